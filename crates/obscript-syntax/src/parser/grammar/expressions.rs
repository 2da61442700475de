//! Expression parsing using Pratt parsing.
//!
//! Operator precedence (low to high):
//! - `:=`, `+=`, `-=`, `*=`, `/=`, `^=`, `|=`, `&=`, `%=` (2-1, right associative)
//! - `||` (3-4)
//! - `&&` (5-6)
//! - `:` (7-8)
//! - `==`, `!=` (9-10)
//! - `<`, `>`, `<=`, `>=` (11-12)
//! - `|` (13-14)
//! - `&` (15-16)
//! - `<<`, `>>` (17-18)
//! - `+`, `-` (19-20)
//! - `*`, `/`, `%` (21-22)
//! - `^` (24-23, right associative)
//! - prefix `!`, `-`, `$`, `#`, `*`, `&` (25)
//! - postfix `.`, `->`, `[...]`
//!
//! An identifier followed by something that can start an argument is a call:
//! `GetItemCount Gold001` is `FuncExpr(GetItemCount, [Gold001])`. Arguments
//! are parsed at prefix level, so `GetStage Quest > 10` compares the call
//! result. Identifiers flagged by the function hints are calls even without
//! arguments.

use crate::lexer::TokenKind;
use crate::syntax::SyntaxKind;

use super::super::{CompletedMarker, Parser, TokenSet};
use super::BLOCK_END;

/// Tokens that end an expression without being consumed by the error path.
const EXPR_STOP: TokenSet = TokenSet::new(&[
    TokenKind::RParen,
    TokenKind::RBracket,
    TokenKind::RBrace,
    TokenKind::Comma,
    TokenKind::KwTo,
    TokenKind::LArrow,
])
.union(BLOCK_END);

impl Parser<'_> {
    /// Parse an expression using Pratt parsing.
    pub(crate) fn parse_expression(&mut self) -> Option<CompletedMarker> {
        self.parse_expr_bp(0)
    }

    /// Parse expression with minimum binding power.
    pub(crate) fn parse_expr_bp(&mut self, min_bp: u8) -> Option<CompletedMarker> {
        let mut lhs = self.parse_unary_expr(true)?;
        let outer_nesting = self.nesting;

        loop {
            let op = self.current();
            let Some((l_bp, r_bp)) = op.infix_binding_power() else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            // Each operator deepens the left operand's chain.
            if self.too_deep() {
                self.err_expr_too_deep();
                break;
            }
            self.nesting += 1;

            let marker = lhs.precede(self);
            self.bump_any(); // operator
            self.parse_expr_bp(r_bp);
            lhs = marker.complete(self, SyntaxKind::BinExpr);
        }

        self.nesting = outer_nesting;
        Some(lhs)
    }

    /// Parse a prefix expression. With `calls` unset, identifiers never
    /// start a call (used for bare arguments).
    fn parse_unary_expr(&mut self, calls: bool) -> Option<CompletedMarker> {
        if self.too_deep() {
            return Some(self.err_expr_too_deep());
        }
        self.nesting += 1;
        let expr = self.parse_unary_expr_inner(calls);
        self.nesting -= 1;
        expr
    }

    fn parse_unary_expr_inner(&mut self, calls: bool) -> Option<CompletedMarker> {
        if let Some(bp) = self.current().prefix_binding_power() {
            let marker = self.start();
            self.bump_any();
            if calls {
                self.parse_expr_bp(bp);
            } else {
                self.parse_unary_expr(false);
            }
            return Some(marker.complete(self, SyntaxKind::UnaryExpr));
        }

        let primary = self.parse_primary_expr(calls)?;
        Some(self.parse_postfix_expr(primary, calls))
    }

    /// Parse postfix member access and indexing, left-nested.
    fn parse_postfix_expr(&mut self, mut lhs: CompletedMarker, calls: bool) -> CompletedMarker {
        let outer_nesting = self.nesting;
        loop {
            let at_postfix = matches!(
                self.current(),
                TokenKind::Dot | TokenKind::Arrow | TokenKind::LBracket
            );
            if at_postfix && self.too_deep() {
                self.err_expr_too_deep();
                break;
            }
            self.nesting += 1;
            match self.current() {
                TokenKind::Dot | TokenKind::Arrow => {
                    let marker = lhs.precede(self);
                    self.bump_any();
                    if self.at(TokenKind::Ident) {
                        self.parse_name_ref_or_call(calls);
                    } else {
                        self.error("expected member name");
                    }
                    lhs = marker.complete(self, SyntaxKind::MemberExpr);
                }
                TokenKind::LBracket => {
                    let marker = lhs.precede(self);
                    self.bump(TokenKind::LBracket);
                    self.parse_expression();
                    self.expect(TokenKind::RBracket, "expected ]");
                    lhs = marker.complete(self, SyntaxKind::MemberExpr);
                }
                _ => break,
            }
        }
        self.nesting = outer_nesting;
        lhs
    }

    /// Parse primary expressions (literals, names, calls, parentheses, lambdas).
    fn parse_primary_expr(&mut self, calls: bool) -> Option<CompletedMarker> {
        match self.current() {
            kind if kind.is_literal() => {
                let marker = self.start();
                self.bump_any();
                Some(marker.complete(self, SyntaxKind::Literal))
            }
            TokenKind::Ident => Some(self.parse_name_ref_or_call(calls)),
            TokenKind::LParen if self.nth(1) == TokenKind::KwBegin => {
                Some(self.parse_lambda_expr())
            }
            TokenKind::LParen => {
                let marker = self.start();
                self.paren_depth += 1;
                self.bump(TokenKind::LParen);
                self.parse_expression();
                self.paren_depth -= 1;
                self.expect(TokenKind::RParen, "expected )");
                Some(marker.complete(self, SyntaxKind::ParenExpr))
            }
            _ if self.at_line_end() || self.at_set(EXPR_STOP) => {
                self.error("expected expression");
                None
            }
            _ => {
                let marker = self.start();
                self.error("expected expression");
                self.bump_any();
                Some(marker.complete(self, SyntaxKind::Error))
            }
        }
    }

    /// Parse an identifier, turning it into a call when arguments follow or
    /// the identifier is a known function.
    fn parse_name_ref_or_call(&mut self, calls: bool) -> CompletedMarker {
        let known_function = self.at_known_function();
        let marker = self.start();
        self.bump(TokenKind::Ident);
        let name = marker.complete(self, SyntaxKind::NameRef);

        if !calls || !(known_function || self.current().can_start_argument()) {
            return name;
        }

        let call = name.precede(self);
        let args = self.start();
        if self.at(TokenKind::LParen) && self.nth(1) != TokenKind::KwBegin {
            self.parse_paren_args();
        } else {
            self.parse_arg_sequence();
        }
        args.complete(self, SyntaxKind::ArgList);
        call.complete(self, SyntaxKind::FuncExpr)
    }

    /// Parse `(arg, arg, ...)`; each argument is a full expression.
    fn parse_paren_args(&mut self) {
        self.paren_depth += 1;
        self.bump(TokenKind::LParen);
        let recovery = TokenSet::new(&[TokenKind::RParen]);
        while !self.at(TokenKind::RParen) && !self.at_line_end() {
            if self.current().can_start_expr() {
                self.parse_expression();
            } else {
                self.err_recover("expected argument", recovery);
            }
            self.eat(TokenKind::Comma);
        }
        self.paren_depth -= 1;
        self.expect(TokenKind::RParen, "expected )");
    }

    /// Parse bare arguments as a standalone `ArgList` (begin block arguments).
    pub(crate) fn parse_bare_args(&mut self) {
        let marker = self.start();
        self.parse_arg_sequence();
        marker.complete(self, SyntaxKind::ArgList);
    }

    /// Parse whitespace separated arguments with optional commas.
    fn parse_arg_sequence(&mut self) {
        let mut after_comma = false;
        while self.current().can_start_argument()
            || (after_comma && self.current().can_start_expr())
        {
            self.parse_unary_expr(false);
            after_comma = self.eat(TokenKind::Comma);
        }
    }

    /// Parse `(begin BlockType [{params}] NL ... end)`.
    fn parse_lambda_expr(&mut self) -> CompletedMarker {
        let marker = self.start();
        let outer_paren_depth = std::mem::take(&mut self.paren_depth);
        self.bump(TokenKind::LParen);
        self.bump(TokenKind::KwBegin);
        self.parse_name("expected block type");
        if self.at(TokenKind::LBrace) {
            self.parse_param_list();
        }
        self.expect_newline();
        self.begin_depth += 1;
        self.parse_stmt_list();
        self.begin_depth -= 1;
        self.expect(TokenKind::KwEnd, "expected end");
        self.paren_depth = outer_paren_depth;
        self.expect(TokenKind::RParen, "expected )");
        marker.complete(self, SyntaxKind::LambdaExpr)
    }
}
