//! Grammar rules for ObScript.
//!
//! This module contains the grammar rules organized by category:
//!
//! - `mod.rs` - Entry points and the script level
//! - `statements.rs` - Statement parsing
//! - `expressions.rs` - Expression parsing (Pratt parser)

mod expressions;
mod statements;

use crate::lexer::TokenKind;
use crate::syntax::SyntaxKind;

use super::{Parser, TokenSet};

/// Tokens that close a block body.
pub(crate) const BLOCK_END: TokenSet = TokenSet::new(&[
    TokenKind::KwEnd,
    TokenKind::KwEndIf,
    TokenKind::KwElseIf,
    TokenKind::KwElse,
    TokenKind::KwLoop,
]);

impl Parser<'_> {
    /// Parse a whole script.
    pub(crate) fn parse_script(&mut self) {
        let m = self.start();

        while self.eat(TokenKind::Newline) {}

        if self.at(TokenKind::KwScriptName) {
            self.parse_script_name_decl();
        } else {
            self.error("expected script name declaration");
        }

        while !self.at_end() {
            if self.eat(TokenKind::Newline) {
                continue;
            }
            match self.current() {
                TokenKind::KwScriptName => {
                    self.error("duplicate script name declaration");
                    self.parse_script_name_decl();
                }
                kind if BLOCK_END.contains(kind) => {
                    self.err_recover(&format!("unexpected {}", closer_name(kind)), TokenSet::EMPTY);
                }
                kind => {
                    if !is_top_level_statement(kind) {
                        self.warning("statement not allowed at top level");
                    }
                    self.parse_statement();
                }
            }
        }

        m.complete(self, SyntaxKind::Script);
    }

    /// Parse `scriptname Name`.
    fn parse_script_name_decl(&mut self) {
        let m = self.start();
        self.bump(TokenKind::KwScriptName);
        self.parse_name("expected script name");
        self.expect_newline();
        m.complete(self, SyntaxKind::ScriptNameDecl);
    }

    /// Parse a standalone expression.
    pub(crate) fn parse_expr_root(&mut self) {
        let m = self.start();
        while self.eat(TokenKind::Newline) {}
        self.parse_expression();
        while self.eat(TokenKind::Newline) {}
        if !self.at_end() {
            let junk = self.start();
            self.error("unexpected input after expression");
            while !self.at_end() {
                self.bump_any();
            }
            junk.complete(self, SyntaxKind::Error);
        }
        m.complete(self, SyntaxKind::ExprRoot);
    }

    /// Parse a declared name.
    pub(crate) fn parse_name(&mut self, message: &str) {
        let m = self.start();
        if self.eat(TokenKind::Ident) {
            m.complete(self, SyntaxKind::Name);
        } else {
            m.abandon(self);
            self.error(message);
        }
    }
}

fn is_top_level_statement(kind: TokenKind) -> bool {
    kind.is_type() || matches!(kind, TokenKind::KwSet | TokenKind::KwLet | TokenKind::KwBegin)
}

fn closer_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::KwEnd => "end",
        TokenKind::KwEndIf => "endif",
        TokenKind::KwElseIf => "elseif",
        TokenKind::KwElse => "else",
        TokenKind::KwLoop => "loop",
        _ => "token",
    }
}
