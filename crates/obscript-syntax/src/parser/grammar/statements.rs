//! Statement parsing for ObScript.
//!
//! Supported statements (each ends at a newline or the end of input):
//! - Declaration: `float f`, `int i := 3`
//! - Assignment: `set x to expr`, `let x := expr`
//! - `if`/`elseif`/`else`/`endif`
//! - `while ... loop`, `foreach x <- expr ... loop`
//! - `begin BlockType ... end`
//! - `return`, `break`, `continue`
//! - Expression statement: `PlayerRef.AddItem Gold001 10`

use crate::lexer::TokenKind;
use crate::syntax::SyntaxKind;

use super::super::{Parser, TokenSet};
use super::BLOCK_END;

impl Parser<'_> {
    /// Parse a single statement, including its line terminator.
    pub(crate) fn parse_statement(&mut self) {
        match self.current() {
            kind if kind.is_type() => self.parse_var_decl_stmt(),
            TokenKind::KwSet => self.parse_set_stmt(),
            TokenKind::KwLet => self.parse_let_stmt(),
            TokenKind::KwIf => self.parse_if_stmt(),
            TokenKind::KwWhile => self.parse_while_stmt(),
            TokenKind::KwForeach => self.parse_foreach_stmt(),
            TokenKind::KwBegin => self.parse_begin_or_nested(),
            TokenKind::KwReturn => {
                let m = self.start();
                self.bump(TokenKind::KwReturn);
                if self.current().can_start_expr() {
                    self.parse_expression();
                }
                self.expect_newline();
                m.complete(self, SyntaxKind::ReturnStmt);
            }
            TokenKind::KwBreak => self.parse_keyword_stmt(TokenKind::KwBreak, SyntaxKind::BreakStmt),
            TokenKind::KwContinue => {
                self.parse_keyword_stmt(TokenKind::KwContinue, SyntaxKind::ContinueStmt);
            }
            _ => {
                let m = self.start();
                self.parse_expression();
                self.expect_newline();
                m.complete(self, SyntaxKind::ExprStmt);
            }
        }
    }

    fn parse_keyword_stmt(&mut self, keyword: TokenKind, kind: SyntaxKind) {
        let m = self.start();
        self.bump(keyword);
        self.expect_newline();
        m.complete(self, kind);
    }

    /// Parse statements until a block terminator.
    pub(crate) fn parse_stmt_list(&mut self) {
        let m = self.start();
        if self.too_deep() {
            self.err_block_too_deep();
            m.complete(self, SyntaxKind::StmtList);
            return;
        }
        self.nesting += 1;
        while !self.at_end() && !self.at_set(BLOCK_END) {
            if self.eat(TokenKind::Newline) {
                continue;
            }
            self.parse_statement();
        }
        self.nesting -= 1;
        m.complete(self, SyntaxKind::StmtList);
    }

    /// Parse `type name`.
    pub(crate) fn parse_var_decl(&mut self) {
        let m = self.start();
        self.bump_any(); // type
        self.parse_name("expected variable name");
        m.complete(self, SyntaxKind::VarDecl);
    }

    /// Parse a declaration or a plain variable reference.
    pub(crate) fn parse_var_or_var_decl(&mut self, recovery: TokenSet) {
        if self.current().is_type() {
            self.parse_var_decl();
        } else if self.at(TokenKind::Ident) {
            let m = self.start();
            self.bump(TokenKind::Ident);
            m.complete(self, SyntaxKind::NameRef);
        } else {
            self.err_recover("expected variable", recovery);
        }
    }

    /// Parse `type name [:= expr]`.
    fn parse_var_decl_stmt(&mut self) {
        let m = self.start();
        self.parse_var_decl();
        if self.eat(TokenKind::ColonEq) {
            self.parse_expression();
        }
        self.expect_newline();
        m.complete(self, SyntaxKind::VarDeclStmt);
    }

    /// Parse `set target to value`.
    fn parse_set_stmt(&mut self) {
        let m = self.start();
        self.bump(TokenKind::KwSet);
        self.parse_expression();
        if self.expect(TokenKind::KwTo, "expected to") {
            self.parse_expression();
        }
        self.expect_newline();
        m.complete(self, SyntaxKind::SetStmt);
    }

    /// Parse `let expr`.
    fn parse_let_stmt(&mut self) {
        let m = self.start();
        self.bump(TokenKind::KwLet);
        self.parse_expression();
        self.expect_newline();
        m.complete(self, SyntaxKind::LetStmt);
    }

    /// Parse `if cond ... [elseif ...] [else ...] endif`.
    fn parse_if_stmt(&mut self) {
        let m = self.start();
        self.bump(TokenKind::KwIf);
        self.parse_expression();
        self.expect_newline();
        self.parse_stmt_list();
        self.parse_else_chain();
        if self.expect(TokenKind::KwEndIf, "expected endif") {
            self.expect_newline();
        }
        m.complete(self, SyntaxKind::IfStmt);
    }

    /// Branches nest to the right: each `elseif` owns the rest of the chain.
    fn parse_else_chain(&mut self) {
        if self.at(TokenKind::KwElseIf) {
            let m = self.start();
            self.bump(TokenKind::KwElseIf);
            self.parse_expression();
            self.expect_newline();
            self.parse_stmt_list();
            self.parse_else_chain();
            m.complete(self, SyntaxKind::ElseIfBranch);
        } else if self.at(TokenKind::KwElse) {
            let m = self.start();
            self.bump(TokenKind::KwElse);
            self.expect_newline();
            self.parse_stmt_list();
            m.complete(self, SyntaxKind::ElseBranch);
        }
    }

    /// Parse `while cond ... loop`.
    fn parse_while_stmt(&mut self) {
        let m = self.start();
        self.bump(TokenKind::KwWhile);
        self.parse_expression();
        self.expect_newline();
        self.parse_stmt_list();
        if self.expect(TokenKind::KwLoop, "expected loop") {
            self.expect_newline();
        }
        m.complete(self, SyntaxKind::WhileStmt);
    }

    /// Parse `foreach var <- expr ... loop`.
    fn parse_foreach_stmt(&mut self) {
        let m = self.start();
        self.bump(TokenKind::KwForeach);
        self.parse_var_or_var_decl(TokenSet::new(&[TokenKind::LArrow]));
        if self.expect(TokenKind::LArrow, "expected <-") {
            self.parse_expression();
        }
        self.expect_newline();
        self.parse_stmt_list();
        if self.expect(TokenKind::KwLoop, "expected loop") {
            self.expect_newline();
        }
        m.complete(self, SyntaxKind::ForeachStmt);
    }

    fn parse_begin_or_nested(&mut self) {
        if self.begin_depth == 0 {
            self.parse_begin_stmt();
            return;
        }
        let m = self.start();
        self.error("nested begin blocks not allowed");
        self.parse_begin_stmt();
        m.complete(self, SyntaxKind::Error);
    }

    /// Parse `begin BlockType [{params} | args] ... end`.
    fn parse_begin_stmt(&mut self) {
        let m = self.start();
        self.bump(TokenKind::KwBegin);
        self.parse_name("expected block type");
        if self.at(TokenKind::LBrace) {
            self.parse_param_list();
        } else if self.current().can_start_argument() {
            self.parse_bare_args();
        }
        self.expect_newline();
        self.begin_depth += 1;
        self.parse_stmt_list();
        self.begin_depth -= 1;
        if self.expect(TokenKind::KwEnd, "expected end") {
            self.expect_newline();
        }
        m.complete(self, SyntaxKind::BeginStmt);
    }

    /// Parse `{ var, type var, ... }`.
    pub(crate) fn parse_param_list(&mut self) {
        let m = self.start();
        self.bump(TokenKind::LBrace);
        let recovery = TokenSet::new(&[TokenKind::RBrace]);
        while !self.at(TokenKind::RBrace) && !self.at_line_end() {
            self.parse_var_or_var_decl(recovery);
            self.eat(TokenKind::Comma);
        }
        self.expect(TokenKind::RBrace, "expected }");
        m.complete(self, SyntaxKind::ParamList);
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::syntax::SyntaxKind;

    fn kinds_of(source: &str, kind: SyntaxKind) -> usize {
        parse(source)
            .syntax()
            .descendants()
            .filter(|node| node.kind() == kind)
            .count()
    }

    #[test]
    fn test_if_chain_nests_to_the_right() {
        let source = "scn T\nbegin GameMode\nif a\nelseif b\nelseif c\nelse\nendif\nend\n";
        let parse = parse(source);
        assert!(parse.ok(), "errors: {:?}", parse.errors());
        let first = parse
            .syntax()
            .descendants()
            .find(|node| node.kind() == SyntaxKind::ElseIfBranch)
            .unwrap();
        let nested: Vec<_> = first.descendants().skip(1).map(|n| n.kind()).collect();
        assert!(nested.contains(&SyntaxKind::ElseIfBranch));
        assert!(nested.contains(&SyntaxKind::ElseBranch));
    }

    #[test]
    fn test_foreach_with_declared_variable() {
        let source = "scn T\nbegin GameMode\nforeach array_var entry <- list\nprint entry\nloop\nend\n";
        let parse = parse(source);
        assert!(parse.ok(), "errors: {:?}", parse.errors());
        assert_eq!(kinds_of(source, SyntaxKind::ForeachStmt), 1);
        assert_eq!(kinds_of(source, SyntaxKind::VarDecl), 1);
    }

    #[test]
    fn test_begin_with_params_and_args() {
        let source = "scn T\nbegin Function { int a, b }\nend\nbegin MenuMode 1007\nend\n";
        let parse = parse(source);
        assert!(parse.ok(), "errors: {:?}", parse.errors());
        assert_eq!(kinds_of(source, SyntaxKind::ParamList), 1);
        assert_eq!(kinds_of(source, SyntaxKind::ArgList), 1);
    }

    #[test]
    fn test_missing_loop_recovers_at_end() {
        let source = "scn T\nbegin GameMode\nwhile 1\nset x to 1\nend\n";
        let parse = parse(source);
        let messages: Vec<_> = parse.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["expected loop"]);
        assert_eq!(kinds_of(source, SyntaxKind::BeginStmt), 1);
    }
}
