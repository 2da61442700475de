//! Script, statement and declaration nodes.

use rowan::ast::support;
use smol_str::SmolStr;

use super::{ast_node, child_after, child_before, ident_text, Branch, Expr, Stmt};
use super::{ArgList, VarOrVarDecl};
use crate::syntax::{SyntaxKind, SyntaxToken};

ast_node! {
    /// The root of a parsed script.
    Script
}

impl Script {
    /// The `scriptname` declaration, if any.
    #[must_use]
    pub fn name_decl(&self) -> Option<ScriptNameDecl> {
        support::child(&self.syntax)
    }

    /// Top-level statements, in source order.
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> {
        support::children(&self.syntax)
    }
}

ast_node! {
    /// `scriptname Name`
    ScriptNameDecl
}

impl ScriptNameDecl {
    /// The declared script name.
    #[must_use]
    pub fn name(&self) -> Option<Name> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// A block body.
    StmtList
}

impl StmtList {
    /// Statements in the block, in source order.
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> {
        support::children(&self.syntax)
    }
}

ast_node! {
    /// `type name`
    VarDecl
}

impl VarDecl {
    /// The type keyword token.
    #[must_use]
    pub fn type_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(rowan::NodeOrToken::into_token)
            .find(|token| token.kind().is_type())
    }

    /// The declared name.
    #[must_use]
    pub fn name(&self) -> Option<Name> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// `type name [:= expr]`
    VarDeclStmt
}

impl VarDeclStmt {
    /// The declaration part.
    #[must_use]
    pub fn var_decl(&self) -> Option<VarDecl> {
        support::child(&self.syntax)
    }

    /// The initializer after `:=`.
    #[must_use]
    pub fn initializer(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// `set target to value`
    SetStmt
}

impl SetStmt {
    /// The assigned expression (before `to`).
    #[must_use]
    pub fn target(&self) -> Option<Expr> {
        child_before(&self.syntax, self.to_token().as_ref())
    }

    /// The value expression (after `to`).
    #[must_use]
    pub fn value(&self) -> Option<Expr> {
        child_after(&self.syntax, &self.to_token()?)
    }

    /// The `to` keyword.
    #[must_use]
    pub fn to_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::KwTo)
    }
}

ast_node! {
    /// `let expr`
    LetStmt
}

impl LetStmt {
    /// The expression.
    #[must_use]
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// `if cond ... endif`
    IfStmt
}

impl IfStmt {
    /// The condition expression.
    #[must_use]
    pub fn condition(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    /// The block body.
    #[must_use]
    pub fn body(&self) -> Option<StmtList> {
        support::child(&self.syntax)
    }

    /// The first `elseif` or `else` branch.
    #[must_use]
    pub fn branch(&self) -> Option<Branch> {
        support::child(&self.syntax)
    }

    /// The closing `endif`, `None` when it is missing.
    #[must_use]
    pub fn endif_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::KwEndIf)
    }
}

ast_node! {
    /// `elseif cond ...` followed by the rest of the chain.
    ElseIfBranch
}

impl ElseIfBranch {
    /// The condition expression.
    #[must_use]
    pub fn condition(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    /// The block body.
    #[must_use]
    pub fn body(&self) -> Option<StmtList> {
        support::child(&self.syntax)
    }

    /// The next branch in the chain.
    #[must_use]
    pub fn branch(&self) -> Option<Branch> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// `else ...`
    ElseBranch
}

impl ElseBranch {
    /// The block body.
    #[must_use]
    pub fn body(&self) -> Option<StmtList> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// `while cond ... loop`
    WhileStmt
}

impl WhileStmt {
    /// The condition expression.
    #[must_use]
    pub fn condition(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    /// The block body.
    #[must_use]
    pub fn body(&self) -> Option<StmtList> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// `foreach var <- expr ... loop`
    ForeachStmt
}

impl ForeachStmt {
    /// The loop variable, declared here or referenced.
    #[must_use]
    pub fn variable(&self) -> Option<VarOrVarDecl> {
        child_before(&self.syntax, self.arrow_token().as_ref())
    }

    /// The collection being iterated.
    #[must_use]
    pub fn iterable(&self) -> Option<Expr> {
        child_after(&self.syntax, &self.arrow_token()?)
    }

    /// The `<-` token.
    #[must_use]
    pub fn arrow_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::LArrow)
    }

    /// The block body.
    #[must_use]
    pub fn body(&self) -> Option<StmtList> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// `begin BlockType [args] ... end`
    BeginStmt
}

impl BeginStmt {
    /// The block type (`GameMode`, `OnActivate`, `Function`, ...).
    #[must_use]
    pub fn block_type(&self) -> Option<Name> {
        support::child(&self.syntax)
    }

    /// The `{...}` parameter list.
    #[must_use]
    pub fn param_list(&self) -> Option<ParamList> {
        support::child(&self.syntax)
    }

    /// Bare block arguments, as in `begin OnActivate player`.
    #[must_use]
    pub fn arg_list(&self) -> Option<ArgList> {
        support::child(&self.syntax)
    }

    /// The block body.
    #[must_use]
    pub fn body(&self) -> Option<StmtList> {
        support::child(&self.syntax)
    }

    /// The closing `end`.
    #[must_use]
    pub fn end_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::KwEnd)
    }
}

ast_node! {
    /// `{ var, type var, ... }`
    ParamList
}

impl ParamList {
    /// Parameters, in declaration order.
    pub fn params(&self) -> impl Iterator<Item = VarOrVarDecl> {
        support::children(&self.syntax)
    }
}

ast_node! {
    /// `return [expr]`
    ReturnStmt
}

impl ReturnStmt {
    /// The expression.
    #[must_use]
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// `break`
    BreakStmt
}

ast_node! {
    /// `continue`
    ContinueStmt
}

ast_node! {
    /// An expression used as a statement.
    ExprStmt
}

impl ExprStmt {
    /// The expression.
    #[must_use]
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// A declared name.
    Name
}

impl Name {
    /// The identifier token.
    #[must_use]
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Ident)
    }

    /// The name as written.
    #[must_use]
    pub fn text(&self) -> SmolStr {
        ident_text(&self.syntax)
    }
}

impl Stmt {
    /// Returns the body of a block statement.
    #[must_use]
    pub fn body(&self) -> Option<StmtList> {
        match self {
            Stmt::IfStmt(it) => it.body(),
            Stmt::WhileStmt(it) => it.body(),
            Stmt::ForeachStmt(it) => it.body(),
            Stmt::BeginStmt(it) => it.body(),
            _ => None,
        }
    }
}
