//! Expression nodes.

use rowan::ast::support;
use smol_str::SmolStr;

use super::{ast_node, child_after, child_before, ident_text, Expr, Name, ParamList, StmtList};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

/// First non-trivia token directly under `node` that satisfies `pred`.
fn token_where(node: &SyntaxNode, pred: impl Fn(SyntaxKind) -> bool) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token)
        .find(|token| !token.kind().is_trivia() && pred(token.kind()))
}

ast_node! {
    /// A name used in an expression.
    NameRef
}

impl NameRef {
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

/// The lexical form of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// `42`, `1.5`
    Number,
    /// `0xFF`
    HexNumber,
    /// `"text"` or `'text'`
    String,
}

ast_node! {
    /// A number or string literal.
    Literal
}

impl Literal {
    /// The literal token.
    #[must_use]
    pub fn token(&self) -> Option<SyntaxToken> {
        token_where(&self.syntax, SyntaxKind::is_literal)
    }

    /// Which kind of literal this is.
    #[must_use]
    pub fn kind(&self) -> Option<LiteralKind> {
        match self.token()?.kind() {
            SyntaxKind::Number => Some(LiteralKind::Number),
            SyntaxKind::HexNumber => Some(LiteralKind::HexNumber),
            SyntaxKind::String => Some(LiteralKind::String),
            _ => None,
        }
    }
}

ast_node! {
    /// `lhs op rhs`, including assignments.
    BinExpr
}

impl BinExpr {
    /// The operand left of the operator.
    #[must_use]
    pub fn lhs(&self) -> Option<Expr> {
        child_before(&self.syntax, self.op_token().as_ref())
    }

    /// The operand right of the operator.
    #[must_use]
    pub fn rhs(&self) -> Option<Expr> {
        child_after(&self.syntax, &self.op_token()?)
    }

    /// The operator token.
    #[must_use]
    pub fn op_token(&self) -> Option<SyntaxToken> {
        token_where(&self.syntax, SyntaxKind::is_operator)
    }

    /// The operator kind.
    #[must_use]
    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.op_token().map(|token| token.kind())
    }
}

ast_node! {
    /// `op expr`
    UnaryExpr
}

impl UnaryExpr {
    /// The operator token.
    #[must_use]
    pub fn op_token(&self) -> Option<SyntaxToken> {
        token_where(&self.syntax, SyntaxKind::is_operator)
    }

    /// The operand.
    #[must_use]
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// `(expr)`
    ParenExpr
}

impl ParenExpr {
    /// The inner expression.
    #[must_use]
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

ast_node! {
    /// `base.member`, `base->member` or `base[index]`
    MemberExpr
}

impl MemberExpr {
    /// The accessed expression.
    #[must_use]
    pub fn base(&self) -> Option<Expr> {
        child_before(&self.syntax, self.op_token().as_ref())
    }

    /// The member name, call, or index expression.
    #[must_use]
    pub fn member(&self) -> Option<Expr> {
        child_after(&self.syntax, &self.op_token()?)
    }

    /// `.`, `->` or `[`.
    #[must_use]
    pub fn op_token(&self) -> Option<SyntaxToken> {
        token_where(&self.syntax, |kind| {
            matches!(kind, SyntaxKind::Dot | SyntaxKind::Arrow | SyntaxKind::LBracket)
        })
    }

    /// Returns `true` for `base[index]`.
    #[must_use]
    pub fn is_index(&self) -> bool {
        self.op_token()
            .is_some_and(|token| token.kind() == SyntaxKind::LBracket)
    }
}

ast_node! {
    /// `Func arg arg` or `Func(arg, arg)`
    FuncExpr
}

impl FuncExpr {
    /// The called name.
    #[must_use]
    pub fn name_ref(&self) -> Option<NameRef> {
        support::child(&self.syntax)
    }

    /// The argument list, empty for a call without arguments.
    #[must_use]
    pub fn arg_list(&self) -> Option<ArgList> {
        support::child(&self.syntax)
    }

    /// Arguments, in order.
    pub fn args(&self) -> impl Iterator<Item = Expr> {
        self.arg_list().into_iter().flat_map(|list| list.args())
    }
}

ast_node! {
    /// Call arguments.
    ArgList
}

impl ArgList {
    /// Argument expressions, in order.
    pub fn args(&self) -> impl Iterator<Item = Expr> {
        support::children(&self.syntax)
    }
}

ast_node! {
    /// `(begin Function {params} ... end)`
    LambdaExpr
}

impl LambdaExpr {
    /// The block type after `begin`, normally `Function`.
    #[must_use]
    pub fn block_type(&self) -> Option<Name> {
        support::child(&self.syntax)
    }

    /// The `{ ... }` parameters.
    #[must_use]
    pub fn param_list(&self) -> Option<ParamList> {
        support::child(&self.syntax)
    }

    /// The statements between the header and `end`.
    #[must_use]
    pub fn body(&self) -> Option<StmtList> {
        support::child(&self.syntax)
    }
}
