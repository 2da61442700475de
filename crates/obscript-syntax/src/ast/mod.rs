//! Typed views over the syntax tree.
//!
//! Every wrapper is a zero-cost newtype around a [`SyntaxNode`] of one kind.
//! Accessors never fail: a child the parser could not produce comes back as
//! `None` or an empty iterator.
//!
//! # Example
//!
//! ```
//! use obscript_syntax::ast::{AstNode, Stmt};
//! use obscript_syntax::parse;
//!
//! let parse = parse("scn Demo\nfloat f\nset f to 1.5\n");
//! let script = parse.script().unwrap();
//! assert_eq!(script.name_decl().and_then(|d| d.name()).unwrap().text(), "Demo");
//! assert!(matches!(script.stmts().nth(1), Some(Stmt::SetStmt(_))));
//! ```

mod expr;
mod stmt;

pub use expr::{
    ArgList, BinExpr, FuncExpr, LambdaExpr, Literal, LiteralKind, MemberExpr, NameRef, ParenExpr,
    UnaryExpr,
};
pub use rowan::ast::{AstNode, AstPtr};
pub use stmt::{
    BeginStmt, BreakStmt, ContinueStmt, ElseBranch, ElseIfBranch, ExprStmt, ForeachStmt, IfStmt,
    LetStmt, Name, ParamList, ReturnStmt, Script, ScriptNameDecl, SetStmt, StmtList, VarDecl,
    VarDeclStmt, WhileStmt,
};

use smol_str::SmolStr;

use crate::syntax::{ObsLanguage, SyntaxKind, SyntaxNode, SyntaxToken};

/// A position-independent pointer to a node of any kind.
pub type SyntaxNodePtr = rowan::ast::SyntaxNodePtr<ObsLanguage>;

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) syntax: $crate::syntax::SyntaxNode,
        }

        impl rowan::ast::AstNode for $name {
            type Language = $crate::syntax::ObsLanguage;

            fn can_cast(kind: $crate::syntax::SyntaxKind) -> bool {
                kind == $crate::syntax::SyntaxKind::$name
            }

            fn cast(syntax: $crate::syntax::SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &$crate::syntax::SyntaxNode {
                &self.syntax
            }
        }
    };
}

macro_rules! ast_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),* $(,)? }) => {
        $(#[$meta])*
        #[allow(missing_docs)]
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($variant),)*
        }

        impl AstNode for $name {
            type Language = ObsLanguage;

            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$variant)|*)
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                let node = match syntax.kind() {
                    $(SyntaxKind::$variant => Self::$variant($variant { syntax }),)*
                    _ => return None,
                };
                Some(node)
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Self::$variant(it) => &it.syntax,)*
                }
            }
        }

        $(
            impl From<$variant> for $name {
                fn from(it: $variant) -> Self {
                    Self::$variant(it)
                }
            }
        )*
    };
}

pub(crate) use ast_node;

ast_enum! {
    /// Any statement.
    Stmt {
        VarDeclStmt,
        SetStmt,
        LetStmt,
        IfStmt,
        WhileStmt,
        ForeachStmt,
        BeginStmt,
        ReturnStmt,
        BreakStmt,
        ContinueStmt,
        ExprStmt,
    }
}

ast_enum! {
    /// Any expression.
    Expr {
        NameRef,
        Literal,
        BinExpr,
        UnaryExpr,
        ParenExpr,
        MemberExpr,
        FuncExpr,
        LambdaExpr,
    }
}

ast_enum! {
    /// An expression that needs no operator to delimit it.
    PrimaryExpr {
        NameRef,
        Literal,
        ParenExpr,
        FuncExpr,
        LambdaExpr,
    }
}

ast_enum! {
    /// A loop variable or parameter: either declared in place or referenced.
    VarOrVarDecl {
        NameRef,
        VarDecl,
    }
}

ast_enum! {
    /// The tail of an `if` chain.
    Branch {
        ElseIfBranch,
        ElseBranch,
    }
}

/// Text of the identifier token directly under `node`.
pub(crate) fn ident_text(node: &SyntaxNode) -> SmolStr {
    rowan::ast::support::token(node, SyntaxKind::Ident)
        .map(|token| SmolStr::new(token.text()))
        .unwrap_or_default()
}

/// The first child of type `N` that starts after `token`.
pub(crate) fn child_after<N: AstNode<Language = ObsLanguage>>(
    parent: &SyntaxNode,
    token: &SyntaxToken,
) -> Option<N> {
    let offset = token.text_range().end();
    parent
        .children()
        .filter(|child| child.text_range().start() >= offset)
        .find_map(N::cast)
}

/// The first child of type `N` that ends before `token`.
pub(crate) fn child_before<N: AstNode<Language = ObsLanguage>>(
    parent: &SyntaxNode,
    token: Option<&SyntaxToken>,
) -> Option<N> {
    let limit = token.map(|t| t.text_range().start());
    parent
        .children()
        .filter(|child| limit.is_none_or(|limit| child.text_range().end() <= limit))
        .find_map(N::cast)
}
