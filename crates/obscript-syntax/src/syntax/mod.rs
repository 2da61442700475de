//! Syntax tree types for ObScript.
//!
//! This module provides the `rowan`-based syntax tree implementation,
//! including the `SyntaxKind` enum that covers both tokens and composite nodes.

use crate::lexer::TokenKind;
use crate::token_kinds::for_each_token_kind;

macro_rules! define_syntax_kind {
    ($($token:ident),* $(,)?) => {
        /// All syntax node and token kinds in ObScript.
        ///
        /// This enum includes both token kinds (from the lexer) and composite
        /// node kinds (produced by the parser).
        // Variants mirror lexer/token names; documenting each would be noisy.
        #[allow(missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum SyntaxKind {
            // =========================================================================
            // TOKEN KINDS (mirrors TokenKind)
            // =========================================================================
            $($token,)*

            // COMPOSITE NODE KINDS (produced by parser)
            // =========================================================================
            /// Root node of a script file
            Script,

            /// Root node of a standalone expression parse
            ExprRoot,

            /// Tokens the parser could not place
            Error,

            /// `scriptname Name`
            ScriptNameDecl,

            /// Statement list that forms a block body
            StmtList,

            /// `type name`
            VarDecl,

            /// `type name [:= expr]` as a statement
            VarDeclStmt,

            /// `set target to value`
            SetStmt,

            /// `let expr`
            LetStmt,

            /// `if cond ... endif`
            IfStmt,

            /// `elseif cond ...`
            ElseIfBranch,

            /// `else ...`
            ElseBranch,

            /// `while cond ... loop`
            WhileStmt,

            /// `foreach var <- expr ... loop`
            ForeachStmt,

            /// `begin BlockType [args] ... end`
            BeginStmt,

            /// `{ var, type var, ... }`
            ParamList,

            ReturnStmt,
            BreakStmt,
            ContinueStmt,
            ExprStmt,

            /// A declared name
            Name,

            /// A name used in an expression
            NameRef,

            Literal,
            BinExpr,
            UnaryExpr,
            ParenExpr,

            /// `a.b`, `a->b`, `a[b]`
            MemberExpr,

            /// `Func arg arg` or `Func(arg, arg)`
            FuncExpr,

            ArgList,

            /// `(begin Function {params} ... end)`
            LambdaExpr,
        }
    };
}

for_each_token_kind!(define_syntax_kind);

impl SyntaxKind {
    /// Returns `true` for whitespace and comments.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    /// Returns `true` for newline runs.
    #[must_use]
    pub fn is_newline(self) -> bool {
        self == Self::Newline
    }

    /// Returns `true` for literal tokens.
    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Number | Self::HexNumber | Self::String)
    }

    /// Returns `true` for operators and punctuation.
    #[must_use]
    pub fn is_operator(self) -> bool {
        (self as u16) >= (Self::ColonEq as u16) && (self as u16) <= (Self::RBrace as u16)
    }

    /// Returns `true` for the assignment operators (`:=`, `+=`, ...).
    #[must_use]
    pub fn is_assign_op(self) -> bool {
        (self as u16) >= (Self::ColonEq as u16) && (self as u16) <= (Self::PercentEq as u16)
    }

    /// Returns `true` for statement keywords.
    #[must_use]
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::KwScriptName as u16) && (self as u16) <= (Self::KwLet as u16)
    }

    /// Returns `true` for variable type names.
    #[must_use]
    pub fn is_type(self) -> bool {
        (self as u16) >= (Self::KwShort as u16) && (self as u16) <= (Self::KwArrayVar as u16)
    }

    /// Returns `true` for token kinds.
    #[must_use]
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::Eof as u16)
    }

    /// Returns `true` for composite node kinds.
    #[must_use]
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns `true` for expression node kinds.
    #[must_use]
    pub fn is_expr(self) -> bool {
        matches!(
            self,
            Self::NameRef
                | Self::Literal
                | Self::BinExpr
                | Self::UnaryExpr
                | Self::ParenExpr
                | Self::MemberExpr
                | Self::FuncExpr
                | Self::LambdaExpr
        )
    }

    /// Returns `true` for statement node kinds.
    #[must_use]
    pub fn is_stmt(self) -> bool {
        matches!(
            self,
            Self::VarDeclStmt
                | Self::SetStmt
                | Self::LetStmt
                | Self::IfStmt
                | Self::WhileStmt
                | Self::ForeachStmt
                | Self::BeginStmt
                | Self::ReturnStmt
                | Self::BreakStmt
                | Self::ContinueStmt
                | Self::ExprStmt
        )
    }

    /// Returns `true` for nodes that open a lexical scope.
    #[must_use]
    pub fn is_scope(self) -> bool {
        matches!(
            self,
            Self::Script | Self::StmtList | Self::LambdaExpr | Self::ForeachStmt
        )
    }

    /// Every kind, in discriminant order.
    #[must_use]
    pub fn all() -> &'static [SyntaxKind] {
        SYNTAX_KINDS
    }
}

macro_rules! map_token_kinds {
    ($($name:ident),* $(,)?) => {
        impl From<TokenKind> for SyntaxKind {
            fn from(kind: TokenKind) -> Self {
                match kind {
                    $(TokenKind::$name => SyntaxKind::$name,)*
                }
            }
        }
    };
}

for_each_token_kind!(map_token_kinds);

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// The language marker for `rowan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObsLanguage {}

macro_rules! define_syntax_kinds {
    ($($token:ident),* $(,)?) => {
        const SYNTAX_KINDS: &[SyntaxKind] = &[
            $(SyntaxKind::$token,)*
            SyntaxKind::Script,
            SyntaxKind::ExprRoot,
            SyntaxKind::Error,
            SyntaxKind::ScriptNameDecl,
            SyntaxKind::StmtList,
            SyntaxKind::VarDecl,
            SyntaxKind::VarDeclStmt,
            SyntaxKind::SetStmt,
            SyntaxKind::LetStmt,
            SyntaxKind::IfStmt,
            SyntaxKind::ElseIfBranch,
            SyntaxKind::ElseBranch,
            SyntaxKind::WhileStmt,
            SyntaxKind::ForeachStmt,
            SyntaxKind::BeginStmt,
            SyntaxKind::ParamList,
            SyntaxKind::ReturnStmt,
            SyntaxKind::BreakStmt,
            SyntaxKind::ContinueStmt,
            SyntaxKind::ExprStmt,
            SyntaxKind::Name,
            SyntaxKind::NameRef,
            SyntaxKind::Literal,
            SyntaxKind::BinExpr,
            SyntaxKind::UnaryExpr,
            SyntaxKind::ParenExpr,
            SyntaxKind::MemberExpr,
            SyntaxKind::FuncExpr,
            SyntaxKind::ArgList,
            SyntaxKind::LambdaExpr,
        ];
    };
}

for_each_token_kind!(define_syntax_kinds);

impl rowan::Language for ObsLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SYNTAX_KINDS
            .get(raw.0 as usize)
            .copied()
            .unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// A syntax node in the ObScript syntax tree.
pub type SyntaxNode = rowan::SyntaxNode<ObsLanguage>;

/// A syntax token in the ObScript syntax tree.
pub type SyntaxToken = rowan::SyntaxToken<ObsLanguage>;

/// Either a node or a token.
pub type SyntaxElement = rowan::SyntaxElement<ObsLanguage>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn test_token_kind_to_syntax_kind() {
        assert_eq!(SyntaxKind::from(TokenKind::KwBegin), SyntaxKind::KwBegin);
        assert_eq!(SyntaxKind::from(TokenKind::Ident), SyntaxKind::Ident);
        assert_eq!(SyntaxKind::from(TokenKind::ColonEq), SyntaxKind::ColonEq);
        assert_eq!(SyntaxKind::from(TokenKind::Eof), SyntaxKind::Eof);
    }

    #[test]
    fn test_discriminants_line_up() {
        for (index, kind) in SyntaxKind::all().iter().enumerate() {
            assert_eq!(*kind as usize, index, "{kind:?} out of order");
            assert_eq!(ObsLanguage::kind_from_raw(ObsLanguage::kind_to_raw(*kind)), *kind);
        }
    }

    #[test]
    fn test_is_trivia() {
        assert!(SyntaxKind::Whitespace.is_trivia());
        assert!(SyntaxKind::Comment.is_trivia());
        assert!(!SyntaxKind::Newline.is_trivia());
        assert!(!SyntaxKind::Ident.is_trivia());
    }

    #[test]
    fn test_is_token_vs_node() {
        for kind in SyntaxKind::all() {
            assert_ne!(kind.is_token(), kind.is_node(), "{kind:?}");
        }
        assert!(SyntaxKind::KwIf.is_token());
        assert!(SyntaxKind::IfStmt.is_node());
        assert!(SyntaxKind::Script.is_node());
    }

    #[test]
    fn test_families_are_exclusive() {
        for kind in SyntaxKind::all() {
            let families = [
                kind.is_trivia(),
                kind.is_newline(),
                kind.is_literal(),
                kind.is_operator(),
                kind.is_keyword(),
                kind.is_type(),
            ];
            assert!(
                families.iter().filter(|b| **b).count() <= 1,
                "{kind:?} in more than one family"
            );
            if kind.is_node() {
                assert!(families.iter().all(|b| !b), "{kind:?} is a node");
            }
            assert!(!(kind.is_expr() && kind.is_stmt()), "{kind:?}");
            if kind.is_assign_op() {
                assert!(kind.is_operator());
            }
        }
    }
}
