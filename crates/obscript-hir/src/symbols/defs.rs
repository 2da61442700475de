//! Symbol and scope definitions.

use obscript_syntax::ast::SyntaxNodePtr;
use smol_str::SmolStr;
use text_size::TextRange;

use super::SymbolTable;
use crate::types::ExprType;

/// A unique identifier for a symbol within one [`ScopeTree`](super::ScopeTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// A unique identifier for a scope within one [`ScopeTree`](super::ScopeTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// The script scope.
    pub const ROOT: Self = Self(0);
}

/// The kind of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// A variable declared with a type keyword, or a parameter.
    Variable,
    /// A builtin or plugin function.
    Function,
    /// Another script, referenced by name.
    Script,
}

impl SymbolKind {
    /// Display name used in hover text.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Variable => "variable",
            Self::Function => "function",
            Self::Script => "script",
        }
    }
}

/// A declared symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The symbol's name, as written at the declaration.
    pub name: SmolStr,
    /// The kind of symbol.
    pub kind: SymbolKind,
    /// The declared type.
    pub ty: ExprType,
    /// The declaring `VarDecl` node.
    pub decl: SyntaxNodePtr,
    /// The range of the declared name.
    pub name_range: TextRange,
}

/// The kind of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// The whole script.
    Script,
    /// A block body (`if`, `while`, `begin`, lambda bodies...).
    Block,
    /// The header of a `foreach`, holding the loop variable.
    ForeachHeader,
    /// The parameter list of a lambda.
    LambdaParams,
}

/// A scope in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// The scope's id.
    pub id: ScopeId,
    /// Enclosing scope, `None` for the script scope.
    pub parent: Option<ScopeId>,
    /// Nested scopes, in source order.
    pub children: Vec<ScopeId>,
    /// The kind of scope.
    pub kind: ScopeKind,
    /// The node that opens the scope: `Script`, `StmtList`, `ForeachStmt`
    /// or `LambdaExpr`.
    pub node: SyntaxNodePtr,
    /// Symbols declared directly in this scope.
    pub symbols: SymbolTable,
}

/// Case-folds a name for lookup. ObScript names are case-insensitive.
#[must_use]
pub fn normalize_name(name: &str) -> SmolStr {
    SmolStr::new(name.to_ascii_lowercase())
}
