//! Best-effort expression types.
//!
//! ObScript is loosely typed at run time. These types only drive hover and
//! completion, so anything that cannot be determined locally is either
//! [`ExprType::Ambiguous`] (a name resolved outside the script) or
//! [`ExprType::Unknown`].

use obscript_syntax::SyntaxKind;
use serde::{Deserialize, Serialize};

/// The type of an expression or symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprType {
    /// `short`, `int`, `long`, integer and hex literals.
    Integer,
    /// `float` and decimal literals.
    Float,
    /// `string_var` and string literals.
    String,
    /// `array_var`.
    Array,
    /// `ref`/`reference`.
    Reference,
    /// A name that did not resolve inside the script.
    Ambiguous,
    /// Anything else.
    #[default]
    Unknown,
}

impl ExprType {
    /// Maps a type keyword to its type.
    #[must_use]
    pub fn from_keyword(kind: SyntaxKind) -> Option<Self> {
        let ty = match kind {
            SyntaxKind::KwShort | SyntaxKind::KwInt | SyntaxKind::KwLong => Self::Integer,
            SyntaxKind::KwFloat => Self::Float,
            SyntaxKind::KwRef => Self::Reference,
            SyntaxKind::KwStringVar => Self::String,
            SyntaxKind::KwArrayVar => Self::Array,
            _ => return None,
        };
        Some(ty)
    }

    /// Display name used in hover text.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Reference => "reference",
            Self::Ambiguous => "ambiguous",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ExprType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
