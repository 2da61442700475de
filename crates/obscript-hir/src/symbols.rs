//! Scopes and symbol tables.
//!
//! Every script owns a [`ScopeTree`]: an arena of scopes linked by id, each
//! with its own [`SymbolTable`]. The tree is rebuilt from scratch whenever
//! the script is lowered again.

mod defs;
mod table;

pub use defs::*;
pub use table::{ScopeTree, SymbolTable};
