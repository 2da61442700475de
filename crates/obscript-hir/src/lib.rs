//! `obscript-hir` - Lowering and name resolution for ObScript.
//!
//! This crate builds on `obscript-syntax`:
//!
//! - **Lowering**: the typed AST becomes a [`Script`] with literal values,
//!   classified operators and best-effort types
//! - **Scopes**: a [`ScopeTree`] per script, with case-insensitive lookup
//! - **Globals**: builtins, forms and script names shared by all files
//! - **Database**: open files, reparsed and relowered on every change
//!
//! # Example
//!
//! ```
//! use obscript_hir::{Database, ExprType, SourceKey};
//!
//! let mut db = Database::default();
//! let file = db.open(SourceKey::from_virtual("demo"), "ScriptName Test\nfloat f\nset f to 1.5\n");
//!
//! let script = db.file(file).unwrap().hir.clone().unwrap();
//! let root = script.scopes.scope(script.scopes.root()).unwrap();
//! let f = script.scopes.symbol(root.symbols.lookup("F").unwrap()).unwrap();
//! assert_eq!(f.ty, ExprType::Float);
//! assert!(db.diagnostics(file).is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod db;
pub mod diagnostics;
pub mod globals;
pub mod hir;
pub mod lower;
pub mod project;
pub mod symbols;
pub mod types;

pub use catalog::{BuiltinCatalog, CatalogError, FormEntry, FunctionEntry, FunctionKind};
pub use db::{Database, File};
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSeverity};
pub use globals::{GlobalEntry, GlobalOrigin, GlobalSymbols};
pub use hir::Script;
pub use lower::{lower, LowerOutput};
pub use project::{FileId, SourceKey, SourceRegistry};
pub use symbols::{
    normalize_name, Scope, ScopeId, ScopeKind, ScopeTree, Symbol, SymbolId, SymbolKind,
    SymbolTable,
};
pub use types::ExprType;
