//! `obscript-ide` - Editor features for ObScript.
//!
//! This crate provides IDE functionality built on top of `obscript-hir`:
//!
//! - **Scope queries**: the scope around a node, and name resolution
//! - **Go to Definition**: Navigate to declarations, across scripts
//! - **Find References**: Find all usages of a name
//! - **Rename**: Renaming with conflict checks
//! - **Hover**: Declarations and catalog information
//! - **Completion**: Locals, keywords, builtins and scripts
//! - **Formatting**: Indentation and keyword case
//! - **Diagnostics**: Editor-shaped diagnostics with line/column ranges
//!
//! # Architecture
//!
//! All IDE features are implemented as pure functions that take a database
//! and an offset, making them easy to test and compose.
//!
//! ```
//! use obscript_hir::{Database, SourceKey};
//! use obscript_ide::goto_definition;
//!
//! let mut db = Database::default();
//! let source = "scn Demo\nint count\nset count to 1\n";
//! let file = db.open(SourceKey::from_virtual("demo"), source);
//! let use_site = source.rfind("count").unwrap() as u32;
//! let target = goto_definition(&db, file, use_site.into()).unwrap();
//! assert_eq!(&source[target.range], "count");
//! assert_eq!(u32::from(target.range.start()), 13);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod completion;
pub mod config;
pub mod diagnostics;
pub mod formatting;
pub mod goto_def;
pub mod hover;
pub mod line_index;
pub mod references;
pub mod rename;
pub mod scope;
pub mod util;

pub use completion::{completions, CompletionItem, CompletionKind};
pub use config::{ConfigError, KeywordStyle, WorkspaceConfig};
pub use diagnostics::{collect_diagnostics, to_lsp};
pub use formatting::{format, format_source};
pub use goto_def::{goto_definition, DefinitionResult};
pub use hover::{hover, HoverResult};
pub use line_index::LineIndex;
pub use references::{references, FindReferencesOptions, Reference};
pub use rename::{prepare_rename, rename, RenameError, RenameResult, TextEdit};
pub use scope::{
    definition_at, find_containing_scope, find_definition, find_references, scope_symbol_table,
    Definition, ScopeNode,
};
