//! Rename.

use std::collections::HashMap;

use obscript_hir::{normalize_name, Database, FileId, GlobalOrigin};
use obscript_syntax::algo;
use rowan::NodeOrToken;
use smol_str::SmolStr;
use text_size::{TextRange, TextSize};
use thiserror::Error;
use tracing::debug;

use crate::references::{references_to, FindReferencesOptions};
use crate::scope::{definition_at, find_containing_scope, scope_symbol_table, Definition};
use crate::util::{is_valid_identifier, IdeContext};

/// A text edit representing a change to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// The range to replace.
    pub range: TextRange,
    /// The new text.
    pub new_text: String,
}

/// Result of a rename operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameResult {
    /// Edits grouped by file.
    pub edits: HashMap<FileId, Vec<TextEdit>>,
}

impl RenameResult {
    /// Creates an empty rename result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edit for a file.
    pub fn add_edit(&mut self, file_id: FileId, edit: TextEdit) {
        self.edits.entry(file_id).or_default().push(edit);
    }

    /// Returns the total number of edits.
    #[must_use]
    pub fn edit_count(&self) -> usize {
        self.edits.values().map(Vec::len).sum()
    }
}

/// Why a rename was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenameError {
    /// Nothing renameable at the position.
    #[error("no renameable name at this position")]
    NoTarget,
    /// The new name is not a plain identifier.
    #[error("'{0}' is not a valid identifier")]
    InvalidName(String),
    /// Builtins and forms come from the catalog.
    #[error("'{0}' is defined by the builtin catalog")]
    Builtin(SmolStr),
    /// The new name is already visible at one of the references.
    #[error("'{0}' is already defined")]
    Conflict(String),
}

/// The range of the name at `offset`, if it can be renamed.
#[must_use]
pub fn prepare_rename(db: &Database, file_id: FileId, offset: TextSize) -> Option<TextRange> {
    let (token, definition) = definition_at(db, file_id, offset)?;
    check_renameable(&definition).ok()?;
    Some(token.text_range())
}

/// Renames the name at `offset` and every reference to it.
///
/// # Errors
///
/// Returns a [`RenameError`] when there is no name at `offset`, the new
/// name is not an identifier, the name comes from the catalog, or the new
/// name would collide with a name already visible at some reference.
pub fn rename(
    db: &Database,
    file_id: FileId,
    offset: TextSize,
    new_name: &str,
) -> Result<RenameResult, RenameError> {
    let (_, definition) = definition_at(db, file_id, offset).ok_or(RenameError::NoTarget)?;
    if !is_valid_identifier(new_name) {
        return Err(RenameError::InvalidName(new_name.to_string()));
    }
    check_renameable(&definition)?;

    let references = references_to(
        db,
        &definition,
        FindReferencesOptions {
            include_declaration: true,
        },
    );
    match &definition {
        Definition::Local { .. } => {
            for reference in &references {
                if captured_at(db, reference.file_id, reference.range, &definition, new_name) {
                    return Err(RenameError::Conflict(new_name.to_string()));
                }
            }
        }
        Definition::Global(entry) => {
            let clashes = normalize_name(&entry.name) != normalize_name(new_name)
                && db.globals().get(new_name).is_some();
            if clashes {
                return Err(RenameError::Conflict(new_name.to_string()));
            }
        }
    }

    let mut result = RenameResult::new();
    for reference in references {
        result.add_edit(
            reference.file_id,
            TextEdit {
                range: reference.range,
                new_text: new_name.to_string(),
            },
        );
    }
    debug!("rename to {new_name}: {} edits", result.edit_count());
    Ok(result)
}

fn check_renameable(definition: &Definition) -> Result<(), RenameError> {
    match definition {
        Definition::Global(entry)
            if matches!(entry.origin, GlobalOrigin::Builtin | GlobalOrigin::Form) =>
        {
            Err(RenameError::Builtin(entry.name.clone()))
        }
        _ => Ok(()),
    }
}

/// Returns `true` if `new_name` already resolves to another local at the
/// reference in `range`.
fn captured_at(
    db: &Database,
    file_id: FileId,
    range: TextRange,
    definition: &Definition,
    new_name: &str,
) -> bool {
    let Some(context) = IdeContext::new(db, file_id) else {
        return false;
    };
    let Some(token) = algo::token_containing(&context.root, range.start()) else {
        return false;
    };
    let Some((script, scope)) = find_containing_scope(&NodeOrToken::Token(token))
        .and_then(|scope| scope_symbol_table(db, file_id, &scope))
    else {
        return false;
    };
    let Definition::Local { symbol, .. } = definition else {
        return false;
    };
    script
        .scopes
        .resolve(scope, new_name)
        .is_some_and(|(_, found)| found != *symbol)
}
