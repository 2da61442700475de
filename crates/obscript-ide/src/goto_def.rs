//! Go to definition.

use obscript_hir::{Database, FileId, GlobalOrigin};
use text_size::{TextRange, TextSize};
use tracing::debug;

use crate::scope::{definition_at, Definition};

/// Result of a go-to-definition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionResult {
    /// The file containing the definition.
    pub file_id: FileId,
    /// The range of the declared name.
    pub range: TextRange,
}

/// Finds the declaration of the name at `offset`.
///
/// Builtins, forms and names that no open script declares have no
/// location.
#[must_use]
pub fn goto_definition(db: &Database, file_id: FileId, offset: TextSize) -> Option<DefinitionResult> {
    let (token, definition) = definition_at(db, file_id, offset)?;
    debug!("goto definition of {}", token.text());
    declaration_of(db, &definition)
}

/// The location of a definition's declared name.
#[must_use]
pub fn declaration_of(db: &Database, definition: &Definition) -> Option<DefinitionResult> {
    match definition {
        Definition::Local { file, symbol, .. } => {
            let script = db.file(*file)?.hir.as_ref()?;
            let symbol = script.scopes.symbol(*symbol)?;
            Some(DefinitionResult {
                file_id: *file,
                range: symbol.name_range,
            })
        }
        Definition::Global(entry) => match entry.origin {
            GlobalOrigin::Script(owner) => {
                let script = db.file(owner)?.hir.as_ref()?;
                Some(DefinitionResult {
                    file_id: owner,
                    range: script.name_range,
                })
            }
            GlobalOrigin::Builtin | GlobalOrigin::Form | GlobalOrigin::Implicit => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obscript_hir::SourceKey;

    #[test]
    fn test_local_and_cross_file_definitions() {
        let mut db = Database::default();
        let quest = db.open(SourceKey::from_virtual("quest"), "scn MyQuest\nint stage\n");
        let source = "scn User\nint count\nset count to MyQuest\n";
        let user = db.open(SourceKey::from_virtual("user"), source);

        let local = goto_definition(&db, user, TextSize::from(24)).unwrap();
        assert_eq!(local.file_id, user);
        assert_eq!(local.range, TextRange::new(13.into(), 18.into()));

        let other = goto_definition(&db, user, TextSize::from(33)).unwrap();
        assert_eq!(other.file_id, quest);
        assert_eq!(other.range, TextRange::new(4.into(), 11.into()));
    }

    #[test]
    fn test_undeclared_names_have_no_location() {
        let mut db = Database::default();
        let file = db.open(SourceKey::from_virtual("a"), "scn A\nset Elsewhere to 1\n");
        assert!(goto_definition(&db, file, TextSize::from(11)).is_none());
    }
}
