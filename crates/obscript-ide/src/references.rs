//! Find references.
//!
//! Locals are searched in the subtree of their declaring scope. Globals are
//! searched in every open file.

use obscript_hir::hir::BinaryOp;
use obscript_hir::lower::binary_op;
use obscript_hir::{Database, FileId};
use obscript_syntax::ast::{self, AstNode};
use obscript_syntax::algo;
use obscript_syntax::{SyntaxKind, SyntaxToken};
use text_size::{TextRange, TextSize};
use tracing::debug;

use crate::goto_def::declaration_of;
use crate::scope::{definition_at, find_references, Definition};

/// A reference to a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The file containing the reference.
    pub file_id: FileId,
    /// The range of the identifier.
    pub range: TextRange,
    /// Whether the reference is assigned to.
    pub is_write: bool,
}

/// Options for finding references.
#[derive(Debug, Clone, Copy, Default)]
pub struct FindReferencesOptions {
    /// Include the declaration in the results.
    pub include_declaration: bool,
}

/// Finds all references to the name at `offset`.
#[must_use]
pub fn references(
    db: &Database,
    file_id: FileId,
    offset: TextSize,
    options: FindReferencesOptions,
) -> Vec<Reference> {
    let Some((token, definition)) = definition_at(db, file_id, offset) else {
        return Vec::new();
    };
    let references = references_to(db, &definition, options);
    debug!("{} references to {}", references.len(), token.text());
    references
}

/// All references to `definition`, ordered by file then position.
#[must_use]
pub fn references_to(
    db: &Database,
    definition: &Definition,
    options: FindReferencesOptions,
) -> Vec<Reference> {
    let mut files: Vec<FileId> = match definition {
        Definition::Local { file, .. } => vec![*file],
        Definition::Global(_) => db.files().map(|(id, _)| id).collect(),
    };
    files.sort_unstable();

    let declaration = declaration_of(db, definition);
    let mut references = Vec::new();
    for file_id in files {
        let Some(file) = db.file(file_id) else {
            continue;
        };
        let root = file.parse.syntax();
        for range in find_references(db, file_id, definition) {
            let is_declaration = declaration
                .as_ref()
                .is_some_and(|decl| decl.file_id == file_id && decl.range == range);
            if is_declaration && !options.include_declaration {
                continue;
            }
            let is_write = algo::token_containing(&root, range.start())
                .is_some_and(|token| is_write_access(&token));
            references.push(Reference {
                file_id,
                range,
                is_write,
            });
        }
    }
    references
}

/// Returns `true` for the target of `set ... to` and the left side of an
/// assignment operator.
fn is_write_access(token: &SyntaxToken) -> bool {
    let Some(name_ref) = token.parent().and_then(ast::NameRef::cast) else {
        return false;
    };
    let node = name_ref.syntax();
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        SyntaxKind::SetStmt => ast::SetStmt::cast(parent)
            .and_then(|set| set.target())
            .is_some_and(|target| target.syntax() == node),
        SyntaxKind::BinExpr => ast::BinExpr::cast(parent).is_some_and(|bin| {
            bin.op_kind()
                .and_then(binary_op)
                .is_some_and(BinaryOp::is_assignment)
                && bin.lhs().is_some_and(|lhs| lhs.syntax() == node)
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obscript_hir::SourceKey;

    fn offsets(source: &str, needle: &str) -> Vec<(u32, u32)> {
        source
            .match_indices(needle)
            .map(|(start, _)| (start as u32, (start + needle.len()) as u32))
            .collect()
    }

    fn ranges(references: &[Reference]) -> Vec<(u32, u32)> {
        references
            .iter()
            .map(|r| (r.range.start().into(), r.range.end().into()))
            .collect()
    }

    #[test]
    fn test_local_references_and_writes() {
        let source = "scn T\nint n\nset n to 1\nlet n += n\nPrintC \"%g\" n\n";
        let mut db = Database::default();
        let file = db.open(SourceKey::from_virtual("t"), source);
        let all = offsets(source, " n");
        let decl = all[0].0 + 1;

        let with_decl = references(
            &db,
            file,
            decl.into(),
            FindReferencesOptions {
                include_declaration: true,
            },
        );
        let expected: Vec<_> = all.iter().map(|(s, e)| (s + 1, *e)).collect();
        assert_eq!(ranges(&with_decl), expected);
        let writes: Vec<bool> = with_decl.iter().map(|r| r.is_write).collect();
        assert_eq!(writes, vec![false, true, true, false, false]);

        let without = references(&db, file, decl.into(), FindReferencesOptions::default());
        assert_eq!(without.len(), 4);
    }

    #[test]
    fn test_global_references_span_files() {
        let mut db = Database::default();
        let a = db.open(SourceKey::from_virtual("a"), "scn A\nset Shared to 1\n");
        let b = db.open(SourceKey::from_virtual("b"), "scn B\nint x\nset x to shared\n");
        let found = references(&db, a, TextSize::from(11), FindReferencesOptions::default());
        let files: Vec<FileId> = found.iter().map(|r| r.file_id).collect();
        assert_eq!(files, vec![a, b]);
    }
}
