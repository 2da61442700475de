//! Integration tests for IDE features.

mod common;
use common::*;

use obscript_ide::{
    completions, format, goto_definition, hover, prepare_rename, references, rename, to_lsp,
    CompletionKind, FindReferencesOptions, LineIndex, RenameError, WorkspaceConfig,
};

const FOREACH_SOURCE: &str = "scn T
array_var x
begin GameMode
foreach array_var x <- x
PrintC \"%g\" x
loop
set x to 1
end
";

fn sorted_edits(result: &obscript_ide::RenameResult, file: FileId) -> Vec<TextRange> {
    let mut ranges: Vec<TextRange> = result.edits[&file].iter().map(|edit| edit.range).collect();
    ranges.sort_by_key(|range| range.start());
    ranges
}

// =============================================================================
// Rename
// =============================================================================

#[test]
fn test_rename_foreach_variable_stays_in_loop() {
    let (db, file) = setup(FOREACH_SOURCE);
    let loop_decl = word_offsets(FOREACH_SOURCE, "x")[1];
    let result = rename(&db, file, loop_decl, "item").unwrap();
    assert_eq!(
        sorted_edits(&result, file),
        vec![word_range(FOREACH_SOURCE, "x", 1), word_range(FOREACH_SOURCE, "x", 3)]
    );

    let from_use = rename(&db, file, word_offsets(FOREACH_SOURCE, "x")[3], "item").unwrap();
    assert_eq!(from_use, result);
}

#[test]
fn test_rename_outer_variable_skips_shadowed_uses() {
    let (db, file) = setup(FOREACH_SOURCE);
    let result = rename(&db, file, word_offsets(FOREACH_SOURCE, "x")[0], "list").unwrap();
    assert_eq!(
        sorted_edits(&result, file),
        vec![
            word_range(FOREACH_SOURCE, "x", 0),
            word_range(FOREACH_SOURCE, "x", 2),
            word_range(FOREACH_SOURCE, "x", 4),
        ]
    );
}

#[test]
fn test_rename_rejects_keywords_and_builtins() {
    let mut db = catalog_db();
    let source = "scn T\nbegin GameMode\nint hp\nset hp to PlayerRef.GetAV Health\nend\n";
    let file = db.open(SourceKey::from_virtual("t"), source);
    let hp = word_offsets(source, "hp")[0];
    assert_eq!(
        rename(&db, file, hp, "while"),
        Err(RenameError::InvalidName("while".to_string()))
    );
    let get_av = word_offsets(source, "GetAV")[0];
    assert!(prepare_rename(&db, file, get_av).is_none());
    assert!(matches!(
        rename(&db, file, word_offsets(source, "PlayerRef")[0], "Me"),
        Err(RenameError::Builtin(_))
    ));
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn test_navigation_across_scripts() {
    let mut db = Database::default();
    let quest_source = "scn MainQuest\nshort stage\n";
    let quest = db.open(SourceKey::from_virtual("quest"), quest_source);
    let user_source = "scn Watcher\nbegin GameMode\nif MainQuest.stage > 1\nset MainQuest.stage to 2\nendif\nend\n";
    let watcher = db.open(SourceKey::from_virtual("watcher"), user_source);

    let use_site = word_offsets(user_source, "MainQuest")[1];
    let target = goto_definition(&db, watcher, use_site).unwrap();
    assert_eq!(target.file_id, quest);
    assert_eq!(target.range, word_range(quest_source, "MainQuest", 0));

    let found = references(
        &db,
        quest,
        word_offsets(quest_source, "MainQuest")[0],
        FindReferencesOptions::default(),
    );
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|r| r.file_id == watcher));
    assert_eq!(found.iter().filter(|r| r.is_write).count(), 0);

    // Fields after `.` are never resolved.
    assert!(goto_definition(&db, watcher, word_offsets(user_source, "stage")[0]).is_none());

    db.close(quest);
    assert!(goto_definition(&db, watcher, use_site).is_none());
}

#[test]
fn test_writes_are_flagged() {
    let source = "scn T\nint n\nset n to 1\nlet n := n + 1\n";
    let (db, file) = setup(source);
    let found = references(
        &db,
        file,
        word_offsets(source, "n")[0],
        FindReferencesOptions {
            include_declaration: true,
        },
    );
    let writes: Vec<bool> = found.iter().map(|r| r.is_write).collect();
    assert_eq!(writes, vec![false, true, true, false]);
}

// =============================================================================
// Hover and completion
// =============================================================================

#[test]
fn test_hover_and_completion_share_resolution() {
    let mut db = catalog_db();
    let source = "scn T\nfloat health\nbegin GameMode\nint health\nset health to PlayerRef.GetAV Health\nPrintC \"%g\" he\nend\n";
    let file = db.open(SourceKey::from_virtual("t"), source);

    let inner = hover(&db, file, word_offsets(source, "health")[2]).unwrap();
    assert!(inner.contents.contains("int health"), "{}", inner.contents);

    let command = hover(&db, file, word_offsets(source, "PrintC")[0]).unwrap();
    assert!(command.contents.contains("command PrintC"));
    assert!(command.contents.ends_with("From xNVSE"));

    let cursor = word_offsets(source, "he")[0] + TextSize::from(2);
    let items = completions(&db, file, cursor);
    let locals: Vec<_> = items
        .iter()
        .filter(|item| item.kind == CompletionKind::Variable)
        .map(|item| (item.label.as_str(), item.detail.as_deref()))
        .collect();
    assert_eq!(locals, vec![("health", Some("integer"))]);
}

// =============================================================================
// Formatting, diagnostics and positions
// =============================================================================

#[test]
fn test_format_open_file_is_idempotent() {
    let mut db = Database::default();
    let config = WorkspaceConfig::from_json(r#"{ "keywordStyle": "capitalized", "indentWidth": 2 }"#).unwrap();
    let file = db.open(SourceKey::from_virtual("t"), FOREACH_SOURCE);
    let edits = format(&db, file, &config);
    assert!(!edits.is_empty());

    let formatted = obscript_ide::formatting::apply_edits(FOREACH_SOURCE, &edits);
    assert!(formatted.contains("\n  ForEach Array_Var x <- x\n    PrintC"));
    db.change(file, formatted.as_str());
    assert!(format(&db, file, &config).is_empty());
}

#[test]
fn test_lsp_diagnostics_for_nested_begin() {
    let source = "scn T\nbegin GameMode\n  begin OnActivate\n  end\nend\n";
    let (db, file) = setup(source);
    let diagnostics = to_lsp(&db, file);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "nested begin blocks not allowed");

    let index = LineIndex::new(db.file(file).unwrap().text.clone());
    let range = index.range_at(diagnostics[0].range).unwrap();
    assert_eq!(&source[range], "begin");
}
