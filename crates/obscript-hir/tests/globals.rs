mod common;
use common::*;

#[test]
fn test_external_names_are_reference_counted_across_files() {
    let mut db = Database::default();
    let a = db.open(SourceKey::from_virtual("a"), "scn A\nset SharedFlag to 1\n");
    let b = db.open(SourceKey::from_virtual("b"), "scn B\nif sharedflag\nendif\n");

    let entry = db.globals().get("SHAREDFLAG").unwrap();
    assert_eq!(entry.origin, GlobalOrigin::Implicit);
    assert_eq!(entry.name, "SharedFlag");
    assert_eq!(entry.referencing_files.len(), 2);

    db.close(a);
    assert_eq!(
        db.globals().get("sharedflag").unwrap().referencing_files.len(),
        1
    );
    db.change(b, "scn B\n");
    assert!(db.globals().get("sharedflag").is_none());
}

#[test]
fn test_scripts_referenced_by_other_files() {
    let mut db = Database::default();
    let quest = db.open(SourceKey::from_virtual("quest"), "scn MyQuest\nint stage\n");
    let user = db.open(
        SourceKey::from_virtual("user"),
        "scn User\nbegin GameMode\nset MyQuest.stage to 10\nend\n",
    );

    let entry = db.globals().get("myquest").unwrap();
    assert_eq!(entry.origin, GlobalOrigin::Script(quest));
    assert!(entry.referencing_files.contains(&user));

    db.close(quest);
    assert_eq!(
        db.globals().get("myquest").unwrap().origin,
        GlobalOrigin::Implicit
    );
    let quest = db.open(SourceKey::from_virtual("quest"), "scn MyQuest\nint stage\n");
    assert_eq!(
        db.globals().get("myquest").unwrap().origin,
        GlobalOrigin::Script(quest)
    );
}

#[test]
fn test_builtins_survive_every_close() {
    let mut db = database_with_catalog();
    let before = db.globals().len();
    let file = db.open(
        SourceKey::from_virtual("a"),
        "scn A\nbegin GameMode\nPrintC \"%g\" PlayerRef\nlet v := GetAV\nend\n",
    );
    assert!(db.globals().get("printc").unwrap().referencing_files.contains(&file));
    assert!(db.globals().get("getav").unwrap().referencing_files.contains(&file));
    assert_eq!(db.globals().get("v").unwrap().origin, GlobalOrigin::Implicit);
    db.close(file);
    assert_eq!(db.globals().len(), before);
    assert_eq!(db.globals().get("getav").unwrap().origin, GlobalOrigin::Builtin);
    assert_eq!(db.globals().get("playerref").unwrap().origin, GlobalOrigin::Form);
}

#[test]
fn test_editing_the_owner_of_a_duplicated_name_keeps_it() {
    let mut db = Database::default();
    let first = db.open(SourceKey::from_virtual("a"), "scn Quest\n");
    let second = db.open(SourceKey::from_virtual("b"), "scn quest\n");

    db.change(first, "scn Quest\nint x\n");
    assert_eq!(db.script_file("quest"), Some(first));
    assert_eq!(
        db.globals().get("quest").unwrap().origin,
        GlobalOrigin::Script(first)
    );
    assert!(db.diagnostics(first).is_empty());
    let codes: Vec<_> = db.diagnostics(second).iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![DiagnosticCode::DuplicateScriptName]);

    // Renaming the owner hands the old name over.
    db.change(first, "scn Other\n");
    assert_eq!(db.script_file("quest"), Some(second));
    assert_eq!(db.script_file("other"), Some(first));
    assert!(db.diagnostics(second).is_empty());
}
