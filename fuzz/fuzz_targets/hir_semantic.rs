#![no_main]

use libfuzzer_sys::fuzz_target;
use obscript_hir::{Database, FileId, SourceKey};
use obscript_ide::{completions, format, formatting, goto_definition, hover, to_lsp, WorkspaceConfig};

const MAX_SOURCE_BYTES: usize = 4096;

fn decode_source(bytes: &[u8]) -> String {
    let capped = &bytes[..bytes.len().min(MAX_SOURCE_BYTES)];
    String::from_utf8_lossy(capped).into_owned()
}

fn source_offset(seed: u8, source: &str) -> u32 {
    if source.is_empty() {
        return 0;
    }
    (usize::from(seed) % (source.len() + 1)) as u32
}

fn run_queries(db: &Database, file_id: FileId, seed: u8) {
    let Some(source) = db.file(file_id).map(|file| file.text.clone()) else {
        return;
    };
    let _ = db.diagnostics(file_id);
    let _ = to_lsp(db, file_id);

    let offset = source_offset(seed, &source).into();
    let _ = goto_definition(db, file_id, offset);
    let _ = hover(db, file_id, offset);
    let _ = completions(db, file_id, offset);

    let config = WorkspaceConfig::default();
    let formatted = formatting::apply_edits(&source, &format(db, file_id, &config));
    assert!(
        formatting::format_source(&formatted, &config) == formatted,
        "formatting must be idempotent"
    );
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let split = usize::from(data[0]) % (data.len() + 1);
    let raw_a = decode_source(&data[..split]);
    let raw_b = decode_source(&data[split..]);

    let mut db = Database::default();
    let first = db.open(
        SourceKey::from_virtual("first"),
        format!("scn FuzzA\nint shared\nbegin GameMode\n{raw_a}\nend\n"),
    );
    let second = db.open(
        SourceKey::from_virtual("second"),
        format!("scn FuzzB\nset FuzzA.shared to 1\n{raw_b}\n"),
    );

    for (idx, file_id) in [first, second].into_iter().enumerate() {
        let seed = *data.get(1 + idx).unwrap_or(&0);
        run_queries(&db, file_id, seed);
    }

    // Edit -> reregister -> requery cycle.
    let edit_payload = decode_source(&data[data.len() / 2..]);
    db.change(first, format!("scn FuzzA\n{edit_payload}\n"));
    run_queries(&db, first, *data.get(3).unwrap_or(&0));
    run_queries(&db, second, *data.get(4).unwrap_or(&0));

    // Close and reopen to exercise global retraction.
    db.close(second);
    let reopened = db.open(SourceKey::from_virtual("second"), raw_b);
    run_queries(&db, reopened, *data.get(5).unwrap_or(&0));
    db.close(first);
    db.close(reopened);
    assert!(db.globals().is_empty(), "closing every file must empty the globals");
});
