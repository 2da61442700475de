//! Shared helpers for IDE feature tests.
#![allow(dead_code, unused_imports)]

use std::sync::Arc;

pub use obscript_hir::{BuiltinCatalog, Database, FileId, SourceKey};
pub use text_size::{TextRange, TextSize};

/// Opens `source` in a fresh database.
pub fn setup(source: &str) -> (Database, FileId) {
    let mut db = Database::default();
    let file = db.open(SourceKey::from_virtual("test"), source);
    (db, file)
}

/// A database over a small catalog: `GetAV` (float), `PrintC` (command)
/// and the `PlayerRef` form.
pub fn catalog_db() -> Database {
    let catalog = BuiltinCatalog::from_json(
        r#"[
            { "name": "GetAV", "returnType": "float", "origin": "base" },
            { "name": "PrintC", "kind": "command", "origin": "xNVSE" }
        ]"#,
        r#"{ "PlayerRef": { "type": "reference" } }"#,
    )
    .expect("catalog json");
    Database::new(Arc::new(catalog))
}

/// Start offsets of `word` where it stands alone as an identifier.
pub fn word_offsets(source: &str, word: &str) -> Vec<TextSize> {
    let bytes = source.as_bytes();
    let is_ident = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    source
        .match_indices(word)
        .filter(|(start, _)| {
            let end = start + word.len();
            (*start == 0 || !is_ident(bytes[start - 1])) && (end == bytes.len() || !is_ident(bytes[end]))
        })
        .map(|(start, _)| TextSize::from(start as u32))
        .collect()
}

/// The range of the `nth` standalone occurrence of `word`.
pub fn word_range(source: &str, word: &str, nth: usize) -> TextRange {
    TextRange::at(word_offsets(source, word)[nth], TextSize::of(word))
}
