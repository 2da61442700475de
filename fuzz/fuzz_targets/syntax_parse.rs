#![no_main]

use libfuzzer_sys::fuzz_target;
use obscript_syntax::{lex, parse};

const MAX_SOURCE_BYTES: usize = 8192;

fuzz_target!(|data: &[u8]| {
    let capped = &data[..data.len().min(MAX_SOURCE_BYTES)];
    let source = String::from_utf8_lossy(capped);

    let parsed = parse(&source);
    let text = parsed.syntax().text().to_string();
    assert_eq!(text, source, "tree must reproduce its input");

    let kinds = |source: &str| lex(source).iter().map(|token| token.kind).collect::<Vec<_>>();
    assert_eq!(kinds(&text), kinds(&source), "relexing must be stable");

    for error in parsed.errors() {
        assert!(usize::from(error.range.end()) <= source.len());
    }
});
