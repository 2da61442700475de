//! Document formatting.
//!
//! The formatter only touches whitespace at line edges and the case of
//! keywords. Indentation is the number of statement lists around the first
//! token of a line, so block terminators (`endif`, `loop`, `end`) line up
//! with their openers. Lines that begin inside a multi-line string are left
//! alone.

use obscript_hir::{Database, FileId};
use obscript_syntax::{SyntaxKind, SyntaxNode, SyntaxToken};
use text_size::{TextRange, TextSize};
use tracing::debug;

use crate::config::WorkspaceConfig;
use crate::rename::TextEdit;

/// Edits that format an open file. Formatting the result again yields no
/// edits.
#[must_use]
pub fn format(db: &Database, file_id: FileId, config: &WorkspaceConfig) -> Vec<TextEdit> {
    let Some(file) = db.file(file_id) else {
        return Vec::new();
    };
    let edits = format_tree(&file.parse.syntax(), config);
    debug!("formatting {}: {} edits", file.key.display(), edits.len());
    edits
}

/// Formats source text directly.
#[must_use]
pub fn format_source(source: &str, config: &WorkspaceConfig) -> String {
    let parse = obscript_syntax::parse(source);
    apply_edits(source, &format_tree(&parse.syntax(), config))
}

/// Applies non-overlapping edits sorted by position.
#[must_use]
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut result = String::with_capacity(source.len());
    let mut last = 0;
    for edit in edits {
        let start = usize::from(edit.range.start());
        let end = usize::from(edit.range.end());
        if start < last || end > source.len() {
            continue;
        }
        result.push_str(&source[last..start]);
        result.push_str(&edit.new_text);
        last = end;
    }
    result.push_str(&source[last..]);
    result
}

/// Edits for every line of the tree, in source order.
#[must_use]
pub fn format_tree(root: &SyntaxNode, config: &WorkspaceConfig) -> Vec<TextEdit> {
    let unit = config.indent_unit();
    let mut edits = Vec::new();
    let mut line: Vec<SyntaxToken> = Vec::new();
    for token in root
        .descendants_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token)
        .filter(|token| token.kind() != SyntaxKind::Eof)
    {
        if token.kind().is_newline() {
            format_line(&line, token.text_range().start(), &unit, config, &mut edits);
            line.clear();
        } else {
            line.push(token);
        }
    }
    format_line(&line, root.text_range().end(), &unit, config, &mut edits);
    edits
}

fn format_line(
    tokens: &[SyntaxToken],
    line_end: TextSize,
    unit: &str,
    config: &WorkspaceConfig,
    edits: &mut Vec<TextEdit>,
) {
    let (indent, content) = match tokens.split_first() {
        Some((first, rest)) if first.kind() == SyntaxKind::Whitespace => (Some(first), rest),
        _ => (None, tokens),
    };
    let Some(first) = content.first() else {
        if let Some(indent) = indent {
            edits.push(edit(indent.text_range(), ""));
        }
        return;
    };

    let depth = first
        .parent_ancestors()
        .filter(|node| node.kind() == SyntaxKind::StmtList)
        .count();
    let wanted = unit.repeat(depth);
    match indent {
        Some(indent) if indent.text() != wanted => edits.push(edit(indent.text_range(), &wanted)),
        None if !wanted.is_empty() => {
            edits.push(edit(TextRange::empty(first.text_range().start()), &wanted));
        }
        _ => {}
    }

    for token in content {
        let kind = token.kind();
        if kind.is_keyword() || kind.is_type() {
            let cased = config.keyword_style.apply(token.text());
            if cased != token.text() {
                edits.push(edit(token.text_range(), &cased));
            }
        }
    }

    if let Some(last) = content.last().filter(|last| last.kind() == SyntaxKind::Whitespace) {
        edits.push(edit(TextRange::new(last.text_range().start(), line_end), ""));
    }
}

fn edit(range: TextRange, new_text: &str) -> TextEdit {
    TextEdit {
        range,
        new_text: new_text.to_string(),
    }
}
