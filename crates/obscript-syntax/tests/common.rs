//! Shared helpers for parser snapshot tests.
#![allow(dead_code, unused_imports)]

pub use expect_test::{expect, Expect};
pub use obscript_syntax::parser::{parse, parse_expr, Parse};
pub use obscript_syntax::syntax::{SyntaxKind, SyntaxNode};

/// Helper to format a parse result for snapshot testing.
pub fn snapshot(parsed: &Parse) -> String {
    let mut output = String::new();
    format_node(&parsed.syntax(), &mut output, 0);

    if !parsed.ok() {
        output.push_str("---\nErrors:\n");
        for err in parsed.errors() {
            output.push_str(&format!("  - {err}\n"));
        }
    }

    output
}

/// Compares the tree dump of a script against `expected`.
pub fn check(source: &str, expected: Expect) {
    expected.assert_eq(&snapshot(&parse(source)));
}

/// Compares the tree dump of a standalone expression against `expected`.
pub fn check_expr(source: &str, expected: Expect) {
    expected.assert_eq(&snapshot(&parse_expr(source)));
}

/// Error messages of a script parse, in order.
pub fn messages(source: &str) -> Vec<String> {
    parse(source)
        .errors()
        .iter()
        .map(|err| err.message.clone())
        .collect()
}

/// Number of nodes of `kind` in the tree.
pub fn count(parsed: &Parse, kind: SyntaxKind) -> usize {
    parsed
        .syntax()
        .descendants()
        .filter(|node| node.kind() == kind)
        .count()
}

fn format_node(node: &SyntaxNode, out: &mut String, depth: usize) {
    let indent = "  ".repeat(depth);

    out.push_str(&format!("{indent}{:?}@{:?}\n", node.kind(), node.text_range()));

    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => format_node(&n, out, depth + 1),
            rowan::NodeOrToken::Token(t) => {
                // Only show significant tokens
                let kind = t.kind();
                if !kind.is_trivia() && !kind.is_newline() {
                    out.push_str(&format!(
                        "{}{:?}@{:?} {:?}\n",
                        "  ".repeat(depth + 1),
                        kind,
                        t.text_range(),
                        t.text()
                    ));
                }
            }
        }
    }
}
