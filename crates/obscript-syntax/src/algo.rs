//! Tree traversal and position lookup helpers.

use rowan::{NodeOrToken, TokenAtOffset, WalkEvent};
use text_size::TextSize;

use crate::syntax::{SyntaxElement, SyntaxNode, SyntaxToken};

/// Nodes and tokens of `root` in pre-order: parents before children.
pub fn visit_preorder(root: &SyntaxNode) -> impl Iterator<Item = SyntaxElement> {
    root.preorder_with_tokens().filter_map(|event| match event {
        WalkEvent::Enter(element) => Some(element),
        WalkEvent::Leave(_) => None,
    })
}

/// Nodes and tokens of `root` in post-order: children before parents.
pub fn visit_postorder(root: &SyntaxNode) -> impl Iterator<Item = SyntaxElement> {
    root.preorder_with_tokens().filter_map(|event| match event {
        WalkEvent::Enter(NodeOrToken::Token(token)) => Some(NodeOrToken::Token(token)),
        WalkEvent::Leave(NodeOrToken::Node(node)) => Some(NodeOrToken::Node(node)),
        _ => None,
    })
}

/// All nodes under `root`, `root` included, in pre-order.
pub fn descendants(root: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    root.descendants()
}

/// All tokens under `root`, in source order.
pub fn leaves(root: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    root.descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
}

/// Ancestors of `element`, nearest first. The element itself is not included.
pub fn ancestors(element: &SyntaxElement) -> impl Iterator<Item = SyntaxNode> {
    let parent = match element {
        NodeOrToken::Node(node) => node.parent(),
        NodeOrToken::Token(token) => token.parent(),
    };
    std::iter::successors(parent, SyntaxNode::parent)
}

/// The token that contains `offset`, preferring the one that starts there.
///
/// Returns `None` when `offset` lies outside the tree.
pub fn token_containing(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
    if !root.text_range().contains_inclusive(offset) {
        return None;
    }
    match root.token_at_offset(offset) {
        TokenAtOffset::None => None,
        TokenAtOffset::Single(token) => Some(token),
        TokenAtOffset::Between(_, right) => Some(right),
    }
}

/// The significant token at `offset`, or the one that ends right before it.
///
/// Editor cursors sit between characters: with the cursor at the end of
/// `foo|`, the identifier is the token of interest, not the newline after it.
pub fn token_at_or_before(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
    if !root.text_range().contains_inclusive(offset) {
        return None;
    }
    let significant = |token: &SyntaxToken| {
        let kind = token.kind();
        !kind.is_trivia() && !kind.is_newline()
    };
    match root.token_at_offset(offset) {
        TokenAtOffset::None => None,
        TokenAtOffset::Single(token) => {
            if significant(&token) {
                Some(token)
            } else {
                previous_significant(&token).or(Some(token))
            }
        }
        TokenAtOffset::Between(left, right) => {
            if significant(&left) {
                Some(left)
            } else if significant(&right) {
                Some(right)
            } else {
                previous_significant(&left).or(Some(left))
            }
        }
    }
}

fn previous_significant(token: &SyntaxToken) -> Option<SyntaxToken> {
    let mut current = token.prev_token();
    while let Some(token) = current {
        let kind = token.kind();
        if kind.is_newline() {
            return None;
        }
        if !kind.is_trivia() {
            return Some(token);
        }
        current = token.prev_token();
    }
    None
}

/// The full text of `root`.
#[must_use]
pub fn text_of(root: &SyntaxNode) -> String {
    root.text().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::syntax::SyntaxKind;

    const SOURCE: &str = "scn T\nset x to 1 ; note\n";

    #[test]
    fn test_text_of_round_trips() {
        let parse = parse(SOURCE);
        assert_eq!(text_of(&parse.syntax()), SOURCE);
        let joined: String = leaves(&parse.syntax())
            .map(|token| token.text().to_string())
            .collect();
        assert_eq!(joined, SOURCE);
    }

    #[test]
    fn test_orders() {
        let parse = parse(SOURCE);
        let root = parse.syntax();
        let pre: Vec<_> = visit_preorder(&root).collect();
        let post: Vec<_> = visit_postorder(&root).collect();
        assert_eq!(pre.len(), post.len());
        assert_eq!(pre.first().map(SyntaxElement::kind), Some(SyntaxKind::Script));
        assert_eq!(post.last().map(SyntaxElement::kind), Some(SyntaxKind::Script));
        assert_eq!(descendants(&root).count(), root.descendants().count());
    }

    #[test]
    fn test_ancestors_start_at_parent() {
        let parse = parse(SOURCE);
        let token = token_containing(&parse.syntax(), TextSize::from(10)).unwrap();
        assert_eq!(token.text(), "x");
        let kinds: Vec<_> = ancestors(&NodeOrToken::Token(token))
            .map(|node| node.kind())
            .collect();
        assert_eq!(
            kinds,
            [SyntaxKind::NameRef, SyntaxKind::SetStmt, SyntaxKind::Script]
        );
    }

    #[test]
    fn test_token_at_or_before_prefers_identifier() {
        let parse = parse(SOURCE);
        let root = parse.syntax();
        // End of `x`, between `x` and the following space.
        let token = token_at_or_before(&root, TextSize::from(11)).unwrap();
        assert_eq!(token.text(), "x");
        // Right after `to`.
        let token = token_at_or_before(&root, TextSize::from(14)).unwrap();
        assert_eq!(token.text(), "to");
        assert!(token_at_or_before(&root, TextSize::from(1000)).is_none());
    }
}
