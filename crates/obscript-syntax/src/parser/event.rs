//! Parser events.
//!
//! The parser produces a flat stream of events that are later converted
//! into a syntax tree. This design allows for better error recovery and
//! keeps the grammar independent of the tree library.

use crate::parser::Severity;
use crate::syntax::SyntaxKind;

/// An event produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Start a new node.
    Start {
        /// The kind of node being started.
        kind: SyntaxKind,
        /// Offset to the event of the node that wraps this one, used when a
        /// parent is only discovered after its first child (left recursion).
        forward_parent: Option<u32>,
    },
    /// Add a token to the current node.
    Token {
        /// The kind of token.
        kind: SyntaxKind,
        /// Number of non-trivia lexer tokens to consume (usually 1).
        n_raw_tokens: u8,
    },
    /// Finish the current node.
    Finish,
    /// Report a diagnostic at the next unconsumed token.
    Error {
        /// Human readable message.
        message: String,
        /// Error or warning.
        severity: Severity,
    },
    /// An abandoned or already-consumed start event.
    Tombstone,
}

impl Event {
    /// Creates a start event with no forward parent.
    #[must_use]
    pub fn start(kind: SyntaxKind) -> Self {
        Self::Start {
            kind,
            forward_parent: None,
        }
    }

    /// Creates a token event.
    #[must_use]
    pub fn token(kind: SyntaxKind) -> Self {
        Self::Token {
            kind,
            n_raw_tokens: 1,
        }
    }
}
