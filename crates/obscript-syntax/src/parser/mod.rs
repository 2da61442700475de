//! Parser for ObScript.
//!
//! This module provides a hand-written recursive descent parser that builds
//! a lossless concrete syntax tree (CST) using the `rowan` library.
//!
//! # Design
//!
//! The parser is designed for IDE use:
//!
//! - **Error-tolerant**: Continues parsing after errors, every input yields a tree
//! - **Lossless**: Preserves all source text including whitespace and comments
//! - **Text-free**: The grammar only sees token kinds, never text or offsets
//!
//! # Architecture
//!
//! The parser uses a three-phase approach:
//!
//! 1. **Lexing**: Tokenize source text (see `lexer` module)
//! 2. **Parsing**: Build a flat stream of events (start node, add token, finish node, error)
//! 3. **Tree Building**: Convert events into a `rowan` green tree, re-attaching trivia

#![allow(clippy::module_inception)]

pub mod event;
mod grammar;
mod input;
mod parser;
mod sink;
mod token_set;

pub use input::{FunctionHints, NoHints};

pub(crate) use parser::{CompletedMarker, Parser};
pub(crate) use token_set::TokenSet;

use crate::lexer::lex;
use crate::syntax::SyntaxNode;
use input::Input;
use sink::Sink;
use text_size::TextRange;

/// Grammar entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryPoint {
    Script,
    Expr,
}

/// Parses a script into a syntax tree rooted at `Script`.
#[must_use]
pub fn parse(source: &str) -> Parse {
    parse_with_hints(source, &NoHints)
}

/// Parses a script, consulting `hints` to recognise zero-argument calls.
#[must_use]
pub fn parse_with_hints(source: &str, hints: &dyn FunctionHints) -> Parse {
    run(source, hints, EntryPoint::Script)
}

/// Parses a standalone expression into a tree rooted at `ExprRoot`.
#[must_use]
pub fn parse_expr(source: &str) -> Parse {
    run(source, &NoHints, EntryPoint::Expr)
}

fn run(source: &str, hints: &dyn FunctionHints, entry: EntryPoint) -> Parse {
    let tokens = lex(source);
    let input = Input::new(&tokens, source, hints);
    let events = Parser::new(&input).parse(entry);
    let (green_node, errors) = Sink::new(&tokens, source, events).finish();
    Parse { green_node, errors }
}

/// Result of parsing source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    /// The root syntax node.
    green_node: rowan::GreenNode,
    /// Parsing errors, in encounter order.
    errors: Vec<ParseError>,
}

impl Parse {
    /// Returns the root syntax node.
    #[must_use]
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green_node.clone())
    }

    /// Returns the root as a typed [`Script`](crate::ast::Script), or `None`
    /// for trees built by [`parse_expr`].
    #[must_use]
    pub fn script(&self) -> Option<crate::ast::Script> {
        rowan::ast::AstNode::cast(self.syntax())
    }

    /// Returns the green tree.
    #[must_use]
    pub fn green(&self) -> &rowan::GreenNode {
        &self.green_node
    }

    /// Returns the parsing errors.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Returns `true` if parsing produced no diagnostics at all.
    #[must_use]
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` if any diagnostic has error severity.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|error| error.severity == Severity::Error)
    }
}

/// Severity of a syntax diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The input is malformed.
    Error,
    /// The input parses but is suspicious.
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A parsing error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{severity}: {message} at {}..{}", u32::from(.range.start()), u32::from(.range.end()))]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// Error or warning.
    pub severity: Severity,
    /// The byte range where the error occurred.
    pub range: TextRange,
}
