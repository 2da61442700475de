//! Sink for converting parser events into a syntax tree.
//!
//! The sink takes the flat event stream and builds a proper `rowan` green
//! tree, interleaving the trivia the parser never saw and resolving error
//! positions to text ranges.

use crate::lexer::{Token, TokenKind};
use crate::parser::event::Event;
use crate::parser::ParseError;
use crate::syntax::SyntaxKind;
use text_size::{TextRange, TextSize};

/// Builds a syntax tree from parser events.
pub(crate) struct Sink<'t, 'src> {
    tokens: &'t [Token],
    source: &'src str,
    events: Vec<Event>,
    cursor: usize,
    depth: usize,
    last_significant_end: TextSize,
    builder: rowan::GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'t, 'src> Sink<'t, 'src> {
    /// Creates a new sink.
    pub(crate) fn new(tokens: &'t [Token], source: &'src str, events: Vec<Event>) -> Self {
        Self {
            tokens,
            source,
            events,
            cursor: 0,
            depth: 0,
            last_significant_end: TextSize::from(0),
            builder: rowan::GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    /// Consumes the sink and returns the green tree and errors.
    pub(crate) fn finish(mut self) -> (rowan::GreenNode, Vec<ParseError>) {
        for i in 0..self.events.len() {
            match std::mem::replace(&mut self.events[i], Event::Tombstone) {
                Event::Start {
                    kind,
                    forward_parent,
                } => {
                    let mut kinds = vec![kind];
                    let mut idx = i;
                    let mut fp = forward_parent;

                    while let Some(fp_idx) = fp {
                        idx += fp_idx as usize;
                        if let Event::Start {
                            kind,
                            forward_parent,
                        } = std::mem::replace(&mut self.events[idx], Event::Tombstone)
                        {
                            kinds.push(kind);
                            fp = forward_parent;
                        } else {
                            break;
                        }
                    }

                    // Nodes start at their first significant token, statement
                    // lists own the indentation in front of their statements.
                    if self.depth > 0 && !kinds.contains(&SyntaxKind::StmtList) {
                        self.eat_trivia();
                    }

                    for kind in kinds.into_iter().rev() {
                        self.builder.start_node(kind.into());
                        self.depth += 1;
                    }
                }
                Event::Token { kind, n_raw_tokens } => {
                    for _ in 0..n_raw_tokens {
                        self.eat_trivia();
                        self.token(kind);
                    }
                }
                Event::Finish => {
                    assert!(self.depth > 0, "unbalanced finish event");
                    if self.depth == 1 {
                        self.eat_remaining();
                    }
                    self.builder.finish_node();
                    self.depth -= 1;
                }
                Event::Error { message, severity } => {
                    let range = self.error_range();
                    self.errors.push(ParseError {
                        message,
                        severity,
                        range,
                    });
                }
                Event::Tombstone => {}
            }
        }

        assert_eq!(self.depth, 0, "unbalanced start event");
        (self.builder.finish(), self.errors)
    }

    /// Adds trivia (whitespace, comments) to the tree.
    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor) {
            if !token.kind.is_trivia() {
                break;
            }
            self.token(SyntaxKind::from(token.kind));
        }
    }

    /// Appends everything the parser left behind to the root.
    fn eat_remaining(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor) {
            if token.kind == TokenKind::Eof {
                break;
            }
            self.token(SyntaxKind::from(token.kind));
        }
    }

    /// Adds the token under the cursor to the tree as `kind`.
    fn token(&mut self, kind: SyntaxKind) {
        if let Some(token) = self.tokens.get(self.cursor) {
            if token.kind == TokenKind::Eof {
                return;
            }
            self.builder.token(kind.into(), &self.source[token.range]);
            if !token.kind.is_trivia() && token.kind != TokenKind::Newline {
                self.last_significant_end = token.range.end();
            }
            self.cursor += 1;
        }
    }

    /// The range of the next significant token, or an empty range after
    /// the previous one when the next token ends the line.
    fn error_range(&self) -> TextRange {
        let next = self.tokens[self.cursor..]
            .iter()
            .find(|token| !token.kind.is_trivia());
        match next {
            Some(token) if !matches!(token.kind, TokenKind::Newline | TokenKind::Eof) => {
                token.range
            }
            _ => TextRange::empty(self.last_significant_end),
        }
    }
}
