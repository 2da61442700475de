//! Main parser implementation.

use std::cell::Cell;

use crate::lexer::TokenKind;
use crate::parser::event::Event;
use crate::parser::input::Input;
use crate::parser::grammar::BLOCK_END;
use crate::parser::{EntryPoint, Severity, TokenSet};
use crate::syntax::SyntaxKind;
use drop_bomb::DropBomb;

/// Lookahead calls allowed between two consumed tokens.
const STEP_LIMIT: u32 = 4096;

/// Nested expressions and block bodies allowed before the parser stops
/// descending.
const NESTING_LIMIT: u32 = 128;

/// The parser state.
pub(crate) struct Parser<'i> {
    input: &'i Input,
    pos: usize,
    pub(crate) events: Vec<Event>,
    steps: Cell<u32>,
    /// Open parentheses; while positive, newlines are insignificant.
    pub(crate) paren_depth: u32,
    /// Open `begin` blocks and lambda bodies.
    pub(crate) begin_depth: u32,
    /// Expression and block nesting of the current position.
    pub(crate) nesting: u32,
}

pub(crate) struct Marker {
    pos: usize,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: usize) -> Self {
        Self {
            pos,
            bomb: DropBomb::new("uncompleted marker"),
        }
    }

    pub(crate) fn complete(mut self, parser: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();
        match &mut parser.events[self.pos] {
            event @ Event::Tombstone => *event = Event::start(kind),
            Event::Start {
                kind: existing_kind,
                ..
            } => *existing_kind = kind,
            _ => unreachable!("marker does not point at a start event"),
        }
        parser.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    pub(crate) fn abandon(mut self, parser: &mut Parser<'_>) {
        self.bomb.defuse();
        if self.pos == parser.events.len() - 1 {
            match parser.events.pop() {
                Some(Event::Tombstone) => {}
                _ => unreachable!("abandoned marker does not point at a tombstone"),
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct CompletedMarker {
    pos: usize,
}

impl CompletedMarker {
    pub(crate) fn precede(self, parser: &mut Parser<'_>) -> Marker {
        let new_pos = parser.events.len();
        parser.events.push(Event::Tombstone);
        set_forward_parent(&mut parser.events, self.pos, new_pos);
        Marker::new(new_pos)
    }
}

fn set_forward_parent(events: &mut [Event], from: usize, to: usize) {
    let mut current = from;
    loop {
        match &mut events[current] {
            Event::Start {
                forward_parent: Some(fp),
                ..
            } => {
                current += *fp as usize;
            }
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some((to - current) as u32);
                break;
            }
            _ => break,
        }
    }
}

impl<'i> Parser<'i> {
    pub(crate) fn new(input: &'i Input) -> Self {
        Self {
            input,
            pos: 0,
            events: Vec::new(),
            steps: Cell::new(0),
            paren_depth: 0,
            begin_depth: 0,
            nesting: 0,
        }
    }

    pub(crate) fn parse(mut self, entry: EntryPoint) -> Vec<Event> {
        match entry {
            EntryPoint::Script => self.parse_script(),
            EntryPoint::Expr => self.parse_expr_root(),
        }
        self.events
    }

    // =========================================================================
    // Lookahead
    // =========================================================================

    pub(crate) fn nth(&self, n: usize) -> TokenKind {
        let steps = self.steps.get();
        assert!(steps <= STEP_LIMIT, "the parser seems stuck");
        self.steps.set(steps + 1);
        self.input.kind(self.pos + n)
    }

    pub(crate) fn current(&self) -> TokenKind {
        self.nth(0)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_set(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    pub(crate) fn at_end(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// At a newline or the end of input.
    pub(crate) fn at_line_end(&self) -> bool {
        matches!(self.current(), TokenKind::Newline | TokenKind::Eof)
    }

    /// Whether the current token is an identifier known to be a function.
    pub(crate) fn at_known_function(&self) -> bool {
        self.at(TokenKind::Ident) && self.input.is_function(self.pos)
    }

    // =========================================================================
    // Consumption
    // =========================================================================

    /// Consumes the current token, which must be `kind`.
    pub(crate) fn bump(&mut self, kind: TokenKind) {
        assert!(self.eat(kind), "bumped {kind:?} at {:?}", self.current());
    }

    /// Consumes the current token whatever it is. No-op at the end of input.
    pub(crate) fn bump_any(&mut self) {
        let kind = self.current();
        if kind == TokenKind::Eof {
            return;
        }
        self.do_bump(kind);
    }

    /// Consumes the current token if it is `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if !self.at(kind) || kind == TokenKind::Eof {
            return false;
        }
        self.do_bump(kind);
        true
    }

    fn do_bump(&mut self, kind: TokenKind) {
        self.push_token(kind);
        if self.paren_depth > 0 {
            while self.input.kind(self.pos) == TokenKind::Newline {
                self.push_token(TokenKind::Newline);
            }
        }
    }

    fn push_token(&mut self, kind: TokenKind) {
        self.events.push(Event::token(SyntaxKind::from(kind)));
        self.pos += 1;
        self.steps.set(0);
    }

    /// Consumes `kind` or reports `message`.
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(message);
        false
    }

    // =========================================================================
    // Markers and diagnostics
    // =========================================================================

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Tombstone);
        Marker::new(pos)
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.events.push(Event::Error {
            message: message.into(),
            severity: Severity::Error,
        });
    }

    pub(crate) fn warning(&mut self, message: impl Into<String>) {
        self.events.push(Event::Error {
            message: message.into(),
            severity: Severity::Warning,
        });
    }

    /// Reports `message` and wraps the current token in an `Error` node,
    /// unless the token is in `recovery` or ends the line.
    pub(crate) fn err_recover(&mut self, message: &str, recovery: TokenSet) {
        if self.at_set(recovery) || self.at_line_end() {
            self.error(message);
            return;
        }
        let m = self.start();
        self.error(message);
        self.bump_any();
        m.complete(self, SyntaxKind::Error);
    }

    pub(crate) fn too_deep(&self) -> bool {
        self.nesting >= NESTING_LIMIT
    }

    /// Wraps the rest of the line in an `Error` node. Stops before a closing
    /// bracket opened outside the skipped tokens.
    pub(crate) fn err_expr_too_deep(&mut self) -> CompletedMarker {
        let m = self.start();
        self.error("expression nested too deeply");
        let outer_paren_depth = std::mem::take(&mut self.paren_depth);
        let mut open = 0u32;
        while !self.at_line_end() {
            match self.current() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => open += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    if open == 0 {
                        break;
                    }
                    open -= 1;
                }
                _ => {}
            }
            self.bump_any();
        }
        self.paren_depth = outer_paren_depth;
        m.complete(self, SyntaxKind::Error)
    }

    /// Wraps a block body in an `Error` node, up to the terminator that
    /// closes the enclosing block.
    pub(crate) fn err_block_too_deep(&mut self) {
        let m = self.start();
        self.error("block nested too deeply");
        let mut open = 0u32;
        while !self.at_end() {
            match self.current() {
                TokenKind::KwIf | TokenKind::KwWhile | TokenKind::KwForeach | TokenKind::KwBegin => {
                    open += 1;
                }
                TokenKind::KwEndIf | TokenKind::KwLoop | TokenKind::KwEnd if open > 0 => open -= 1,
                kind if open == 0 && BLOCK_END.contains(kind) => break,
                _ => {}
            }
            self.bump_any();
        }
        m.complete(self, SyntaxKind::Error);
    }

    /// Consumes the statement terminator. Anything left on the line is
    /// wrapped in a single `Error` node.
    pub(crate) fn expect_newline(&mut self) {
        if self.eat(TokenKind::Newline) || self.at_end() {
            return;
        }
        let m = self.start();
        self.error("expected newline");
        while !self.at_line_end() {
            self.bump_any();
        }
        m.complete(self, SyntaxKind::Error);
        self.eat(TokenKind::Newline);
    }
}
