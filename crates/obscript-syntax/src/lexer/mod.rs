//! Lexer for ObScript.
//!
//! This module provides a lexer that tokenizes script source into a stream
//! of tokens with their positions in the source text. The stream is lossless:
//! every byte of the input belongs to exactly one token, and the stream is
//! always terminated by a single zero-width [`TokenKind::Eof`].

mod tokens;

pub use tokens::TokenKind;

use logos::Logos;
use std::collections::VecDeque;
use std::ops::Range;
use text_size::{TextRange, TextSize};

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The byte range of the token in the source text.
    pub range: TextRange,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    /// Returns the length of the token in bytes.
    #[must_use]
    pub fn len(&self) -> TextSize {
        self.range.len()
    }

    /// Returns true if the token has zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// Lexer for ObScript source code.
///
/// The lexer is an iterator over tokens. It handles all error recovery
/// internally - any unrecognized character is returned as
/// `TokenKind::Unknown`, so lexing never fails.
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source: &'src str,
    pending: VecDeque<Token>,
    eof_emitted: bool,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            pending: VecDeque::new(),
            eof_emitted: false,
        }
    }

    /// Returns the source text being lexed.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Classifies a raw word: hex literal, number, keyword or identifier.
    ///
    /// A word that starts a number but continues into identifier characters
    /// stays a word (`1x`). A decimal whose fraction runs into letters is cut
    /// back to the integer part, which is then lexed as a word (`12.5x`
    /// becomes `12`, `.`, `5x`).
    fn lex_word(&mut self, span: Range<usize>) -> Token {
        let text = &self.source[span.clone()];
        if !text.as_bytes()[0].is_ascii_digit() {
            return Token::new(TokenKind::from_word(text), to_range(span));
        }

        if let Some(hex_len) = hex_prefix_len(text) {
            let split = span.start + hex_len;
            if split < span.end {
                let rest = &self.source[split..span.end];
                self.pending.push_back(Token::new(
                    TokenKind::from_word(rest),
                    to_range(split..span.end),
                ));
            }
            return Token::new(TokenKind::HexNumber, to_range(span.start..split));
        }

        match scan_number(&self.source[span.start..]) {
            Some(len) => {
                let word_len = span.len();
                if len > word_len {
                    self.inner.bump(len - word_len);
                }
                Token::new(TokenKind::Number, to_range(span.start..span.start + len))
            }
            None => Token::new(TokenKind::from_word(text), to_range(span)),
        }
    }

    /// A `.` directly followed by digits is a fraction-only number (`.5`)
    /// unless the digits run into identifier characters.
    fn lex_dot(&mut self, span: Range<usize>) -> Token {
        let rest = &self.source[span.end..];
        let digits = leading_digits(rest);
        if digits > 0 && !rest.as_bytes().get(digits).copied().is_some_and(is_ident_byte) {
            self.inner.bump(digits);
            return Token::new(TokenKind::Number, to_range(span.start..span.end + digits));
        }
        Token::new(TokenKind::Dot, to_range(span))
    }

    /// Widens an error span to the next char boundary so that a multi-byte
    /// character becomes exactly one `Unknown` token.
    fn lex_unknown(&mut self, span: Range<usize>) -> Token {
        let mut end = span.end.max(span.start + 1);
        while end < self.source.len() && !self.source.is_char_boundary(end) {
            end += 1;
        }
        if end > span.end {
            self.inner.bump(end - span.end);
        }
        Token::new(TokenKind::Unknown, to_range(span.start..end))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }

        let Some(kind) = self.inner.next() else {
            if self.eof_emitted {
                return None;
            }
            self.eof_emitted = true;
            return Some(Token::new(
                TokenKind::Eof,
                TextRange::empty(TextSize::of(self.source)),
            ));
        };
        let span = self.inner.span();

        let token = match kind {
            Ok(TokenKind::Ident) => self.lex_word(span),
            Ok(TokenKind::Dot) => self.lex_dot(span),
            Ok(kind) => Token::new(kind, to_range(span)),
            Err(()) => self.lex_unknown(span),
        };
        Some(token)
    }
}

fn to_range(span: Range<usize>) -> TextRange {
    TextRange::new(
        TextSize::from(span.start as u32),
        TextSize::from(span.end as u32),
    )
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn leading_digits(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

/// Length of a `0x`/`0X` prefix plus its hex digits, if at least one digit
/// follows the prefix.
fn hex_prefix_len(word: &str) -> Option<usize> {
    let digits = word
        .strip_prefix("0x")
        .or_else(|| word.strip_prefix("0X"))?
        .bytes()
        .take_while(u8::is_ascii_hexdigit)
        .count();
    (digits > 0).then_some(digits + 2)
}

/// Scans `digits [. digits]` at the start of `text` and returns its length,
/// or `None` when an identifier character follows the number.
fn scan_number(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut end = leading_digits(text);
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end += 1 + leading_digits(&text[end + 1..]);
    }
    if bytes.get(end).copied().is_some_and(is_ident_byte) {
        return None;
    }
    Some(end)
}

/// Lex the entire source and return all tokens, ending with `Eof`.
///
/// This is a convenience function for testing and simple use cases.
/// For the parser, use the `Lexer` iterator directly.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).collect()
}

/// Lex source and return tokens paired with their text.
///
/// Useful for debugging and testing.
#[must_use]
pub fn lex_with_text(source: &str) -> Vec<(Token, &str)> {
    Lexer::new(source)
        .map(|token| (token, &source[token.range]))
        .collect()
}

/// Concatenates the text of `tokens` back into a string.
#[must_use]
pub fn reconstruct(tokens: &[Token], source: &str) -> String {
    tokens.iter().map(|token| &source[token.range]).collect()
}
