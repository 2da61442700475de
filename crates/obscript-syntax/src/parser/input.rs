//! Token input for the parser.
//!
//! The parser works on a projection of the lexer output: trivia is dropped,
//! newlines stay (they terminate statements), and each identifier carries one
//! bit saying whether it names a known function.

use crate::lexer::{Token, TokenKind};

/// Knowledge about which identifiers name functions.
///
/// The grammar uses it to parse a bare identifier with no arguments as a
/// call. Implementations must be case-insensitive.
pub trait FunctionHints {
    /// Returns `true` if `name` is a function.
    fn is_function(&self, name: &str) -> bool;
}

/// No function knowledge: only identifiers followed by arguments are calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHints;

impl FunctionHints for NoHints {
    fn is_function(&self, _name: &str) -> bool {
        false
    }
}

pub(crate) struct Input {
    kinds: Vec<TokenKind>,
    function_hint: Vec<bool>,
}

impl Input {
    pub(crate) fn new(tokens: &[Token], source: &str, hints: &dyn FunctionHints) -> Self {
        let mut kinds = Vec::with_capacity(tokens.len());
        let mut function_hint = Vec::with_capacity(tokens.len());
        for token in tokens {
            if token.kind.is_trivia() || token.kind == TokenKind::Eof {
                continue;
            }
            kinds.push(token.kind);
            function_hint
                .push(token.kind == TokenKind::Ident && hints.is_function(&source[token.range]));
        }
        Self {
            kinds,
            function_hint,
        }
    }

    /// Kind of the token at `idx`, `Eof` past the end.
    pub(crate) fn kind(&self, idx: usize) -> TokenKind {
        self.kinds.get(idx).copied().unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn is_function(&self, idx: usize) -> bool {
        self.function_hint.get(idx).copied().unwrap_or(false)
    }
}
