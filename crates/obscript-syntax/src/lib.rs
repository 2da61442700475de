//! `obscript-syntax` - Lexer, parser, and concrete syntax tree for ObScript.
//!
//! This crate provides the low-level syntactic analysis for script source:
//!
//! - **Lexer**: Tokenizes source text into a stream of tokens
//! - **Parser**: Builds a concrete syntax tree (CST) from tokens
//! - **Syntax Tree**: Lossless representation of the source code
//! - **AST**: Typed views over tree nodes
//!
//! # Design Principles
//!
//! This crate follows the design of `rust-analyzer` and uses the `rowan` library
//! for building lossless syntax trees. Key design decisions:
//!
//! - **Lossless**: All source text is preserved, including whitespace and comments
//! - **Error-tolerant**: Parsing continues after errors, producing a partial tree
//! - **Line-oriented**: Newlines terminate statements and are real tokens
//!
//! # Example
//!
//! ```
//! use obscript_syntax::lexer::{lex, TokenKind};
//!
//! let source = "set x to 42";
//! let tokens = lex(source);
//!
//! // Filter out whitespace to see the meaningful tokens
//! let meaningful: Vec<_> = tokens.iter()
//!     .filter(|t| !t.kind.is_trivia())
//!     .collect();
//!
//! assert_eq!(meaningful[0].kind, TokenKind::KwSet);
//! assert_eq!(meaningful[1].kind, TokenKind::Ident);
//! assert_eq!(meaningful[2].kind, TokenKind::KwTo);
//! assert_eq!(meaningful[3].kind, TokenKind::Number);
//! assert_eq!(meaningful[4].kind, TokenKind::Eof);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod algo;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod syntax;
mod token_kinds;

pub use lexer::{lex, Lexer, Token, TokenKind};
pub use parser::{
    parse, parse_expr, parse_with_hints, FunctionHints, NoHints, Parse, ParseError, Severity,
};
pub use syntax::{ObsLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
