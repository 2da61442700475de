//! Token definitions for ObScript.
//!
//! This module defines all lexical tokens that can appear in script source.
//! The `logos` derive only recognises the raw shapes (whitespace, comments,
//! strings, words, punctuation); words are classified into numbers, keywords
//! and type names by the [`Lexer`](super::Lexer) afterwards, because the
//! number-versus-word decision needs lookahead that a DFA cannot express.

use logos::Logos;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// All token kinds in ObScript.
///
/// Token kinds are divided into categories:
/// - Trivia (whitespace, comments) - preserved but invisible to the grammar
/// - Newlines - preserved and significant (statement terminators)
/// - Literals (numbers, strings)
/// - Punctuation and operators
/// - Keywords and type names
/// - Special tokens (unknown characters, EOF)
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    /// Horizontal whitespace (spaces, tabs, form feeds).
    #[regex(r"[ \t\f]+")]
    Whitespace,

    /// Line comment: `; ...` up to, not including, the line break.
    #[regex(r";[^\r\n]*", allow_greedy = true)]
    Comment,

    /// A run of line breaks.
    #[regex(r"[\r\n]+")]
    Newline,

    // =========================================================================
    // LITERALS
    // =========================================================================
    /// Decimal number: `42`, `1.5`, `.5`
    Number,

    /// Hexadecimal number: `0xFF`
    HexNumber,

    /// String literal, greedy to the matching quote, no escapes.
    /// An unterminated string runs to the end of input.
    #[regex(r#""[^"]*"?"#)]
    #[regex(r"'[^']*'?")]
    String,

    /// Identifier. The lexer reclassifies words into numbers and keywords.
    #[regex(r"[0-9a-zA-Z_]+")]
    Ident,

    // =========================================================================
    // OPERATORS - Assignment
    // =========================================================================
    /// `:=`
    #[token(":=")]
    ColonEq,

    /// `+=`
    #[token("+=")]
    PlusEq,

    /// `-=`
    #[token("-=")]
    MinusEq,

    /// `*=`
    #[token("*=")]
    StarEq,

    /// `/=`
    #[token("/=")]
    SlashEq,

    /// `^=`
    #[token("^=")]
    CaretEq,

    /// `|=`
    #[token("|=")]
    PipeEq,

    /// `&=`
    #[token("&=")]
    AmpEq,

    /// `%=`
    #[token("%=")]
    PercentEq,

    // =========================================================================
    // OPERATORS - Logical and comparison
    // =========================================================================
    /// `||`
    #[token("||")]
    PipePipe,

    /// `&&`
    #[token("&&")]
    AmpAmp,

    /// `==`
    #[token("==")]
    EqEq,

    /// `!=`
    #[token("!=")]
    BangEq,

    /// `>=`
    #[token(">=")]
    GtEq,

    /// `<=`
    #[token("<=")]
    LtEq,

    /// `<<`
    #[token("<<")]
    Shl,

    /// `>>`
    #[token(">>")]
    Shr,

    /// `->`
    #[token("->")]
    Arrow,

    /// `<-`
    #[token("<-")]
    LArrow,

    // =========================================================================
    // OPERATORS - Single character
    // =========================================================================
    /// `+`
    #[token("+")]
    Plus,

    /// `-`
    #[token("-")]
    Minus,

    /// `*`
    #[token("*")]
    Star,

    /// `/`
    #[token("/")]
    Slash,

    /// `%`
    #[token("%")]
    Percent,

    /// `^`
    #[token("^")]
    Caret,

    /// `!`
    #[token("!")]
    Bang,

    /// `$`
    #[token("$")]
    Dollar,

    /// `#`
    #[token("#")]
    Hash,

    /// `&`
    #[token("&")]
    Amp,

    /// `|`
    #[token("|")]
    Pipe,

    /// `<`
    #[token("<")]
    Lt,

    /// `>`
    #[token(">")]
    Gt,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    /// `.`
    #[token(".")]
    Dot,

    /// `,`
    #[token(",")]
    Comma,

    /// `:`
    #[token(":")]
    Colon,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    /// `scriptname` / `scn`
    KwScriptName,
    /// `begin`
    KwBegin,
    /// `end`
    KwEnd,
    /// `if`
    KwIf,
    /// `elseif`
    KwElseIf,
    /// `else`
    KwElse,
    /// `endif`
    KwEndIf,
    /// `while`
    KwWhile,
    /// `loop`
    KwLoop,
    /// `foreach`
    KwForeach,
    /// `continue`
    KwContinue,
    /// `break`
    KwBreak,
    /// `return`
    KwReturn,
    /// `set`
    KwSet,
    /// `to`
    KwTo,
    /// `let`
    KwLet,

    // =========================================================================
    // TYPE NAMES
    // =========================================================================
    /// `short`
    KwShort,
    /// `int`
    KwInt,
    /// `long`
    KwLong,
    /// `float`
    KwFloat,
    /// `ref` / `reference`
    KwRef,
    /// `string_var`
    KwStringVar,
    /// `array_var`
    KwArrayVar,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    /// A character no other rule accepts.
    Unknown,

    /// End of input.
    Eof,
}

static KEYWORDS: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    [
        ("scriptname", TokenKind::KwScriptName),
        ("scn", TokenKind::KwScriptName),
        ("begin", TokenKind::KwBegin),
        ("end", TokenKind::KwEnd),
        ("if", TokenKind::KwIf),
        ("elseif", TokenKind::KwElseIf),
        ("else", TokenKind::KwElse),
        ("endif", TokenKind::KwEndIf),
        ("while", TokenKind::KwWhile),
        ("loop", TokenKind::KwLoop),
        ("foreach", TokenKind::KwForeach),
        ("continue", TokenKind::KwContinue),
        ("break", TokenKind::KwBreak),
        ("return", TokenKind::KwReturn),
        ("set", TokenKind::KwSet),
        ("to", TokenKind::KwTo),
        ("let", TokenKind::KwLet),
        ("short", TokenKind::KwShort),
        ("int", TokenKind::KwInt),
        ("long", TokenKind::KwLong),
        ("float", TokenKind::KwFloat),
        ("ref", TokenKind::KwRef),
        ("reference", TokenKind::KwRef),
        ("string_var", TokenKind::KwStringVar),
        ("array_var", TokenKind::KwArrayVar),
    ]
    .into_iter()
    .collect()
});

impl TokenKind {
    /// Classifies a word by its lowercase form: keyword, type name or `Ident`.
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        KEYWORDS
            .get(word.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(Self::Ident)
    }

    /// Returns `true` if this token is trivia (whitespace or comment).
    ///
    /// Newlines are not trivia: they terminate statements.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }

    /// Returns `true` if this token is a literal.
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Number | Self::HexNumber | Self::String)
    }

    /// Returns `true` if this token is a keyword.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::KwScriptName
                | Self::KwBegin
                | Self::KwEnd
                | Self::KwIf
                | Self::KwElseIf
                | Self::KwElse
                | Self::KwEndIf
                | Self::KwWhile
                | Self::KwLoop
                | Self::KwForeach
                | Self::KwContinue
                | Self::KwBreak
                | Self::KwReturn
                | Self::KwSet
                | Self::KwTo
                | Self::KwLet
        )
    }

    /// Returns `true` if this token is a type name.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::KwShort
                | Self::KwInt
                | Self::KwLong
                | Self::KwFloat
                | Self::KwRef
                | Self::KwStringVar
                | Self::KwArrayVar
        )
    }

    /// Returns `true` if this token is an assignment operator.
    pub fn is_assign_op(self) -> bool {
        matches!(
            self,
            Self::ColonEq
                | Self::PlusEq
                | Self::MinusEq
                | Self::StarEq
                | Self::SlashEq
                | Self::CaretEq
                | Self::PipeEq
                | Self::AmpEq
                | Self::PercentEq
        )
    }

    /// Returns `true` if this token is an operator or punctuation.
    pub fn is_operator(self) -> bool {
        (self as u16) >= (Self::ColonEq as u16) && (self as u16) <= (Self::RBrace as u16)
    }

    /// Returns `true` if this token can start an expression.
    pub fn can_start_expr(self) -> bool {
        self.is_literal()
            || self.prefix_binding_power().is_some()
            || matches!(self, Self::Ident | Self::LParen)
    }

    /// Returns `true` if this token can start a bare function argument.
    ///
    /// Operators that are also binary (`-`, `*`, `&`) are excluded so that
    /// `foo - 1` stays a subtraction.
    pub fn can_start_argument(self) -> bool {
        self.is_literal()
            || matches!(
                self,
                Self::Ident | Self::LParen | Self::Dollar | Self::Hash | Self::Bang
            )
    }

    /// Returns the binding power for Pratt parsing (left, right).
    /// Returns None if not an infix operator.
    pub fn infix_binding_power(self) -> Option<(u8, u8)> {
        Some(match self {
            Self::ColonEq
            | Self::PlusEq
            | Self::MinusEq
            | Self::StarEq
            | Self::SlashEq
            | Self::CaretEq
            | Self::PipeEq
            | Self::AmpEq
            | Self::PercentEq => (2, 1), // Right associative
            Self::PipePipe => (3, 4),
            Self::AmpAmp => (5, 6),
            Self::Colon => (7, 8),
            Self::EqEq | Self::BangEq => (9, 10),
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq => (11, 12),
            Self::Pipe => (13, 14),
            Self::Amp => (15, 16),
            Self::Shl | Self::Shr => (17, 18),
            Self::Plus | Self::Minus => (19, 20),
            Self::Star | Self::Slash | Self::Percent => (21, 22),
            Self::Caret => (24, 23), // Right associative
            _ => return None,
        })
    }

    /// Returns the binding power for prefix operators.
    pub fn prefix_binding_power(self) -> Option<u8> {
        Some(match self {
            Self::Bang | Self::Minus | Self::Dollar | Self::Hash | Self::Star | Self::Amp => 25,
            _ => return None,
        })
    }
}

impl From<TokenKind> for rowan::SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        Self(kind as u16)
    }
}
