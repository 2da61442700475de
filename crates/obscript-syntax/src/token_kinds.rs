//! Single source of truth for the token kind list.
//!
//! `SyntaxKind` mirrors `TokenKind` variant for variant and in the same
//! order, so `TokenKind as u16 == SyntaxKind as u16` for every token.

macro_rules! for_each_token_kind {
    ($m:ident) => {
        $m! {
            Whitespace,
            Comment,
            Newline,
            Number,
            HexNumber,
            String,
            Ident,
            ColonEq,
            PlusEq,
            MinusEq,
            StarEq,
            SlashEq,
            CaretEq,
            PipeEq,
            AmpEq,
            PercentEq,
            PipePipe,
            AmpAmp,
            EqEq,
            BangEq,
            GtEq,
            LtEq,
            Shl,
            Shr,
            Arrow,
            LArrow,
            Plus,
            Minus,
            Star,
            Slash,
            Percent,
            Caret,
            Bang,
            Dollar,
            Hash,
            Amp,
            Pipe,
            Lt,
            Gt,
            Dot,
            Comma,
            Colon,
            LParen,
            RParen,
            LBracket,
            RBracket,
            LBrace,
            RBrace,
            KwScriptName,
            KwBegin,
            KwEnd,
            KwIf,
            KwElseIf,
            KwElse,
            KwEndIf,
            KwWhile,
            KwLoop,
            KwForeach,
            KwContinue,
            KwBreak,
            KwReturn,
            KwSet,
            KwTo,
            KwLet,
            KwShort,
            KwInt,
            KwLong,
            KwFloat,
            KwRef,
            KwStringVar,
            KwArrayVar,
            Unknown,
            Eof,
        }
    };
}

pub(crate) use for_each_token_kind;
