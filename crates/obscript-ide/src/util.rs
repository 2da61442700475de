//! Shared helpers for IDE features.

use obscript_hir::{Database, File, FileId};
use obscript_syntax::algo::token_at_or_before;
use obscript_syntax::{lex, SyntaxKind, SyntaxNode, SyntaxToken, TokenKind};
use rowan::TokenAtOffset;
use text_size::TextSize;

/// One file's state, resolved once per request.
pub struct IdeContext<'db> {
    /// The database the request runs against.
    pub db: &'db Database,
    /// The requested file.
    pub file_id: FileId,
    /// The file entry.
    pub file: &'db File,
    /// The syntax tree root.
    pub root: SyntaxNode,
}

impl<'db> IdeContext<'db> {
    /// Resolves a file, or `None` if it is not open.
    #[must_use]
    pub fn new(db: &'db Database, file_id: FileId) -> Option<Self> {
        let file = db.file(file_id)?;
        Some(Self {
            db,
            file_id,
            file,
            root: file.parse.syntax(),
        })
    }

    /// The identifier under or right before `offset`.
    #[must_use]
    pub fn ident_at(&self, offset: TextSize) -> Option<SyntaxToken> {
        ident_at(&self.root, offset)
    }
}

/// The identifier token under or right before `offset`.
#[must_use]
pub fn ident_at(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
    let is_ident = |token: &SyntaxToken| token.kind() == SyntaxKind::Ident;
    if !root.text_range().contains_inclusive(offset) {
        return None;
    }
    match root.token_at_offset(offset) {
        TokenAtOffset::Between(left, right) => {
            [right, left].into_iter().find(is_ident)
        }
        _ => token_at_or_before(root, offset).filter(is_ident),
    }
}

/// Returns `true` if `name` lexes as a single identifier.
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    matches!(
        lex(name).as_slice(),
        [ident, eof] if ident.kind == TokenKind::Ident && eof.kind == TokenKind::Eof
    )
}
