//! Offset and position conversion.
//!
//! Editors address text by line and UTF-16 column; the syntax tree uses byte
//! offsets.

use std::sync::Arc;

use lsp_types::Position;
use text_size::{TextRange, TextSize};

/// Line starts of one text snapshot.
#[derive(Debug, Clone)]
pub struct LineIndex {
    text: Arc<str>,
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    /// Indexes `text`.
    #[must_use]
    pub fn new(text: Arc<str>) -> Self {
        let line_starts = std::iter::once(TextSize::from(0))
            .chain(
                text.match_indices('\n')
                    .map(|(index, _)| TextSize::from(index as u32 + 1)),
            )
            .collect();
        Self { text, line_starts }
    }

    /// Number of lines. A trailing newline opens a final empty line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The position of a byte offset. Offsets past the end map to the end;
    /// offsets inside a character map to its start.
    #[must_use]
    pub fn position_at(&self, offset: TextSize) -> Position {
        let offset = offset.min(TextSize::of(&*self.text));
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let start = self.line_starts[line];
        let prefix = &self.text[usize::from(start)..];
        let len = usize::from(offset - start);
        let character = prefix
            .char_indices()
            .take_while(|(index, _)| *index < len)
            .map(|(_, c)| c.len_utf16() as u32)
            .sum();
        Position {
            line: line as u32,
            character,
        }
    }

    /// The byte offset of a position. Columns past the line end clamp to
    /// it; columns inside a surrogate pair round down; lines past the last
    /// give `None`.
    #[must_use]
    pub fn offset_at(&self, position: Position) -> Option<TextSize> {
        let range = self.line_range(position.line as usize)?;
        let line = &self.text[range];
        let mut column = 0;
        for (index, c) in line.char_indices() {
            column += c.len_utf16() as u32;
            if column > position.character {
                return Some(range.start() + TextSize::from(index as u32));
            }
        }
        Some(range.end())
    }

    /// The range of a position pair, if both ends exist.
    #[must_use]
    pub fn range_at(&self, range: lsp_types::Range) -> Option<TextRange> {
        let start = self.offset_at(range.start)?;
        let end = self.offset_at(range.end)?;
        (start <= end).then(|| TextRange::new(start, end))
    }

    /// The editor range of a byte range.
    #[must_use]
    pub fn lsp_range(&self, range: TextRange) -> lsp_types::Range {
        lsp_types::Range {
            start: self.position_at(range.start()),
            end: self.position_at(range.end()),
        }
    }

    /// The range of a line, `\n` excluded.
    fn line_range(&self, line: usize) -> Option<TextRange> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map_or(TextSize::of(&*self.text), |next| *next - TextSize::from(1));
        Some(TextRange::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(text: &str) -> LineIndex {
        LineIndex::new(Arc::from(text))
    }

    fn pos(line: u32, character: u32) -> Position {
        Position { line, character }
    }

    #[test]
    fn test_round_trip_on_char_boundaries() {
        let text = "scn T\nset s to \"é😀\"\r\nend";
        let index = index(text);
        for (offset, _) in text.char_indices() {
            let offset = TextSize::from(offset as u32);
            let position = index.position_at(offset);
            assert_eq!(index.offset_at(position), Some(offset), "{position:?}");
        }
    }

    #[test]
    fn test_utf16_columns() {
        let index = index("a😀b\n");
        assert_eq!(index.position_at(TextSize::from(5)), pos(0, 3));
        assert_eq!(index.offset_at(pos(0, 3)), Some(TextSize::from(5)));
        assert_eq!(index.offset_at(pos(0, 2)), Some(TextSize::from(1)));
    }

    #[test]
    fn test_clamping() {
        let index = index("ab\r\ncd\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.offset_at(pos(0, 10)), Some(TextSize::from(3)));
        assert_eq!(index.offset_at(pos(2, 0)), Some(TextSize::from(7)));
        assert_eq!(index.offset_at(pos(3, 0)), None);
        assert_eq!(index.position_at(TextSize::from(100)), pos(2, 0));
    }
}
