//! Source text positions and ranges.

use std::fmt;

pub use text_size::TextRange;
pub use text_size::TextSize;

/// A line and column position in source text.
///
/// Both fields are 0-indexed; `Display` prints them 1-indexed the way
/// editors show them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
pub struct LineCol {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column, in UTF-8 bytes
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl fmt::Debug for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Converts between byte offsets and line/column positions of one text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(offset, _)| TextSize::from((offset + 1) as u32)),
        );

        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Offsets past the end clamp to the end of the text.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);

        LineCol {
            line: line as u32,
            col: (offset - self.line_starts[line]).into(),
        }
    }

    /// Convert a line/column position to a byte offset.
    ///
    /// Returns `None` for lines that do not exist or columns past the end
    /// of the line.
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(line_col.line as usize)?;
        let end = self
            .line_starts
            .get(line_col.line as usize + 1)
            .map(|&next| next - TextSize::from(1))
            .unwrap_or(self.len);
        let offset = start + TextSize::from(line_col.col);
        (offset <= end).then_some(offset)
    }

    /// Line/column bounds of a range.
    pub fn range(&self, range: TextRange) -> (LineCol, LineCol) {
        (self.line_col(range.start()), self.line_col(range.end()))
    }

    /// Number of lines (a trailing newline starts an empty last line).
    pub fn len(&self) -> usize {
        self.line_starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::from(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_display_is_one_indexed() {
        assert_eq!(LineCol::new(0, 0).to_string(), "1:1");
        assert_eq!(LineCol::new(5, 10).to_string(), "6:11");
    }

    #[test]
    fn test_line_index_multi_line() {
        let index = LineIndex::new("package a\n\nfunc f() {}\n");

        assert_eq!(index.line_col(TextSize::from(0)), LineCol::new(0, 0));
        assert_eq!(index.line_col(TextSize::from(8)), LineCol::new(0, 8));
        assert_eq!(index.line_col(TextSize::from(10)), LineCol::new(1, 0));
        assert_eq!(index.line_col(TextSize::from(16)), LineCol::new(2, 5));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_line_index_offset_round_trip() {
        let text = "package a\nvar x int\n";
        let index = LineIndex::new(text);

        let offset = index.offset(LineCol::new(1, 4)).unwrap();
        assert_eq!(&text[usize::from(offset)..usize::from(offset) + 1], "x");
        assert_eq!(index.line_col(offset), LineCol::new(1, 4));
    }

    #[test]
    fn test_line_index_rejects_out_of_bounds() {
        let index = LineIndex::new("ab\ncd");

        assert_eq!(index.offset(LineCol::new(0, 3)), None);
        assert_eq!(index.offset(LineCol::new(7, 0)), None);
        assert_eq!(index.line_col(TextSize::from(100)), LineCol::new(1, 2));
    }
}
