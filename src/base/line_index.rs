//! Byte offset to line/column conversion.
//!
//! Failure records report where in the source a candidate sat; the engine
//! converts the candidate's byte offset through a [`LineIndex`] built once
//! per document.

use text_size::TextSize;

/// A line/column pair, both 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Maps byte offsets to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
        Self { line_starts }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = u32::from(offset) - u32::from(self.line_starts[line]);
        LineCol {
            line: line as u32,
            col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line() {
        let index = LineIndex::new("hello\nworld");
        assert_eq!(index.line_col(TextSize::new(2)), LineCol { line: 0, col: 2 });
    }

    #[test]
    fn second_line() {
        let index = LineIndex::new("hello\nworld");
        assert_eq!(index.line_col(TextSize::new(6)), LineCol { line: 1, col: 0 });
        assert_eq!(index.line_col(TextSize::new(8)), LineCol { line: 1, col: 2 });
    }

    #[test]
    fn offset_at_newline_belongs_to_current_line() {
        let index = LineIndex::new("a\nb\n");
        assert_eq!(index.line_col(TextSize::new(1)), LineCol { line: 0, col: 1 });
    }
}
