//! Source locations attached to syntax nodes and diagnostics.

use std::fmt;

/// Where a syntax node starts in the source text, plus its length.
///
/// The checker never reads source text; spans only flow from the parser
/// into diagnostics, so the line:column start is all that is displayed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub col: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }

    /// Smallest span on the first line that covers both inputs.
    ///
    /// Spans on different lines keep `self` unchanged.
    pub fn cover(self, other: Span) -> Span {
        if self.line != other.line {
            return self;
        }
        let start = self.col.min(other.col);
        let end = (self.col + self.len).max(other.col + other.len);
        Span::new(self.line, start, end - start)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}+{}", self.line, self.col, self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_display_is_line_and_column() {
        assert_eq!(Span::new(12, 5, 3).to_string(), "12:5");
    }

    #[test]
    fn cover_on_same_line_extends_to_both_ends() {
        let a = Span::new(1, 4, 2);
        let b = Span::new(1, 10, 3);
        assert_eq!(a.cover(b), Span::new(1, 4, 9));
        assert_eq!(b.cover(a), Span::new(1, 4, 9));
    }

    #[test]
    fn cover_across_lines_keeps_first() {
        let a = Span::new(1, 4, 2);
        assert_eq!(a.cover(Span::new(3, 1, 1)), a);
    }
}
