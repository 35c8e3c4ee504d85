/// Byte offsets of line starts in a source text.
///
/// Lines are 1-based. Line content excludes the terminating `\n` and any
/// `\r` before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    text: String,
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();
        Self { text, starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines; a trailing newline opens one more empty line.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Byte offset where `line` begins.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line.checked_sub(1)?).copied()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        let start = self.line_start(line)?;
        let end = self
            .starts
            .get(line)
            .map_or(self.text.len(), |next| next - 1);
        let content = &self.text[start..end];
        Some(content.strip_suffix('\r').unwrap_or(content))
    }

    /// Byte column of the first non-whitespace character, `None` for blank lines.
    pub fn first_non_whitespace(&self, line: usize) -> Option<usize> {
        let content = self.line(line)?;
        content
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map(|(idx, _)| idx)
    }

    /// Absolute byte offset of `(line, column)`, with the column clamped to the line.
    pub fn offset(&self, line: usize, column: usize) -> Option<usize> {
        let content = self.line(line)?;
        Some(self.line_start(line)? + column.min(content.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lines() {
        let index = LineIndex::new("a = 1\n\n  b\r\nlast");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line(1), Some("a = 1"));
        assert_eq!(index.line(2), Some(""));
        assert_eq!(index.line(3), Some("  b"));
        assert_eq!(index.line(4), Some("last"));
        assert_eq!(index.line(0), None);
        assert_eq!(index.line(5), None);
    }

    #[test]
    fn trailing_newline_opens_empty_line() {
        let index = LineIndex::new("x\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line(2), Some(""));
    }

    #[test]
    fn first_non_whitespace_skips_indent() {
        let index = LineIndex::new("def f():\n    return 1\n   \n");
        assert_eq!(index.first_non_whitespace(1), Some(0));
        assert_eq!(index.first_non_whitespace(2), Some(4));
        assert_eq!(index.first_non_whitespace(3), None);
    }

    #[test]
    fn offsets_clamp_to_line() {
        let index = LineIndex::new("ab\ncde\n");
        assert_eq!(index.offset(2, 1), Some(4));
        assert_eq!(index.offset(2, 99), Some(6));
        assert_eq!(index.offset(9, 0), None);
    }
}
