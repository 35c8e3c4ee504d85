use crate::tree::errors::TreeError;

/// A half-open source interval `[start, end)` with optional line/column metadata.
///
/// Offsets are UTF-8 byte offsets into the source text. Line numbers are
/// 1-based; columns are byte offsets from the start of their line. Lines
/// default to `1` when unknown, columns stay absent rather than defaulting
/// to `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    start: usize,
    end: usize,
    lineno: usize,
    end_lineno: usize,
    col_offset: Option<usize>,
    end_col_offset: Option<usize>,
}

const DEFAULT_LINENO: usize = 1;

impl Position {
    /// Create a position covering `[start, end)` with default line metadata.
    pub fn new(start: usize, end: usize) -> Result<Self, TreeError> {
        if start > end {
            return Err(TreeError::InvalidRange { start, end });
        }
        Ok(Self {
            start,
            end,
            lineno: DEFAULT_LINENO,
            end_lineno: DEFAULT_LINENO,
            col_offset: None,
            end_col_offset: None,
        })
    }

    /// Attach line numbers.
    pub fn with_lines(mut self, lineno: usize, end_lineno: usize) -> Result<Self, TreeError> {
        if lineno > end_lineno {
            return Err(TreeError::InvalidLineRange { lineno, end_lineno });
        }
        self.lineno = lineno;
        self.end_lineno = end_lineno;
        Ok(self)
    }

    /// Attach column offsets. Either side may stay absent.
    pub fn with_columns(mut self, col_offset: Option<usize>, end_col_offset: Option<usize>) -> Self {
        self.col_offset = col_offset;
        self.end_col_offset = end_col_offset;
        self
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn lineno(&self) -> usize {
        self.lineno
    }

    pub fn end_lineno(&self) -> usize {
        self.end_lineno
    }

    pub fn col_offset(&self) -> Option<usize> {
        self.col_offset
    }

    pub fn end_col_offset(&self) -> Option<usize> {
        self.end_col_offset
    }

    /// Length of the interval in bytes.
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    /// True when `other` lies entirely within `self` (bounds inclusive).
    pub fn contains(&self, other: &Position) -> bool {
        self.contains_range(other.start, other.end)
    }

    /// Same as [`Position::contains`] for a bare `[start, end)` pair.
    pub fn contains_range(&self, start: usize, end: usize) -> bool {
        self.start <= start && end <= self.end
    }

    /// True when the two intervals share at least one offset.
    ///
    /// A zero-width interval overlaps anything that contains it.
    pub fn overlaps(&self, other: &Position) -> bool {
        if self.start == self.end || other.start == other.end {
            return self.contains(other) || other.contains(self);
        }
        self.start < other.end && other.start < self.end
    }

    /// Whether the `(line, column)` point falls inside the line/column range.
    ///
    /// The end column is exclusive. When column metadata is missing the
    /// whole line is taken to be covered on that side.
    pub fn contains_point(&self, line: usize, column: usize) -> bool {
        if line < self.lineno || line > self.end_lineno {
            return false;
        }
        if line == self.lineno {
            if let Some(col) = self.col_offset {
                if column < col {
                    return false;
                }
            }
        }
        if line == self.end_lineno {
            if let Some(end_col) = self.end_col_offset {
                let zero_width = self.lineno == self.end_lineno && self.col_offset == Some(end_col);
                if column > end_col || (column == end_col && !zero_width) {
                    return false;
                }
            }
        }
        true
    }

    /// Ordering key for best-match preference: smaller size, then smaller start.
    ///
    /// Callers append the insertion order as the final tie-break.
    pub fn preference_key(&self) -> (usize, usize) {
        (self.size(), self.start)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{} (line {}", self.start, self.end, self.lineno)?;
        if self.end_lineno != self.lineno {
            write!(f, "-{}", self.end_lineno)?;
        }
        write!(f, ")")
    }
}
