//! Addressing scheme for locations and spans in the buffer.
//!
//! A [`Position`] is a character offset: every character, line breaks
//! included, advances it by one. That keeps `advance` exact, which the
//! insert inverse depends on. [`TextIndex`] is the human/persisted form
//! (`"line.column"` or `"end"`); converting between the two needs the
//! buffer's line structure and lives on `Buffer`.

use std::fmt;
use std::str::FromStr;

use crate::core::error::{EditorError, Result};

/// Character offset into the buffer content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position(pub usize);

impl Position {
    pub const START: Position = Position(0);

    /// The position `n` characters further on. Pure arithmetic: the result
    /// may lie beyond the current end, as when computing the span an insert
    /// is about to create.
    #[must_use]
    pub fn advance(self, n: usize) -> Position {
        Position(self.0 + n)
    }

    pub fn offset(self) -> usize {
        self.0
    }
}

impl From<usize> for Position {
    fn from(offset: usize) -> Self {
        Position(offset)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Half-open span `[start, end)` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Range {
    start: Position,
    end: Position,
}

impl Range {
    pub fn new(start: impl Into<Position>, end: impl Into<Position>) -> Result<Self> {
        let (start, end) = (start.into(), end.into());
        if start > end {
            return Err(EditorError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a range from two endpoints given in either order, e.g. a
    /// selection anchor and a cursor.
    pub fn ordered(a: impl Into<Position>, b: impl Into<Position>) -> Self {
        let (a, b) = (a.into(), b.into());
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Empty range sitting at `at`.
    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end.0 - self.start.0
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if `position` falls inside the half-open span.
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    /// True if the spans share at least one character, or touch end to start.
    pub fn touches(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn intersection(&self, other: &Range) -> Option<Range> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Range { start, end })
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Line/column form of a position, as written in documents and scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextIndex {
    /// 1-indexed line, 0-indexed character column.
    LineColumn { line: usize, column: usize },
    /// One past the final character.
    End,
}

impl TextIndex {
    pub fn new(line: usize, column: usize) -> Self {
        TextIndex::LineColumn { line, column }
    }
}

impl fmt::Display for TextIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextIndex::LineColumn { line, column } => write!(f, "{}.{}", line, column),
            TextIndex::End => write!(f, "end"),
        }
    }
}

impl FromStr for TextIndex {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || EditorError::BadIndex {
            index: s.to_string(),
        };
        let s_trimmed = s.trim();
        if s_trimmed == "end" {
            return Ok(TextIndex::End);
        }
        let (line, column) = s_trimmed.split_once('.').ok_or_else(bad)?;
        let line: usize = line.parse().map_err(|_| bad())?;
        let column: usize = column.parse().map_err(|_| bad())?;
        if line == 0 {
            return Err(bad());
        }
        Ok(TextIndex::LineColumn { line, column })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_is_exact() {
        assert_eq!(Position(3).advance(0), Position(3));
        assert_eq!(Position(3).advance(4), Position(7));
    }

    #[test]
    fn test_range_rejects_inverted() {
        assert!(Range::new(5, 2).unwrap_err().is_invalid_range());
        let r = Range::new(2, 5).unwrap();
        assert_eq!(r.len(), 3);
        assert!(r.contains(Position(2)));
        assert!(!r.contains(Position(5)));
        assert_eq!(Range::ordered(5, 2), r);
    }

    #[test]
    fn test_range_intersection_and_touch() {
        let a = Range::new(0, 5).unwrap();
        let b = Range::new(5, 8).unwrap();
        assert!(a.touches(&b));
        assert_eq!(a.intersection(&b), None);
        let c = Range::new(3, 8).unwrap();
        assert_eq!(a.intersection(&c), Some(Range::new(3, 5).unwrap()));
    }

    #[test]
    fn test_text_index_parse() {
        assert_eq!("1.0".parse::<TextIndex>().unwrap(), TextIndex::new(1, 0));
        assert_eq!("12.34".parse::<TextIndex>().unwrap(), TextIndex::new(12, 34));
        assert_eq!("end".parse::<TextIndex>().unwrap(), TextIndex::End);
        assert_eq!(TextIndex::new(2, 7).to_string(), "2.7");

        for bad in ["", "1", "0.0", "a.b", "1.-1", "1.2.3", "end+1c"] {
            assert!(bad.parse::<TextIndex>().is_err(), "{bad:?} should not parse");
        }
    }
}
