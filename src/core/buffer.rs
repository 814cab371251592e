//! Buffer: text content plus the tag applications over it.
//! No undo history and no selection (those belong to the Editor).
//!
//! Text lives in a ropey Rope, so line lookups and edits are O(log n).
//! All addressing is by character offset ([`Position`]); byte offsets never
//! leave this module.

use ropey::Rope;

use crate::core::error::{EditorError, Result};
use crate::core::position::{Position, Range, TextIndex};
use crate::core::tag_index::TagIndex;
use crate::core::tags::TagName;

/// Buffer: pure data structure holding text and tag coverage.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    /// Text content stored in a Rope (O(log n) operations)
    rope: Rope,
    /// Tag applications, kept in step with every content edit
    tags: TagIndex,
    /// Version counter, bumped on every change
    version: u64,
}

impl Buffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an untagged buffer from a string
    pub fn from_string(content: impl AsRef<str>) -> Self {
        Self {
            rope: Rope::from_str(content.as_ref()),
            tags: TagIndex::new(),
            version: 0,
        }
    }

    // ==================== Content Access ====================

    /// Length in characters
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// One past the final character
    pub fn end(&self) -> Position {
        Position(self.rope.len_chars())
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get entire content as string
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }

    /// Text covered by `range`
    pub fn text_between(&self, range: Range) -> Result<String> {
        self.check_range(range)?;
        Ok(self
            .rope
            .slice(range.start().offset()..range.end().offset())
            .to_string())
    }

    /// Get character at position
    pub fn char_at(&self, position: Position) -> Option<char> {
        self.rope.get_char(position.offset())
    }

    /// Position reached after moving `n` characters forward from `from`.
    /// A line break counts as one character.
    pub fn advance(&self, from: Position, n: usize) -> Position {
        from.advance(n)
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    /// Tags applied to the character at `position`
    pub fn tags_at(&self, position: Position) -> Vec<TagName> {
        self.tags.tags_at(position)
    }

    // ==================== Bounds ====================

    pub fn check_position(&self, position: Position) -> Result<()> {
        if position.offset() > self.len() {
            return Err(EditorError::PositionOutOfBounds {
                position,
                len: self.len(),
            });
        }
        Ok(())
    }

    pub fn check_range(&self, range: Range) -> Result<()> {
        if range.end().offset() > self.len() {
            return Err(EditorError::RangeOutOfBounds {
                range,
                len: self.len(),
            });
        }
        Ok(())
    }

    // ==================== Line Operations (O(log n) via Rope) ====================

    /// Get number of lines in buffer. An empty buffer has one line.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Content of a 0-indexed line, without its `\n`
    pub fn line(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(line.strip_suffix('\n').unwrap_or(line.as_str()).to_string())
    }

    /// Characters on a 0-indexed line, excluding its `\n`. Only `\n` breaks
    /// lines; a `\r` before it is an ordinary column.
    fn line_width(&self, line_idx: usize) -> usize {
        let line = self.rope.line(line_idx);
        let width = line.len_chars();
        match line.chars_at(width).prev() {
            Some('\n') => width - 1,
            _ => width,
        }
    }

    /// Line/column form of a position
    pub fn index_of(&self, position: Position) -> Result<TextIndex> {
        self.check_position(position)?;
        let line_idx = self.rope.char_to_line(position.offset());
        let column = position.offset() - self.rope.line_to_char(line_idx);
        Ok(TextIndex::new(line_idx + 1, column))
    }

    /// Resolve a line/column index. The line must exist and the column may
    /// be at most the line's width (the position just before its break).
    pub fn position_of(&self, index: TextIndex) -> Result<Position> {
        match index {
            TextIndex::End => Ok(self.end()),
            TextIndex::LineColumn { line, column } => {
                let bad = || EditorError::BadIndex {
                    index: index.to_string(),
                };
                if line == 0 || line > self.rope.len_lines() {
                    return Err(bad());
                }
                let line_idx = line - 1;
                if column > self.line_width(line_idx) {
                    return Err(bad());
                }
                Ok(Position(self.rope.line_to_char(line_idx) + column))
            }
        }
    }

    // ==================== Editing Operations ====================
    //
    // These apply unconditionally once bounds are checked. Recording and
    // inverse derivation happen one level up, in `command`.

    /// Insert text at a position, shifting tag spans around it
    pub fn insert(&mut self, at: Position, text: &str) -> Result<()> {
        self.check_position(at)?;
        if text.is_empty() {
            return Ok(());
        }
        let len = text.chars().count();
        self.rope.insert(at.offset(), text);
        self.tags.shift_for_insert(at, len);
        self.mark_modified();
        Ok(())
    }

    /// Delete the characters in `range`, returning them
    pub fn delete(&mut self, range: Range) -> Result<String> {
        self.check_range(range)?;
        if range.is_empty() {
            return Ok(String::new());
        }
        let start = range.start().offset();
        let end = range.end().offset();
        let deleted = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.tags.shift_for_delete(range);
        self.mark_modified();
        Ok(deleted)
    }

    pub fn add_tag(&mut self, tag: &TagName, range: Range) -> Result<()> {
        self.check_range(range)?;
        self.tags.add(tag, range);
        self.mark_modified();
        Ok(())
    }

    pub fn remove_tag(&mut self, tag: &TagName, range: Range) -> Result<()> {
        self.check_range(range)?;
        self.tags.remove(tag, range);
        self.mark_modified();
        Ok(())
    }

    /// Remove every tag application, keeping the text
    pub fn clear_tags(&mut self) {
        self.tags.clear();
        self.mark_modified();
    }

    fn mark_modified(&mut self) {
        self.version += 1;
    }
}
