//! Mutating commands and their inverses.
//!
//! [`HistoryEntry::derive`] classifies a [`Command`], validates it and
//! computes its inverse from the buffer state *before* the command runs.
//! Nothing here records history; that is the Editor's job.

use std::fmt;

use crate::core::buffer::Buffer;
use crate::core::error::{EditorError, Result};
use crate::core::position::{Position, Range};
use crate::core::tag_index::RangeSet;
use crate::core::tags::TagName;

/// Tag spans attached to an insertion, in absolute positions after the
/// text is in place.
pub type TagSpans = Vec<(TagName, Vec<Range>)>;

/// A single classified mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert `text` at `at`, then apply `tags` over the inserted span.
    Insert {
        at: Position,
        text: String,
        tags: TagSpans,
    },
    /// Delete the characters in `range`.
    Delete { range: Range },
    /// Apply `tag` over each of `ranges`.
    TagAdd { tag: TagName, ranges: Vec<Range> },
    /// Remove `tag` from each of `ranges`.
    TagRemove { tag: TagName, ranges: Vec<Range> },
}

impl Command {
    /// Plain insertion with no formatting of its own.
    pub fn insert(at: impl Into<Position>, text: impl Into<String>) -> Self {
        Command::Insert {
            at: at.into(),
            text: text.into(),
            tags: Vec::new(),
        }
    }

    pub fn delete(range: Range) -> Self {
        Command::Delete { range }
    }

    pub fn tag_add(tag: impl Into<TagName>, ranges: Vec<Range>) -> Self {
        Command::TagAdd {
            tag: tag.into(),
            ranges,
        }
    }

    pub fn tag_remove(tag: impl Into<TagName>, ranges: Vec<Range>) -> Self {
        Command::TagRemove {
            tag: tag.into(),
            ranges,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Insert { .. } => "insert",
            Command::Delete { .. } => "delete",
            Command::TagAdd { .. } => "tag-add",
            Command::TagRemove { .. } => "tag-remove",
        }
    }

    /// True for commands that change text (and therefore move positions).
    pub fn is_content(&self) -> bool {
        matches!(self, Command::Insert { .. } | Command::Delete { .. })
    }

    /// The tag a tag command targets.
    pub fn tag(&self) -> Option<&TagName> {
        match self {
            Command::TagAdd { tag, .. } | Command::TagRemove { tag, .. } => Some(tag),
            Command::Insert { .. } | Command::Delete { .. } => None,
        }
    }

    /// A command that would change nothing whatever the buffer holds.
    pub fn is_noop(&self) -> bool {
        match self {
            Command::Insert { text, .. } => text.is_empty(),
            Command::Delete { range } => range.is_empty(),
            Command::TagAdd { ranges, .. } | Command::TagRemove { ranges, .. } => {
                ranges.iter().all(Range::is_empty)
            }
        }
    }

    /// Check that every position the command names lies inside `buffer`.
    pub fn validate(&self, buffer: &Buffer) -> Result<()> {
        match self {
            Command::Insert { at, text, tags } => {
                buffer.check_position(*at)?;
                // Tag spans must stay inside the inserted text, or deleting
                // that text would not undo them.
                let span = Range::ordered(*at, at.advance(text.chars().count()));
                for (_, ranges) in tags {
                    for range in ranges {
                        if range.start() < span.start() || range.end() > span.end() {
                            return Err(EditorError::RangeOutOfBounds {
                                range: *range,
                                len: buffer.len() + span.len(),
                            });
                        }
                    }
                }
                Ok(())
            }
            Command::Delete { range } => buffer.check_range(*range),
            Command::TagAdd { ranges, .. } | Command::TagRemove { ranges, .. } => {
                ranges.iter().try_for_each(|range| buffer.check_range(*range))
            }
        }
    }

    /// Apply the command to `buffer`. Validation happens first, so an error
    /// leaves the buffer untouched.
    pub fn apply(&self, buffer: &mut Buffer) -> Result<()> {
        self.validate(buffer)?;
        match self {
            Command::Insert { at, text, tags } => {
                buffer.insert(*at, text)?;
                for (tag, ranges) in tags {
                    for range in ranges {
                        buffer.add_tag(tag, *range)?;
                    }
                }
            }
            Command::Delete { range } => {
                buffer.delete(*range)?;
            }
            Command::TagAdd { tag, ranges } => {
                for range in ranges {
                    buffer.add_tag(tag, *range)?;
                }
            }
            Command::TagRemove { tag, ranges } => {
                for range in ranges {
                    buffer.remove_tag(tag, *range)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Insert { at, text, .. } => write!(f, "insert {:?} at {}", text, at),
            Command::Delete { range } => write!(f, "delete {}", range),
            Command::TagAdd { tag, ranges } => {
                write!(f, "tag add {:?} over {} range(s)", tag.as_str(), ranges.len())
            }
            Command::TagRemove { tag, ranges } => {
                write!(f, "tag remove {:?} over {} range(s)", tag.as_str(), ranges.len())
            }
        }
    }
}

/// A forward command paired with the command that undoes it.
///
/// Applying `forward` then `inverse` leaves content and tag coverage
/// exactly as they were, and so does `inverse` then `forward`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub inverse: Command,
    pub forward: Command,
}

impl HistoryEntry {
    /// Validate `forward` against the current buffer and derive its inverse
    /// from the state the buffer is in right now.
    ///
    /// Tag inverses use the exact prior coverage: `TagAdd` is undone by
    /// removing only what it newly covered, and `TagRemove` by restoring
    /// only what was actually tagged. Partial overlaps therefore round-trip.
    pub fn derive(forward: Command, buffer: &Buffer) -> Result<Self> {
        forward.validate(buffer)?;
        let inverse = match &forward {
            Command::Insert { at, text, .. } => {
                let end = buffer.advance(*at, text.chars().count());
                Command::Delete {
                    range: Range::ordered(*at, end),
                }
            }
            Command::Delete { range } => Command::Insert {
                at: range.start(),
                text: buffer.text_between(*range)?,
                tags: buffer.tags().coverage_within(*range),
            },
            Command::TagAdd { tag, ranges } => {
                let before = buffer.tags().coverage(tag);
                let mut newly = RangeSet::new();
                for range in ranges {
                    for gap in before.uncovered(*range).into_ranges() {
                        newly.insert(gap);
                    }
                }
                Command::TagRemove {
                    tag: tag.clone(),
                    ranges: newly.into_ranges(),
                }
            }
            Command::TagRemove { tag, ranges } => {
                let before = buffer.tags().coverage(tag);
                let mut removed = RangeSet::new();
                for range in ranges {
                    for covered in before.covered(*range).into_ranges() {
                        removed.insert(covered);
                    }
                }
                Command::TagAdd {
                    tag: tag.clone(),
                    ranges: removed.into_ranges(),
                }
            }
        };
        Ok(Self { inverse, forward })
    }
}
