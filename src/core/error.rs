//! Error kinds surfaced by the editing core.
//!
//! Every mutation is validated before it touches the buffer, so an `Err`
//! always means "nothing changed". An empty undo/redo history is not an
//! error: `undo()`/`redo()` report it by returning `Ok(false)`.

use thiserror::Error;

use crate::core::position::{Position, Range};

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("position {position} is outside the buffer (length {len})")]
    PositionOutOfBounds { position: Position, len: usize },

    #[error("range {range} is outside the buffer (length {len})")]
    RangeOutOfBounds { range: Range, len: usize },

    #[error("range start {start} is after its end {end}")]
    InvertedRange { start: Position, end: Position },

    #[error("no such index: {index}")]
    BadIndex { index: String },

    #[error("unknown tag: {name}")]
    UnknownTag { name: String },

    #[error("tag name is reserved: {name}")]
    ReservedTag { name: String },

    #[error("malformed document: {reason}")]
    Serialization { reason: String },

    #[error("document has no file name")]
    NoPath,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// True for the `InvalidRange` family: a position, index or range that
    /// does not address the current buffer.
    #[must_use]
    pub fn is_invalid_range(&self) -> bool {
        matches!(
            self,
            Self::PositionOutOfBounds { .. }
                | Self::RangeOutOfBounds { .. }
                | Self::InvertedRange { .. }
                | Self::BadIndex { .. }
        )
    }

    #[must_use]
    pub fn unknown_tag(name: impl Into<String>) -> Self {
        Self::UnknownTag { name: name.into() }
    }

    #[must_use]
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        // Syntax and missing-field errors are document problems; only a
        // failing reader is an I/O problem.
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::serialization(err.to_string())
        }
    }
}

impl From<tempfile::PersistError> for EditorError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}
