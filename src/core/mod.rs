//! The headless editing core of rtedit.
//! It owns the rope-backed buffer and its tag coverage, the tag table, the
//! command interceptor that derives inverses, the undo/redo stacks, and the
//! document serializer.

pub mod buffer;
pub mod command;
pub mod document;
pub mod editor;
pub mod error;
pub mod history;
pub mod position;
pub mod tag_index;
pub mod tags;
pub mod undo_group;

pub use command::{Command, HistoryEntry};
pub use editor::Editor;
pub use error::{EditorError, Result};
pub use position::{Position, Range, TextIndex};
pub use tags::{TagGroup, TagName, TagStyle, TagTable};
