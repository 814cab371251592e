//! Editor: one editing session and the single choke point for mutations.
//!
//! Every mutation goes through [`Editor::execute`], which classifies the
//! command, derives its inverse from the current state, applies it and
//! records `(inverse, forward)`. Undo/redo replay bypass that path and move
//! groups between the two stacks instead.
//!
//! Redo is only valid while no unrelated edit intervenes: a recorded edit
//! clears the redo stack, and an unrecorded content edit clears both stacks
//! because every stored position may have moved.

use std::path::{Path, PathBuf};

use crate::core::buffer::Buffer;
use crate::core::command::{Command, HistoryEntry};
use crate::core::document::{self, Document};
use crate::core::error::{EditorError, Result};
use crate::core::history::{History, HistoryConfig};
use crate::core::position::{Position, Range, TextIndex};
use crate::core::tags::{TagGroup, TagName, TagTable};
use crate::core::undo_group::UndoGroup;

/// Whether applied commands are pushed onto the undo stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recording {
    Enabled,
    Suppressed,
}

#[derive(Debug)]
pub struct Editor {
    buffer: Buffer,
    table: TagTable,
    history: History,
    /// Active selection. Never recorded and never saved.
    selection: Option<Range>,
    recording: Recording,
    /// Open transaction collecting entries into one undo step
    pending: Option<UndoGroup>,
    path: Option<PathBuf>,
    modified: bool,
}

impl Editor {
    pub fn new(table: TagTable) -> Self {
        Self::with_config(table, HistoryConfig::default())
    }

    pub fn with_config(table: TagTable, config: HistoryConfig) -> Self {
        Self {
            buffer: Buffer::new(),
            table,
            history: History::new(config),
            selection: None,
            recording: Recording::Enabled,
            pending: None,
            path: None,
            modified: false,
        }
    }

    // ==================== Mutation ====================

    /// Run one command through the interceptor.
    ///
    /// Returns `Ok(false)` for commands that are structurally empty (empty
    /// text, empty ranges); those change nothing and record nothing. On
    /// error nothing is applied and nothing is recorded.
    pub fn execute(&mut self, command: Command) -> Result<bool> {
        if command.tag().is_some_and(TagName::is_selection) {
            return self.apply_selection(&command);
        }
        self.check_tags(&command)?;
        if command.is_noop() {
            command.validate(&self.buffer)?;
            return Ok(false);
        }

        let entry = match HistoryEntry::derive(command, &self.buffer) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "command rejected");
                return Err(err);
            }
        };
        entry.forward.apply(&mut self.buffer)?;
        self.modified = true;
        self.clamp_selection();
        self.track(entry);
        Ok(true)
    }

    pub fn insert(&mut self, at: Position, text: &str) -> Result<bool> {
        self.execute(Command::insert(at, text))
    }

    pub fn delete(&mut self, range: Range) -> Result<bool> {
        self.execute(Command::delete(range))
    }

    pub fn add_tag(&mut self, tag: &str, ranges: &[Range]) -> Result<bool> {
        self.execute(Command::tag_add(tag, ranges.to_vec()))
    }

    pub fn remove_tag(&mut self, tag: &str, ranges: &[Range]) -> Result<bool> {
        self.execute(Command::tag_remove(tag, ranges.to_vec()))
    }

    /// Replace `range` with `text` as a single undo step.
    pub fn replace(&mut self, range: Range, text: &str) -> Result<bool> {
        self.transaction("replace", |ed| {
            let deleted = ed.delete(range)?;
            let inserted = ed.insert(range.start(), text)?;
            Ok(deleted || inserted)
        })
    }

    /// Toggle `tag` over `range`.
    ///
    /// If the tag already covers the start of the range it is removed over
    /// the range. Otherwise every other tag of `group` is cleared from the
    /// range and the tag is added. Either way it is one undo step. An empty
    /// or out-of-bounds range is silently ignored.
    pub fn toggle_tag(&mut self, tag: &str, group: TagGroup, range: Range) -> Result<bool> {
        let tag = TagName::new(tag);
        self.table.lookup(&tag)?;
        if range.is_empty() || self.buffer.check_range(range).is_err() {
            return Ok(false);
        }

        let description = format!("toggle {}", tag);
        if self.buffer.tags().coverage(&tag).contains(range.start()) {
            return self.transaction(&description, |ed| {
                ed.execute(Command::TagRemove {
                    tag,
                    ranges: vec![range],
                })
            });
        }

        let siblings: Vec<TagName> = self
            .table
            .names_in_group(group)
            .filter(|name| **name != tag)
            .filter(|name| !self.buffer.tags().coverage(name).covered(range).is_empty())
            .cloned()
            .collect();
        self.transaction(&description, |ed| {
            for sibling in siblings {
                ed.execute(Command::TagRemove {
                    tag: sibling,
                    ranges: vec![range],
                })?;
            }
            ed.execute(Command::TagAdd {
                tag,
                ranges: vec![range],
            })
        })
    }

    /// Run `f` with every command it executes collected into one undo
    /// group. If `f` fails, whatever it applied is rolled back.
    pub fn transaction<T>(
        &mut self,
        description: &str,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if self.pending.is_some() {
            // Nested: join the outer transaction.
            return f(self);
        }
        self.pending = Some(UndoGroup::with_description(description));
        let result = f(self);
        let group = self.pending.take().unwrap_or_default();
        match result {
            Ok(value) => {
                if self.recording == Recording::Enabled {
                    self.history.record(group);
                }
                Ok(value)
            }
            Err(err) => {
                for entry in group.entries.iter().rev() {
                    if let Err(rollback_err) = entry.inverse.apply(&mut self.buffer) {
                        tracing::error!(
                            transaction = description,
                            command = %entry.inverse,
                            error = %rollback_err,
                            "rollback failed"
                        );
                    }
                }
                self.clamp_selection();
                tracing::warn!(transaction = description, error = %err, "rolled back");
                Err(err)
            }
        }
    }

    /// Run `f` with recording suppressed. Commands still apply, but nothing
    /// is pushed onto the undo stack. Content changes made this way clear
    /// the history, since stored positions can no longer be trusted.
    pub fn without_recording<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.recording, Recording::Suppressed);
        let out = f(self);
        self.recording = previous;
        out
    }

    pub fn recording(&self) -> Recording {
        self.recording
    }

    // ==================== Undo/Redo ====================

    /// Undo the last step. `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        let undone = self.history.undo(&mut self.buffer)?;
        if undone {
            self.modified = true;
            self.clamp_selection();
        }
        Ok(undone)
    }

    /// Redo the last undone step. `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool> {
        let redone = self.history.redo(&mut self.buffer)?;
        if redone {
            self.modified = true;
            self.clamp_selection();
        }
        Ok(redone)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ==================== Queries ====================

    pub fn content(&self) -> String {
        self.buffer.to_string()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn tag_table(&self) -> &TagTable {
        &self.table
    }

    /// Tags on the character at `position` (menu checkmark state)
    pub fn tags_at(&self, position: Position) -> Vec<TagName> {
        self.buffer.tags_at(position)
    }

    pub fn position_of(&self, index: TextIndex) -> Result<Position> {
        self.buffer.position_of(index)
    }

    pub fn index_of(&self, position: Position) -> Result<TextIndex> {
        self.buffer.index_of(position)
    }

    pub fn selection(&self) -> Option<Range> {
        self.selection
    }

    /// Set or clear the selection. Not an edit: nothing is recorded.
    pub fn select(&mut self, range: Option<Range>) -> Result<()> {
        if let Some(range) = range {
            self.buffer.check_range(range)?;
        }
        self.selection = range;
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ==================== Documents ====================

    pub fn to_document(&self) -> Result<Document> {
        document::to_document(&self.buffer, &self.table)
    }

    /// Replace the whole buffer with `doc`. History and selection reset.
    /// On error the current buffer is left untouched.
    pub fn load_document(&mut self, doc: &Document) -> Result<()> {
        let buffer = document::from_document(doc, &self.table)?;
        self.buffer = buffer;
        self.reset_session();
        Ok(())
    }

    /// Start over with an empty, untitled document.
    pub fn new_document(&mut self) {
        self.buffer = Buffer::new();
        self.reset_session();
        self.path = None;
    }

    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let doc = Document::load(path)?;
        self.load_document(&doc)?;
        self.path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), chars = self.buffer.len(), "document opened");
        Ok(())
    }

    /// Save to the current path.
    pub fn save(&mut self) -> Result<PathBuf> {
        let path = self.path.clone().ok_or(EditorError::NoPath)?;
        self.save_as(path)
    }

    /// Save to `path` (`.rte` appended if missing) and make it current.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let written = self.to_document()?.save(path)?;
        self.path = Some(written.clone());
        self.modified = false;
        Ok(written)
    }

    // ==================== Internals ====================

    fn reset_session(&mut self) {
        self.history.clear();
        self.selection = None;
        self.pending = None;
        self.modified = false;
    }

    /// Open transactions collect every applied entry, recorded or not, so a
    /// failure can always be rolled back.
    fn track(&mut self, entry: HistoryEntry) {
        if self.recording == Recording::Suppressed
            && entry.forward.is_content()
            && (self.can_undo() || self.can_redo())
        {
            tracing::debug!(
                command = %entry.forward,
                "unrecorded content edit discards history"
            );
            self.history.clear();
        }
        match self.pending.as_mut() {
            Some(group) => group.add_entry(entry),
            None if self.recording == Recording::Enabled => {
                self.history.record(UndoGroup::single(entry))
            }
            None => {}
        }
    }

    fn check_tags(&self, command: &Command) -> Result<()> {
        match command {
            Command::TagAdd { tag, .. } | Command::TagRemove { tag, .. } => {
                self.table.lookup(tag).map(|_| ())
            }
            Command::Insert { tags, .. } => tags
                .iter()
                .try_for_each(|(tag, _)| self.table.lookup(tag).map(|_| ())),
            Command::Delete { .. } => Ok(()),
        }
    }

    /// `sel` commands move the selection and bypass history entirely.
    fn apply_selection(&mut self, command: &Command) -> Result<bool> {
        command.validate(&self.buffer)?;
        match command {
            Command::TagAdd { ranges, .. } => {
                let hull = ranges
                    .iter()
                    .copied()
                    .reduce(|a, b| Range::ordered(a.start().min(b.start()), a.end().max(b.end())));
                self.selection = hull;
            }
            Command::TagRemove { .. } => self.selection = None,
            Command::Insert { .. } | Command::Delete { .. } => return Ok(false),
        }
        Ok(true)
    }

    fn clamp_selection(&mut self) {
        let end = self.buffer.end();
        if let Some(sel) = self.selection {
            if sel.end() > end {
                self.selection = Some(Range::ordered(sel.start().min(end), end));
            }
        }
    }
}
