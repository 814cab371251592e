//! Undo/redo stacks.
//!
//! ```text
//! record(g3)             Undo: [g1, g2, g3]   Redo: []
//! undo() x2              Undo: [g1]           Redo: [g3, g2]
//! redo()                 Undo: [g1, g2]       Redo: [g3]
//! record(g4)             Undo: [g1, g2, g4]   Redo: []   <- redo invalidated
//! ```
//!
//! Invariants:
//! 1. A group lives in exactly one of the two stacks.
//! 2. Recording a new group clears the redo stack.
//! 3. `undo_stack.len() <= max_depth` when a limit is set (oldest dropped).
//! 4. A failed undo/redo leaves the buffer unchanged and the group where it was.
//!
//! The stacks are private. Callers get `record`, `undo`, `redo`,
//! `can_undo`, `can_redo` and `clear`, nothing else.

use std::collections::VecDeque;

use crate::core::buffer::Buffer;
use crate::core::command::{Command, HistoryEntry};
use crate::core::error::Result;
use crate::core::undo_group::UndoGroup;

/// Default undo depth, as a guard against unbounded memory growth
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum groups kept on the undo stack (0 = unlimited).
    pub max_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HistoryConfig {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn unlimited() -> Self {
        Self { max_depth: 0 }
    }
}

#[derive(Debug, Default)]
pub struct History {
    /// Groups available for undo (newest at back)
    undo_stack: VecDeque<UndoGroup>,
    /// Groups available for redo (newest at back)
    redo_stack: VecDeque<UndoGroup>,
    config: HistoryConfig,
}

impl History {
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            config,
        }
    }

    /// Push a freshly applied group. Clears the redo stack.
    pub fn record(&mut self, group: UndoGroup) {
        if group.is_empty() {
            return;
        }
        if !self.redo_stack.is_empty() {
            tracing::debug!(
                discarded = self.redo_stack.len(),
                "new edit invalidates redo history"
            );
            self.redo_stack.clear();
        }
        if self.config.max_depth > 0 && self.undo_stack.len() >= self.config.max_depth {
            self.undo_stack.pop_front(); // O(1) discard oldest
        }
        self.undo_stack.push_back(group);
    }

    /// Undo the newest group. `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self, buffer: &mut Buffer) -> Result<bool> {
        let Some(group) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        // Inverses run newest entry first.
        let inverses: Vec<&Command> = group.entries.iter().rev().map(|e| &e.inverse).collect();
        if let Err(err) = apply_all(buffer, &inverses) {
            tracing::warn!(group = %group.label(), error = %err, "undo failed");
            self.undo_stack.push_back(group);
            return Err(err);
        }

        tracing::debug!(group = %group.label(), "undo");
        self.redo_stack.push_back(group);
        Ok(true)
    }

    /// Redo the newest undone group. `Ok(false)` when there is nothing to redo.
    ///
    /// Forward commands are replayed as stored, but every inverse is
    /// re-derived against the current buffer, so it always describes the
    /// state the redo actually changed (including tag edits made since).
    pub fn redo(&mut self, buffer: &mut Buffer) -> Result<bool> {
        let Some(group) = self.redo_stack.pop_back() else {
            return Ok(false);
        };

        let mut replayed = UndoGroup {
            entries: Vec::with_capacity(group.entries.len()),
            description: group.description.clone(),
        };
        for entry in &group.entries {
            let result = HistoryEntry::derive(entry.forward.clone(), buffer)
                .and_then(|fresh| fresh.forward.apply(buffer).map(|()| fresh));
            match result {
                Ok(applied) => replayed.add_entry(applied),
                Err(err) => {
                    let rollback: Vec<&Command> =
                        replayed.entries.iter().rev().map(|e| &e.inverse).collect();
                    if let Err(rollback_err) = apply_all(buffer, &rollback) {
                        tracing::error!(
                            group = %group.label(),
                            error = %rollback_err,
                            "redo rollback failed"
                        );
                    }
                    tracing::warn!(group = %group.label(), error = %err, "redo failed");
                    self.redo_stack.push_back(group);
                    return Err(err);
                }
            }
        }

        tracing::debug!(group = %replayed.label(), "redo");
        self.undo_stack.push_back(replayed);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop both stacks (document load, new document).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Apply commands in order. If one fails, the ones already applied are
/// reverted so the buffer is left as it was found.
fn apply_all(buffer: &mut Buffer, commands: &[&Command]) -> Result<()> {
    let mut applied: Vec<HistoryEntry> = Vec::with_capacity(commands.len());
    for command in commands {
        match HistoryEntry::derive((*command).clone(), buffer) {
            Ok(entry) => {
                entry.forward.apply(buffer)?;
                applied.push(entry);
            }
            Err(err) => {
                for done in applied.iter().rev() {
                    if let Err(rollback_err) = done.inverse.apply(buffer) {
                        tracing::error!(
                            command = %done.inverse,
                            error = %rollback_err,
                            "rollback failed"
                        );
                    }
                }
                return Err(err);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::position::Range;

    fn r(a: usize, b: usize) -> Range {
        Range::new(a, b).unwrap()
    }

    fn record(history: &mut History, buffer: &mut Buffer, forward: Command) {
        let entry = HistoryEntry::derive(forward, buffer).unwrap();
        entry.forward.apply(buffer).unwrap();
        history.record(UndoGroup::single(entry));
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut buffer = Buffer::from_string("abc");
        let mut history = History::default();
        record(&mut history, &mut buffer, Command::insert(0, "X"));
        assert_eq!(buffer.to_string(), "Xabc");

        assert!(history.undo(&mut buffer).unwrap());
        assert_eq!(buffer.to_string(), "abc");
        assert!(history.can_redo());
        assert!(!history.can_undo());

        assert!(history.redo(&mut buffer).unwrap());
        assert_eq!(buffer.to_string(), "Xabc");
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_history_is_noop() {
        let mut buffer = Buffer::from_string("abc");
        let mut history = History::default();
        assert!(!history.undo(&mut buffer).unwrap());
        assert!(!history.redo(&mut buffer).unwrap());
        assert_eq!(buffer.to_string(), "abc");
    }

    #[test]
    fn test_record_clears_redo() {
        let mut buffer = Buffer::new();
        let mut history = History::default();
        record(&mut history, &mut buffer, Command::insert(0, "a"));
        history.undo(&mut buffer).unwrap();
        assert_eq!(history.redo_depth(), 1);

        record(&mut history, &mut buffer, Command::insert(0, "b"));
        assert_eq!(history.redo_depth(), 0);
        assert!(!history.redo(&mut buffer).unwrap());
        assert_eq!(buffer.to_string(), "b");
    }

    #[test]
    fn test_depth_limit_drops_oldest() {
        let mut buffer = Buffer::new();
        let mut history = History::new(HistoryConfig::new(3));
        for i in 0..5 {
            record(&mut history, &mut buffer, Command::insert(i, "x"));
        }
        assert_eq!(history.undo_depth(), 3);
        while history.undo(&mut buffer).unwrap() {}
        assert_eq!(buffer.to_string(), "xx");
    }

    #[test]
    fn test_group_undoes_in_reverse_order() {
        let mut buffer = Buffer::from_string("hello");
        let mut history = History::default();
        let mut group = UndoGroup::with_description("two inserts");
        for forward in [Command::insert(5, " world"), Command::insert(0, ">> ")] {
            let entry = HistoryEntry::derive(forward, &buffer).unwrap();
            entry.forward.apply(&mut buffer).unwrap();
            group.add_entry(entry);
        }
        history.record(group);
        assert_eq!(buffer.to_string(), ">> hello world");

        history.undo(&mut buffer).unwrap();
        assert_eq!(buffer.to_string(), "hello");
        history.redo(&mut buffer).unwrap();
        assert_eq!(buffer.to_string(), ">> hello world");
    }

    #[test]
    fn test_failed_undo_keeps_group_and_buffer() {
        let mut buffer = Buffer::from_string("abcdef");
        let mut history = History::default();
        record(&mut history, &mut buffer, Command::insert(6, "gh"));
        // Shrink the buffer behind history's back so the stored inverse
        // no longer fits.
        buffer.delete(r(0, 6)).unwrap();

        let before = buffer.to_string();
        assert!(history.undo(&mut buffer).unwrap_err().is_invalid_range());
        assert_eq!(buffer.to_string(), before);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_redo_rederives_tag_entries() {
        let bold = crate::core::tags::TagName::new("bold");
        let mut buffer = Buffer::from_string("Hello World");
        let mut history = History::default();
        record(&mut history, &mut buffer, Command::tag_add("bold", vec![r(0, 5)]));
        history.undo(&mut buffer).unwrap();
        assert!(buffer.tags().ranges(&bold).is_empty());

        // Coverage that appeared between undo and redo must survive a later
        // undo of the redone entry.
        buffer.add_tag(&bold, r(0, 2)).unwrap();
        history.redo(&mut buffer).unwrap();
        assert_eq!(buffer.tags().ranges(&bold), &[r(0, 5)]);

        history.undo(&mut buffer).unwrap();
        assert_eq!(buffer.tags().ranges(&bold), &[r(0, 2)]);
    }
}
