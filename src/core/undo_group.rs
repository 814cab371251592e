//! Undo Grouping
//!
//! A group is the unit the undo and redo stacks hold. Most groups carry a
//! single entry; compound operations such as a tag toggle that first clears
//! its siblings carry several, so one undo reverses the whole operation.

use super::command::HistoryEntry;

/// A group of history entries that should be undone/redone together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndoGroup {
    /// Entries in the order they were applied
    pub entries: Vec<HistoryEntry>,
    /// Optional description of what this group represents
    pub description: Option<String>,
}

impl UndoGroup {
    /// Create a new empty undo group
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            description: None,
        }
    }

    /// Create an undo group with a specific description
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            description: Some(description.into()),
        }
    }

    /// Group holding exactly one entry
    pub fn single(entry: HistoryEntry) -> Self {
        Self {
            entries: vec![entry],
            description: None,
        }
    }

    /// Add an entry to this group
    pub fn add_entry(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Check if this group is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the number of entries in this group
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Label for logs: the description, or the first forward command
    pub fn label(&self) -> String {
        match (&self.description, self.entries.first()) {
            (Some(description), _) => description.clone(),
            (None, Some(entry)) => entry.forward.to_string(),
            (None, None) => "empty group".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::Command;
    use crate::core::position::Range;

    fn entry(text: &str) -> HistoryEntry {
        let len = text.chars().count();
        HistoryEntry {
            inverse: Command::delete(Range::new(0, len).unwrap()),
            forward: Command::insert(0, text),
        }
    }

    #[test]
    fn test_undo_group_creation() {
        let group = UndoGroup::new();
        assert!(group.is_empty());
        assert_eq!(group.len(), 0);

        let group_with_desc = UndoGroup::with_description("test group");
        assert_eq!(group_with_desc.description, Some("test group".to_string()));
    }

    #[test]
    fn test_undo_group_operations() {
        let mut group = UndoGroup::new();
        group.add_entry(entry("hello"));
        group.add_entry(entry(" world"));

        assert_eq!(group.len(), 2);
        assert!(!group.is_empty());
        assert_eq!(group.label(), "insert \"hello\" at 0");
    }

    #[test]
    fn test_label_prefers_description() {
        let mut group = UndoGroup::with_description("toggle bold");
        group.add_entry(entry("x"));
        assert_eq!(group.label(), "toggle bold");
        assert_eq!(UndoGroup::single(entry("x")).len(), 1);
    }
}
