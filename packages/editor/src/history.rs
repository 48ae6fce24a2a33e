//! # Undo/Redo History
//!
//! Linear snapshot log of the document tree.
//!
//! ## Design
//!
//! - Every successful mutation records a deep copy of the tree
//! - Undo/redo move a cursor and hand back the stored snapshot; nothing is
//!   recomputed, so a restored tree is exactly what existed, ids included
//! - Recording after an undo discards the redo branch
//! - The log is capped; the oldest snapshot is dropped on overflow
//! - Batches (e.g. one column-resize gesture) collapse into one snapshot
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new();
//! history.record(&tree, "add_section");
//!
//! if let Some(previous) = history.undo() {
//!     tree = previous.clone();
//! }
//! ```

use crate::model::DocumentTree;

/// Default number of snapshots kept
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One immutable snapshot in the history log
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Tree as it was right after the change
    pub tree: DocumentTree,

    /// Name of the change that produced this snapshot
    pub label: String,
}

/// Snapshot log with a cursor
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,

    /// Index of the entry matching the live tree (meaningless while `entries` is empty)
    cursor: usize,

    /// Maximum number of entries (0 = unlimited)
    limit: usize,

    /// Nesting depth of open batches
    batch_depth: usize,

    /// Label of the first change recorded inside the open batch
    batch_label: Option<String>,
}

impl History {
    /// Create a history with the default limit (50)
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a history with a custom limit
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit,
            batch_depth: 0,
            batch_label: None,
        }
    }

    /// Snapshot `tree` after a change, unless a batch is open
    pub fn record(&mut self, tree: &DocumentTree, label: &str) {
        if self.batch_depth > 0 {
            self.batch_label.get_or_insert_with(|| label.to_string());
            return;
        }

        self.push(HistoryEntry {
            tree: tree.clone(),
            label: label.to_string(),
        });
    }

    fn push(&mut self, entry: HistoryEntry) {
        // New change invalidates the redo branch
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }

        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;

        if self.limit > 0 && self.entries.len() > self.limit {
            self.entries.remove(0);
            self.cursor -= 1;
        }

        tracing::debug!(
            entries = self.entries.len(),
            cursor = self.cursor,
            "history snapshot recorded"
        );
    }

    /// Start a batch: changes recorded until [`History::end_batch`] become one entry
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Close a batch and snapshot `tree` if anything changed inside it
    pub fn end_batch(&mut self, tree: &DocumentTree) {
        if self.batch_depth == 0 {
            return;
        }

        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            if let Some(label) = self.batch_label.take() {
                self.push(HistoryEntry {
                    tree: tree.clone(),
                    label,
                });
            }
        }
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    /// Step back one entry and return the snapshot to restore
    pub fn undo(&mut self) -> Option<&DocumentTree> {
        if !self.can_undo() {
            return None;
        }

        self.cursor -= 1;
        Some(&self.entries[self.cursor].tree)
    }

    /// Step forward one entry and return the snapshot to restore
    pub fn redo(&mut self) -> Option<&DocumentTree> {
        if !self.can_redo() {
            return None;
        }

        self.cursor += 1;
        Some(&self.entries[self.cursor].tree)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor + 1 < self.entries.len()
    }

    /// Current cursor, or `None` before the first snapshot
    pub fn cursor(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The entry the live tree should equal
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// Label of the change the next undo would revert
    pub fn undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries.get(self.cursor).map(|e| e.label.as_str())
    }

    /// Label of the change the next redo would re-apply
    pub fn redo_description(&self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.entries.get(self.cursor + 1).map(|e| e.label.as_str())
    }

    /// Drop all entries and any open batch
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.batch_depth = 0;
        self.batch_label = None;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Section;

    fn tree_with(n: usize) -> DocumentTree {
        DocumentTree {
            sections: (0..n).map(|i| Section::new(format!("s{}", i))).collect(),
        }
    }

    #[test]
    fn test_history_creation() {
        let history = History::new();
        assert_eq!(history.len(), 0);
        assert_eq!(history.cursor(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_undo_redo() {
        let mut history = History::new();
        history.record(&tree_with(1), "a");
        history.record(&tree_with(2), "b");

        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.undo_description(), Some("b"));

        assert_eq!(history.undo(), Some(&tree_with(1)));
        assert_eq!(history.cursor(), Some(0));
        assert!(history.undo().is_none());

        assert_eq!(history.redo_description(), Some("b"));
        assert_eq!(history.redo(), Some(&tree_with(2)));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_new_record_truncates_redo() {
        let mut history = History::new();
        history.record(&tree_with(1), "a");
        history.record(&tree_with(2), "b");
        history.record(&tree_with(3), "c");
        history.undo();
        history.undo();

        history.record(&tree_with(5), "e");

        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
        assert!(!history.can_redo());
        assert_eq!(history.current().unwrap().tree, tree_with(5));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::with_limit(3);
        for n in 1..=5 {
            history.record(&tree_with(n), "add");
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(history.entries()[0].tree, tree_with(3));
    }

    #[test]
    fn test_batch_collapses_to_one_entry() {
        let mut history = History::new();
        history.record(&tree_with(1), "a");

        history.begin_batch();
        history.record(&tree_with(2), "resize_column");
        history.record(&tree_with(3), "resize_column");
        assert!(history.in_batch());
        history.end_batch(&tree_with(3));

        assert_eq!(history.len(), 2);
        assert_eq!(history.undo_description(), Some("resize_column"));
        assert_eq!(history.undo(), Some(&tree_with(1)));
    }

    #[test]
    fn test_empty_batch_records_nothing() {
        let mut history = History::new();
        history.begin_batch();
        history.end_batch(&tree_with(1));
        assert!(history.is_empty());
    }
}
