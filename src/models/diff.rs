//! Structured diff between two snapshots.

use serde::{Deserialize, Serialize};

use crate::models::Line;

/// Line-level difference between consecutive snapshots.
///
/// Recomputed each run from the two newest snapshots; never stored on its
/// own, only embedded into a report.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Sequence of the older snapshot, `None` on the bootstrap run
    pub from_sequence_id: Option<u64>,

    /// Sequence of the newer snapshot
    pub to_sequence_id: u64,

    /// Lines present only in the newer snapshot, in page order
    pub added: Vec<Line>,

    /// Lines present only in the older snapshot, in page order
    pub removed: Vec<Line>,

    /// Number of lines common to both snapshots
    pub unchanged_count: usize,
}

impl DiffResult {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    /// Get the total number of changed lines.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_diff_has_no_changes() {
        let diff = DiffResult {
            to_sequence_id: 2,
            from_sequence_id: Some(1),
            unchanged_count: 5,
            ..DiffResult::default()
        };
        assert!(!diff.has_changes());
        assert_eq!(diff.change_count(), 0);
    }

    #[test]
    fn test_change_count() {
        let diff = DiffResult {
            to_sequence_id: 2,
            from_sequence_id: Some(1),
            added: vec![Line::new(0, "a"), Line::new(1, "b")],
            removed: vec![Line::new(0, "c")],
            unchanged_count: 0,
        };
        assert!(diff.has_changes());
        assert_eq!(diff.change_count(), 3);
    }
}
