//! Diff calculation between consecutive snapshots.
//!
//! Aligns the normalized lines of the two newest snapshots with a
//! longest-common-subsequence comparison and reports the added and
//! removed lines. Output is fully deterministic: at alignment ties the
//! deletion is emitted before the insertion.

use crate::models::{DiffResult, Line, Snapshot};

/// Calculator for line-level snapshot diffs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffCalculator;

impl DiffCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Diff `previous` against `current`.
    ///
    /// With no previous snapshot (bootstrap), every current line counts
    /// as added and nothing as removed.
    pub fn calculate(&self, previous: Option<&Snapshot>, current: &Snapshot) -> DiffResult {
        let current_lines = current.lines();

        let Some(previous) = previous else {
            return DiffResult {
                from_sequence_id: None,
                to_sequence_id: current.sequence_id,
                added: current_lines,
                removed: Vec::new(),
                unchanged_count: 0,
            };
        };

        let previous_lines = previous.lines();
        let table = lcs_table(&previous_lines, &current_lines);

        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut unchanged_count = 0;

        let (mut i, mut j) = (0, 0);
        while i < previous_lines.len() && j < current_lines.len() {
            if previous_lines[i].text == current_lines[j].text {
                unchanged_count += 1;
                i += 1;
                j += 1;
            } else if table[i + 1][j] >= table[i][j + 1] {
                removed.push(previous_lines[i].clone());
                i += 1;
            } else {
                added.push(current_lines[j].clone());
                j += 1;
            }
        }
        removed.extend(previous_lines[i..].iter().cloned());
        added.extend(current_lines[j..].iter().cloned());

        DiffResult {
            from_sequence_id: Some(previous.sequence_id),
            to_sequence_id: current.sequence_id,
            added,
            removed,
            unchanged_count,
        }
    }
}

/// `table[i][j]` = LCS length of `previous[i..]` and `current[j..]`.
fn lcs_table(previous: &[Line], current: &[Line]) -> Vec<Vec<usize>> {
    let (n, m) = (previous.len(), current.len());
    let mut table = vec![vec![0usize; m + 1]; n + 1];

    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if previous[i].text == current[j].text {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }
    table
}

/// Convenience function to diff two snapshots.
pub fn diff_snapshots(previous: Option<&Snapshot>, current: &Snapshot) -> DiffResult {
    DiffCalculator::new().calculate(previous, current)
}
