//! Report artifact and run outcome structures.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::DiffResult;

/// Materiality verdict for a diff, consumed by the notification transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeDecision {
    /// Whether the change warrants notifying a human
    pub is_material: bool,

    /// Short human-readable justification (e.g. "1 added, 0 removed")
    pub reason: String,
}

impl ChangeDecision {
    pub fn material(reason: impl Into<String>) -> Self {
        Self {
            is_material: true,
            reason: reason.into(),
        }
    }

    pub fn immaterial(reason: impl Into<String>) -> Self {
        Self {
            is_material: false,
            reason: reason.into(),
        }
    }
}

/// Persisted record of one changed run: the diff plus the decision.
///
/// Reports are regenerable from snapshot history; the snapshot store stays
/// authoritative if a report write fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report creation time (UTC)
    pub generated_at: DateTime<Utc>,

    /// One-line summary for notification subjects/log lines
    pub summary: String,

    /// Structured line diff
    pub diff: DiffResult,

    /// Materiality decision
    pub decision: ChangeDecision,
}

impl Report {
    /// Build a report for a freshly computed diff and decision.
    pub fn new(diff: DiffResult, decision: ChangeDecision) -> Self {
        let summary = match diff.from_sequence_id {
            Some(from) => format!(
                "Snapshot {:06} vs {:06}: {}",
                diff.to_sequence_id, from, decision.reason
            ),
            None => format!(
                "Snapshot {:06}: initial capture, {}",
                diff.to_sequence_id, decision.reason
            ),
        };
        Self {
            generated_at: Utc::now(),
            summary,
            diff,
            decision,
        }
    }
}

/// Outcome of one monitor run, returned to the external scheduler.
///
/// Fetch and concurrency failures travel as errors instead.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Content unchanged, nothing appended
    NoChange {
        /// Sequence of the snapshot the page still matches
        sequence_id: u64,
    },

    /// New snapshot appended, report attempted
    Changed {
        /// Sequence of the appended snapshot
        sequence_id: u64,
        /// Materiality decision for downstream transports
        decision: ChangeDecision,
        /// Where the report landed; `None` if the write failed (logged)
        report_path: Option<PathBuf>,
    },
}

impl RunOutcome {
    /// Stable status label for scheduler logs.
    pub fn status(&self) -> &'static str {
        match self {
            Self::NoChange { .. } => "no-change",
            Self::Changed { .. } => "changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::Line;

    use super::*;

    #[test]
    fn test_report_summary_with_previous() {
        let diff = DiffResult {
            from_sequence_id: Some(1),
            to_sequence_id: 2,
            added: vec![Line::new(2, "Meeting C — Jan 19")],
            removed: vec![],
            unchanged_count: 2,
        };
        let report = Report::new(diff, ChangeDecision::material("1 added, 0 removed"));
        assert_eq!(report.summary, "Snapshot 000002 vs 000001: 1 added, 0 removed");
        assert!(report.decision.is_material);
    }

    #[test]
    fn test_report_summary_bootstrap() {
        let diff = DiffResult {
            from_sequence_id: None,
            to_sequence_id: 1,
            added: vec![Line::new(0, "Meeting A")],
            removed: vec![],
            unchanged_count: 0,
        };
        let report = Report::new(diff, ChangeDecision::material("1 added, 0 removed"));
        assert!(report.summary.contains("initial capture"));
    }

    #[test]
    fn test_outcome_status_labels() {
        let no_change = RunOutcome::NoChange { sequence_id: 4 };
        assert_eq!(no_change.status(), "no-change");

        let changed = RunOutcome::Changed {
            sequence_id: 5,
            decision: ChangeDecision::immaterial("no changes"),
            report_path: None,
        };
        assert_eq!(changed.status(), "changed");
    }
}
