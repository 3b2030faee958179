//! Snapshot and line data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::file_stamp;

/// One normalized unit of page content used for comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Line {
    /// Zero-based position within the normalized content
    pub position: usize,

    /// Normalized text of the line
    pub text: String,
}

impl Line {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

/// An immutable capture of the monitored page.
///
/// Created once per run that observes new content, never mutated or
/// deleted afterwards. Owned exclusively by the snapshot store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    /// Strictly monotonic, gap-free sequence number (starts at 1)
    pub sequence_id: u64,

    /// Capture time (UTC)
    pub timestamp: DateTime<Utc>,

    /// Hex SHA-256 of `normalized_content`
    pub content_hash: String,

    /// Page content exactly as fetched
    pub raw_content: String,

    /// Canonical comparison form, one line per content unit
    pub normalized_content: String,
}

impl Snapshot {
    /// Normalized content as positioned lines.
    pub fn lines(&self) -> Vec<Line> {
        if self.normalized_content.is_empty() {
            return Vec::new();
        }
        self.normalized_content
            .lines()
            .enumerate()
            .map(|(position, text)| Line::new(position, text))
            .collect()
    }

    /// Filename stem: zero-padded sequence plus timestamp stamp.
    pub fn file_stem(&self) -> String {
        format!("{:06}-{}", self.sequence_id, file_stamp(&self.timestamp))
    }
}
