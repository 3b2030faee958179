//! Storage abstractions for snapshot persistence.
//!
//! The snapshot store is the sole durable state of the monitor: an
//! append-only, timestamped archive of page captures. Reports are derived
//! artifacts and live next to it.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml                       # Monitor configuration
//! ├── snapshots/                        # Append-only capture history
//! │   ├── 000001-20260105-090000.json
//! │   └── 000002-20260112-090000.json
//! └── reports/                          # One diff report per changed run
//!     └── 000002.json
//! ```

pub mod local;
pub mod memory;
pub mod reports;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Snapshot;

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;
pub use reports::ReportWriter;

/// Listing row for snapshot history inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub sequence_id: u64,
    pub timestamp: DateTime<Utc>,
    pub content_hash: String,
}

impl From<&Snapshot> for SnapshotEntry {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            sequence_id: snapshot.sequence_id,
            timestamp: snapshot.timestamp,
            content_hash: snapshot.content_hash.clone(),
        }
    }
}

/// Trait for snapshot storage backends.
///
/// Injected into the pipeline so tests can substitute an in-memory store.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// The most recent snapshot, or `None` on the first-ever run.
    async fn latest(&self) -> Result<Option<Snapshot>>;

    /// Append a new snapshot atomically.
    ///
    /// Computes the content hash, assigns the next sequence id, and
    /// persists so that either the full record is visible to a later
    /// `latest()` or nothing is. `expected_sequence` is the newest
    /// sequence observed at the start of the run; if the store has moved
    /// past it, the append fails with `ConcurrentModification` and the
    /// store is left untouched.
    async fn append(
        &self,
        raw_content: String,
        normalized_content: String,
        expected_sequence: Option<u64>,
    ) -> Result<Snapshot>;

    /// Load one snapshot by sequence id.
    async fn load(&self, sequence_id: u64) -> Result<Option<Snapshot>>;

    /// All snapshots in sequence order, as lightweight listing rows.
    async fn list(&self) -> Result<Vec<SnapshotEntry>>;
}
