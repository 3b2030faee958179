//! In-memory snapshot store.
//!
//! Backs tests and dry runs with the same `SnapshotStore` contract as the
//! filesystem store, plus an injectable append failure for exercising the
//! pipeline's atomicity guarantees.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::{SnapshotEntry, SnapshotStore};
use crate::utils::sha256_hex;

/// Mutex-guarded in-memory snapshot store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: Mutex<Vec<Snapshot>>,
    fail_next_append: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrange for the next `append` to fail without mutating the store.
    pub fn fail_next_append(&self) {
        self.fail_next_append.store(true, Ordering::SeqCst);
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn latest(&self) -> Result<Option<Snapshot>> {
        let snapshots = self.snapshots.lock().expect("store lock poisoned");
        Ok(snapshots.last().cloned())
    }

    async fn append(
        &self,
        raw_content: String,
        normalized_content: String,
        expected_sequence: Option<u64>,
    ) -> Result<Snapshot> {
        if self.fail_next_append.swap(false, Ordering::SeqCst) {
            return Err(AppError::Io(std::io::Error::other(
                "injected append failure",
            )));
        }

        let mut snapshots = self.snapshots.lock().expect("store lock poisoned");

        let found = snapshots.last().map(|s| s.sequence_id);
        if found != expected_sequence {
            return Err(AppError::ConcurrentModification {
                expected: expected_sequence.unwrap_or(0),
                found: found.unwrap_or(0),
            });
        }

        let snapshot = Snapshot {
            sequence_id: found.unwrap_or(0) + 1,
            timestamp: Utc::now(),
            content_hash: sha256_hex(&normalized_content),
            raw_content,
            normalized_content,
        };
        snapshots.push(snapshot.clone());
        Ok(snapshot)
    }

    async fn load(&self, sequence_id: u64) -> Result<Option<Snapshot>> {
        let snapshots = self.snapshots.lock().expect("store lock poisoned");
        Ok(snapshots
            .iter()
            .find(|s| s.sequence_id == sequence_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<SnapshotEntry>> {
        let snapshots = self.snapshots.lock().expect("store lock poisoned");
        Ok(snapshots.iter().map(SnapshotEntry::from).collect())
    }
}
