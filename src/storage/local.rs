//! Local filesystem snapshot store.
//!
//! One JSON file per snapshot under `{root}/snapshots/`, named
//! `{sequence:06}-{YYYYMMDD-HHMMSS}.json` so lexicographic order equals
//! chronological order. Writes go through a temp file plus rename, so a
//! partially written record is never visible to `latest()`.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::{SnapshotEntry, SnapshotStore};
use crate::utils::sha256_hex;

/// Filesystem-backed snapshot store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn snapshots_dir(&self) -> PathBuf {
        self.root_dir.join("snapshots")
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Snapshot files sorted by sequence id.
    ///
    /// Only `*.json` files whose stem starts with a sequence number count;
    /// in-flight `*.tmp` files are invisible.
    async fn scan(&self) -> Result<Vec<(u64, PathBuf)>> {
        let dir = self.snapshots_dir();
        let mut entries = Vec::new();

        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(AppError::Io(e)),
        };

        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(sequence) = stem.split('-').next().and_then(|s| s.parse::<u64>().ok())
            else {
                continue;
            };
            entries.push((sequence, path));
        }

        entries.sort_by_key(|(sequence, _)| *sequence);
        Ok(entries)
    }

    async fn read_snapshot(&self, path: &PathBuf) -> Result<Snapshot> {
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl SnapshotStore for LocalStore {
    async fn latest(&self) -> Result<Option<Snapshot>> {
        match self.scan().await?.last() {
            Some((_, path)) => Ok(Some(self.read_snapshot(path).await?)),
            None => Ok(None),
        }
    }

    async fn append(
        &self,
        raw_content: String,
        normalized_content: String,
        expected_sequence: Option<u64>,
    ) -> Result<Snapshot> {
        // Optimistic check: the newest sequence must still match what the
        // run observed at its start.
        let found = self.scan().await?.last().map(|(sequence, _)| *sequence);
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

        let path = self
            .snapshots_dir()
            .join(format!("{}.json", snapshot.file_stem()));
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        self.write_bytes(&path, &bytes).await?;

        log::info!(
            "Snapshot {:06} written to {} (hash {})",
            snapshot.sequence_id,
            path.display(),
            &snapshot.content_hash[..12]
        );

        Ok(snapshot)
    }

    async fn load(&self, sequence_id: u64) -> Result<Option<Snapshot>> {
        for (sequence, path) in self.scan().await? {
            if sequence == sequence_id {
                return Ok(Some(self.read_snapshot(&path).await?));
            }
        }
        Ok(None)
    }

    async fn list(&self) -> Result<Vec<SnapshotEntry>> {
        let mut entries = Vec::new();
        for (_, path) in self.scan().await? {
            let snapshot = self.read_snapshot(&path).await?;
            entries.push(SnapshotEntry::from(&snapshot));
        }
        Ok(entries)
    }
}
