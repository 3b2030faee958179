//! Report artifact writer.
//!
//! Serializes one report per changed run to `{root}/reports/{seq:06}.json`
//! for the external site renderer and notification transport. A failed
//! write never rolls back the snapshot store; reports are regenerable
//! from snapshot history.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Report;

/// Writer for per-run report artifacts.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    reports_dir: PathBuf,
}

impl ReportWriter {
    /// Create a writer rooted at the given storage directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: root_dir.into().join("reports"),
        }
    }

    /// Serialize the report, keyed by the new snapshot's sequence id.
    pub async fn write(&self, report: &Report) -> Result<PathBuf> {
        let path = self
            .reports_dir
            .join(format!("{:06}.json", report.diff.to_sequence_id));

        let bytes = serde_json::to_vec_pretty(report)
            .map_err(|e| AppError::report_write(path.display().to_string(), e))?;
        self.write_bytes(&path, &bytes)
            .await
            .map_err(|e| AppError::report_write(path.display().to_string(), e))?;

        log::info!("Report written to {}", path.display());
        Ok(path)
    }

    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.reports_dir).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await
    }
}
