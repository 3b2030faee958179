// src/pipeline/run.rs

//! Monitor run pipeline.
//!
//! One invocation is a single linear fetch → normalize → snapshot → diff →
//! classify → report cycle. The snapshot store is the only durable state;
//! fetch and concurrency failures abort before any mutation, report-write
//! failures after a successful append are logged and non-fatal.

use crate::error::Result;
use crate::models::{Config, Report, RunOutcome};
use crate::pipeline::classify::ChangeClassifier;
use crate::pipeline::diff::diff_snapshots;
use crate::services::{Normalizer, PageFetcher};
use crate::storage::{ReportWriter, SnapshotStore};
use crate::utils::sha256_hex;

/// Run one full fetch-compare-persist cycle.
pub async fn run_once(
    config: &Config,
    fetcher: &PageFetcher,
    store: &dyn SnapshotStore,
    reporter: &ReportWriter,
) -> Result<RunOutcome> {
    log::info!("Checking {}", fetcher.url());
    let raw_content = fetcher.fetch().await?;
    process(config, raw_content, store, reporter).await
}

/// Compare already-fetched content against the store and persist changes.
///
/// Split from `run_once` so tests can drive the pipeline with fixture
/// markup and an injected store.
pub async fn process(
    config: &Config,
    raw_content: String,
    store: &dyn SnapshotStore,
    reporter: &ReportWriter,
) -> Result<RunOutcome> {
    // Compile configured patterns up front: a bad config aborts the run
    // before any store mutation.
    let normalizer = Normalizer::new(&config.cleaning)?;
    let classifier = ChangeClassifier::new(&config.classifier)?;

    let page = normalizer.normalize(&raw_content);
    let content_hash = sha256_hex(&page.text);
    log::debug!("Normalized {} line(s), hash {}", page.lines.len(), &content_hash[..12]);

    let previous = store.latest().await?;
    if let Some(previous) = &previous {
        if previous.content_hash == content_hash {
            log::info!(
                "No change since snapshot {:06} (hash {})",
                previous.sequence_id,
                &content_hash[..12]
            );
            return Ok(RunOutcome::NoChange {
                sequence_id: previous.sequence_id,
            });
        }
    }

    let expected_sequence = previous.as_ref().map(|s| s.sequence_id);
    let current = store
        .append(raw_content, page.text, expected_sequence)
        .await?;

    let diff = diff_snapshots(previous.as_ref(), &current);
    let decision = classifier.classify(&diff);
    log::info!(
        "Diff: {} added, {} removed ({})",
        diff.added.len(),
        diff.removed.len(),
        if decision.is_material {
            "material"
        } else {
            "not material"
        }
    );

    let report = Report::new(diff, decision.clone());
    let report_path = match reporter.write(&report).await {
        Ok(path) => Some(path),
        Err(e) => {
            log::error!(
                "Report write failed, snapshot {:06} remains authoritative: {}",
                current.sequence_id,
                e
            );
            None
        }
    };

    Ok(RunOutcome::Changed {
        sequence_id: current.sequence_id,
        decision,
        report_path,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::error::AppError;
    use crate::storage::MemoryStore;

    use super::*;

    const PAGE_V1: &str = r#"
        <html><body>
          <h1>Public Events</h1>
          <ul>
            <li>Meeting A — Jan 5</li>
            <li>Meeting B — Jan 12</li>
          </ul>
          <p>Last updated: 2024-01-01</p>
        </body></html>
    "#;

    const PAGE_V2: &str = r#"
        <html><body>
          <h1>Public Events</h1>
          <ul>
            <li>Meeting A — Jan 5</li>
            <li>Meeting B — Jan 12</li>
            <li>Meeting C — Jan 19</li>
          </ul>
          <p>Last updated: 2024-01-01</p>
        </body></html>
    "#;

    // Identical to PAGE_V1 except the volatile footer.
    const PAGE_V1_FOOTER_BUMP: &str = r#"
        <html><body>
          <h1>Public Events</h1>
          <ul>
            <li>Meeting A — Jan 5</li>
            <li>Meeting B — Jan 12</li>
          </ul>
          <p>Last updated: 2024-01-02</p>
        </body></html>
    "#;

    struct Harness {
        _tmp: TempDir,
        config: Config,
        store: MemoryStore,
        reporter: ReportWriter,
    }

    fn harness() -> Harness {
        let tmp = TempDir::new().unwrap();
        let reporter = ReportWriter::new(tmp.path());
        Harness {
            config: Config::default(),
            store: MemoryStore::new(),
            reporter,
            _tmp: tmp,
        }
    }

    async fn run(h: &Harness, page: &str) -> Result<RunOutcome> {
        process(&h.config, page.to_string(), &h.store, &h.reporter).await
    }

    #[tokio::test]
    async fn test_bootstrap_run_appends_and_reports() {
        let h = harness();

        let outcome = run(&h, PAGE_V1).await.unwrap();
        let RunOutcome::Changed {
            sequence_id,
            decision,
            report_path,
        } = outcome
        else {
            panic!("bootstrap run must report a change");
        };

        assert_eq!(sequence_id, 1);
        assert!(decision.is_material);
        assert_eq!(h.store.len(), 1);

        let report_path = report_path.unwrap();
        let bytes = tokio::fs::read(&report_path).await.unwrap();
        let report: Report = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(report.diff.from_sequence_id, None);
        assert!(report.diff.removed.is_empty());
        assert!(report.summary.contains("initial capture"));
    }

    #[tokio::test]
    async fn test_unchanged_page_is_noop() {
        let h = harness();

        run(&h, PAGE_V1).await.unwrap();
        let hash_after_first = h.store.latest().await.unwrap().unwrap().content_hash;

        let outcome = run(&h, PAGE_V1).await.unwrap();
        assert!(matches!(outcome, RunOutcome::NoChange { sequence_id: 1 }));

        // No second snapshot, hash untouched.
        assert_eq!(h.store.len(), 1);
        let latest = h.store.latest().await.unwrap().unwrap();
        assert_eq!(latest.content_hash, hash_after_first);
    }

    #[tokio::test]
    async fn test_new_meeting_detected() {
        let h = harness();

        run(&h, PAGE_V1).await.unwrap();
        let outcome = run(&h, PAGE_V2).await.unwrap();

        let RunOutcome::Changed {
            sequence_id,
            decision,
            report_path,
        } = outcome
        else {
            panic!("expected a change");
        };

        assert_eq!(sequence_id, 2);
        assert!(decision.is_material);
        assert_eq!(decision.reason, "1 added, 0 removed");

        let bytes = tokio::fs::read(report_path.unwrap()).await.unwrap();
        let report: Report = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(report.diff.from_sequence_id, Some(1));
        assert_eq!(report.diff.added.len(), 1);
        assert_eq!(report.diff.added[0].text, "Meeting C — Jan 19");
        assert!(report.diff.removed.is_empty());
    }

    #[tokio::test]
    async fn test_footer_bump_snapshotted_but_not_material() {
        let h = harness();

        run(&h, PAGE_V1).await.unwrap();
        let outcome = run(&h, PAGE_V1_FOOTER_BUMP).await.unwrap();

        let RunOutcome::Changed {
            sequence_id,
            decision,
            ..
        } = outcome
        else {
            panic!("content did change");
        };

        // History records the change; the transport stays quiet.
        assert_eq!(sequence_id, 2);
        assert!(!decision.is_material);
        assert_eq!(h.store.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_append_leaves_store_intact() {
        let h = harness();

        run(&h, PAGE_V1).await.unwrap();

        h.store.fail_next_append();
        let result = run(&h, PAGE_V2).await;
        assert!(result.is_err());

        // Recovery view: latest() still returns the pre-run snapshot.
        assert_eq!(h.store.len(), 1);
        let latest = h.store.latest().await.unwrap().unwrap();
        assert_eq!(latest.sequence_id, 1);

        // The next scheduled run repairs naturally.
        let outcome = run(&h, PAGE_V2).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Changed { sequence_id: 2, .. }));
    }

    #[tokio::test]
    async fn test_report_write_failure_is_nonfatal() {
        let tmp = TempDir::new().unwrap();
        let blocked = tmp.path().join("blocked");
        tokio::fs::write(&blocked, b"file").await.unwrap();

        let h = Harness {
            config: Config::default(),
            store: MemoryStore::new(),
            reporter: ReportWriter::new(&blocked),
            _tmp: tmp,
        };

        let outcome = run(&h, PAGE_V1).await.unwrap();
        let RunOutcome::Changed {
            sequence_id,
            report_path,
            ..
        } = outcome
        else {
            panic!("append must survive a report failure");
        };

        assert_eq!(sequence_id, 1);
        assert!(report_path.is_none());
        assert_eq!(h.store.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_config_aborts_before_mutation() {
        let mut h = harness();
        h.config.classifier.ignore_patterns.push("([unclosed".into());

        let result = run(&h, PAGE_V1).await;
        assert!(matches!(result, Err(AppError::Pattern { .. })));
        assert!(h.store.is_empty());
    }
}
