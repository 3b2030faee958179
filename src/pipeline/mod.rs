//! Pipeline stages for the monitor engine.
//!
//! - `diff`: line alignment between consecutive snapshots
//! - `classify`: materiality decision over a diff
//! - `run`: the fetch → normalize → snapshot → diff → classify → report cycle

pub mod classify;
pub mod diff;
pub mod run;

pub use classify::ChangeClassifier;
pub use diff::diff_snapshots;
pub use run::{process, run_once};
