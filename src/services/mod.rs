//! Service layer for the monitor application.
//!
//! This module contains the business logic for:
//! - Page fetching (`PageFetcher`)
//! - Visible-text normalization (`Normalizer`)

mod fetcher;
mod normalizer;

pub use fetcher::PageFetcher;
pub use normalizer::{NormalizedPage, Normalizer};
