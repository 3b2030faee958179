//! Utility functions and helpers.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a text.
///
/// Two snapshots with equal digests are treated as identical content.
pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Compact filename stamp for a timestamp (lexicographic = chronological).
pub fn file_stamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d-%H%M%S").to_string()
}
