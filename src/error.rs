// src/error.rs

//! Unified error handling for the monitor application.

use std::fmt;

use thiserror::Error;

/// Result type alias for monitor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure class of a page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Request exceeded the configured timeout
    Timeout,
    /// Server answered with a non-success HTTP status
    HttpStatus,
    /// Connection could not be established
    NetworkUnreachable,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::HttpStatus => write!(f, "http status"),
            Self::NetworkUnreachable => write!(f, "network unreachable"),
        }
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Page fetch failed; the run aborts without touching the store
    #[error("Fetch error ({kind}) for {url}: {message}")]
    Fetch {
        kind: FetchKind,
        url: String,
        message: String,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Regex pattern compilation failed
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Report artifact could not be written; the appended snapshot stays authoritative
    #[error("Report write error for {path}: {message}")]
    ReportWrite { path: String, message: String },

    /// Snapshot store changed between the initial read and the append
    #[error("Store modified concurrently: expected sequence {expected}, found {found}")]
    ConcurrentModification { expected: u64, found: u64 },
}

impl AppError {
    /// Classify a reqwest error observed while fetching `url`.
    pub fn from_fetch(url: impl Into<String>, error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            FetchKind::Timeout
        } else if error.is_status() {
            FetchKind::HttpStatus
        } else {
            FetchKind::NetworkUnreachable
        };
        Self::Fetch {
            kind,
            url: url.into(),
            message: error.to_string(),
        }
    }

    /// Create a pattern compilation error.
    pub fn pattern(pattern: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a report write error with path context.
    pub fn report_write(path: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::ReportWrite {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
