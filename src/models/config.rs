//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and fetch behavior settings
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Normalization settings
    #[serde(default)]
    pub cleaning: CleaningConfig,

    /// Materiality settings
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.url.trim().is_empty() {
            return Err(AppError::validation("monitor.url is empty"));
        }
        url::Url::parse(&self.monitor.url)?;
        if self.monitor.user_agent.trim().is_empty() {
            return Err(AppError::validation("monitor.user_agent is empty"));
        }
        if self.monitor.timeout_secs == 0 {
            return Err(AppError::validation("monitor.timeout_secs must be > 0"));
        }
        for pattern in self
            .cleaning
            .strip_patterns
            .iter()
            .chain(self.classifier.ignore_patterns.iter())
        {
            regex::Regex::new(pattern).map_err(|e| AppError::pattern(pattern, e))?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            cleaning: CleaningConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// HTTP client and fetch behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Page to watch
    #[serde(default = "defaults::url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            url: defaults::url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CleaningConfig {
    /// Regexes removed from extracted lines before comparison
    /// (server-side timestamps, session tokens)
    #[serde(default)]
    pub strip_patterns: Vec<String>,
}

/// Materiality settings for the change classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Regexes marking a changed line as ignorable; a diff whose changed
    /// lines all match is not material
    #[serde(default = "defaults::ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: defaults::ignore_patterns(),
        }
    }
}

mod defaults {
    // Monitor defaults
    pub fn url() -> String {
        "https://reformlacharter.lacity.gov/public-events".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; civicwatch/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Classifier defaults
    pub fn ignore_patterns() -> Vec<String> {
        vec![
            r"(?i)^last\s+updated\b".into(),
            r"(?i)^page\s+last\s+reviewed\b".into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.monitor.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.monitor.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_malformed_url() {
        let mut config = Config::default();
        config.monitor.url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_ignore_pattern() {
        let mut config = Config::default();
        config.classifier.ignore_patterns.push("([unclosed".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [monitor]
            url = "https://example.gov/meetings"
            "#,
        )
        .unwrap();
        assert_eq!(config.monitor.url, "https://example.gov/meetings");
        assert_eq!(config.monitor.timeout_secs, 30);
        assert!(!config.classifier.ignore_patterns.is_empty());
    }
}
