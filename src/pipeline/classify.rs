//! Change classification.
//!
//! Decides whether a diff is material enough to warrant notification.
//! Purely a function of the diff and the configured ignore patterns;
//! no I/O.

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::{ChangeDecision, ClassifierConfig, DiffResult};

/// Classifier producing a materiality decision for a diff.
#[derive(Debug)]
pub struct ChangeClassifier {
    ignore_patterns: Vec<Regex>,
}

impl ChangeClassifier {
    /// Create a classifier, compiling the configured ignore patterns.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let ignore_patterns = config
            .ignore_patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| AppError::pattern(p, e)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { ignore_patterns })
    }

    /// Classify a diff.
    ///
    /// Not material when nothing changed or when every changed line
    /// matches an ignore pattern; material otherwise.
    pub fn classify(&self, diff: &DiffResult) -> ChangeDecision {
        if !diff.has_changes() {
            return ChangeDecision::immaterial("no changes");
        }

        let all_ignorable = diff
            .added
            .iter()
            .chain(diff.removed.iter())
            .all(|line| self.is_ignorable(&line.text));

        if all_ignorable {
            return ChangeDecision::immaterial(format!(
                "{} changed line(s), all matching ignore patterns",
                diff.change_count()
            ));
        }

        ChangeDecision::material(format!(
            "{} added, {} removed",
            diff.added.len(),
            diff.removed.len()
        ))
    }

    fn is_ignorable(&self, text: &str) -> bool {
        self.ignore_patterns.iter().any(|p| p.is_match(text))
    }
}

#[cfg(test)]
mod tests {
    use crate::models::Line;

    use super::*;

    fn classifier() -> ChangeClassifier {
        ChangeClassifier::new(&ClassifierConfig::default()).unwrap()
    }

    fn diff_with(added: Vec<Line>, removed: Vec<Line>) -> DiffResult {
        DiffResult {
            from_sequence_id: Some(1),
            to_sequence_id: 2,
            added,
            removed,
            unchanged_count: 0,
        }
    }

    #[test]
    fn test_empty_diff_not_material() {
        let decision = classifier().classify(&diff_with(vec![], vec![]));
        assert!(!decision.is_material);
        assert_eq!(decision.reason, "no changes");
    }

    #[test]
    fn test_new_meeting_is_material() {
        let decision = classifier().classify(&diff_with(
            vec![Line::new(2, "Meeting C — Jan 19")],
            vec![],
        ));
        assert!(decision.is_material);
        assert_eq!(decision.reason, "1 added, 0 removed");
    }

    #[test]
    fn test_footer_timestamp_change_not_material() {
        let decision = classifier().classify(&diff_with(
            vec![Line::new(5, "Last updated: 2024-01-02")],
            vec![Line::new(5, "Last updated: 2024-01-01")],
        ));
        assert!(!decision.is_material);
        assert!(decision.reason.contains("ignore patterns"));
    }

    #[test]
    fn test_mixed_change_is_material() {
        let decision = classifier().classify(&diff_with(
            vec![
                Line::new(5, "Last updated: 2024-01-02"),
                Line::new(2, "Meeting C — Jan 19"),
            ],
            vec![Line::new(5, "Last updated: 2024-01-01")],
        ));
        assert!(decision.is_material);
        assert_eq!(decision.reason, "2 added, 1 removed");
    }

    #[test]
    fn test_custom_ignore_pattern() {
        let config = ClassifierConfig {
            ignore_patterns: vec![r"^Visitor count: \d+$".to_string()],
        };
        let classifier = ChangeClassifier::new(&config).unwrap();
        let decision = classifier.classify(&diff_with(
            vec![Line::new(0, "Visitor count: 4892")],
            vec![Line::new(0, "Visitor count: 4891")],
        ));
        assert!(!decision.is_material);
    }

    #[test]
    fn test_rejects_bad_pattern() {
        let config = ClassifierConfig {
            ignore_patterns: vec!["([unclosed".to_string()],
        };
        assert!(ChangeClassifier::new(&config).is_err());
    }
}
