// src/services/normalizer.rs

//! Visible-text normalization.
//!
//! Transforms fetched markup into a canonical line-based form that is
//! stable across cosmetic variation: scripts, styles, layout chrome and
//! hidden elements are dropped, whitespace runs collapse to single spaces,
//! and duplicate lines keep only their first occurrence.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector, node::Element};

use crate::error::{AppError, Result};
use crate::models::{CleaningConfig, Line};

/// Tags whose subtrees never contribute visible content.
const EXCLUDED_TAGS: [&str; 11] = [
    "script", "style", "noscript", "head", "title", "meta", "link", "nav", "header", "footer",
    "aside",
];

/// Block-ish elements whose text forms candidate lines.
const LINE_SELECTOR: &str = "p, li, h1, h2, h3, h4, h5, h6, span, a, div";

/// Result of normalizing one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPage {
    /// Content lines in page order, deduplicated
    pub lines: Vec<Line>,

    /// Canonical comparison text: lines joined by `\n`
    pub text: String,
}

/// Normalizer for raw page markup.
///
/// Pure and deterministic: the same raw content always yields the same
/// normalized page.
pub struct Normalizer {
    line_selector: Selector,
    strip_patterns: Vec<Regex>,
}

impl Normalizer {
    /// Create a normalizer, compiling the configured strip patterns.
    pub fn new(config: &CleaningConfig) -> Result<Self> {
        let strip_patterns = config
            .strip_patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| AppError::pattern(p, e)))
            .collect::<Result<Vec<_>>>()?;

        // LINE_SELECTOR is a compile-time constant; parsing cannot fail.
        let line_selector = Selector::parse(LINE_SELECTOR)
            .map_err(|e| AppError::pattern(LINE_SELECTOR, format!("{e:?}")))?;

        Ok(Self {
            line_selector,
            strip_patterns,
        })
    }

    /// Normalize raw markup into positioned lines plus canonical text.
    pub fn normalize(&self, raw_content: &str) -> NormalizedPage {
        let document = Html::parse_document(raw_content);

        let mut seen = HashSet::new();
        let mut lines = Vec::new();

        for element in document.select(&self.line_selector) {
            if Self::in_excluded_subtree(element) {
                continue;
            }

            let mut buffer = String::new();
            Self::collect_visible_text(element, &mut buffer);

            let text = self.clean_line(&buffer);
            if text.is_empty() {
                continue;
            }

            if seen.insert(text.clone()) {
                lines.push(Line::new(lines.len(), text));
            }
        }

        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        NormalizedPage { lines, text }
    }

    /// Collapse whitespace and remove configured volatile fragments.
    fn clean_line(&self, text: &str) -> String {
        let mut result = normalize_whitespace(text);
        for pattern in &self.strip_patterns {
            result = pattern.replace_all(&result, "").into_owned();
        }
        result.trim().to_string()
    }

    /// Whether the element itself or any ancestor is excluded or hidden.
    fn in_excluded_subtree(element: ElementRef<'_>) -> bool {
        if is_excluded(element.value()) {
            return true;
        }
        element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_excluded(ancestor.value()))
    }

    /// Gather text nodes below `element`, skipping excluded/hidden subtrees.
    fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                out.push_str(&text.text);
                out.push(' ');
            } else if let Some(child_element) = ElementRef::wrap(child) {
                if !is_excluded(child_element.value()) {
                    Self::collect_visible_text(child_element, out);
                }
            }
        }
    }
}

/// Whether an element is excluded by tag or hidden via inline CSS/ARIA.
fn is_excluded(element: &Element) -> bool {
    if EXCLUDED_TAGS.contains(&element.name()) {
        return true;
    }
    if let Some(style) = element.attr("style") {
        let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.contains("display:none") {
            return true;
        }
    }
    element.attr("aria-hidden") == Some("true")
}

/// Collapse whitespace runs to single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
