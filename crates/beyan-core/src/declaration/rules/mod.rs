//! Rule-based extractors for VAT return layouts.

pub mod amounts;
pub mod catalog;
pub mod patterns;
pub mod period;

pub use amounts::{find_value_in_line, parse_turkish_amount, FieldMatcher};
pub use catalog::builtin_rules;
pub use patterns::*;
pub use period::{match_month, PeriodLocator};

use serde::{Deserialize, Serialize};

use crate::layout::Line;

/// Trait for extractors working on reconstructed lines.
pub trait LineExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the value from the document's lines, top to bottom.
    fn extract(&self, lines: &[Line]) -> Self::Output;
}

/// Where a rule's value sits relative to its matched label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuePolicy {
    /// Rightmost currency-shaped token on the matched line.
    #[default]
    Standard,
}

/// One labeled monetary field to extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRule {
    /// Stable internal key.
    pub key: String,
    /// Display label, also the output column name.
    pub label: String,
    /// Phrases locating the field's line; any one is enough.
    pub search_phrases: Vec<String>,
    #[serde(default)]
    pub policy: ValuePolicy,
}

impl ExtractionRule {
    pub fn new(key: &str, label: &str, search_phrases: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            search_phrases: search_phrases.iter().map(|p| p.to_string()).collect(),
            policy: ValuePolicy::Standard,
        }
    }

    /// Check whether any search phrase occurs in the line text.
    pub fn matches(&self, line_text: &str) -> bool {
        self.search_phrases
            .iter()
            .any(|phrase| line_text.contains(phrase.as_str()))
    }
}
