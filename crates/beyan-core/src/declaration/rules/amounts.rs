//! Labeled amount extraction.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::patterns::is_currency;
use super::{ExtractionRule, LineExtractor, ValuePolicy};
use crate::layout::Line;
use crate::models::declaration::FieldValue;

/// Resolves every rule's value against the same line sequence.
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    rules: Vec<ExtractionRule>,
}

impl FieldMatcher {
    pub fn new(rules: Vec<ExtractionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    /// Find the value of one rule, or an empty string.
    ///
    /// A line whose text matches a phrase but holds no amount does not end
    /// the search; later matching lines are still tried.
    pub fn match_rule(&self, rule: &ExtractionRule, lines: &[Line]) -> String {
        for (i, line) in lines.iter().enumerate() {
            if !rule.matches(&line.text()) {
                continue;
            }

            let value = match rule.policy {
                ValuePolicy::Standard => find_value_in_line(line),
            };

            match value {
                Some(value) => {
                    trace!("Rule '{}' matched line {}: {}", rule.key, i, value);
                    return value.to_string();
                }
                None => trace!("Rule '{}' matched line {} without an amount", rule.key, i),
            }
        }

        debug!("No value found for rule '{}'", rule.key);
        String::new()
    }
}

impl LineExtractor for FieldMatcher {
    type Output = Vec<FieldValue>;

    fn extract(&self, lines: &[Line]) -> Vec<FieldValue> {
        self.rules
            .iter()
            .map(|rule| FieldValue {
                label: rule.label.clone(),
                value: self.match_rule(rule, lines),
            })
            .collect()
    }
}

/// Rightmost token of the line that looks like a currency amount.
pub fn find_value_in_line(line: &Line) -> Option<&str> {
    line.tokens
        .iter()
        .rev()
        .map(|t| t.trimmed())
        .find(|text| is_currency(text))
}

/// Parse Turkish currency text ("1.234,56") into a decimal.
pub fn parse_turkish_amount(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace('.', "").replacen(',', ".", 1);
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}
