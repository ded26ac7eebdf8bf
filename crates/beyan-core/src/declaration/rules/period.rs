//! Reporting period (month and year) detection.
//!
//! Returns print the period in a small header table: an "Ay" and a "Yıl"
//! column title with the values one to three rows below, roughly aligned
//! on x. When no header yields a value, the first lines of the document are
//! scanned for any month name or 20xx year.

use tracing::debug;

use super::patterns::contains_year;
use super::LineExtractor;
use crate::layout::Line;
use crate::models::config::PeriodConfig;
use crate::models::declaration::{turkish_lowercase, Period, MONTH_NAMES};

/// Month/year locator using header anchors with a positional fallback.
#[derive(Debug, Clone)]
pub struct PeriodLocator {
    month_anchor: String,
    year_anchor: String,
    column_tolerance: f64,
    lookahead_lines: usize,
    fallback_lines: usize,
}

impl PeriodLocator {
    /// Create a locator with the default KDV header layout.
    pub fn new() -> Self {
        Self::from_config(&PeriodConfig::default())
    }

    pub fn from_config(config: &PeriodConfig) -> Self {
        Self {
            month_anchor: config.month_anchor.clone(),
            year_anchor: config.year_anchor.clone(),
            column_tolerance: config.column_tolerance,
            lookahead_lines: config.lookahead_lines,
            fallback_lines: config.fallback_lines,
        }
    }

    /// Look below line `index` for a value aligned with `anchor_x`.
    ///
    /// Only the first aligned token of each following line is tested.
    fn value_below<F>(&self, lines: &[Line], index: usize, anchor_x: f64, accept: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        lines
            .iter()
            .skip(index + 1)
            .take(self.lookahead_lines)
            .filter_map(|line| line.find_near_x(anchor_x, self.column_tolerance))
            .find_map(|token| accept(&token.text))
    }

    fn locate_by_anchor(&self, lines: &[Line]) -> (Option<String>, Option<String>) {
        let mut month: Option<String> = None;
        let mut year: Option<String> = None;

        for (i, line) in lines.iter().enumerate() {
            if month.is_none() {
                if let Some(anchor) = line.find_exact(&self.month_anchor) {
                    month = self.value_below(lines, i, anchor.x, |t| {
                        match_month(t).map(str::to_string)
                    });
                    if let Some(m) = &month {
                        debug!("Month '{}' found below header on line {}", m, i);
                    }
                }
            }

            if year.is_none() {
                if let Some(anchor) = line.find_exact(&self.year_anchor) {
                    year = self.value_below(lines, i, anchor.x, match_year);
                    if let Some(y) = &year {
                        debug!("Year '{}' found below header on line {}", y, i);
                    }
                }
            }

            if month.is_some() && year.is_some() {
                break;
            }
        }

        (month, year)
    }

    fn locate_by_scan(
        &self,
        lines: &[Line],
        mut month: Option<String>,
        mut year: Option<String>,
    ) -> (Option<String>, Option<String>) {
        for line in lines.iter().take(self.fallback_lines) {
            for token in &line.tokens {
                let text = token.trimmed();
                if year.is_none() && contains_year(text) {
                    debug!("Year '{}' found by fallback scan", text);
                    year = Some(text.to_string());
                }
                if month.is_none() {
                    month = match_month(text).map(str::to_string);
                }
            }
            if month.is_some() && year.is_some() {
                break;
            }
        }

        (month, year)
    }
}

impl Default for PeriodLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl LineExtractor for PeriodLocator {
    type Output = Period;

    fn extract(&self, lines: &[Line]) -> Period {
        let (month, year) = self.locate_by_anchor(lines);

        let (month, year) = if month.is_none() || year.is_none() {
            self.locate_by_scan(lines, month, year)
        } else {
            (month, year)
        };

        Period::new(month.unwrap_or_default(), year.unwrap_or_default())
    }
}

/// Match text against the canonical month names.
///
/// The text is trimmed and lower-cased with Turkish rules; a month matches
/// when the text equals or contains its name. Returns the canonical name.
pub fn match_month(text: &str) -> Option<&'static str> {
    let clean = turkish_lowercase(text.trim());
    MONTH_NAMES.iter().copied().find(|name| {
        let lower = turkish_lowercase(name);
        clean == lower || clean.contains(&lower)
    })
}

fn match_year(text: &str) -> Option<String> {
    contains_year(text).then(|| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::TextToken;
    use pretty_assertions::assert_eq;

    fn line(tokens: &[(&str, f64)]) -> Line {
        Line {
            tokens: tokens
                .iter()
                .map(|(text, x)| TextToken::new(*text, *x, 0.0))
                .collect(),
        }
    }

    #[test]
    fn test_match_month() {
        assert_eq!(match_month("Temmuz"), Some("Temmuz"));
        assert_eq!(match_month("  temmuz "), Some("Temmuz"));
        assert_eq!(match_month("KASIM"), Some("Kasım"));
        assert_eq!(match_month("ARALIK"), Some("Aralık"));
        assert_eq!(match_month("Dönem: Şubat"), Some("Şubat"));
        assert_eq!(match_month("Vergi"), None);
        assert_eq!(match_month(""), None);
    }

    #[test]
    fn test_month_below_anchor_within_tolerance() {
        let lines = vec![
            line(&[("Ay", 100.0), ("Yıl", 200.0)]),
            line(&[("-----", 0.0)]),
            line(&[("Temmuz", 105.0), ("2024", 198.0)]),
        ];

        let period = PeriodLocator::new().extract(&lines);
        assert_eq!(period, Period::new("Temmuz", "2024"));
    }

    #[test]
    fn test_anchor_lookahead_is_bounded() {
        let lines = vec![
            line(&[("Ay", 100.0)]),
            line(&[("x", 500.0)]),
            line(&[("y", 500.0)]),
            line(&[("z", 500.0)]),
            line(&[("Mart", 100.0)]),
        ];

        // Not found below the header, but still inside the fallback range.
        let period = PeriodLocator::new().extract(&lines);
        assert_eq!(period.month, "Mart");

        let config = PeriodConfig {
            fallback_lines: 4,
            ..PeriodConfig::default()
        };
        let period = PeriodLocator::from_config(&config).extract(&lines);
        assert_eq!(period.month, "");
    }

    #[test]
    fn test_misaligned_value_is_ignored_by_anchor() {
        let lines = vec![
            line(&[("Ay", 100.0)]),
            line(&[("Nisan", 300.0), ("Ekim", 136.0)]),
            line(&[("Haziran", 90.0)]),
        ];

        let period = PeriodLocator::new().extract(&lines);
        assert_eq!(period.month, "Haziran");
    }

    #[test]
    fn test_year_fallback_without_anchor() {
        let lines = vec![
            line(&[("KATMA DEĞER VERGİSİ BEYANNAMESİ", 50.0)]),
            line(&[("Dönem", 50.0), ("2024", 300.0)]),
        ];

        let period = PeriodLocator::new().extract(&lines);
        assert_eq!(period.year, "2024");
        assert_eq!(period.month, "");
    }

    #[test]
    fn test_fallback_limited_to_leading_lines() {
        let mut lines: Vec<Line> = (0..30).map(|_| line(&[("satır", 10.0)])).collect();
        lines.push(line(&[("2023", 10.0), ("Ocak", 60.0)]));

        let period = PeriodLocator::new().extract(&lines);
        assert_eq!(period, Period::default());
    }

    #[test]
    fn test_anchor_result_wins_over_earlier_text() {
        let lines = vec![
            line(&[("Şubat 2020 tarihli tebliğ", 10.0)]),
            line(&[("Ay", 100.0), ("Yıl", 200.0)]),
            line(&[("Eylül", 101.0), ("2022", 201.0)]),
        ];

        let period = PeriodLocator::new().extract(&lines);
        assert_eq!(period, Period::new("Eylül", "2022"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(PeriodLocator::new().extract(&[]), Period::default());
    }
}
