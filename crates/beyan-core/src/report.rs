//! Tabular export of extraction results.
//!
//! One row per document, one column per rule. Currency text is converted
//! to plain decimals where parseable.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::declaration::rules::{parse_turkish_amount, ExtractionRule};
use crate::models::config::ExportConfig;
use crate::models::declaration::DocumentExtractionResult;

/// Fixed leading columns of the export.
pub const FIXED_HEADERS: [&str; 5] = ["Sıra", "Dosya Adı", "Dönem", "Dönem Yıl", "Dönem Ay"];

/// A rendered table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Integer(usize),
    Number(Decimal),
    Text(String),
}

impl Cell {
    /// Convert raw currency text; unparseable text is kept verbatim.
    pub fn currency(raw: &str) -> Self {
        if raw.is_empty() {
            return Cell::Empty;
        }
        match parse_turkish_amount(raw) {
            Some(amount) => Cell::Number(amount),
            None => Cell::Text(raw.to_string()),
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Cell::Integer(_) | Cell::Number(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Number(d) => write!(f, "{}", d),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Export table built from a result set.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Column widths in characters.
    pub widths: Vec<usize>,
}

impl Report {
    /// Build the table from results already in display order.
    pub fn build(
        results: &[&DocumentExtractionResult],
        rules: &[ExtractionRule],
        config: &ExportConfig,
    ) -> Self {
        let headers: Vec<String> = FIXED_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(rules.iter().map(|r| r.label.clone()))
            .collect();

        let rows = results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let mut row = vec![
                    Cell::Integer(i + 1),
                    Cell::Text(result.identifier.clone()),
                    Cell::Text(result.period.clone()),
                    text_cell(&result.year),
                    text_cell(&result.month),
                ];
                row.extend(rules.iter().map(|r| Cell::currency(result.value(&r.label))));
                row
            })
            .collect();

        let widths = headers
            .iter()
            .map(|h| config.min_column_width.max(h.chars().count() + config.column_padding))
            .collect();

        Self {
            title: config.sheet_name.clone(),
            headers,
            rows,
            widths,
        }
    }

    /// Render as an aligned plain-text table.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');

        let header_cells: Vec<String> = self
            .headers
            .iter()
            .zip(&self.widths)
            .map(|(h, w)| pad_right(h, *w))
            .collect();
        out.push_str(header_cells.join(" | ").trim_end());
        out.push('\n');

        let rule: Vec<String> = self.widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("-+-"));
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&self.widths)
                .map(|(cell, w)| {
                    let text = cell.to_string();
                    if cell.is_numeric() {
                        pad_left(&text, *w)
                    } else {
                        pad_right(&text, *w)
                    }
                })
                .collect();
            out.push_str(cells.join(" | ").trim_end());
            out.push('\n');
        }

        out
    }
}

fn text_cell(s: &str) -> Cell {
    if s.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}

fn pad_right(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.chars().count());
    format!("{}{}", s, " ".repeat(fill))
}

fn pad_left(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.chars().count());
    format!("{}{}", " ".repeat(fill), s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::declaration::{FieldValue, Period};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn rules() -> Vec<ExtractionRule> {
        vec![
            ExtractionRule::new("matrah_toplam", "Matrah Toplamı", &["Matrah Toplamı"]),
            ExtractionRule::new("x", "Bir Çok Uzun Başlıklı Vergi Alanı", &["x"]),
        ]
    }

    #[test]
    fn test_currency_cell() {
        assert_eq!(
            Cell::currency("1.234,56"),
            Cell::Number(Decimal::from_str("1234.56").unwrap())
        );
        assert_eq!(Cell::currency("abc"), Cell::Text("abc".into()));
        assert_eq!(Cell::currency(""), Cell::Empty);
        assert_eq!(Cell::currency("1.234,56").to_string(), "1234.56");
    }

    #[test]
    fn test_build_rows_and_widths() {
        let ok = DocumentExtractionResult::new(
            "a.pdf",
            Period::new("Temmuz", "2024"),
            vec![FieldValue {
                label: "Matrah Toplamı".into(),
                value: "12.345,67".into(),
            }],
        );
        let failed = DocumentExtractionResult::failed("b.pdf", "bozuk");

        let report = Report::build(&[&ok, &failed], &rules(), &ExportConfig::default());

        assert_eq!(report.headers.len(), FIXED_HEADERS.len() + 2);
        assert_eq!(report.headers[5], "Matrah Toplamı");
        assert_eq!(report.widths[0], 20);
        assert_eq!(report.widths[6], "Bir Çok Uzun Başlıklı Vergi Alanı".chars().count() + 5);

        assert_eq!(
            report.rows[0],
            vec![
                Cell::Integer(1),
                Cell::Text("a.pdf".into()),
                Cell::Text("Temmuz 2024".into()),
                Cell::Text("2024".into()),
                Cell::Text("Temmuz".into()),
                Cell::Number(Decimal::from_str("12345.67").unwrap()),
                Cell::Empty,
            ]
        );
        assert_eq!(report.rows[1][2], Cell::Text("HATA".into()));
        assert_eq!(report.rows[1][5], Cell::Empty);
    }

    #[test]
    fn test_to_text_aligns_columns() {
        let ok = DocumentExtractionResult::new(
            "a.pdf",
            Period::new("Ocak", "2024"),
            vec![FieldValue {
                label: "Matrah Toplamı".into(),
                value: "1,00".into(),
            }],
        );
        let config = ExportConfig {
            min_column_width: 8,
            column_padding: 0,
            sheet_name: "KDV".into(),
        };
        let rules = vec![ExtractionRule::new("m", "Matrah", &["Matrah"])];
        let report = Report::build(&[&ok], &rules, &config);
        let text = report.to_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "KDV");
        assert!(lines[1].starts_with("Sıra     | Dosya Adı"));
        assert!(lines[3].starts_with("       1 | a.pdf     |"));
    }
}
