//! Extraction results for VAT return documents.

use serde::{Deserialize, Serialize};

/// Canonical Turkish month names in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

/// Period label used for documents that could not be read.
pub const ERROR_PERIOD: &str = "HATA";

/// User-facing message attached to unreadable documents.
pub const UNREADABLE_MESSAGE: &str = "Dosya okunamadı veya bozuk.";

/// Lower-case text using Turkish casing rules (I → ı, İ → i).
pub fn turkish_lowercase(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            'I' => vec!['ı'],
            'İ' => vec!['i'],
            _ => c.to_lowercase().collect(),
        })
        .collect()
}

/// Index of a canonical month name (0 = Ocak), ignoring case and padding.
pub fn month_index(name: &str) -> Option<usize> {
    let needle = turkish_lowercase(name.trim());
    MONTH_NAMES
        .iter()
        .position(|m| turkish_lowercase(m) == needle)
}

/// Reporting period of a return. Either part may be empty when unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Canonical month name, or empty.
    pub month: String,
    /// Four-digit year text, or empty.
    pub year: String,
}

impl Period {
    pub fn new(month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            year: year.into(),
        }
    }

    /// Display label, e.g. "Temmuz 2024".
    pub fn label(&self) -> String {
        format!("{} {}", self.month, self.year).trim().to_string()
    }

    pub fn is_resolved(&self) -> bool {
        !self.month.is_empty() && !self.year.is_empty()
    }
}

/// Value extracted for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Rule label (output column name).
    pub label: String,
    /// Raw currency text as printed, or empty when not found.
    pub value: String,
}

/// Why a document produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentError {
    pub message: String,
    pub cause: String,
}

/// Extraction output for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentExtractionResult {
    /// Document identifier, usually the file name.
    pub identifier: String,
    pub year: String,
    pub month: String,
    /// Combined period label, or [`ERROR_PERIOD`] for failed documents.
    pub period: String,
    /// Values in rule order.
    pub values: Vec<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DocumentError>,
}

impl DocumentExtractionResult {
    /// Build a successful result.
    pub fn new(identifier: impl Into<String>, period: Period, values: Vec<FieldValue>) -> Self {
        let label = period.label();
        Self {
            identifier: identifier.into(),
            year: period.year,
            month: period.month,
            period: label,
            values,
            error: None,
        }
    }

    /// Build the uniform result for an unreadable document.
    pub fn failed(identifier: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            year: String::new(),
            month: String::new(),
            period: ERROR_PERIOD.to_string(),
            values: Vec::new(),
            error: Some(DocumentError {
                message: UNREADABLE_MESSAGE.to_string(),
                cause: cause.into(),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Value for a rule label; empty when the rule found nothing.
    pub fn value(&self, label: &str) -> &str {
        self.values
            .iter()
            .find(|v| v.label == label)
            .map(|v| v.value.as_str())
            .unwrap_or("")
    }

    /// Resolved period of the document.
    pub fn period(&self) -> Period {
        Period::new(self.month.clone(), self.year.clone())
    }
}
