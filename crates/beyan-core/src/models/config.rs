//! Configuration structures for the extraction pipeline.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::declaration::rules::{builtin_rules, ExtractionRule};
use crate::error::BeyanError;
use crate::layout::DEFAULT_LINE_TOLERANCE;

/// Main configuration for the beyan pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BeyanConfig {
    /// Line reconstruction configuration.
    pub layout: LayoutConfig,

    /// Period detection configuration.
    pub period: PeriodConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Export configuration.
    pub export: ExportConfig,

    /// Ordered extraction rules; order fixes the output columns.
    pub rules: Vec<ExtractionRule>,
}

impl Default for BeyanConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            period: PeriodConfig::default(),
            pdf: PdfConfig::default(),
            export: ExportConfig::default(),
            rules: builtin_rules(),
        }
    }
}

/// Line reconstruction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum vertical distance from a line's first token.
    pub line_tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance: DEFAULT_LINE_TOLERANCE,
        }
    }
}

/// Period detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodConfig {
    /// Header token above the month value.
    pub month_anchor: String,

    /// Header token above the year value.
    pub year_anchor: String,

    /// Maximum horizontal distance between a header and its value.
    pub column_tolerance: f64,

    /// Number of lines below a header searched for its value.
    pub lookahead_lines: usize,

    /// Number of leading lines scanned when no header yields a value.
    pub fallback_lines: usize,
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            month_anchor: "Ay".to_string(),
            year_anchor: "Yıl".to_string(),
            column_tolerance: 35.0,
            lookahead_lines: 3,
            fallback_lines: 30,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { max_pages: 0 }
    }
}

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Minimum rendered column width in characters.
    pub min_column_width: usize,

    /// Characters added to the header length when sizing a column.
    pub column_padding: usize,

    /// Title of the exported table.
    pub sheet_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            min_column_width: 20,
            column_padding: 5,
            sheet_name: "KDV Verileri".to_string(),
        }
    }
}

impl BeyanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, BeyanError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), BeyanError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations the extractor cannot work with.
    pub fn validate(&self) -> Result<(), BeyanError> {
        if self.rules.is_empty() {
            return Err(BeyanError::Config("no extraction rules configured".to_string()));
        }
        if let Some(rule) = self.rules.iter().find(|r| r.search_phrases.is_empty()) {
            return Err(BeyanError::Config(format!(
                "rule '{}' has no search phrases",
                rule.key
            )));
        }
        // A blank phrase is contained in every line.
        if let Some(rule) = self
            .rules
            .iter()
            .find(|r| r.search_phrases.iter().any(|p| p.trim().is_empty()))
        {
            return Err(BeyanError::Config(format!(
                "rule '{}' has a blank search phrase",
                rule.key
            )));
        }
        let mut labels = HashSet::new();
        if let Some(rule) = self.rules.iter().find(|r| !labels.insert(r.label.as_str())) {
            return Err(BeyanError::Config(format!(
                "duplicate rule label '{}'",
                rule.label
            )));
        }
        if self.layout.line_tolerance <= 0.0 {
            return Err(BeyanError::Config(
                "layout.line_tolerance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
