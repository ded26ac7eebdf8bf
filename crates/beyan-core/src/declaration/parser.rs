//! End-to-end extraction of a single VAT return.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::layout::{Line, LineReconstructor};
use crate::models::config::BeyanConfig;
use crate::models::declaration::DocumentExtractionResult;
use crate::pdf::{self, TokenSource};

use super::rules::{builtin_rules, ExtractionRule, FieldMatcher, LineExtractor, PeriodLocator};

/// Single-document extraction pipeline.
///
/// Holds only static configuration; every call to [`extract`] is
/// independent of the previous ones.
///
/// [`extract`]: DeclarationParser::extract
#[derive(Debug, Clone)]
pub struct DeclarationParser {
    reconstructor: LineReconstructor,
    period: PeriodLocator,
    fields: FieldMatcher,
}

impl DeclarationParser {
    /// Create a parser with the default layout settings and built-in rules.
    pub fn new() -> Self {
        Self {
            reconstructor: LineReconstructor::new(),
            period: PeriodLocator::new(),
            fields: FieldMatcher::new(builtin_rules()),
        }
    }

    pub fn from_config(config: &BeyanConfig) -> Self {
        Self {
            reconstructor: LineReconstructor::new().with_tolerance(config.layout.line_tolerance),
            period: PeriodLocator::from_config(&config.period),
            fields: FieldMatcher::new(config.rules.clone()),
        }
    }

    /// Replace the extraction rules.
    pub fn with_rules(mut self, rules: Vec<ExtractionRule>) -> Self {
        self.fields = FieldMatcher::new(rules);
        self
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        self.fields.rules()
    }

    /// Load a document and reconstruct its lines, page by page.
    ///
    /// A document without pages yields no lines.
    pub fn read_lines(&self, source: &mut dyn TokenSource, data: &[u8]) -> pdf::Result<Vec<Line>> {
        source.load(data)?;

        let page_count = source.page_count();
        let mut lines = Vec::new();
        for page in 1..=page_count {
            let tokens = source.page_tokens(page)?;
            let page_lines = self.reconstructor.reconstruct(&tokens);
            debug!(
                "Page {}: {} tokens -> {} lines",
                page,
                tokens.len(),
                page_lines.len()
            );
            lines.extend(page_lines);
        }

        Ok(lines)
    }

    /// Run period and field matching over already reconstructed lines.
    pub fn parse_lines(&self, identifier: &str, lines: &[Line]) -> DocumentExtractionResult {
        let period = self.period.extract(lines);
        let values = self.fields.extract(lines);

        let found = values.iter().filter(|v| !v.value.is_empty()).count();
        info!(
            "{}: period '{}', {}/{} fields",
            identifier,
            period.label(),
            found,
            values.len()
        );

        DocumentExtractionResult::new(identifier, period, values)
    }

    /// Extract one document.
    ///
    /// Never fails: decoding errors and panics inside the token source are
    /// turned into an error result with the `HATA` period.
    pub fn extract(
        &self,
        identifier: &str,
        data: &[u8],
        source: &mut dyn TokenSource,
    ) -> DocumentExtractionResult {
        let start = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.read_lines(source, data)
                .map(|lines| self.parse_lines(identifier, &lines))
        }));

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!("Failed to read {}: {}", identifier, e);
                DocumentExtractionResult::failed(identifier, e.to_string())
            }
            Err(payload) => {
                let cause = panic_message(payload.as_ref());
                warn!("Decoder panicked on {}: {}", identifier, cause);
                DocumentExtractionResult::failed(identifier, cause)
            }
        };

        debug!("Processed {} in {:?}", identifier, start.elapsed());
        result
    }
}

impl Default for DeclarationParser {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "decoder panicked".to_string()
    }
}
