//! Batch intake: supported-type filtering, sequential extraction and the
//! accumulated, de-duplicated result set.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::declaration::DeclarationParser;
use crate::error::Result;
use crate::models::declaration::{month_index, DocumentExtractionResult};
use crate::pdf::TokenSource;

/// File extension accepted by the intake filter.
pub const SUPPORTED_EXTENSION: &str = "pdf";

/// Check whether a path has the supported document type.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(SUPPORTED_EXTENSION))
}

/// Keep only supported documents, preserving submission order.
pub fn filter_supported<I>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths.into_iter().filter(|p| is_supported(p)).collect()
}

/// Identifier of a document on disk: its file name.
pub fn document_identifier(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Chronological ordering: year text, then month position in the calendar.
///
/// Unresolved or unknown months sort after all resolved months of the
/// same year.
pub fn chronological_cmp(a: &DocumentExtractionResult, b: &DocumentExtractionResult) -> Ordering {
    a.year.cmp(&b.year).then_with(|| {
        let month_a = month_index(&a.month).unwrap_or(usize::MAX);
        let month_b = month_index(&b.month).unwrap_or(usize::MAX);
        month_a.cmp(&month_b)
    })
}

/// Processes documents one at a time, in submission order.
///
/// Nothing is read before [`Iterator::next`] is called, so a batch can be
/// abandoned between documents by dropping the iterator.
pub struct SequentialExtraction<'a> {
    parser: &'a DeclarationParser,
    source: &'a mut dyn TokenSource,
    paths: std::vec::IntoIter<PathBuf>,
    total: usize,
    done: usize,
}

impl<'a> SequentialExtraction<'a> {
    /// Create an extraction run over the supported documents in `paths`.
    pub fn new(
        parser: &'a DeclarationParser,
        source: &'a mut dyn TokenSource,
        paths: Vec<PathBuf>,
    ) -> Self {
        let paths = filter_supported(paths);
        debug!("Queued {} documents", paths.len());
        Self {
            parser,
            source,
            total: paths.len(),
            paths: paths.into_iter(),
            done: 0,
        }
    }

    /// Number of queued documents.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of documents processed so far.
    pub fn done(&self) -> usize {
        self.done
    }
}

impl Iterator for SequentialExtraction<'_> {
    type Item = DocumentExtractionResult;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        let identifier = document_identifier(&path);

        let result = match fs::read(&path) {
            Ok(data) => self.parser.extract(&identifier, &data, &mut *self.source),
            Err(e) => DocumentExtractionResult::failed(identifier, e.to_string()),
        };

        self.done += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.paths.size_hint()
    }
}

/// Accumulated results of one or more batches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchState {
    results: Vec<DocumentExtractionResult>,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add new results, skipping identifiers already present.
    ///
    /// The first result seen for an identifier wins, including duplicates
    /// within `results` itself. Returns the number of accepted results.
    pub fn add_documents<I>(&mut self, results: I) -> usize
    where
        I: IntoIterator<Item = DocumentExtractionResult>,
    {
        let mut seen: HashSet<String> = self
            .results
            .iter()
            .map(|r| r.identifier.clone())
            .collect();

        let before = self.results.len();
        for result in results {
            if seen.insert(result.identifier.clone()) {
                self.results.push(result);
            } else {
                debug!("Skipping duplicate document {}", result.identifier);
            }
        }

        let added = self.results.len() - before;
        info!("Accepted {} new documents ({} total)", added, self.results.len());
        added
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.results.iter().any(|r| r.identifier == identifier)
    }

    /// Results in insertion order.
    pub fn results(&self) -> &[DocumentExtractionResult] {
        &self.results
    }

    /// Results in chronological order (stable for equal periods).
    pub fn chronological(&self) -> Vec<&DocumentExtractionResult> {
        let mut sorted: Vec<&DocumentExtractionResult> = self.results.iter().collect();
        sorted.sort_by(|a, b| chronological_cmp(a, b));
        sorted
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Load a saved state; a missing file yields an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
