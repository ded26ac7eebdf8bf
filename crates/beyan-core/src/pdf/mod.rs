//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use serde::{Deserialize, Serialize};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A positioned text fragment as decoded from a page.
///
/// Coordinates are in page space: the origin is the bottom-left corner and
/// `y` grows upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToken {
    /// Text content, untrimmed.
    pub text: String,
    /// Horizontal position of the fragment origin.
    pub x: f64,
    /// Vertical position of the fragment baseline.
    pub y: f64,
    /// Advance width of the fragment.
    pub width: f64,
    /// Font height of the fragment.
    pub height: f64,
}

impl TextToken {
    /// Create a token with zero size at the given position.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Set the token size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Token text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Source of positioned text tokens for a document.
///
/// Implementations own all document-format decoding; callers only see
/// pages of unordered tokens.
pub trait TokenSource {
    /// Load a document from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the loaded document.
    fn page_count(&self) -> u32;

    /// Get the unordered tokens of a page (1-indexed).
    fn page_tokens(&self, page: u32) -> Result<Vec<TextToken>>;
}
