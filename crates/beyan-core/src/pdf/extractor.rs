//! Positioned text extraction using pdf-extract.

use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};
use tracing::{debug, trace};

use super::{Result, TextToken, TokenSource};
use crate::error::PdfError;

/// Maximum baseline shift (in page units) for glyphs of the same token.
const BASELINE_EPSILON: f64 = 0.5;

/// Horizontal gap, relative to the glyph height, that starts a new token.
const TOKEN_GAP_RATIO: f64 = 0.15;

/// PDF token source backed by pdf-extract.
///
/// Glyph runs are grouped into tokens at load time, one list per page.
pub struct PdfExtractor {
    pages: Option<Vec<Vec<TextToken>>>,
    max_pages: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            pages: None,
            max_pages: 0,
        }
    }

    /// Limit the number of decoded pages (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        self.pages = None;

        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        let mut collector = TokenCollector::default();
        pdf_extract::output_doc(&doc, &mut collector)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let mut pages = collector.finish();
        if self.max_pages > 0 && pages.len() > self.max_pages {
            debug!("Truncating {} pages to {}", pages.len(), self.max_pages);
            pages.truncate(self.max_pages);
        }

        debug!(
            "Loaded PDF with {} pages, {} tokens",
            pages.len(),
            pages.iter().map(Vec::len).sum::<usize>()
        );
        self.pages = Some(pages);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.pages
            .as_ref()
            .map(|pages| pages.len() as u32)
            .unwrap_or(0)
    }

    fn page_tokens(&self, page: u32) -> Result<Vec<TextToken>> {
        let pages = self.pages.as_ref().ok_or(PdfError::NotLoaded)?;
        let index = (page as usize).checked_sub(1).ok_or(PdfError::InvalidPage(page))?;
        pages
            .get(index)
            .cloned()
            .ok_or(PdfError::InvalidPage(page))
    }
}

/// Glyphs accumulated for the token currently being built.
struct PendingToken {
    text: String,
    x: f64,
    y: f64,
    right: f64,
    height: f64,
}

impl PendingToken {
    fn accepts(&self, x: f64, y: f64) -> bool {
        (y - self.y).abs() <= BASELINE_EPSILON
            && x >= self.right - self.height
            && x - self.right <= self.height * TOKEN_GAP_RATIO
    }

    fn into_token(self) -> Option<TextToken> {
        if self.text.trim().is_empty() {
            return None;
        }
        let width = self.right - self.x;
        Some(TextToken::new(self.text, self.x, self.y).with_size(width, self.height))
    }
}

/// `OutputDev` that turns glyph callbacks into page token lists.
#[derive(Default)]
struct TokenCollector {
    pages: Vec<Vec<TextToken>>,
    pending: Option<PendingToken>,
}

impl TokenCollector {
    fn flush(&mut self) {
        if let Some(token) = self.pending.take().and_then(PendingToken::into_token) {
            match self.pages.last_mut() {
                Some(page) => page.push(token),
                None => self.pages.push(vec![token]),
            }
        }
    }

    fn finish(mut self) -> Vec<Vec<TextToken>> {
        self.flush();
        self.pages
    }
}

impl OutputDev for TokenCollector {
    fn begin_page(
        &mut self,
        page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        self.flush();
        trace!("Decoding page {}", page_num);
        self.pages.push(Vec::new());
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        self.flush();
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> std::result::Result<(), OutputError> {
        // `trm` carries no font scale; glyph width is in text space units.
        let x = trm.m31;
        let y = trm.m32;
        let advance = width * font_size * trm.m11.hypot(trm.m12);
        let height = font_size * trm.m21.hypot(trm.m22);

        if char.trim().is_empty() {
            self.flush();
            return Ok(());
        }

        if let Some(pending) = self.pending.as_mut() {
            if pending.accepts(x, y) {
                pending.text.push_str(char);
                pending.right = x + advance;
                return Ok(());
            }
        }

        self.flush();
        self.pending = Some(PendingToken {
            text: char.to_string(),
            x,
            y,
            right: x + advance,
            height,
        });
        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        self.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(text: &str, x: f64, right: f64) -> PendingToken {
        PendingToken {
            text: text.to_string(),
            x,
            y: 700.0,
            right,
            height: 10.0,
        }
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.pages.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(matches!(extractor.page_tokens(1), Err(PdfError::NotLoaded)));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let result = extractor.load(b"definitely not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_pending_token_accepts_adjacent_glyphs() {
        let token = pending("Ma", 100.0, 112.0);
        assert!(token.accepts(112.5, 700.2));
        assert!(!token.accepts(120.0, 700.0));
        assert!(!token.accepts(112.0, 690.0));
        assert!(!token.accepts(50.0, 700.0));
    }

    #[test]
    fn test_whitespace_only_token_is_dropped() {
        assert!(pending("  ", 0.0, 5.0).into_token().is_none());
        let token = pending("Ay", 10.0, 22.0).into_token().unwrap();
        assert_eq!(token.text, "Ay");
        assert_eq!(token.width, 12.0);
        assert_eq!(token.height, 10.0);
    }

    #[test]
    fn test_glyphs_scaled_by_font_size_form_one_token() {
        let mut collector = TokenCollector::default();
        collector.pages.push(Vec::new());

        // Helvetica digit advance is 0.556 em; 10pt text at (150, 600).
        let mut x = 150.0;
        for glyph in ["1", "2", ",", "5", "0"] {
            let trm = Transform::row_major(1.0, 0.0, 0.0, 1.0, x, 600.0);
            collector.output_character(&trm, 0.556, 0.0, 10.0, glyph).unwrap();
            x += 5.56;
        }

        let pages = collector.finish();
        assert_eq!(pages[0].len(), 1);
        let token = &pages[0][0];
        assert_eq!(token.text, "12,50");
        assert_eq!(token.x, 150.0);
        assert_eq!(token.y, 600.0);
        assert!((token.width - 27.8).abs() < 1e-6);
        assert_eq!(token.height, 10.0);
    }

    #[test]
    fn test_space_glyph_splits_tokens() {
        let mut collector = TokenCollector::default();
        collector.pages.push(Vec::new());

        let mut x = 50.0;
        for glyph in ["K", "D", " ", "V"] {
            let trm = Transform::row_major(1.0, 0.0, 0.0, 1.0, x, 580.0);
            collector.output_character(&trm, 0.6, 0.0, 10.0, glyph).unwrap();
            x += 6.0;
        }

        let texts: Vec<String> = collector
            .finish()
            .remove(0)
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["KD", "V"]);
    }

    #[test]
    fn test_collector_splits_pages() {
        let mut collector = TokenCollector::default();
        collector.pages.push(Vec::new());
        collector.pending = Some(pending("Ocak", 0.0, 20.0));
        collector.flush();
        collector.pages.push(Vec::new());
        collector.pending = Some(pending("2024", 0.0, 20.0));

        let pages = collector.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0][0].text, "Ocak");
        assert_eq!(pages[1][0].text, "2024");
    }
}
