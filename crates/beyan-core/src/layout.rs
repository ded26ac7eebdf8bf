//! Line reconstruction from positioned text tokens.
//!
//! Tokens are grouped into visual rows by vertical proximity and ordered
//! left-to-right within each row.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::pdf::TextToken;

/// Default vertical tolerance (in page units) for tokens sharing a line.
pub const DEFAULT_LINE_TOLERANCE: f64 = 6.0;

/// A row of tokens believed to share a baseline, ordered by ascending x.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub tokens: Vec<TextToken>,
}

impl Line {
    /// Token texts joined with a single space.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// First token whose trimmed text equals `text`.
    pub fn find_exact(&self, text: &str) -> Option<&TextToken> {
        self.tokens.iter().find(|t| t.trimmed() == text)
    }

    /// First token whose x lies strictly within `tolerance` of `x`.
    pub fn find_near_x(&self, x: f64, tolerance: f64) -> Option<&TextToken> {
        self.tokens.iter().find(|t| (t.x - x).abs() < tolerance)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Groups page tokens into ordered lines.
#[derive(Debug, Clone, Copy)]
pub struct LineReconstructor {
    tolerance: f64,
}

impl LineReconstructor {
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_LINE_TOLERANCE,
        }
    }

    /// Set the vertical tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Reconstruct the lines of a single page, top to bottom.
    ///
    /// Each line's reference is its first token in top-down order; later
    /// tokens are compared against that reference only, never against a
    /// running average.
    pub fn reconstruct(&self, tokens: &[TextToken]) -> Vec<Line> {
        let mut sorted: Vec<TextToken> = tokens.to_vec();
        sorted.sort_by(|a, b| b.y.total_cmp(&a.y));

        let mut lines = Vec::new();
        let mut current: Vec<TextToken> = Vec::new();

        for token in sorted {
            let joins = current
                .first()
                .is_some_and(|reference| (token.y - reference.y).abs() < self.tolerance);

            if !joins && !current.is_empty() {
                lines.push(close_line(std::mem::take(&mut current)));
            }
            current.push(token);
        }

        if !current.is_empty() {
            lines.push(close_line(current));
        }

        trace!("Reconstructed {} lines from {} tokens", lines.len(), tokens.len());
        lines
    }

    /// Reconstruct each page separately and concatenate in page order.
    pub fn reconstruct_pages<'a, I>(&self, pages: I) -> Vec<Line>
    where
        I: IntoIterator<Item = &'a [TextToken]>,
    {
        pages
            .into_iter()
            .flat_map(|page| self.reconstruct(page))
            .collect()
    }
}

impl Default for LineReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

fn close_line(mut tokens: Vec<TextToken>) -> Line {
    tokens.sort_by(|a, b| a.x.total_cmp(&b.x));
    Line { tokens }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tok(text: &str, x: f64, y: f64) -> TextToken {
        TextToken::new(text, x, y)
    }

    fn texts(lines: &[Line]) -> Vec<Vec<&str>> {
        lines
            .iter()
            .map(|l| l.tokens.iter().map(|t| t.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(LineReconstructor::new().reconstruct(&[]).is_empty());
    }

    #[test]
    fn test_orders_lines_top_down_and_tokens_left_right() {
        let tokens = vec![
            tok("c", 300.0, 400.0),
            tok("b", 200.0, 700.0),
            tok("a", 50.0, 701.0),
            tok("d", 10.0, 398.0),
        ];

        let lines = LineReconstructor::new().reconstruct(&tokens);
        assert_eq!(texts(&lines), vec![vec!["a", "b"], vec!["d", "c"]]);
    }

    #[test]
    fn test_threshold_boundary() {
        let tokens = vec![
            tok("ref", 0.0, 500.0),
            tok("near", 10.0, 494.01),
            tok("far", 20.0, 494.0),
        ];

        let lines = LineReconstructor::new().reconstruct(&tokens);
        assert_eq!(texts(&lines), vec![vec!["ref", "near"], vec!["far"]]);
    }

    #[test]
    fn test_reference_is_first_token_not_average() {
        // Each token is within tolerance of its predecessor but the chain
        // is compared against the first token only.
        let tokens = vec![
            tok("a", 0.0, 500.0),
            tok("b", 10.0, 496.0),
            tok("c", 20.0, 492.0),
            tok("d", 30.0, 488.0),
        ];

        let lines = LineReconstructor::new().reconstruct(&tokens);
        assert_eq!(texts(&lines), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_single_line_when_all_within_tolerance() {
        let tokens: Vec<TextToken> = (0..20)
            .map(|i| tok(&i.to_string(), f64::from(20 - i), 100.0 + f64::from(i % 5)))
            .collect();

        let lines = LineReconstructor::new().reconstruct(&tokens);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].tokens.windows(2).all(|w| w[0].x <= w[1].x));
    }

    #[test]
    fn test_pages_are_concatenated_in_order() {
        let page1 = vec![tok("p1-low", 0.0, 100.0)];
        let page2 = vec![tok("p2-high", 0.0, 800.0)];

        let lines = LineReconstructor::new()
            .reconstruct_pages([page1.as_slice(), page2.as_slice()]);
        assert_eq!(texts(&lines), vec![vec!["p1-low"], vec!["p2-high"]]);
    }

    #[test]
    fn test_line_text_and_lookups() {
        let line = Line {
            tokens: vec![tok("Matrah", 10.0, 0.0), tok(" Toplamı ", 60.0, 0.0)],
        };
        assert_eq!(line.text(), "Matrah  Toplamı ");
        assert_eq!(line.find_exact("Toplamı").map(|t| t.x), Some(60.0));
        assert_eq!(line.find_near_x(40.0, 35.0).map(|t| t.x), Some(10.0));
        assert!(line.find_near_x(200.0, 35.0).is_none());
    }
}
