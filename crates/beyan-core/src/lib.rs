//! Core library for Turkish VAT return (KDV beyannamesi) extraction.
//!
//! This crate provides:
//! - PDF decoding into positioned text tokens
//! - Line reconstruction from token coordinates
//! - Reporting period detection (header anchors with a fallback scan)
//! - Labeled amount extraction driven by a static rule list
//! - Batch accumulation and tabular export of results

pub mod batch;
pub mod declaration;
pub mod error;
pub mod layout;
pub mod models;
pub mod pdf;
pub mod report;

pub use batch::{BatchState, SequentialExtraction};
pub use declaration::{DeclarationParser, ExtractionRule, LineExtractor};
pub use error::{BeyanError, Result};
pub use layout::{Line, LineReconstructor};
pub use models::config::BeyanConfig;
pub use models::declaration::{DocumentExtractionResult, FieldValue, Period};
pub use pdf::{PdfExtractor, TextToken, TokenSource};
pub use report::Report;
