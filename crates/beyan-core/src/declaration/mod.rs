//! VAT return field extraction module.

mod parser;
pub mod rules;

pub use parser::DeclarationParser;
pub use rules::{builtin_rules, ExtractionRule, FieldMatcher, LineExtractor, PeriodLocator};
