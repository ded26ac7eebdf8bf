//! Common regex patterns for VAT return extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Turkish currency text: dot thousands separator, comma and two decimals
    pub static ref CURRENCY_PATTERN: Regex = Regex::new(
        r"^-?[0-9.]+,[0-9]{2}$"
    ).unwrap();

    // Year of the reporting period, anywhere in the token
    pub static ref YEAR_PATTERN: Regex = Regex::new(
        r"20[0-9]{2}"
    ).unwrap();
}

/// Literal zero amount, always accepted as a value.
pub const ZERO_AMOUNT: &str = "0,00";

/// Check whether trimmed token text looks like a Turkish currency amount.
pub fn is_currency(text: &str) -> bool {
    text == ZERO_AMOUNT || CURRENCY_PATTERN.is_match(text)
}

/// Check whether token text carries a 20xx year.
pub fn contains_year(text: &str) -> bool {
    YEAR_PATTERN.is_match(text)
}
