use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use scraper::{ElementRef, Html, Selector};

use crate::util::text;

/// Extracts the text content of the first element matching `css_selector`
/// inside `element`. Returns `None` when the selector is invalid or matches
/// nothing.
pub fn parse_value(element: &ElementRef, css_selector: &str) -> Option<String> {
    match Selector::parse(css_selector) {
        Ok(s) => element
            .select(&s)
            .next()
            .map(|v| v.text().collect::<String>()),
        Err(_) => None,
    }
}

/// Extracts the text content of the first element matching `css_selector`
/// anywhere in `document`.
pub fn select_text(document: &Html, css_selector: &str) -> Option<String> {
    parse_value(&document.root_element(), css_selector)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Selects a decimal field out of `document`, substituting zero when the
/// selector matches nothing or the matched text isn't numeric. Zero is the
/// best-effort stand-in for "unavailable" throughout the quote pipeline.
pub fn select_decimal(document: &Html, css_selector: &str) -> Decimal {
    select_text(document, css_selector)
        .and_then(|v| text::parse_decimal(v.trim(), Some(vec!['(', ')'])).ok())
        .unwrap_or(dec!(0))
}

/// Selects an integer field out of `document` with the same zero
/// substitution as [`select_decimal`].
pub fn select_i64(document: &Html, css_selector: &str) -> i64 {
    select_text(document, css_selector)
        .and_then(|v| text::parse_i64(v.trim(), None).ok())
        .unwrap_or(0)
}
