use std::{collections::HashSet, str::FromStr};

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

/// Characters routinely found around numbers on the quote pages: thousands
/// separators, percent signs, currency prefix remnants and whitespace.
const NUMBER_ESCAPE_CHAR: &[char] = &[',', '%', ' ', '"', '\n', '\r', '\t'];

/// Parses a decimal from scraped text.
///
/// The input may carry thousands separators, percent signs or other
/// decoration; everything in [`NUMBER_ESCAPE_CHAR`] plus `escape_chars` is
/// stripped before parsing.
///
/// # Errors
/// Returns an error when the cleaned text still isn't a valid decimal.
pub fn parse_decimal(s: &str, escape_chars: Option<Vec<char>>) -> Result<Decimal> {
    let cleaned = clean_escape_chars(strip_currency_prefix(s), escape_chars);
    Decimal::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as Decimal because {:?}", cleaned, why))
}

/// Parses an `i64` from scraped text, tolerating thousands separators.
///
/// # Errors
/// Returns an error when the cleaned text still isn't a valid integer.
pub fn parse_i64(s: &str, escape_chars: Option<Vec<char>>) -> Result<i64> {
    let cleaned = clean_escape_chars(strip_currency_prefix(s), escape_chars);
    i64::from_str(&cleaned)
        .map_err(|why| anyhow!("Failed to parse '{}' as i64 because: {:?}", cleaned, why))
}

/// PSX pages prefix rupee amounts with "Rs." or "Rs".
fn strip_currency_prefix(s: &str) -> &str {
    let trimmed = s.trim();
    trimmed
        .strip_prefix("Rs.")
        .or_else(|| trimmed.strip_prefix("Rs"))
        .unwrap_or(trimmed)
}

/// Removes the default escape characters plus any caller-supplied extras.
pub(crate) fn clean_escape_chars(s: &str, escape_chars: Option<Vec<char>>) -> String {
    let mut combined: Vec<char> = NUMBER_ESCAPE_CHAR.to_vec();
    if let Some(ec) = escape_chars {
        combined.extend(ec);
    }

    let filters = combined.iter().collect::<HashSet<_>>();
    s.chars().filter(|c| !filters.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1,234.56", None).unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal(" 118.50 ", None).unwrap(), dec!(118.50));
        assert_eq!(parse_decimal("1.11%", None).unwrap(), dec!(1.11));
        assert_eq!(parse_decimal("-2.45%", None).unwrap(), dec!(-2.45));
        assert_eq!(parse_decimal("Rs.118.50", None).unwrap(), dec!(118.50));
        assert_eq!(parse_decimal("Rs 118.50", None).unwrap(), dec!(118.50));
    }

    #[test]
    fn test_parse_decimal_with_extra_escape_chars() {
        assert_eq!(
            parse_decimal("(1.25%)", Some(vec!['(', ')'])).unwrap(),
            dec!(1.25)
        );
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(parse_decimal("n/a", None).is_err());
        assert!(parse_decimal("", None).is_err());
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64("5,432,100", None).unwrap(), 5_432_100);
        assert_eq!(parse_i64("0", None).unwrap(), 0);
        assert!(parse_i64("--", None).is_err());
    }

    #[test]
    fn test_clean_escape_chars() {
        assert_eq!(clean_escape_chars("1,234 56%", None), "123456");
        assert_eq!(
            clean_escape_chars("(9.87)", Some(vec!['(', ')'])),
            "9.87"
        );
    }
}
