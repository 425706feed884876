use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which upstream produced a quote. Observability only; the two scrape
/// sources are attempted in fixed priority order regardless.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuoteSource {
    /// sarmaaya.pk company pages (primary)
    Sarmaaya,
    /// dps.psx.com.pk data portal (fallback, no 52-week range)
    PsxDataPortal,
    /// served from the stocks table without a fetch
    LocalStore,
}

/// A point-in-time price/volume snapshot for one PSX ticker.
///
/// `last_updated` is stamped by the fetcher when the fetch completes and is
/// never taken from upstream page content. A numeric zero in any price field
/// doubles as "unavailable" (best-effort parsing substitutes zero when a
/// selector matches nothing or the matched text isn't numeric).
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    /// Display name; falls back to the symbol when the page carries none.
    pub name: String,
    pub current_price: Decimal,
    pub previous_close: Decimal,
    pub change_percent: Decimal,
    pub volume: i64,
    /// Primary source only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_52_week: Option<Decimal>,
    /// Primary source only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_52_week: Option<Decimal>,
    pub last_updated: DateTime<Local>,
    pub source: QuoteSource,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn sample_quote() -> Quote {
        Quote {
            symbol: "OGDC".to_string(),
            name: "Oil & Gas Development Company".to_string(),
            current_price: dec!(118.50),
            previous_close: dec!(117.20),
            change_percent: dec!(1.11),
            volume: 5_432_100,
            high_52_week: None,
            low_52_week: None,
            last_updated: Local::now(),
            source: QuoteSource::PsxDataPortal,
        }
    }

    #[test]
    fn test_quote_serializes_camel_case() {
        let json = serde_json::to_value(sample_quote()).unwrap();

        assert_eq!(json["symbol"], "OGDC");
        assert_eq!(json["currentPrice"], "118.50");
        assert_eq!(json["previousClose"], "117.20");
        assert_eq!(json["changePercent"], "1.11");
        assert_eq!(json["volume"], 5_432_100);
        assert_eq!(json["source"], "psx_data_portal");
        // fallback quotes omit the 52-week range rather than emitting nulls
        assert!(json.get("high52Week").is_none());
        assert!(json.get("low52Week").is_none());
        // lastUpdated is an ISO-8601 string
        assert!(json["lastUpdated"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_quote_52_week_range_present_when_set() {
        let mut quote = sample_quote();
        quote.high_52_week = Some(dec!(150.75));
        quote.low_52_week = Some(dec!(80.10));
        quote.source = QuoteSource::Sarmaaya;

        let json = serde_json::to_value(&quote).unwrap();

        assert_eq!(json["high52Week"], "150.75");
        assert_eq!(json["low52Week"], "80.10");
        assert_eq!(json["source"], "sarmaaya");
    }

    #[test]
    fn test_quote_round_trips_through_json() {
        let quote = sample_quote();
        let text = serde_json::to_string(&quote).unwrap();
        let back: Quote = serde_json::from_str(&text).unwrap();

        assert_eq!(back.symbol, quote.symbol);
        assert_eq!(back.current_price, quote.current_price);
        assert_eq!(back.volume, quote.volume);
        assert_eq!(back.high_52_week, None);
        assert_eq!(back.source, QuoteSource::PsxDataPortal);
    }
}
