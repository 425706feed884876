use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use sqlx::postgres::PgQueryResult;

use crate::{
    database,
    declare::{Quote, QuoteSource},
};

/// Durable projection of a [`Quote`], keyed by symbol.
///
/// `sector`, `logo_url` and `is_shariah_compliant` are curated by hand in
/// the database; the crawler never writes them. Rows are created on the
/// first successful fetch for a symbol and upserted on every later one;
/// this subsystem never deletes them.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Stock {
    pub symbol: String,
    pub name: String,
    pub current_price: Decimal,
    pub previous_close: Decimal,
    pub change_percent: Decimal,
    pub volume: i64,
    pub high_52_week: Option<Decimal>,
    pub low_52_week: Option<Decimal>,
    pub sector: Option<String>,
    pub logo_url: Option<String>,
    pub is_shariah_compliant: bool,
    pub last_updated: DateTime<Local>,
}

impl Stock {
    /// Reads one stock row by symbol.
    ///
    /// # Errors
    /// Returns an error when the query fails; a missing row is `Ok(None)`.
    pub async fn fetch_one(symbol: &str) -> Result<Option<Stock>> {
        Ok(sqlx::query_as::<_, Stock>(
            r#"
SELECT
    symbol, name, current_price, previous_close, change_percent, volume,
    high_52_week, low_52_week, sector, logo_url, is_shariah_compliant, last_updated
FROM
    stocks
WHERE
    symbol = $1
"#,
        )
        .bind(symbol)
        .fetch_optional(database::get_connection())
        .await
        .context("Failed to fetch_one from stocks")?)
    }

    /// Inserts or updates the row for this symbol. Last write wins; the
    /// curated columns are left untouched on update, and a missing 52-week
    /// range never clobbers a previously stored one.
    ///
    /// # Errors
    /// Returns an error when the statement fails.
    pub async fn upsert(&self) -> Result<PgQueryResult> {
        sqlx::query(
            r#"
INSERT INTO stocks (
    symbol, name, current_price, previous_close, change_percent, volume,
    high_52_week, low_52_week, last_updated
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
ON CONFLICT (symbol) DO UPDATE SET
    name = EXCLUDED.name,
    current_price = EXCLUDED.current_price,
    previous_close = EXCLUDED.previous_close,
    change_percent = EXCLUDED.change_percent,
    volume = EXCLUDED.volume,
    high_52_week = COALESCE(EXCLUDED.high_52_week, stocks.high_52_week),
    low_52_week = COALESCE(EXCLUDED.low_52_week, stocks.low_52_week),
    last_updated = EXCLUDED.last_updated
"#,
        )
        .bind(&self.symbol)
        .bind(&self.name)
        .bind(self.current_price)
        .bind(self.previous_close)
        .bind(self.change_percent)
        .bind(self.volume)
        .bind(self.high_52_week)
        .bind(self.low_52_week)
        .bind(self.last_updated)
        .execute(database::get_connection())
        .await
        .context("Failed to upsert into stocks")
    }

    /// Re-projects the stored row as a quote for the read path.
    pub fn to_quote(&self) -> Quote {
        Quote {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            current_price: self.current_price,
            previous_close: self.previous_close,
            change_percent: self.change_percent,
            volume: self.volume,
            high_52_week: self.high_52_week,
            low_52_week: self.low_52_week,
            last_updated: self.last_updated,
            source: QuoteSource::LocalStore,
        }
    }
}

impl From<&Quote> for Stock {
    fn from(quote: &Quote) -> Self {
        Stock {
            symbol: quote.symbol.clone(),
            name: quote.name.clone(),
            current_price: quote.current_price,
            previous_close: quote.previous_close,
            change_percent: quote.change_percent,
            volume: quote.volume,
            high_52_week: quote.high_52_week,
            low_52_week: quote.low_52_week,
            sector: None,
            logo_url: None,
            is_shariah_compliant: false,
            last_updated: quote.last_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::logging;

    fn sample_quote(symbol: &str) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            name: "Test Instrument".to_string(),
            current_price: dec!(42.42),
            previous_close: dec!(41.00),
            change_percent: dec!(3.46),
            volume: 1000,
            high_52_week: Some(dec!(55.00)),
            low_52_week: Some(dec!(30.00)),
            last_updated: Local::now(),
            source: QuoteSource::Sarmaaya,
        }
    }

    #[test]
    fn test_stock_from_quote_leaves_curated_fields_empty() {
        let stock = Stock::from(&sample_quote("OGDC"));

        assert_eq!(stock.symbol, "OGDC");
        assert_eq!(stock.current_price, dec!(42.42));
        assert_eq!(stock.sector, None);
        assert_eq!(stock.logo_url, None);
        assert!(!stock.is_shariah_compliant);
    }

    #[test]
    fn test_to_quote_round_trip() {
        let quote = sample_quote("HUBC");
        let back = Stock::from(&quote).to_quote();

        assert_eq!(back.symbol, quote.symbol);
        assert_eq!(back.current_price, quote.current_price);
        assert_eq!(back.previous_close, quote.previous_close);
        assert_eq!(back.change_percent, quote.change_percent);
        assert_eq!(back.volume, quote.volume);
        assert_eq!(back.high_52_week, quote.high_52_week);
        assert_eq!(back.source, QuoteSource::LocalStore);
    }

    #[tokio::test]
    #[ignore]
    async fn test_upsert_and_fetch_one() {
        dotenv::dotenv().ok();

        let quote = sample_quote("ZZTEST");
        if let Err(why) = Stock::from(&quote).upsert().await {
            logging::error_file_async(format!("Failed to upsert because {:?}", why));
            return;
        }

        match Stock::fetch_one("ZZTEST").await {
            Ok(Some(stock)) => {
                assert_eq!(stock.current_price, quote.current_price);
                assert_eq!(stock.previous_close, quote.previous_close);
                assert_eq!(stock.volume, quote.volume);
            }
            Ok(None) => panic!("row missing after upsert"),
            Err(why) => {
                logging::error_file_async(format!("Failed to fetch_one because {:?}", why));
            }
        }
    }
}
