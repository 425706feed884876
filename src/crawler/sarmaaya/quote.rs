use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use concat_string::concat_string;
use rust_decimal::Decimal;
use scraper::Html;

use crate::{
    crawler::{
        sarmaaya::{Sarmaaya, HOST},
        StockInfo,
    },
    declare::{Quote, QuoteSource},
    util::{self, http::element},
};

#[async_trait]
impl StockInfo for Sarmaaya {
    async fn get_stock_quotes(stock_symbol: &str) -> Result<Quote> {
        let url = concat_string!("https://", HOST, "/psx/company/", stock_symbol);
        let text = util::http::get(&url, None).await?;
        let document = Html::parse_document(&text);

        Ok(parse_quote(stock_symbol, &document))
    }
}

/// Pulls the quote fields out of a company page.
///
/// Missing or non-numeric fields become zero rather than failing the whole
/// quote; the 52-week columns stay `None` when absent so the JSON omits
/// them instead of reporting a fake range.
fn parse_quote(stock_symbol: &str, document: &Html) -> Quote {
    let name = element::select_text(document, "div.company-header h4.company-name")
        .unwrap_or_else(|| stock_symbol.to_string());
    let current_price = element::select_decimal(document, "div.company-header span.company-price");
    let change_percent =
        element::select_decimal(document, "div.company-header span.company-price-change");
    let previous_close =
        element::select_decimal(document, "table.company-stats tr.stats-prev-close td.stats-value");
    let volume = element::select_i64(document, "table.company-stats tr.stats-volume td.stats-value");
    let high_52_week = select_optional_decimal(
        document,
        "table.company-stats tr.stats-52wk-high td.stats-value",
    );
    let low_52_week = select_optional_decimal(
        document,
        "table.company-stats tr.stats-52wk-low td.stats-value",
    );

    Quote {
        symbol: stock_symbol.to_string(),
        name,
        current_price,
        previous_close,
        change_percent,
        volume,
        high_52_week,
        low_52_week,
        last_updated: Local::now(),
        source: QuoteSource::Sarmaaya,
    }
}

/// An absent cell yields `None`; a present but unparseable one yields zero,
/// consistent with the required fields.
fn select_optional_decimal(document: &Html, css_selector: &str) -> Option<Decimal> {
    element::select_text(document, css_selector).map(|v| {
        util::text::parse_decimal(v.trim(), Some(vec!['(', ')']))
            .unwrap_or(Decimal::ZERO)
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::logging;

    const COMPANY_PAGE: &str = r#"
        <html><body>
        <div class="company-header">
            <h4 class="company-name">Oil &amp; Gas Development Company Limited</h4>
            <span class="company-price">118.50</span>
            <span class="company-price-change">(1.11%)</span>
        </div>
        <table class="company-stats">
            <tr class="stats-prev-close"><td class="stats-label">Previous Close</td><td class="stats-value">117.20</td></tr>
            <tr class="stats-volume"><td class="stats-label">Volume</td><td class="stats-value">5,432,100</td></tr>
            <tr class="stats-52wk-high"><td class="stats-label">52 Week High</td><td class="stats-value">150.75</td></tr>
            <tr class="stats-52wk-low"><td class="stats-label">52 Week Low</td><td class="stats-value">80.10</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parse_quote() {
        let document = Html::parse_document(COMPANY_PAGE);
        let quote = parse_quote("OGDC", &document);

        assert_eq!(quote.symbol, "OGDC");
        assert_eq!(quote.name, "Oil & Gas Development Company Limited");
        assert_eq!(quote.current_price, dec!(118.50));
        assert_eq!(quote.previous_close, dec!(117.20));
        assert_eq!(quote.change_percent, dec!(1.11));
        assert_eq!(quote.volume, 5_432_100);
        assert_eq!(quote.high_52_week, Some(dec!(150.75)));
        assert_eq!(quote.low_52_week, Some(dec!(80.10)));
        assert_eq!(quote.source, QuoteSource::Sarmaaya);
    }

    #[test]
    fn test_parse_quote_with_broken_markup_substitutes_zero() {
        let document = Html::parse_document("<html><body><p>maintenance</p></body></html>");
        let quote = parse_quote("OGDC", &document);

        // the name falls back to the symbol, every numeric field to zero
        assert_eq!(quote.name, "OGDC");
        assert_eq!(quote.current_price, dec!(0));
        assert_eq!(quote.previous_close, dec!(0));
        assert_eq!(quote.volume, 0);
        assert_eq!(quote.high_52_week, None);
        assert_eq!(quote.low_52_week, None);
    }

    #[tokio::test]
    #[ignore]
    async fn test_visit() {
        dotenv::dotenv().ok();

        match Sarmaaya::get_stock_quotes("OGDC").await {
            Ok(quote) => {
                dbg!(&quote);
            }
            Err(why) => {
                logging::debug_file_async(format!("Failed to visit because {:?}", why));
            }
        }
    }
}
