use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use concat_string::concat_string;
use scraper::Html;

use crate::{
    crawler::{
        psx::{Psx, HOST},
        StockInfo,
    },
    declare::{Quote, QuoteSource},
    util::{self, http::element},
};

#[async_trait]
impl StockInfo for Psx {
    async fn get_stock_quotes(stock_symbol: &str) -> Result<Quote> {
        let url = concat_string!("https://", HOST, "/company/", stock_symbol);
        let text = util::http::get(&url, None).await?;
        let document = Html::parse_document(&text);

        Ok(parse_quote(stock_symbol, &document))
    }
}

/// Pulls the reduced field set out of a data portal company page. The
/// portal labels the previous close "LDCP" (last day closing price) in its
/// equity stats strip.
fn parse_quote(stock_symbol: &str, document: &Html) -> Quote {
    let name = element::select_text(document, "div.quote h1.quote__name")
        .unwrap_or_else(|| stock_symbol.to_string());
    let current_price = element::select_decimal(document, "div.quote div.quote__close");
    let change_percent =
        element::select_decimal(document, "div.quote div.quote__change span.change__percent");
    let previous_close =
        element::select_decimal(document, "div.stats div.stats_item--ldcp div.stats_value");
    let volume = element::select_i64(document, "div.stats div.stats_item--volume div.stats_value");

    Quote {
        symbol: stock_symbol.to_string(),
        name,
        current_price,
        previous_close,
        change_percent,
        volume,
        high_52_week: None,
        low_52_week: None,
        last_updated: Local::now(),
        source: QuoteSource::PsxDataPortal,
    }
}
