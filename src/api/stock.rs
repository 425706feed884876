use std::{collections::HashMap, time::Duration};

use anyhow::Result;
use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures::future::join_all;
use serde::Deserialize;
use serde_json::json;

use crate::{
    cache, config, crawler,
    crawler::localhost,
    database::table::stock::Stock,
    declare::Quote,
    logging,
};

/// Gap between consecutive batch fetch starts; task `i` is released no
/// earlier than `i` times this after batch start.
const STAGGER: Duration = Duration::from_millis(100);

/// `GET /api/scrape-stock?symbol=<SYMBOL>`
///
/// Serves the stored row while it is still inside the freshness window;
/// otherwise scrapes, writes back and returns the fresh quote. A failed
/// write-back is logged and does not fail the request.
pub async fn scrape_stock(Query(params): Query<HashMap<String, String>>) -> Response {
    let symbol = params
        .get("symbol")
        .map(|s| s.trim().to_uppercase())
        .unwrap_or_default();

    if symbol.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Symbol parameter required" })),
        )
            .into_response();
    }

    match quote_for(&symbol).await {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(why) => {
            logging::error_file_async(format!(
                "Failed to scrape stock({}) because {:?}",
                symbol, why
            ));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to fetch quote for {}", symbol),
                    "symbol": symbol,
                })),
            )
                .into_response()
        }
    }
}

/// The read path behind [`scrape_stock`]: freshness gate first, scrape on
/// miss, upsert back. A store read failure is logged and treated as stale
/// rather than failing the request.
async fn quote_for(symbol: &str) -> Result<Quote> {
    match Stock::fetch_one(symbol).await {
        Ok(Some(stock))
            if cache::is_fresh(
                Some(stock.last_updated),
                config::SETTINGS.scraper.max_age_minutes,
            ) =>
        {
            return Ok(stock.to_quote());
        }
        Ok(_) => {}
        Err(why) => {
            logging::warn_file_async(format!(
                "Failed to read stock row({}), treating as stale: {:?}",
                symbol, why
            ));
        }
    }

    let quote = crawler::fetch_stock_quotes_from_remote_site(symbol).await?;
    logging::info_file_async(format!("Fetched quote({}) from {}", symbol, quote.source));

    if let Err(why) = Stock::from(&quote).upsert().await {
        logging::error_file_async(format!(
            "Failed to upsert stock row({}) because {:?}",
            symbol, why
        ));
    }

    Ok(quote)
}

#[derive(Deserialize, Debug)]
pub struct ScrapeAllRequest {
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// `POST /api/scrape-all-stocks` with body `{"symbols": [..]}`.
///
/// Fans out one loopback fetch per symbol, staggered by a fixed per-index
/// delay. A symbol that times out or errors becomes a gap in `data`, never
/// a batch failure; `count` is the number of survivors and `total` the
/// number requested.
pub async fn scrape_all_stocks(payload: Option<Json<serde_json::Value>>) -> Response {
    // a missing body, a non-object body or a non-array `symbols` all count
    // as "no symbols requested"
    let symbols = payload
        .and_then(|Json(value)| serde_json::from_value::<ScrapeAllRequest>(value).ok())
        .map(|req| req.symbols)
        .unwrap_or_default();

    if symbols.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Symbols array required" })),
        )
            .into_response();
    }

    match refresh_all(symbols).await {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(why) => {
            logging::error_file_async(format!("Failed to scrape all stocks because {:?}", why));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to refresh stocks" })),
            )
                .into_response()
        }
    }
}

/// Runs the fan-out and aggregates the surviving quotes.
async fn refresh_all(symbols: Vec<String>) -> Result<serde_json::Value> {
    let total = symbols.len();
    let tasks: Vec<_> = symbols
        .into_iter()
        .enumerate()
        .map(|(i, symbol)| {
            let symbol = symbol.trim().to_uppercase();
            tokio::spawn(async move {
                tokio::time::sleep(STAGGER * i as u32).await;

                match tokio::time::timeout(localhost::FETCH_TIMEOUT, localhost::fetch_quote(&symbol))
                    .await
                {
                    Ok(Ok(quote)) => Some(quote),
                    Ok(Err(why)) => {
                        logging::error_file_async(format!(
                            "Failed to refresh stock({}) because {:?}",
                            symbol, why
                        ));
                        None
                    }
                    Err(_) => {
                        logging::error_file_async(format!(
                            "Failed to refresh stock({}) because the fetch timed out",
                            symbol
                        ));
                        None
                    }
                }
            })
        })
        .collect();

    let data: Vec<Quote> = join_all(tasks)
        .await
        .into_iter()
        .filter_map(|outcome| match outcome {
            Ok(quote) => quote,
            Err(why) => {
                logging::error_file_async(format!("Refresh task panicked: {:?}", why));
                None
            }
        })
        .collect();

    Ok(json!({
        "success": true,
        "count": data.len(),
        "total": total,
        "data": data,
    }))
}

/// Bare OPTIONS (non-preflight) gets an empty 200; real CORS preflights are
/// answered by the `CorsLayer` before reaching here.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scrape_stock_requires_symbol() {
        let response = scrape_stock(Query(HashMap::new())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut params = HashMap::new();
        params.insert("symbol".to_string(), "   ".to_string());
        let response = scrape_stock(Query(params)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_scrape_all_stocks_requires_symbols() {
        let response = scrape_all_stocks(Some(Json(json!({ "symbols": [] })))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // `symbols` present but not an array
        let response = scrape_all_stocks(Some(Json(json!({ "symbols": "OGDC" })))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // a missing body behaves like a missing array
        let response = scrape_all_stocks(None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let response = method_not_allowed().await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_stagger_offsets_grow_per_index() {
        assert_eq!(STAGGER * 0, Duration::from_millis(0));
        assert_eq!(STAGGER * 4, Duration::from_millis(400));
    }
}
