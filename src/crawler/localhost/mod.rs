use std::time::Duration;

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use reqwest::Client;

use crate::{config, declare::Quote};

/// Client for the loopback calls the batch path makes to this service's own
/// single-symbol endpoint. Deliberately separate from the upstream scraping
/// client: loopback requests must not hold the upstream politeness permits
/// while they wait on an inner fetch, and they get the batch's longer
/// per-symbol timeout.
static CLIENT: OnceCell<Client> = OnceCell::new();

/// Per-symbol budget for a batch fetch, including the inner scrape and its
/// possible fallback.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| anyhow!("Failed to create loopback client: {:?}", e))
    })
}

/// Fetches one symbol's quote through the service's own scrape endpoint, so
/// each symbol in a batch is independently retryable and independently
/// failable.
pub async fn fetch_quote(stock_symbol: &str) -> Result<Quote> {
    let url = format!(
        "http://127.0.0.1:{port}/api/scrape-stock?symbol={symbol}",
        port = config::SETTINGS.system.http_port,
        symbol = urlencoding::encode(stock_symbol)
    );
    let response = get_client()?.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!(
            "scrape-stock({}) returned status {}",
            stock_symbol,
            response.status()
        ));
    }

    response
        .json::<Quote>()
        .await
        .map_err(|e| anyhow!("Error parsing scrape-stock({}) JSON: {:?}", stock_symbol, e))
}
