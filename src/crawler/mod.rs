use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::{
    crawler::{psx::Psx, sarmaaya::Sarmaaya},
    declare, logging,
};

/// Internal call path back into this service's own API
pub mod localhost;
/// PSX data disclosure portal (fallback source)
pub mod psx;
/// Sarmaaya stocks research portal (primary source)
pub mod sarmaaya;

#[async_trait]
pub trait StockInfo {
    async fn get_stock_quotes(stock_symbol: &str) -> Result<declare::Quote>;
}

/// Fetches the current quote for a symbol, primary source first.
///
/// The fallback is attempted exactly once, and only after the primary has
/// failed; when both fail the error names the symbol and carries the last
/// underlying cause.
pub async fn fetch_stock_quotes_from_remote_site(stock_symbol: &str) -> Result<declare::Quote> {
    match Sarmaaya::get_stock_quotes(stock_symbol).await {
        Ok(quote) => Ok(quote),
        Err(why) => {
            logging::warn_file_async(format!(
                "Failed to fetch stock quotes({}) from sarmaaya, trying the data portal: {:?}",
                stock_symbol, why
            ));

            Psx::get_stock_quotes(stock_symbol).await.map_err(|why| {
                anyhow!(
                    "Failed to fetch stock quotes({}) from all sites; last error: {:?}",
                    stock_symbol,
                    why
                )
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging;

    #[tokio::test]
    #[ignore]
    async fn test_fetch_stock_quotes_from_remote_site() {
        dotenv::dotenv().ok();

        match fetch_stock_quotes_from_remote_site("OGDC").await {
            Ok(quote) => {
                dbg!(&quote);
            }
            Err(why) => {
                logging::debug_file_async(format!(
                    "Failed to fetch_stock_quotes because {:?}",
                    why
                ));
            }
        }
    }
}
