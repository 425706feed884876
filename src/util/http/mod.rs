use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{header, Client, Method, Response};
use tokio::sync::Semaphore;

use crate::logging::Logger;

pub mod element;
pub mod user_agent;

/// Limits concurrent upstream requests so a batch refresh doesn't hammer
/// the quote sites into banning us.
static SEMAPHORE: Lazy<Semaphore> = Lazy::new(|| Semaphore::new(5));

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("http"));

/// Returns the reqwest client singleton instance or creates one if it
/// doesn't exist.
///
/// Both connect and total timeouts are capped at ten seconds; a source that
/// can't answer inside that window is treated as failed and the caller moves
/// on to its fallback.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .brotli(true)
            .gzip(true)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            .pool_max_idle_per_host(20)
            .pool_idle_timeout(Duration::from_secs(90))
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .referer(true)
            .user_agent(user_agent::gen_random_ua())
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Performs an HTTP GET request and returns the response as text.
///
/// # Errors
/// Fails when the request errors, the status is non-2xx, or the body can't
/// be read as text.
pub async fn get(url: &str, headers: Option<header::HeaderMap>) -> Result<String> {
    get_response(url, headers)
        .await?
        .text()
        .await
        .map_err(|e| anyhow!("Error parsing response text: {:?}", e))
}

pub async fn get_response(url: &str, headers: Option<header::HeaderMap>) -> Result<Response> {
    send(Method::GET, url, headers).await
}

/// Sends a single HTTP request under the politeness semaphore.
///
/// There is no retry here: a failed or timed-out request surfaces
/// immediately so the caller can fall back to its secondary source. A non-2xx
/// status is an error for the same reason.
async fn send(method: Method, url: &str, headers: Option<header::HeaderMap>) -> Result<Response> {
    let visit_log = format!("{method}:{url}");
    let client = get_client()?;
    let mut rb = client.request(method, url);

    if let Some(h) = headers {
        rb = rb.headers(h);
    }

    let permit = SEMAPHORE.acquire().await;
    let start = Instant::now();
    let res = rb.send().await;
    let elapsed = start.elapsed().as_millis();
    drop(permit);

    match res {
        Ok(response) => {
            if !response.status().is_success() {
                LOGGER.error(format!(
                    "{} returned {} in {} ms",
                    visit_log,
                    response.status(),
                    elapsed
                ));
                return Err(anyhow!(
                    "Request to {} returned status {}",
                    url,
                    response.status()
                ));
            }

            LOGGER.info(format!("{} {} ms", visit_log, elapsed));
            Ok(response)
        }
        Err(why) => {
            LOGGER.error(format!("{} failed because {:?}. {} ms", visit_log, why, elapsed));
            Err(anyhow!("Failed to send request to {}: {:?}", url, why))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn test_get() {
        dotenv::dotenv().ok();

        match get("https://dps.psx.com.pk/", None).await {
            Ok(body) => {
                crate::logging::debug_file_async(format!("fetched {} bytes", body.len()));
            }
            Err(why) => {
                crate::logging::error_file_async(format!("Failed to get because {:?}", why));
            }
        }
    }
}
