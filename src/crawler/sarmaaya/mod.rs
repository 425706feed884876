//! # Sarmaaya crawler module
//!
//! Scrapes company pages on sarmaaya.pk, the primary quote source. The
//! company page carries the full field set: display name, current price,
//! previous close, change percent, volume and the 52-week high/low.
//!
//! Source domain: `sarmaaya.pk`, fetched over HTTP GET and parsed with CSS
//! selectors.

/// Current quote crawler
pub mod quote;

/// Sarmaaya host domain
const HOST: &str = "sarmaaya.pk";

/// Carrier struct for the `StockInfo` implementation.
pub struct Sarmaaya {}
