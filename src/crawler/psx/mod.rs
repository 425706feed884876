//! # PSX data portal crawler module
//!
//! Scrapes the exchange's own data disclosure pages (dps.psx.com.pk), used
//! as the fallback when sarmaaya is unreachable or returns broken markup.
//! The portal carries a reduced field set: no 52-week range.

/// Current quote crawler
pub mod quote;

/// PSX data portal host domain
const HOST: &str = "dps.psx.com.pk";

/// Carrier struct for the `StockInfo` implementation.
pub struct Psx {}
