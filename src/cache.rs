//! Freshness gate for persisted quotes.
//!
//! The read path serves a stored stock row as long as its `last_updated`
//! stamp is younger than the configured window; anything older (or a row
//! that was never stamped) forces a re-scrape. Future-dated stamps count as
//! fresh: a skewed clock yields a negative elapsed time, which is below any
//! positive window. That is the documented policy, not an oversight.

use chrono::{DateTime, Local};

/// Default freshness window in minutes.
pub const DEFAULT_MAX_AGE_MINUTES: i64 = 30;

/// Returns true when `last_updated` is strictly younger than
/// `max_age_minutes`. `None` is never fresh. Exactly `max_age_minutes`
/// elapsed is stale.
pub fn is_fresh(last_updated: Option<DateTime<Local>>, max_age_minutes: i64) -> bool {
    match last_updated {
        Some(ts) => (Local::now() - ts).num_minutes() < max_age_minutes,
        None => false,
    }
}
