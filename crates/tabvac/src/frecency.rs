//! Frecency: one ranking value from visit frequency and recency.
//!
//! Uses the bucketed decay from Firefox's Places frecency: each visit is
//! worth a weight that depends on how long ago the page was last visited.
//! The score never decreases as visits grow and never increases as the last
//! visit ages.

use crate::settings::DAY_MS;

/// `(max age in days, weight)`, checked in order. Older visits fall through
/// to [`OLD_VISIT_WEIGHT`].
const RECENCY_BUCKETS: [(u64, f64); 4] = [(4, 100.0), (14, 70.0), (31, 50.0), (90, 30.0)];
const OLD_VISIT_WEIGHT: f64 = 10.0;

/// Score a page from its visit count and last visit time (ms since epoch).
///
/// A last visit in the future counts as "just now".
pub fn score(visit_count: u64, last_visit_time: i64, now: i64) -> f64 {
    if visit_count == 0 {
        return 0.0;
    }
    let elapsed_ms = now.saturating_sub(last_visit_time).max(0) as u64;
    let age_days = elapsed_ms / DAY_MS;
    visit_count as f64 * recency_weight(age_days)
}

fn recency_weight(age_days: u64) -> f64 {
    RECENCY_BUCKETS
        .iter()
        .find(|(max_days, _)| age_days <= *max_days)
        .map_or(OLD_VISIT_WEIGHT, |(_, weight)| *weight)
}
