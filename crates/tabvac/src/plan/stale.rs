//! Stale-tab eviction: close tabs unused past a threshold.
//!
//! Candidates are evaluated in snapshot order. A candidate is spared when
//! closing it would leave its window with no tabs, so within a window the
//! earliest stale tabs close first and the last survivor is always kept.

use std::collections::HashMap;

use tracing::debug;

use super::{ClosePlan, count_noun};
use crate::model::{TabId, TabRecord, WindowId};
use crate::policy::is_protected;
use crate::settings::{DAY_MS, Settings};

/// Select stale tabs to close as of `now` (ms since epoch).
///
/// A tab is stale when `now - last_accessed >= threshold`; a missing
/// `last_accessed` counts as the epoch.
pub fn find_stale_tabs(tabs: &[TabRecord], settings: &Settings, now: i64) -> ClosePlan {
    let threshold = settings.effective_stale_threshold_ms();
    let threshold_ms = i64::try_from(threshold).unwrap_or(i64::MAX);

    let mut window_sizes: HashMap<WindowId, usize> = HashMap::new();
    for tab in tabs {
        *window_sizes.entry(tab.window_id).or_default() += 1;
    }

    let mut closing_per_window: HashMap<WindowId, usize> = HashMap::new();
    let mut to_close: Vec<TabId> = Vec::new();
    let mut spared = 0usize;

    for tab in tabs {
        if is_protected(tab, settings) {
            continue;
        }
        let idle = now.saturating_sub(tab.last_accessed.unwrap_or(0));
        if idle < threshold_ms {
            continue;
        }

        let closing = closing_per_window.entry(tab.window_id).or_default();
        let size = window_sizes.get(&tab.window_id).copied().unwrap_or(0);
        if size.saturating_sub(*closing + 1) == 0 {
            spared += 1;
            continue;
        }

        *closing += 1;
        to_close.push(tab.id);
    }

    debug!(
        tabs = tabs.len(),
        threshold_ms = threshold,
        closing = to_close.len(),
        spared,
        "planned stale tab cleanup"
    );

    let message = if to_close.is_empty() {
        "No stale tabs found".to_string()
    } else {
        let days = (threshold as f64 / DAY_MS as f64).round() as usize;
        format!(
            "Closed {} not accessed in {}",
            count_noun(to_close.len(), "tab"),
            count_noun(days, "day")
        )
    };

    ClosePlan { to_close, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::HOUR_MS;

    const NOW: i64 = 1_700_000_000_000;
    const SEVEN_DAYS: i64 = 7 * DAY_MS as i64;

    fn tab(id: TabId, window: WindowId, last_accessed: i64) -> TabRecord {
        TabRecord::new(id, format!("https://example.com/{id}"))
            .with_window(window)
            .with_last_accessed(last_accessed)
    }

    #[test]
    fn closes_stale_tab() {
        let tabs = vec![tab(1, 1, NOW - SEVEN_DAYS - 1000), tab(2, 1, NOW - 1000)];
        let plan = find_stale_tabs(&tabs, &Settings::default(), NOW);
        assert_eq!(plan.to_close, vec![1]);
        assert_eq!(plan.message, "Closed 1 tab not accessed in 7 days");
    }

    #[test]
    fn protected_tabs_are_skipped() {
        let stale = NOW - SEVEN_DAYS - 1000;
        for protected in [
            tab(1, 1, stale).active(),
            tab(1, 1, stale).pinned(),
            tab(1, 1, stale).audible(),
        ] {
            let tabs = vec![protected, tab(2, 1, NOW - 1000)];
            let plan = find_stale_tabs(&tabs, &Settings::default(), NOW);
            assert!(plan.to_close.is_empty());
        }
    }

    #[test]
    fn pinned_closes_when_not_skipped() {
        let settings = Settings {
            skip_pinned: false,
            ..Default::default()
        };
        let tabs = vec![tab(1, 1, 0).pinned(), tab(2, 1, NOW)];
        assert_eq!(find_stale_tabs(&tabs, &settings, NOW).to_close, vec![1]);
    }

    #[test]
    fn never_closes_last_tab_in_window() {
        let tabs = vec![tab(1, 1, NOW - SEVEN_DAYS - 1000)];
        let plan = find_stale_tabs(&tabs, &Settings::default(), NOW);
        assert!(plan.to_close.is_empty());
        assert_eq!(plan.message, "No stale tabs found");
    }

    #[test]
    fn last_stale_tab_in_window_is_spared() {
        let tabs = vec![tab(1, 1, 0), tab(2, 1, 0), tab(3, 1, 0), tab(4, 2, 0), tab(5, 2, NOW)];
        let plan = find_stale_tabs(&tabs, &Settings::default(), NOW);
        assert_eq!(plan.to_close, vec![1, 2, 4]);
    }

    #[test]
    fn missing_last_accessed_is_always_stale() {
        let tabs = vec![
            TabRecord::new(1, "https://a.com").with_window(1),
            tab(2, 1, NOW),
        ];
        let plan = find_stale_tabs(&tabs, &Settings::default(), NOW);
        assert_eq!(plan.to_close, vec![1]);
    }

    #[test]
    fn none_stale() {
        let tabs = vec![tab(1, 1, NOW - 1000), tab(2, 1, NOW - 2000)];
        let plan = find_stale_tabs(&tabs, &Settings::default(), NOW);
        assert!(plan.to_close.is_empty());
        assert_eq!(plan.message, "No stale tabs found");
    }

    #[test]
    fn exactly_at_threshold_is_stale() {
        let tabs = vec![tab(1, 1, NOW - SEVEN_DAYS), tab(2, 1, NOW - 1000)];
        let plan = find_stale_tabs(&tabs, &Settings::default(), NOW);
        assert_eq!(plan.to_close, vec![1]);
    }

    #[test]
    fn just_under_threshold_is_fresh() {
        let tabs = vec![tab(1, 1, NOW - SEVEN_DAYS + 1), tab(2, 1, NOW - 1000)];
        let plan = find_stale_tabs(&tabs, &Settings::default(), NOW);
        assert!(plan.to_close.is_empty());
    }

    #[test]
    fn message_rounds_threshold_to_days() {
        let settings = Settings {
            stale_threshold_ms: 36 * HOUR_MS,
            ..Default::default()
        };
        let tabs = vec![tab(1, 1, 0), tab(2, 1, 0), tab(3, 1, NOW)];
        let plan = find_stale_tabs(&tabs, &settings, NOW);
        assert_eq!(plan.message, "Closed 2 tabs not accessed in 2 days");

        let settings = Settings {
            stale_threshold_ms: DAY_MS,
            ..Default::default()
        };
        let tabs = vec![tab(1, 1, 0), tab(3, 1, NOW)];
        let plan = find_stale_tabs(&tabs, &settings, NOW);
        assert_eq!(plan.message, "Closed 1 tab not accessed in 1 day");
    }
}
