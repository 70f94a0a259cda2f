//! Tab sorting within one window.
//!
//! Pinned tabs keep their prefix; only unpinned tabs are reordered. The sort
//! is stable, so tabs with equal keys keep their relative order.
//!
//! The numeric criteria read "best first" in the default direction:
//! `Asc` puts the most recently accessed, most visited, or highest frecency
//! tab first. `Desc` reverses whatever the criteria produced.

use std::cmp::Ordering;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::count_noun;
use crate::model::{TabId, TabRecord};
use crate::settings::{SortCriteria, SortDirection};

/// Move `tab_id` to `index` within its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortMove {
    pub tab_id: TabId,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPlan {
    /// Applied strictly in order.
    pub moves: Vec<SortMove>,
    pub message: String,
}

/// Plan the moves that put one window's unpinned tabs in sorted order.
pub fn plan_sort(tabs: &[TabRecord], criteria: SortCriteria, direction: SortDirection) -> SortPlan {
    let pinned_count = tabs.iter().filter(|t| t.pinned).count();
    let mut unpinned: Vec<&TabRecord> = tabs.iter().filter(|t| !t.pinned).collect();

    let text = TextOrder::root();
    unpinned.sort_by(|a, b| {
        let ordering = compare(a, b, criteria, &text);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let moves: Vec<SortMove> = unpinned
        .iter()
        .enumerate()
        .map(|(offset, tab)| SortMove {
            tab_id: tab.id,
            index: pinned_count + offset,
        })
        .collect();

    debug!(
        criteria = criteria.as_str(),
        direction = direction.as_str(),
        pinned = pinned_count,
        moves = moves.len(),
        "planned tab sort"
    );

    let message = format!(
        "Sorted {} by {}",
        count_noun(moves.len(), "tab"),
        criteria.label()
    );
    SortPlan { moves, message }
}

fn compare(a: &TabRecord, b: &TabRecord, criteria: SortCriteria, text: &TextOrder) -> Ordering {
    match criteria {
        SortCriteria::Url => text.compare(&a.url, &b.url),
        SortCriteria::Title => text.compare(&a.title, &b.title),
        // Inverted: larger values first.
        SortCriteria::LastAccessed => b
            .last_accessed
            .unwrap_or(0)
            .cmp(&a.last_accessed.unwrap_or(0)),
        SortCriteria::VisitCount => b.visit_count.unwrap_or(0).cmp(&a.visit_count.unwrap_or(0)),
        SortCriteria::Frecency => b
            .frecency
            .unwrap_or(0.0)
            .total_cmp(&a.frecency.unwrap_or(0.0)),
    }
}

/// Root-locale collation, the order a browser's `localeCompare` produces
/// without an explicit locale: accents and case only break ties, and
/// punctuation sorts before digits before letters.
struct TextOrder(Option<CollatorBorrowed<'static>>);

impl TextOrder {
    fn root() -> Self {
        match Collator::try_new(Default::default(), CollatorOptions::default()) {
            Ok(collator) => Self(Some(collator)),
            Err(e) => {
                warn!(error = %e, "collation data unavailable, comparing code points");
                Self(None)
            }
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.0 {
            Some(collator) => collator.compare(a, b),
            None => a.cmp(b),
        }
    }
}
