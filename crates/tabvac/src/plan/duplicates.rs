//! Duplicate detection: one survivor per normalized URL.
//!
//! Protection always wins over deduplication. If any copy in a group is
//! protected, every protected copy stays and every unprotected copy closes.
//! Otherwise the first copy in snapshot order survives.

use std::collections::HashMap;

use tracing::debug;

use super::{ClosePlan, count_noun};
use crate::model::{TabId, TabRecord};
use crate::normalize::{NormalizeOptions, normalize};
use crate::policy::is_protected;
use crate::settings::Settings;

/// Select duplicate tabs to close across the whole snapshot.
///
/// Ids come out in group order (by first appearance of each URL key), then
/// in snapshot order within each group.
pub fn find_duplicates(tabs: &[TabRecord], settings: &Settings) -> ClosePlan {
    let options = NormalizeOptions::from(settings);

    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<&TabRecord>> = Vec::new();
    for tab in tabs {
        let key = normalize(&tab.url, options);
        let slot = *group_index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(tab);
    }

    let mut to_close: Vec<TabId> = Vec::new();
    for group in groups.iter().filter(|g| g.len() >= 2) {
        let (protected, unprotected): (Vec<&TabRecord>, Vec<&TabRecord>) =
            group.iter().copied().partition(|tab| is_protected(tab, settings));

        let keep_first = protected.is_empty();
        to_close.extend(
            unprotected
                .iter()
                .skip(usize::from(keep_first))
                .map(|tab| tab.id),
        );
    }

    debug!(
        tabs = tabs.len(),
        groups = groups.len(),
        closing = to_close.len(),
        "planned duplicate cleanup"
    );

    let message = if to_close.is_empty() {
        "No duplicate tabs found".to_string()
    } else {
        format!("Closed {}", count_noun(to_close.len(), "duplicate tab"))
    };

    ClosePlan { to_close, message }
}
