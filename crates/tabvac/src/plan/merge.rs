//! Window merging: consolidate every window into one target window.
//!
//! Each source window becomes a single batched move carrying all of its tab
//! ids, so the host makes one relocation call per window instead of one per
//! tab.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{TabId, WindowId, WindowRecord};

/// Move `tab_ids` (in order) into `window_id`, starting at `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeMove {
    pub tab_ids: Vec<TabId>,
    pub window_id: WindowId,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePlan {
    /// Applied strictly in order.
    pub moves: Vec<MergeMove>,
    /// Source windows to remove once all moves are applied.
    pub empty_window_ids: Vec<WindowId>,
    pub message: String,
}

impl MergePlan {
    fn noop(message: &str) -> Self {
        Self {
            moves: Vec::new(),
            empty_window_ids: Vec::new(),
            message: message.to_string(),
        }
    }

    /// Total number of tabs relocated by this plan.
    pub fn moved_tab_count(&self) -> usize {
        self.moves.iter().map(|m| m.tab_ids.len()).sum()
    }
}

/// Plan moving every tab of every other window into `target`.
///
/// The target's own tabs keep their positions; source windows' tabs follow
/// in window order, each window's tabs in their original order.
pub fn plan_merge(windows: &[WindowRecord], target: WindowId) -> MergePlan {
    let Some(target_window) = windows.iter().find(|w| w.id == target) else {
        return MergePlan::noop("Target window not found");
    };

    let sources: Vec<&WindowRecord> = windows.iter().filter(|w| w.id != target).collect();
    if sources.is_empty() {
        return MergePlan::noop("Only one window open");
    }

    let mut index = target_window.tabs.len();
    let mut moves = Vec::new();
    let mut empty_window_ids = Vec::with_capacity(sources.len());

    for source in &sources {
        if !source.tabs.is_empty() {
            moves.push(MergeMove {
                tab_ids: source.tab_ids(),
                window_id: target,
                index,
            });
            index += source.tabs.len();
        }
        empty_window_ids.push(source.id);
    }

    let total_windows = sources.len() + 1;
    // `index` has advanced past every placed tab.
    let total_tabs = index;
    debug!(
        target_window = target,
        windows = total_windows,
        tabs = total_tabs,
        moves = moves.len(),
        "planned window merge"
    );

    MergePlan {
        moves,
        empty_window_ids,
        message: format!("Merged {total_windows} windows ({total_tabs} tabs)"),
    }
}
