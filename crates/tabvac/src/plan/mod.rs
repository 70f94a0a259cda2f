//! Planners: pure functions from a tab/window snapshot to a plan.
//!
//! Each planner returns a freshly allocated plan value plus a human-readable
//! summary. None of them talk to the host; applying a plan is the job of
//! [`Executor`](crate::host::Executor).
//!
//! 1. **[`duplicates`]**: groups tabs by normalized URL and picks survivors.
//! 2. **[`merge`]**: batches every other window's tabs into a target window.
//! 3. **[`sort`]**: reorders one window's unpinned tabs by one criterion.
//! 4. **[`stale`]**: closes tabs unused past a threshold without ever
//!    emptying a window.
//!
//! Relocation plans must be applied in order: every insertion index assumes
//! all earlier moves of the same plan have already happened.

pub mod duplicates;
pub mod merge;
pub mod sort;
pub mod stale;

use serde::{Deserialize, Serialize};

use crate::model::TabId;

pub use duplicates::find_duplicates;
pub use merge::{MergeMove, MergePlan, plan_merge};
pub use sort::{SortMove, SortPlan, plan_sort};
pub use stale::find_stale_tabs;

/// Tabs to close, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePlan {
    pub to_close: Vec<TabId>,
    pub message: String,
}

impl ClosePlan {
    pub fn is_empty(&self) -> bool {
        self.to_close.is_empty()
    }
}

/// `"1 tab"`, `"3 tabs"`, `"0 tabs"`.
pub(crate) fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
