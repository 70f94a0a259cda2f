//! Convenience re-exports for common `tabvac` types.
//!
//! ```ignore
//! use tabvac::prelude::*;
//! ```
//!
//! Pulls in the snapshot records, settings, every planner with its plan
//! type, and the host/executor pair. Routing tables (`MENU_ITEMS`,
//! `SHORTCUTS`) and threshold display helpers live in their modules.

// ── Snapshot & settings ─────────────────────────────────────────────
pub use crate::model::{TabId, TabRecord, WindowId, WindowRecord};
pub use crate::settings::{PartialSettings, Settings, SortCriteria, SortDirection, apply_defaults};

// ── Planners ────────────────────────────────────────────────────────
pub use crate::frecency::score as frecency_score;
pub use crate::normalize::{NormalizeOptions, normalize};
pub use crate::plan::{
    ClosePlan, MergeMove, MergePlan, SortMove, SortPlan, find_duplicates, find_stale_tabs,
    plan_merge, plan_sort,
};
pub use crate::policy::is_protected;

// ── Wiring ──────────────────────────────────────────────────────────
pub use crate::command::Command;
pub use crate::error::{Error, HostError, Result};
pub use crate::host::{
    Clock, Executor, HistoryEntry, HostFuture, MemoryHost, Outcome, Snapshot, TabHost,
};
