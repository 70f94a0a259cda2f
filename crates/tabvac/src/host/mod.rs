//! The host collaborator: the browser (or anything standing in for it).
//!
//! Planners never touch the host. The [`Executor`] queries a [`TabHost`] for
//! a snapshot, runs the matching planner, and applies the resulting plan back
//! through the same trait. [`MemoryHost`] keeps the whole browser state in
//! memory and backs both the CLI and the tests.
//!
//! # Implementing a host
//!
//! ```ignore
//! struct Browser { /* handles */ }
//!
//! impl TabHost for Browser {
//!     fn query_tabs(&self, window: Option<WindowId>) -> HostFuture<'_, Vec<TabRecord>> {
//!         Box::pin(async move { /* ask the browser */ todo!() })
//!     }
//!     // ...
//! }
//! ```

pub mod executor;
pub mod memory;

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::model::{TabId, TabRecord, WindowId, WindowRecord};
use crate::settings::PartialSettings;

pub use executor::{Clock, Executor, Outcome};
pub use memory::{MemoryHost, Snapshot};

/// Boxed future returned by every [`TabHost`] call.
pub type HostFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, HostError>> + Send + 'a>>;

/// Browsing-history facts for one URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub visit_count: u64,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub last_visit_time: i64,
}

/// Everything the executor needs from the browser.
///
/// Implementations should treat every call as independent: the executor
/// ignores failures of individual close/move/remove calls and carries on.
pub trait TabHost: Send + Sync {
    /// Tabs in host order, optionally restricted to one window. Each record's
    /// `window_id` must be filled in.
    fn query_tabs(&self, window: Option<WindowId>) -> HostFuture<'_, Vec<TabRecord>>;

    /// All windows with their tabs.
    fn windows(&self) -> HostFuture<'_, Vec<WindowRecord>>;

    /// The focused window.
    fn current_window(&self) -> HostFuture<'_, WindowId>;

    /// History lookup for one URL. `None` when the URL was never visited.
    fn history(&self, url: &str) -> HostFuture<'_, Option<HistoryEntry>>;

    fn close_tabs(&self, ids: &[TabId]) -> HostFuture<'_, ()>;

    /// Move `ids` (in order) into `window`, the first landing at `index`.
    fn move_tabs(&self, ids: &[TabId], window: WindowId, index: usize) -> HostFuture<'_, ()>;

    fn remove_window(&self, id: WindowId) -> HostFuture<'_, ()>;

    /// The stored (possibly partial) settings record.
    fn load_settings(&self) -> HostFuture<'_, PartialSettings>;

    /// Overlay `settings` onto the stored record.
    fn save_settings(&self, settings: &PartialSettings) -> HostFuture<'_, ()>;

    /// Show a user-facing notification.
    fn notify(&self, message: &str) -> HostFuture<'_, ()>;
}
