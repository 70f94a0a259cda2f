//! Tab housekeeping planner.
//!
//! `tabvac` decides, from a snapshot of open tabs and windows, which tabs to
//! close, which to move where, and in what order. It covers four operations:
//!
//! - **Duplicate cleanup** ([`plan::find_duplicates`]): one survivor per
//!   normalized URL, never closing a protected tab.
//! - **Window merging** ([`plan::plan_merge`]): batches every other window's
//!   tabs into a target window, preserving order.
//! - **Sorting** ([`plan::plan_sort`]): reorders a window's unpinned tabs by
//!   URL, title, last access, visit count, or frecency.
//! - **Stale-tab eviction** ([`plan::find_stale_tabs`]): closes tabs idle past
//!   a threshold without ever emptying a window.
//!
//! Planners are pure and total: `(snapshot, settings) -> plan + summary`.
//! Applying a plan is delegated to a [`TabHost`](host::TabHost) through the
//! [`Executor`](host::Executor), which tolerates individual host failures.
//!
//! # Example
//!
//! ```
//! use tabvac::prelude::*;
//!
//! let tabs = vec![
//!     TabRecord::new(1, "https://example.com/page"),
//!     TabRecord::new(2, "https://example.com/page/"),
//! ];
//! let plan = find_duplicates(&tabs, &Settings::default());
//! assert_eq!(plan.to_close, vec![2]);
//! assert_eq!(plan.message, "Closed 1 duplicate tab");
//! ```

pub mod command;
pub mod error;
pub mod frecency;
pub mod host;
pub mod model;
pub mod normalize;
pub mod plan;
pub mod policy;
pub mod prelude;
pub mod settings;

pub use command::Command;
pub use error::{Error, HostError, Result};
pub use model::{TabId, TabRecord, WindowId, WindowRecord};
pub use settings::{PartialSettings, Settings, SortCriteria, SortDirection, apply_defaults};
