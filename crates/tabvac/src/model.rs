//! Snapshot records for tabs and windows.
//!
//! Records are built by the host per query and consumed once by a planner.
//! Planners never mutate them; every plan is a freshly allocated value.

use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier, unique within a snapshot.
pub type TabId = i64;

/// Host-assigned window identifier, unique within a snapshot.
pub type WindowId = i64;

/// One open tab as seen by the host at query time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub id: TabId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub audible: bool,
    /// Milliseconds since the Unix epoch. Absent is treated as `0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<i64>,
    #[serde(default)]
    pub window_id: WindowId,
    /// Supplied from browsing history when ranking by visits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_count: Option<u64>,
    /// Derived from history; see [`crate::frecency::score`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frecency: Option<f64>,
}

impl TabRecord {
    /// Create a plain, unprotected tab with the given id and URL.
    pub fn new(id: TabId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window(mut self, window_id: WindowId) -> Self {
        self.window_id = window_id;
        self
    }

    pub fn with_last_accessed(mut self, at_ms: i64) -> Self {
        self.last_accessed = Some(at_ms);
        self
    }

    pub fn with_visit_count(mut self, count: u64) -> Self {
        self.visit_count = Some(count);
        self
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn audible(mut self) -> Self {
        self.audible = true;
        self
    }
}

/// One browser window with its tabs in host-visible order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    #[serde(default)]
    pub tabs: Vec<TabRecord>,
}

impl WindowRecord {
    /// Build a window, stamping each tab's `window_id` with this window's id.
    pub fn new(id: WindowId, tabs: Vec<TabRecord>) -> Self {
        let tabs = tabs
            .into_iter()
            .map(|tab| TabRecord {
                window_id: id,
                ..tab
            })
            .collect();
        Self { id, tabs }
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.iter().map(|t| t.id).collect()
    }
}
