//! In-memory host that behaves like a browser.
//!
//! Closing or moving the last tab out of a window closes that window, the
//! same way browsers do. That is why merge plans tolerate `remove_window`
//! failures: by the time the executor removes a drained window, the host may
//! already have dropped it.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{HistoryEntry, HostFuture, TabHost};
use crate::error::{Error, HostError, Result};
use crate::model::{TabId, TabRecord, WindowId, WindowRecord};
use crate::settings::PartialSettings;

/// Complete browser state: windows, focus, history, and stored settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub windows: Vec<WindowRecord>,
    /// Focused window. Defaults to the first window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_window: Option<WindowId>,
    /// History keyed by exact URL.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub history: BTreeMap<String, HistoryEntry>,
    #[serde(default)]
    pub settings: PartialSettings,
}

impl Snapshot {
    /// Build a snapshot from windows, stamping tab window ids.
    pub fn new(windows: Vec<WindowRecord>) -> Self {
        Self {
            windows,
            ..Default::default()
        }
        .stamped()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json).map_err(|source| Error::Json {
            what: "snapshot".to_string(),
            source,
        })?;
        Ok(snapshot.stamped())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn with_current_window(mut self, id: WindowId) -> Self {
        self.current_window = Some(id);
        self
    }

    pub fn with_history(mut self, url: impl Into<String>, entry: HistoryEntry) -> Self {
        self.history.insert(url.into(), entry);
        self
    }

    pub fn with_settings(mut self, settings: PartialSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Every tab across all windows, in window then tab order.
    pub fn all_tabs(&self) -> Vec<TabRecord> {
        self.windows
            .iter()
            .flat_map(|w| w.tabs.iter().cloned())
            .collect()
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Recorded focus, or the first window when none is recorded.
    pub fn focused_window(&self) -> Option<WindowId> {
        self.current_window
            .or_else(|| self.windows.first().map(|w| w.id))
    }

    // Window ids in the file may disagree with the containing window.
    fn stamped(mut self) -> Self {
        for window in &mut self.windows {
            for tab in &mut window.tabs {
                tab.window_id = window.id;
            }
        }
        self
    }

    fn locate(&self, tab_id: TabId) -> Option<(usize, usize)> {
        self.windows.iter().enumerate().find_map(|(w, window)| {
            window
                .tabs
                .iter()
                .position(|t| t.id == tab_id)
                .map(|t| (w, t))
        })
    }

    fn take_tab(&mut self, tab_id: TabId) -> Option<TabRecord> {
        let (w, t) = self.locate(tab_id)?;
        Some(self.windows[w].tabs.remove(t))
    }

    /// Drop windows emptied by a mutation, except `keep`.
    fn drop_drained(&mut self, touched: &HashSet<WindowId>, keep: Option<WindowId>) {
        self.windows.retain(|w| {
            let drained = w.tabs.is_empty() && touched.contains(&w.id) && Some(w.id) != keep;
            if drained {
                debug!(window = w.id, "window closed after losing its last tab");
            }
            !drained
        });
    }
}

#[derive(Debug, Default)]
struct HostState {
    snapshot: Snapshot,
    notifications: Vec<String>,
    failing_history: HashSet<String>,
}

/// A [`TabHost`] backed by a [`Snapshot`] held in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<HostState>,
}

impl MemoryHost {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            state: Mutex::new(HostState {
                snapshot: snapshot.stamped(),
                ..Default::default()
            }),
        }
    }

    /// Make history lookups for `url` fail.
    pub fn fail_history_for(self, url: impl Into<String>) -> Self {
        self.with_state(|s| {
            s.failing_history.insert(url.into());
        });
        self
    }

    /// Current state of the simulated browser.
    pub fn snapshot(&self) -> Snapshot {
        self.with_state(|s| s.snapshot.clone())
    }

    /// Notifications shown so far, oldest first.
    pub fn notifications(&self) -> Vec<String> {
        self.with_state(|s| s.notifications.clone())
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut HostState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    fn close(&self, ids: Vec<TabId>) -> Result<(), HostError> {
        self.with_state(|s| {
            let mut touched = HashSet::new();
            let mut missing = None;
            for id in ids {
                match s.snapshot.take_tab(id) {
                    Some(tab) => {
                        touched.insert(tab.window_id);
                    }
                    None => {
                        missing.get_or_insert(id);
                    }
                }
            }
            s.snapshot.drop_drained(&touched, None);
            match missing {
                Some(id) => Err(HostError::TabNotFound(id)),
                None => Ok(()),
            }
        })
    }

    fn relocate(&self, ids: Vec<TabId>, window: WindowId, index: usize) -> Result<(), HostError> {
        self.with_state(|s| {
            let snapshot = &mut s.snapshot;
            if snapshot.window(window).is_none() {
                return Err(HostError::WindowNotFound(window));
            }
            if let Some(&id) = ids.iter().find(|id| snapshot.locate(**id).is_none()) {
                return Err(HostError::TabNotFound(id));
            }

            let mut touched = HashSet::new();
            let moving: Vec<TabRecord> = ids
                .iter()
                .filter_map(|id| snapshot.take_tab(*id))
                .map(|tab| {
                    touched.insert(tab.window_id);
                    TabRecord {
                        window_id: window,
                        ..tab
                    }
                })
                .collect();

            if let Some(target) = snapshot.windows.iter_mut().find(|w| w.id == window) {
                let at = index.min(target.tabs.len());
                target.tabs.splice(at..at, moving);
            }
            snapshot.drop_drained(&touched, Some(window));
            Ok(())
        })
    }
}

impl TabHost for MemoryHost {
    fn query_tabs(&self, window: Option<WindowId>) -> HostFuture<'_, Vec<TabRecord>> {
        let result = self.with_state(|s| match window {
            None => Ok(s.snapshot.all_tabs()),
            Some(id) => s
                .snapshot
                .window(id)
                .map(|w| w.tabs.clone())
                .ok_or(HostError::WindowNotFound(id)),
        });
        Box::pin(async move { result })
    }

    fn windows(&self) -> HostFuture<'_, Vec<WindowRecord>> {
        let windows = self.with_state(|s| s.snapshot.windows.clone());
        Box::pin(async move { Ok(windows) })
    }

    fn current_window(&self) -> HostFuture<'_, WindowId> {
        let focused = self.with_state(|s| s.snapshot.focused_window());
        Box::pin(async move { focused.ok_or(HostError::NoCurrentWindow) })
    }

    fn history(&self, url: &str) -> HostFuture<'_, Option<HistoryEntry>> {
        let result = self.with_state(|s| {
            if s.failing_history.contains(url) {
                Err(HostError::Other(format!("history unavailable for {url}")))
            } else {
                Ok(s.snapshot.history.get(url).copied())
            }
        });
        Box::pin(async move { result })
    }

    fn close_tabs(&self, ids: &[TabId]) -> HostFuture<'_, ()> {
        let ids = ids.to_vec();
        Box::pin(async move { self.close(ids) })
    }

    fn move_tabs(&self, ids: &[TabId], window: WindowId, index: usize) -> HostFuture<'_, ()> {
        let ids = ids.to_vec();
        Box::pin(async move { self.relocate(ids, window, index) })
    }

    fn remove_window(&self, id: WindowId) -> HostFuture<'_, ()> {
        Box::pin(async move {
            self.with_state(|s| {
                let before = s.snapshot.windows.len();
                s.snapshot.windows.retain(|w| w.id != id);
                if s.snapshot.windows.len() == before {
                    Err(HostError::WindowNotFound(id))
                } else {
                    Ok(())
                }
            })
        })
    }

    fn load_settings(&self) -> HostFuture<'_, PartialSettings> {
        let settings = self.with_state(|s| s.snapshot.settings.clone());
        Box::pin(async move { Ok(settings) })
    }

    fn save_settings(&self, settings: &PartialSettings) -> HostFuture<'_, ()> {
        self.with_state(|s| s.snapshot.settings.extend(settings));
        Box::pin(async move { Ok(()) })
    }

    fn notify(&self, message: &str) -> HostFuture<'_, ()> {
        self.with_state(|s| s.notifications.push(message.to_string()));
        Box::pin(async move { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(id: WindowId, tab_ids: &[TabId]) -> WindowRecord {
        WindowRecord::new(
            id,
            tab_ids
                .iter()
                .map(|&t| TabRecord::new(t, format!("https://example.com/{t}")))
                .collect(),
        )
    }

    fn layout(host: &MemoryHost) -> Vec<(WindowId, Vec<TabId>)> {
        host.snapshot()
            .windows
            .iter()
            .map(|w| (w.id, w.tab_ids()))
            .collect()
    }

    #[tokio::test]
    async fn query_tabs_stamps_window_ids() {
        let host = MemoryHost::new(Snapshot::new(vec![window(1, &[10]), window(2, &[20, 21])]));
        let tabs = host.query_tabs(None).await.unwrap();
        let pairs: Vec<(TabId, WindowId)> = tabs.iter().map(|t| (t.id, t.window_id)).collect();
        assert_eq!(pairs, vec![(10, 1), (20, 2), (21, 2)]);

        let tabs = host.query_tabs(Some(2)).await.unwrap();
        assert_eq!(tabs.len(), 2);
        assert!(matches!(
            host.query_tabs(Some(9)).await,
            Err(HostError::WindowNotFound(9))
        ));
    }

    #[tokio::test]
    async fn move_inserts_at_index_and_closes_drained_window() {
        let host = MemoryHost::new(Snapshot::new(vec![window(1, &[10, 11]), window(2, &[20, 21])]));
        host.move_tabs(&[20, 21], 1, 1).await.unwrap();
        assert_eq!(layout(&host), vec![(1, vec![10, 20, 21, 11])]);
        assert!(matches!(
            host.remove_window(2).await,
            Err(HostError::WindowNotFound(2))
        ));
    }

    #[tokio::test]
    async fn move_rejects_unknown_tab_without_changes() {
        let host = MemoryHost::new(Snapshot::new(vec![window(1, &[10]), window(2, &[20])]));
        assert!(host.move_tabs(&[20, 99], 1, 1).await.is_err());
        assert_eq!(layout(&host), vec![(1, vec![10]), (2, vec![20])]);
    }

    #[tokio::test]
    async fn close_removes_known_tabs_and_reports_missing() {
        let host = MemoryHost::new(Snapshot::new(vec![window(1, &[10, 11, 12])]));
        let result = host.close_tabs(&[11, 42]).await;
        assert!(matches!(result, Err(HostError::TabNotFound(42))));
        assert_eq!(layout(&host), vec![(1, vec![10, 12])]);
    }

    #[tokio::test]
    async fn save_settings_overlays_stored_record() {
        let host = MemoryHost::new(Snapshot::default().with_settings(PartialSettings {
            skip_pinned: Some(false),
            ..Default::default()
        }));
        host.save_settings(&PartialSettings {
            ignore_fragments: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
        let stored = host.load_settings().await.unwrap();
        assert_eq!(stored.skip_pinned, Some(false));
        assert_eq!(stored.ignore_fragments, Some(true));
    }

    #[tokio::test]
    async fn current_window_falls_back_to_first() {
        let host = MemoryHost::new(Snapshot::new(vec![window(5, &[1]), window(6, &[2])]));
        assert_eq!(host.current_window().await.unwrap(), 5);
        let host = MemoryHost::new(Snapshot::default());
        assert!(host.current_window().await.is_err());
    }

    #[test]
    fn snapshot_parses_browser_dump() {
        let json = r#"{
            "windows": [{"id": 3, "tabs": [{"id": 1, "url": "https://a.com", "windowId": 99}]}],
            "currentWindow": 3,
            "history": {"https://a.com": {"visitCount": 4, "lastVisitTime": 1000}}
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.windows[0].tabs[0].window_id, 3);
        assert_eq!(snapshot.history["https://a.com"].visit_count, 4);
        assert_eq!(snapshot.focused_window(), Some(3));
    }
}
