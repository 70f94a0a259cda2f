//! Runs commands against a host: query, plan, apply.
//!
//! Queries that feed a planner must succeed, otherwise the command fails.
//! Applying a plan is best effort: each close/move/remove call that fails is
//! logged and skipped, and the rest of the plan still runs. A partially
//! applied plan is an acceptable outcome; nothing is rolled back.
//!
//! Moves are applied strictly in plan order, because every insertion index
//! in a plan assumes the earlier moves already happened.

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{HistoryEntry, TabHost};
use crate::command::Command;
use crate::error::Result;
use crate::frecency;
use crate::model::{TabRecord, WindowId};
use crate::plan::{ClosePlan, SortPlan, find_duplicates, find_stale_tabs, plan_merge, plan_sort};
use crate::settings::{PartialSettings, Settings, SortCriteria, SortDirection, apply_defaults};

/// Source of "now" for staleness and frecency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    /// Always report this many ms since the epoch.
    Fixed(i64),
}

impl Clock {
    pub fn now_ms(&self) -> i64 {
        match self {
            Clock::System => chrono::Utc::now().timestamp_millis(),
            Clock::Fixed(ms) => *ms,
        }
    }
}

/// Reply to a command, shaped like the popup expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Message { message: String },
    Settings(Settings),
}

impl Outcome {
    fn message(message: impl Into<String>) -> Self {
        Outcome::Message {
            message: message.into(),
        }
    }

    /// The summary text, if this outcome carries one.
    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::Message { message } => Some(message),
            Outcome::Settings(_) => None,
        }
    }
}

/// Dispatches [`Command`]s against a [`TabHost`].
pub struct Executor<H> {
    host: H,
    clock: Clock,
}

impl<H: TabHost> Executor<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            clock: Clock::System,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Run one command and return its reply.
    pub async fn execute(&self, command: Command) -> Result<Outcome> {
        debug!(?command, "executing command");
        let outcome = match command {
            Command::CloseDuplicates => Outcome::message(self.close_duplicates().await?),
            Command::MergeWindows => Outcome::message(self.merge_windows().await?),
            Command::SortTabs {
                criteria,
                direction,
            } => Outcome::message(self.sort_tabs(criteria, direction).await?),
            Command::CloseStaleTabs => Outcome::message(self.close_stale_tabs().await?),
            Command::GetSettings => Outcome::Settings(self.settings().await?),
            Command::SaveSettings { settings } => {
                self.host.save_settings(&settings).await?;
                Outcome::message("Settings saved")
            }
        };
        if let Some(text) = outcome.text() {
            info!(summary = text, "command finished");
        }
        Ok(outcome)
    }

    /// Run a command triggered from a menu or shortcut and show its summary
    /// as a notification.
    pub async fn execute_and_notify(&self, command: Command) -> Result<Outcome> {
        let outcome = self.execute(command).await?;
        if let Some(text) = outcome.text()
            && let Err(e) = self.host.notify(text).await
        {
            warn!(error = %e, "failed to show notification");
        }
        Ok(outcome)
    }

    async fn settings(&self) -> Result<Settings> {
        let stored = self.host.load_settings().await?;
        Ok(apply_defaults(stored))
    }

    async fn close_duplicates(&self) -> Result<String> {
        let settings = self.settings().await?;
        let tabs = self.host.query_tabs(None).await?;
        let plan = find_duplicates(&tabs, &settings);
        self.apply_close(&plan).await;
        Ok(plan.message)
    }

    async fn close_stale_tabs(&self) -> Result<String> {
        let settings = self.settings().await?;
        let tabs = self.host.query_tabs(None).await?;
        let plan = find_stale_tabs(&tabs, &settings, self.clock.now_ms());
        self.apply_close(&plan).await;
        Ok(plan.message)
    }

    async fn apply_close(&self, plan: &ClosePlan) {
        if plan.is_empty() {
            return;
        }
        if let Err(e) = self.host.close_tabs(&plan.to_close).await {
            warn!(error = %e, tabs = plan.to_close.len(), "closing tabs failed");
        }
    }

    async fn merge_windows(&self) -> Result<String> {
        let windows = self.host.windows().await?;
        let target = self.host.current_window().await?;
        let plan = plan_merge(&windows, target);

        for step in &plan.moves {
            if let Err(e) = self
                .host
                .move_tabs(&step.tab_ids, step.window_id, step.index)
                .await
            {
                warn!(error = %e, window = step.window_id, index = step.index, "move failed");
            }
        }

        for &window in &plan.empty_window_ids {
            // Browsers close a window once its last tab leaves.
            if let Err(e) = self.host.remove_window(window).await {
                debug!(error = %e, window, "window already gone");
            }
        }

        Ok(plan.message)
    }

    async fn sort_tabs(
        &self,
        criteria: Option<SortCriteria>,
        direction: Option<SortDirection>,
    ) -> Result<String> {
        let settings = self.settings().await?;
        let criteria = criteria.unwrap_or(settings.last_sort_criteria);
        let direction = direction.unwrap_or(settings.last_sort_direction);

        self.host
            .save_settings(&PartialSettings::last_sort(criteria, direction))
            .await?;

        let (window, plan) = self.preview_sort(criteria, direction).await?;
        for step in &plan.moves {
            if let Err(e) = self.host.move_tabs(&[step.tab_id], window, step.index).await {
                warn!(error = %e, tab = step.tab_id, index = step.index, "move failed");
            }
        }
        Ok(plan.message)
    }

    /// Plan a sort of the focused window without moving anything.
    ///
    /// Visit-based criteria are enriched from history first.
    pub async fn preview_sort(
        &self,
        criteria: SortCriteria,
        direction: SortDirection,
    ) -> Result<(WindowId, SortPlan)> {
        let window = self.host.current_window().await?;
        let mut tabs = self.host.query_tabs(Some(window)).await?;
        if criteria.needs_history() {
            self.enrich_from_history(&mut tabs, criteria).await;
        }
        Ok((window, plan_sort(&tabs, criteria, direction)))
    }

    /// Fill in visit counts (and frecency when sorting by it). Lookups run
    /// concurrently; a failed lookup counts as never visited.
    async fn enrich_from_history(&self, tabs: &mut [TabRecord], criteria: SortCriteria) {
        let now = self.clock.now_ms();
        let lookups = join_all(tabs.iter().map(|tab| self.host.history(&tab.url))).await;

        for (tab, lookup) in tabs.iter_mut().zip(lookups) {
            let entry = lookup.unwrap_or_else(|e| {
                warn!(error = %e, url = %tab.url, "history lookup failed");
                None
            });
            let HistoryEntry {
                visit_count,
                last_visit_time,
            } = entry.unwrap_or_default();
            tab.visit_count = Some(visit_count);
            if criteria == SortCriteria::Frecency {
                tab.frecency = Some(frecency::score(visit_count, last_visit_time, now));
            }
        }
    }
}
