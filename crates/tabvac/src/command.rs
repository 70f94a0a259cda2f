//! User-triggered commands and their entry points.
//!
//! Popup messages, context-menu clicks, and keyboard shortcuts all resolve to
//! a [`Command`], which the [`Executor`](crate::host::Executor) dispatches by
//! exhaustive match.

use serde::{Deserialize, Serialize};

use crate::settings::{PartialSettings, SortCriteria, SortDirection};

/// Something the user asked for.
///
/// Serialized the way the popup sends it, e.g.
/// `{"command": "sortTabs", "criteria": "title", "direction": "desc"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    CloseDuplicates,
    MergeWindows,
    /// Missing criteria or direction fall back to the last-used values.
    SortTabs {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        criteria: Option<SortCriteria>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direction: Option<SortDirection>,
    },
    CloseStaleTabs,
    GetSettings,
    SaveSettings { settings: PartialSettings },
}

// ── Context menu ──────────────────────────────────────────────────

/// A context-menu entry: `(id, parent id, title)`.
pub type MenuItem = (&'static str, Option<&'static str>, &'static str);

/// Entries registered on the tab context menu, parents before children.
pub const MENU_ITEMS: [MenuItem; 9] = [
    ("tv-dupes", None, "Close Duplicate Tabs"),
    ("tv-merge", None, "Merge All Windows"),
    ("tv-sort", None, "Sort Tabs"),
    ("tv-sort-url", Some("tv-sort"), "by URL"),
    ("tv-sort-title", Some("tv-sort"), "by Title"),
    ("tv-sort-last", Some("tv-sort"), "by Last Accessed"),
    ("tv-sort-visit", Some("tv-sort"), "by Visit Count"),
    ("tv-sort-frecency", Some("tv-sort"), "by Frecency"),
    ("tv-stale", None, "Close Stale Tabs"),
];

/// Keyboard shortcut names declared by the extension.
pub const SHORTCUTS: [&str; 4] = ["close-duplicates", "merge-windows", "sort-tabs", "close-stale"];

impl Command {
    /// Sort by `criteria` in the default direction.
    pub fn sort_by(criteria: SortCriteria) -> Self {
        Command::SortTabs {
            criteria: Some(criteria),
            direction: Some(SortDirection::Asc),
        }
    }

    /// Resolve a clicked context-menu item. Parent-only items resolve to `None`.
    pub fn from_menu_item(id: &str) -> Option<Self> {
        let command = match id {
            "tv-dupes" => Command::CloseDuplicates,
            "tv-merge" => Command::MergeWindows,
            "tv-sort-url" => Command::sort_by(SortCriteria::Url),
            "tv-sort-title" => Command::sort_by(SortCriteria::Title),
            "tv-sort-last" => Command::sort_by(SortCriteria::LastAccessed),
            "tv-sort-visit" => Command::sort_by(SortCriteria::VisitCount),
            "tv-sort-frecency" => Command::sort_by(SortCriteria::Frecency),
            "tv-stale" => Command::CloseStaleTabs,
            _ => return None,
        };
        Some(command)
    }

    /// Resolve a keyboard shortcut. `sort-tabs` reuses the last sort choice.
    pub fn from_shortcut(name: &str) -> Option<Self> {
        let command = match name {
            "close-duplicates" => Command::CloseDuplicates,
            "merge-windows" => Command::MergeWindows,
            "sort-tabs" => Command::SortTabs {
                criteria: None,
                direction: None,
            },
            "close-stale" => Command::CloseStaleTabs,
            _ => return None,
        };
        Some(command)
    }

    /// Whether running this command changes tabs or windows.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::GetSettings | Command::SaveSettings { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_popup_messages() {
        let cmd: Command = serde_json::from_str(r#"{"command": "closeDuplicates"}"#).unwrap();
        assert_eq!(cmd, Command::CloseDuplicates);

        let json = r#"{"command": "sortTabs", "criteria": "lastAccessed", "direction": "desc"}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            Command::SortTabs {
                criteria: Some(SortCriteria::LastAccessed),
                direction: Some(SortDirection::Desc),
            }
        );

        let cmd: Command = serde_json::from_str(r#"{"command": "sortTabs"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::SortTabs {
                criteria: None,
                direction: None
            }
        );

        let json = r#"{"command": "saveSettings", "settings": {"skipPinned": false}}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        let Command::SaveSettings { settings } = cmd else {
            panic!("expected saveSettings");
        };
        assert_eq!(settings.skip_pinned, Some(false));
    }

    #[test]
    fn unknown_popup_command_is_rejected() {
        assert!(serde_json::from_str::<Command>(r#"{"command": "explode"}"#).is_err());
    }

    #[test]
    fn every_leaf_menu_item_resolves() {
        for (id, parent, _) in MENU_ITEMS {
            let is_parent = MENU_ITEMS.iter().any(|(_, p, _)| *p == Some(id));
            assert_eq!(Command::from_menu_item(id).is_some(), !is_parent, "{id}");
            if let Some(parent) = parent {
                assert!(MENU_ITEMS.iter().any(|(i, _, _)| *i == parent));
            }
        }
        assert_eq!(Command::from_menu_item("tv-sort"), None);
        assert_eq!(Command::from_menu_item("nope"), None);
    }

    #[test]
    fn menu_sorts_use_default_direction() {
        assert_eq!(
            Command::from_menu_item("tv-sort-frecency"),
            Some(Command::SortTabs {
                criteria: Some(SortCriteria::Frecency),
                direction: Some(SortDirection::Asc),
            })
        );
    }

    #[test]
    fn every_shortcut_resolves() {
        for name in SHORTCUTS {
            assert!(Command::from_shortcut(name).is_some(), "{name}");
        }
        assert_eq!(
            Command::from_shortcut("sort-tabs"),
            Some(Command::SortTabs {
                criteria: None,
                direction: None
            })
        );
        assert_eq!(Command::from_shortcut("unknown"), None);
    }

    #[test]
    fn settings_commands_are_not_mutations() {
        assert!(!Command::GetSettings.is_mutation());
        assert!(Command::MergeWindows.is_mutation());
    }
}
