//! Which tabs are exempt from automatic closing.

use crate::model::TabRecord;
use crate::settings::Settings;

/// A tab is protected when it is active, or pinned / audible and the user
/// asked to skip those.
pub fn is_protected(tab: &TabRecord, settings: &Settings) -> bool {
    tab.active || (tab.pinned && settings.skip_pinned) || (tab.audible && settings.skip_audible)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab() -> TabRecord {
        TabRecord::new(1, "https://example.com")
    }

    #[test]
    fn active_tab_is_always_protected() {
        let settings = Settings {
            skip_pinned: false,
            skip_audible: false,
            ..Default::default()
        };
        assert!(is_protected(&tab().active(), &settings));
    }

    #[test]
    fn pinned_follows_skip_pinned() {
        let pinned = tab().pinned();
        assert!(is_protected(&pinned, &Settings::default()));
        let settings = Settings {
            skip_pinned: false,
            ..Default::default()
        };
        assert!(!is_protected(&pinned, &settings));
    }

    #[test]
    fn audible_follows_skip_audible() {
        let audible = tab().audible();
        assert!(is_protected(&audible, &Settings::default()));
        let settings = Settings {
            skip_audible: false,
            ..Default::default()
        };
        assert!(!is_protected(&audible, &settings));
    }

    #[test]
    fn plain_tab_is_not_protected() {
        assert!(!is_protected(&tab(), &Settings::default()));
    }
}
