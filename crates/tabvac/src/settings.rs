//! User settings with a fixed default table.
//!
//! The host stores a partial record (only what the user changed). Planners
//! always receive a complete [`Settings`], produced by overlaying the stored
//! [`PartialSettings`] onto [`Settings::default`] with [`apply_defaults`].
//!
//! ```ignore
//! let stored: PartialSettings = serde_json::from_str(r#"{"skipAudible": false}"#)?;
//! let settings = apply_defaults(stored);
//! assert!(settings.skip_pinned);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::{Error, Result};

pub const HOUR_MS: u64 = 60 * 60 * 1000;
pub const DAY_MS: u64 = 24 * HOUR_MS;

/// Default stale threshold: seven days.
pub const DEFAULT_STALE_THRESHOLD_MS: u64 = 7 * DAY_MS;

// ── Sort choices ──────────────────────────────────────────────────

/// Key used to order the tabs of a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortCriteria {
    #[default]
    Url,
    Title,
    LastAccessed,
    VisitCount,
    Frecency,
}

impl SortCriteria {
    pub const ALL: [SortCriteria; 5] = [
        SortCriteria::Url,
        SortCriteria::Title,
        SortCriteria::LastAccessed,
        SortCriteria::VisitCount,
        SortCriteria::Frecency,
    ];

    /// Stored name, e.g. `"lastAccessed"`.
    pub fn as_str(self) -> &'static str {
        match self {
            SortCriteria::Url => "url",
            SortCriteria::Title => "title",
            SortCriteria::LastAccessed => "lastAccessed",
            SortCriteria::VisitCount => "visitCount",
            SortCriteria::Frecency => "frecency",
        }
    }

    /// Human label used in sort summaries.
    pub fn label(self) -> &'static str {
        match self {
            SortCriteria::Url => "URL",
            SortCriteria::Title => "title",
            SortCriteria::LastAccessed => "last accessed",
            SortCriteria::VisitCount => "visit count",
            SortCriteria::Frecency => "frecency",
        }
    }

    /// Whether ranking by this key needs history lookups.
    pub fn needs_history(self) -> bool {
        matches!(self, SortCriteria::VisitCount | SortCriteria::Frecency)
    }
}

impl fmt::Display for SortCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortCriteria {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SortCriteria::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::UnknownCriteria(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Error::UnknownDirection(other.to_string())),
        }
    }
}

// ── Settings ──────────────────────────────────────────────────────

/// Complete settings record read by the planners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Age after which an unprotected tab is stale. Default: 7 days.
    #[serde(deserialize_with = "deserialize_millis")]
    pub stale_threshold_ms: u64,
    /// Treat URLs differing only by `#fragment` as duplicates. Default: `false`.
    pub ignore_fragments: bool,
    /// Treat URLs differing only by `?query` as duplicates. Default: `false`.
    pub ignore_query_params: bool,
    /// Never auto-close pinned tabs. Default: `true`.
    pub skip_pinned: bool,
    /// Never auto-close tabs playing audio. Default: `true`.
    pub skip_audible: bool,
    /// Criteria used when a sort is requested without one. Default: `url`.
    pub last_sort_criteria: SortCriteria,
    /// Direction used when a sort is requested without one. Default: `asc`.
    pub last_sort_direction: SortDirection,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stale_threshold_ms: DEFAULT_STALE_THRESHOLD_MS,
            ignore_fragments: false,
            ignore_query_params: false,
            skip_pinned: true,
            skip_audible: true,
            last_sort_criteria: SortCriteria::Url,
            last_sort_direction: SortDirection::Asc,
        }
    }
}

impl Settings {
    /// Overlay every field present in `partial` onto these settings.
    pub fn merge(&mut self, partial: &PartialSettings) {
        if let Some(v) = partial.stale_threshold_ms {
            self.stale_threshold_ms = v;
        }
        if let Some(v) = partial.ignore_fragments {
            self.ignore_fragments = v;
        }
        if let Some(v) = partial.ignore_query_params {
            self.ignore_query_params = v;
        }
        if let Some(v) = partial.skip_pinned {
            self.skip_pinned = v;
        }
        if let Some(v) = partial.skip_audible {
            self.skip_audible = v;
        }
        if let Some(v) = partial.last_sort_criteria {
            self.last_sort_criteria = v;
        }
        if let Some(v) = partial.last_sort_direction {
            self.last_sort_direction = v;
        }
    }

    /// Stale threshold actually applied. A zero threshold falls back to the default.
    pub fn effective_stale_threshold_ms(&self) -> u64 {
        if self.stale_threshold_ms == 0 {
            DEFAULT_STALE_THRESHOLD_MS
        } else {
            self.stale_threshold_ms
        }
    }

    /// Load a stored partial record from a JSON file and apply defaults.
    pub fn load(path: &Path) -> Result<Self> {
        PartialSettings::load(path).map(apply_defaults)
    }
}

/// A stored settings record in which any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSettings {
    #[serde(
        default,
        deserialize_with = "deserialize_opt_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub stale_threshold_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_fragments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_query_params: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_audible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sort_criteria: Option<SortCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sort_direction: Option<SortDirection>,
}

impl PartialSettings {
    /// Read a stored record from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| Error::Json {
            what: path.display().to_string(),
            source,
        })
    }

    /// Record of the last sort choice, saved whenever a sort runs.
    pub fn last_sort(criteria: SortCriteria, direction: SortDirection) -> Self {
        Self {
            last_sort_criteria: Some(criteria),
            last_sort_direction: Some(direction),
            ..Default::default()
        }
    }

    /// Overlay `other` onto this record; fields present in `other` win.
    pub fn extend(&mut self, other: &PartialSettings) {
        fn take<T: Copy>(slot: &mut Option<T>, v: Option<T>) {
            if v.is_some() {
                *slot = v;
            }
        }
        take(&mut self.stale_threshold_ms, other.stale_threshold_ms);
        take(&mut self.ignore_fragments, other.ignore_fragments);
        take(&mut self.ignore_query_params, other.ignore_query_params);
        take(&mut self.skip_pinned, other.skip_pinned);
        take(&mut self.skip_audible, other.skip_audible);
        take(&mut self.last_sort_criteria, other.last_sort_criteria);
        take(&mut self.last_sort_direction, other.last_sort_direction);
    }
}

// The options page stores `value * multiplier` as a float, so 0.3 days is
// saved as 25920000.000000004.
fn round_millis<E: de::Error>(ms: f64) -> Result<u64, E> {
    if ms.is_finite() && ms >= 0.0 {
        Ok(ms.round() as u64)
    } else {
        Err(E::custom(format!("invalid millisecond count {ms}")))
    }
}

fn deserialize_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    round_millis(f64::deserialize(deserializer)?)
}

fn deserialize_opt_millis<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    Option::<f64>::deserialize(deserializer)?
        .map(round_millis)
        .transpose()
}

/// Overlay a stored partial record onto the default table.
pub fn apply_defaults(partial: PartialSettings) -> Settings {
    let mut settings = Settings::default();
    settings.merge(&partial);
    settings
}

// ── Threshold display ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdUnit {
    Hours,
    Days,
}

/// A stale threshold expressed the way the options page shows it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdValue {
    pub value: f64,
    pub unit: ThresholdUnit,
}

impl ThresholdValue {
    /// Whole days when the threshold is at least one whole day, hours otherwise.
    pub fn from_millis(ms: u64) -> Self {
        if ms >= DAY_MS && ms % DAY_MS == 0 {
            Self {
                value: (ms / DAY_MS) as f64,
                unit: ThresholdUnit::Days,
            }
        } else {
            Self {
                value: ms as f64 / HOUR_MS as f64,
                unit: ThresholdUnit::Hours,
            }
        }
    }

    pub fn to_millis(self) -> u64 {
        let multiplier = match self.unit {
            ThresholdUnit::Days => DAY_MS,
            ThresholdUnit::Hours => HOUR_MS,
        };
        (self.value * multiplier as f64).round().max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_table() {
        let s = Settings::default();
        assert_eq!(s.stale_threshold_ms, 7 * 24 * 60 * 60 * 1000);
        assert!(!s.ignore_fragments);
        assert!(!s.ignore_query_params);
        assert!(s.skip_pinned);
        assert!(s.skip_audible);
        assert_eq!(s.last_sort_criteria, SortCriteria::Url);
        assert_eq!(s.last_sort_direction, SortDirection::Asc);
    }

    #[test]
    fn apply_defaults_overlays_present_fields_only() {
        let partial: PartialSettings =
            serde_json::from_str(r#"{"skipAudible": false, "lastSortCriteria": "frecency"}"#)
                .unwrap();
        let s = apply_defaults(partial);
        assert!(!s.skip_audible);
        assert!(s.skip_pinned);
        assert_eq!(s.last_sort_criteria, SortCriteria::Frecency);
        assert_eq!(s.stale_threshold_ms, DEFAULT_STALE_THRESHOLD_MS);
    }

    #[test]
    fn settings_serialize_with_stored_names() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["staleThresholdMs"], 604_800_000u64);
        assert_eq!(json["lastSortCriteria"], "url");
        assert_eq!(json["lastSortDirection"], "asc");
    }

    #[test]
    fn zero_threshold_falls_back_to_default() {
        let s = Settings {
            stale_threshold_ms: 0,
            ..Default::default()
        };
        assert_eq!(s.effective_stale_threshold_ms(), DEFAULT_STALE_THRESHOLD_MS);
    }

    #[test]
    fn partial_extend_prefers_newer_fields() {
        let mut stored = PartialSettings {
            skip_pinned: Some(false),
            last_sort_criteria: Some(SortCriteria::Title),
            ..Default::default()
        };
        stored.extend(&PartialSettings::last_sort(
            SortCriteria::VisitCount,
            SortDirection::Desc,
        ));
        assert_eq!(stored.skip_pinned, Some(false));
        assert_eq!(stored.last_sort_criteria, Some(SortCriteria::VisitCount));
        assert_eq!(stored.last_sort_direction, Some(SortDirection::Desc));
    }

    #[test]
    fn criteria_round_trip_through_names() {
        for c in SortCriteria::ALL {
            assert_eq!(c.as_str().parse::<SortCriteria>().unwrap(), c);
        }
        assert!("random".parse::<SortCriteria>().is_err());
        assert_eq!(SortCriteria::LastAccessed.label(), "last accessed");
    }

    #[test]
    fn threshold_value_prefers_whole_days() {
        let v = ThresholdValue::from_millis(3 * DAY_MS);
        assert_eq!(v.unit, ThresholdUnit::Days);
        assert_eq!(v.value, 3.0);

        let v = ThresholdValue::from_millis(36 * HOUR_MS);
        assert_eq!(v.unit, ThresholdUnit::Hours);
        assert_eq!(v.value, 36.0);
        assert_eq!(v.to_millis(), 36 * HOUR_MS);

        let v = ThresholdValue::from_millis(6 * HOUR_MS);
        assert_eq!(v.unit, ThresholdUnit::Hours);
    }

    #[test]
    fn load_reads_partial_record_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"staleThresholdMs": 86400000, "ignoreFragments": true}"#)
            .unwrap();
        let s = Settings::load(&path).unwrap();
        assert_eq!(s.stale_threshold_ms, DAY_MS);
        assert!(s.ignore_fragments);
        assert!(s.skip_audible);
    }

    #[test]
    fn fractional_threshold_from_options_page_is_rounded() {
        let partial: PartialSettings =
            serde_json::from_str(r#"{"staleThresholdMs": 25920000.000000004}"#).unwrap();
        assert_eq!(partial.stale_threshold_ms, Some(25_920_000));

        let partial: PartialSettings =
            serde_json::from_str(r#"{"staleThresholdMs": 3600000}"#).unwrap();
        assert_eq!(partial.stale_threshold_ms, Some(HOUR_MS));

        let partial: PartialSettings =
            serde_json::from_str(r#"{"staleThresholdMs": null}"#).unwrap();
        assert_eq!(partial.stale_threshold_ms, None);

        assert!(serde_json::from_str::<PartialSettings>(r#"{"staleThresholdMs": -5}"#).is_err());
    }

    #[test]
    fn fractional_threshold_in_full_record_is_rounded() {
        let mut json = serde_json::to_value(Settings::default()).unwrap();
        json["staleThresholdMs"] = serde_json::json!(7200000.4);
        let settings: Settings = serde_json::from_value(json).unwrap();
        assert_eq!(settings.stale_threshold_ms, 2 * HOUR_MS);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
