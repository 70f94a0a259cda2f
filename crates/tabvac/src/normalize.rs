//! URL canonicalization for duplicate detection.
//!
//! Two tabs are duplicates when their normalized keys are equal. Parsing is
//! delegated to the `url` crate (WHATWG rules, the same parser browsers use),
//! so scheme and host casing, default ports, and percent-encoding are already
//! canonical after a parse/serialize round trip.

use url::Url;

use crate::settings::Settings;

/// The subset of [`Settings`] that affects normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub ignore_fragments: bool,
    pub ignore_query_params: bool,
}

impl From<&Settings> for NormalizeOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            ignore_fragments: settings.ignore_fragments,
            ignore_query_params: settings.ignore_query_params,
        }
    }
}

/// Canonicalize `url` into a comparison key.
///
/// Strings that do not parse as absolute URLs are returned unchanged, so they
/// only ever match an identical string.
pub fn normalize(url: &str, options: NormalizeOptions) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    if options.ignore_fragments {
        parsed.set_fragment(None);
    }
    if options.ignore_query_params {
        parsed.set_query(None);
    }

    // Opaque paths (`about:blank`, `mailto:x`) have no slash structure.
    if !parsed.cannot_be_a_base() {
        let trimmed = parsed.path().trim_end_matches('/');
        let path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        parsed.set_path(&path);
    }

    parsed.into()
}
