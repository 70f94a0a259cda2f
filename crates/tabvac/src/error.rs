//! Errors raised outside the planners.
//!
//! Planners are total and never fail. Errors only come from talking to the
//! host, reading snapshot or settings files, and parsing user-supplied names.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::{TabId, WindowId};

/// A single host call failed.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("no tab with id {0}")]
    TabNotFound(TabId),
    #[error("no window with id {0}")]
    WindowNotFound(WindowId),
    #[error("no window is focused")]
    NoCurrentWindow,
    #[error("host error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown sort criteria '{0}'")]
    UnknownCriteria(String),
    #[error("unknown sort direction '{0}'")]
    UnknownDirection(String),
    #[error("unknown menu item '{0}'")]
    UnknownMenuItem(String),
    #[error("unknown shortcut '{0}'")]
    UnknownShortcut(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
