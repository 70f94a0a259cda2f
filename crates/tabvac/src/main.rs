//! Plan (or simulate) tab housekeeping against a JSON snapshot.
//!
//! The snapshot describes windows, tabs, browsing history, and the stored
//! settings record, in the shape a browser extension would dump them.
//!
//! # Examples
//!
//! ```sh
//! # Which duplicates would close?
//! tabvac snapshot.json dupes
//!
//! # Merge everything into window 3 and print the resulting layout
//! tabvac snapshot.json --apply merge --target 3
//!
//! # Sort the focused window by frecency, newest-first reversed
//! tabvac snapshot.json sort --criteria frecency --direction desc
//!
//! # Stale tabs as of a fixed instant, with an overriding settings file
//! tabvac snapshot.json --settings prefs.json --now 1700000000000 stale
//!
//! # Replay a popup message, a context-menu click, or a shortcut
//! tabvac snapshot.json run '{"command": "sortTabs", "criteria": "title"}'
//! tabvac snapshot.json menu tv-sort-last
//! tabvac snapshot.json shortcut close-duplicates
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tabvac::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Plan duplicate cleanup, window merging, tab sorting, and stale-tab
/// eviction for a browser snapshot.
#[derive(Parser)]
#[command(name = "tabvac")]
struct Cli {
    /// JSON snapshot of windows, tabs, history, and stored settings
    snapshot: PathBuf,

    /// Settings file (partial record) layered over the snapshot's settings
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Current time in ms since the epoch. Defaults to the system clock
    #[arg(long)]
    now: Option<i64>,

    /// Apply the plan to the snapshot and print the resulting snapshot
    #[arg(long)]
    apply: bool,

    /// Log planner decisions to stderr
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Close duplicate tabs across all windows
    Dupes,
    /// Merge all windows into one
    Merge {
        /// Window to merge into. Defaults to the focused window
        #[arg(long)]
        target: Option<WindowId>,
    },
    /// Sort one window's unpinned tabs
    Sort {
        /// url, title, lastAccessed, visitCount, or frecency. Defaults to the last used
        #[arg(long)]
        criteria: Option<SortCriteria>,
        /// asc or desc. Defaults to the last used
        #[arg(long)]
        direction: Option<SortDirection>,
        /// Window to sort. Defaults to the focused window
        #[arg(long)]
        window: Option<WindowId>,
    },
    /// Close tabs not accessed within the stale threshold
    Stale,
    /// Run a popup command message, e.g. '{"command": "closeDuplicates"}'
    Run { message: String },
    /// Run the command behind a context-menu item id
    Menu { id: String },
    /// Run the command bound to a keyboard shortcut
    Shortcut { name: String },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|source| Error::Json {
        what: "output".to_string(),
        source,
    })
}

fn load_snapshot(cli: &Cli) -> Result<Snapshot> {
    let mut snapshot = Snapshot::load(&cli.snapshot)?;
    if let Some(path) = &cli.settings {
        snapshot.settings.extend(&PartialSettings::load(path)?);
    }
    Ok(snapshot)
}

/// Resolve a subcommand into the command it runs and the window to focus first.
fn resolve(action: &Action) -> Result<(Command, Option<WindowId>)> {
    let resolved = match action {
        Action::Dupes => (Command::CloseDuplicates, None),
        Action::Merge { target } => (Command::MergeWindows, *target),
        Action::Sort {
            criteria,
            direction,
            window,
        } => (
            Command::SortTabs {
                criteria: *criteria,
                direction: *direction,
            },
            *window,
        ),
        Action::Stale => (Command::CloseStaleTabs, None),
        Action::Run { message } => {
            let command = serde_json::from_str(message).map_err(|source| Error::Json {
                what: "command message".to_string(),
                source,
            })?;
            (command, None)
        }
        Action::Menu { id } => (
            Command::from_menu_item(id).ok_or_else(|| Error::UnknownMenuItem(id.clone()))?,
            None,
        ),
        Action::Shortcut { name } => (
            Command::from_shortcut(name).ok_or_else(|| Error::UnknownShortcut(name.clone()))?,
            None,
        ),
    };
    Ok(resolved)
}

/// Compute the plan for a planner subcommand without touching the snapshot.
///
/// Returns `None` for subcommands that only make sense when executed.
async fn preview(action: &Action, snapshot: &Snapshot, clock: Clock) -> Result<Option<String>> {
    let settings = apply_defaults(snapshot.settings.clone());
    let output = match action {
        Action::Dupes => to_json(&find_duplicates(&snapshot.all_tabs(), &settings))?,
        Action::Stale => to_json(&find_stale_tabs(
            &snapshot.all_tabs(),
            &settings,
            clock.now_ms(),
        ))?,
        Action::Merge { target } => {
            let target = target
                .or(snapshot.focused_window())
                .ok_or(HostError::NoCurrentWindow)?;
            to_json(&plan_merge(&snapshot.windows, target))?
        }
        Action::Sort {
            criteria,
            direction,
            ..
        } => {
            let criteria = criteria.unwrap_or(settings.last_sort_criteria);
            let direction = direction.unwrap_or(settings.last_sort_direction);
            // History enrichment goes through a host; use a scratch copy.
            let scratch = Executor::new(MemoryHost::new(snapshot.clone())).with_clock(clock);
            let (_, plan) = scratch.preview_sort(criteria, direction).await?;
            to_json(&plan)?
        }
        Action::Run { .. } | Action::Menu { .. } | Action::Shortcut { .. } => return Ok(None),
    };
    Ok(Some(output))
}

async fn run(cli: &Cli) -> Result<String> {
    let mut snapshot = load_snapshot(cli)?;
    let clock = cli.now.map_or(Clock::System, Clock::Fixed);
    let (command, focus) = resolve(&cli.action)?;

    if let Some(window) = focus {
        snapshot.current_window = Some(window);
    }

    if !cli.apply
        && let Some(plan) = preview(&cli.action, &snapshot, clock).await?
    {
        return Ok(plan);
    }

    let executor = Executor::new(MemoryHost::new(snapshot)).with_clock(clock);
    let mutates = command.is_mutation();
    let triggered = matches!(cli.action, Action::Menu { .. } | Action::Shortcut { .. });
    let outcome = if triggered {
        executor.execute_and_notify(command).await?
    } else {
        executor.execute(command).await?
    };

    if cli.apply && mutates {
        if let Some(text) = outcome.text() {
            eprintln!("{text}");
        }
        to_json(&executor.host().snapshot())
    } else {
        to_json(&outcome)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
