// File logging
// The terminal belongs to the TUI, so tracing output goes to a log file in the data directory

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::{Level, warn};
use tracing_subscriber::EnvFilter;

use crate::xth_config::log_path;

/// Directive for this crate at the configured level; unknown levels mean info
fn default_directive(level: &str) -> String {
    let level = level.trim().parse::<Level>().unwrap_or(Level::INFO);
    format!("xthanoi={}", level.as_str().to_ascii_lowercase())
}

/// Build the filter: RUST_LOG wins, otherwise the configured level for this crate
pub fn make_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(default_level)))
}

/// Install the global subscriber writing to the default log file, then log
/// the notes collected while loading the config
/// Returns false when the log file cannot be opened (logging stays disabled)
pub fn init(default_level: &str, config_notes: &[String]) -> bool {
    match log_path() {
        Some(path) => init_at(&path, default_level, config_notes),
        None => false,
    }
}

fn init_at(path: &Path, default_level: &str, config_notes: &[String]) -> bool {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };
    let installed = tracing_subscriber::fmt()
        .with_env_filter(make_filter(default_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok();
    for note in config_notes {
        warn!("{}", note);
    }
    installed
}
