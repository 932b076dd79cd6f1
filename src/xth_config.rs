// User configuration and records
// Persisted as TOML under the per-user config directory

use chrono::Local;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::xth_game::{MAX_DISKS, MIN_DISKS};

pub const DEFAULT_DISKS: usize = 3;
pub const DEFAULT_SOLVE_INTERVAL_MS: u64 = 500;
pub const MIN_SOLVE_INTERVAL_MS: u64 = 50;
pub const MAX_SOLVE_INTERVAL_MS: u64 = 5000;

/// Best completion for one disk count
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub disks: usize,
    pub secs: u64,     // Completion time in seconds
    pub moves: usize,  // Moves used in that run
    pub date: String,  // Date in ISO format (YYYY-MM-DD)
}

/// User configuration and game records
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub disks: usize,              // Disk count for the next game
    pub language: String,          // Language code ("en" or "es")
    pub solve_interval_ms: u64,    // Delay between animated solver moves
    pub ascii_icons: bool,         // Draw disks with ASCII only
    pub show_labels: bool,         // Print disk sizes inside the disks
    pub log_level: String,         // Default log filter when RUST_LOG is unset
    pub records: Vec<Record>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            disks: DEFAULT_DISKS,
            language: detect_language(),
            solve_interval_ms: DEFAULT_SOLVE_INTERVAL_MS,
            ascii_icons: false,
            show_labels: true,
            log_level: "info".to_string(),
            records: Vec::new(),
        }
    }
}

/// Auto-detect the system language on first run
fn detect_language() -> String {
    let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    if system_lang.to_lowercase().starts_with("es") {
        "es".to_string()
    } else {
        "en".to_string()
    }
}

impl Config {
    /// Replace out-of-range values loaded from disk with defaults
    /// Returns a note for each value that had to be replaced
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut notes = Vec::new();
        if !(MIN_DISKS..=MAX_DISKS).contains(&self.disks) {
            notes.push(format!(
                "configured disk count {} out of range, using default",
                self.disks
            ));
            self.disks = DEFAULT_DISKS;
        }
        let interval = self
            .solve_interval_ms
            .clamp(MIN_SOLVE_INTERVAL_MS, MAX_SOLVE_INTERVAL_MS);
        if interval != self.solve_interval_ms {
            notes.push(format!(
                "solve interval {} ms clamped to {} ms",
                self.solve_interval_ms, interval
            ));
            self.solve_interval_ms = interval;
        }
        let before = self.records.len();
        self.records
            .retain(|r| (MIN_DISKS..=MAX_DISKS).contains(&r.disks));
        if self.records.len() != before {
            notes.push(format!("dropped {} invalid records", before - self.records.len()));
        }
        notes
    }

    /// Get the best record for a disk count
    pub fn get_record(&self, disks: usize) -> Option<&Record> {
        self.records.iter().find(|r| r.disks == disks)
    }

    /// Store a completion if it beats the current record (time first, then moves)
    /// Returns true when a new record was set
    pub fn set_record(&mut self, disks: usize, secs: u64, moves: usize) -> bool {
        let date = Local::now().format("%Y-%m-%d").to_string();
        let record = Record { disks, secs, moves, date };
        match self.records.iter_mut().find(|r| r.disks == disks) {
            Some(cur) if (secs, moves) < (cur.secs, cur.moves) => *cur = record,
            Some(_) => return false,
            None => {
                self.records.push(record);
                self.records.sort_by_key(|r| r.disks);
            }
        }
        true
    }
}

/// Get the configuration file path
/// Uses platform-specific config directory (e.g., ~/.config/xthanoi/xthanoi.toml on Linux)
/// Falls back to current directory if ProjectDirs is unavailable
pub fn config_path() -> Option<PathBuf> {
    let name = exe_name()?;
    if let Some(proj) = ProjectDirs::from("com", "xhbl", &name) {
        let mut path = proj.config_dir().to_path_buf();
        path.push(format!("{}.toml", name));
        return Some(path);
    }
    // fallback to current directory
    let mut path = env::current_dir().ok()?;
    path.push(format!("{}.toml", name));
    Some(path)
}

/// Get the log file path (data directory, next to nothing the TUI draws)
pub fn log_path() -> Option<PathBuf> {
    let name = exe_name()?;
    if let Some(proj) = ProjectDirs::from("com", "xhbl", &name) {
        let mut path = proj.data_local_dir().to_path_buf();
        path.push(format!("{}.log", name));
        return Some(path);
    }
    let mut path = env::current_dir().ok()?;
    path.push(format!("{}.log", name));
    Some(path)
}

fn exe_name() -> Option<String> {
    let exe = env::current_exe().ok()?;
    exe.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

/// Parse a config document, falling back to defaults for anything invalid
/// Problems are returned as notes since this runs before logging is set up
pub fn parse_config(s: &str) -> (Config, Vec<String>) {
    match toml::from_str::<Config>(s) {
        Ok(mut cfg) => {
            let notes = cfg.sanitize();
            (cfg, notes)
        }
        Err(err) => (
            Config::default(),
            vec![format!("config file unreadable, using defaults: {}", err)],
        ),
    }
}

/// Load configuration from disk, or create default if not found
/// The notes are meant to be logged once the subscriber is installed
pub fn load_or_create_config() -> (Config, Vec<String>) {
    let Some(path) = config_path() else {
        return (Config::default(), Vec::new());
    };
    let mut notes = Vec::new();
    if path.exists() {
        match fs::read_to_string(&path) {
            Ok(s) => return parse_config(&s),
            Err(err) => notes.push(format!("cannot read config {}: {}", path.display(), err)),
        }
    }
    let cfg = Config::default();
    if let Err(err) = write_config(&path, &cfg) {
        notes.push(err);
    }
    (cfg, notes)
}

/// Save configuration to disk as TOML
pub fn save_config(cfg: &Config) {
    let Some(path) = config_path() else {
        return;
    };
    match write_config(&path, cfg) {
        Ok(()) => debug!(path = %path.display(), "config saved"),
        Err(err) => warn!("{}", err),
    }
}

fn write_config(path: &Path, cfg: &Config) -> Result<(), String> {
    let s = toml::to_string(cfg).map_err(|err| format!("cannot serialize config: {}", err))?;
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    fs::write(path, s).map_err(|err| format!("cannot write config {}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let (cfg, notes) = parse_config("disks = 5\nlanguage = \"es\"\n");
        assert!(notes.is_empty());
        assert_eq!(cfg.disks, 5);
        assert_eq!(cfg.language, "es");
        assert_eq!(cfg.solve_interval_ms, DEFAULT_SOLVE_INTERVAL_MS);
        assert!(cfg.records.is_empty());
    }

    #[test]
    fn out_of_range_values_are_sanitized() {
        let (cfg, notes) = parse_config(
            "disks = 12\nsolve_interval_ms = 1\n\n[[records]]\ndisks = 9\nsecs = 1\nmoves = 1\ndate = \"2026-01-01\"\n",
        );
        assert_eq!(cfg.disks, DEFAULT_DISKS);
        assert_eq!(cfg.solve_interval_ms, MIN_SOLVE_INTERVAL_MS);
        assert!(cfg.records.is_empty());
        assert_eq!(notes.len(), 3);
        assert!(notes[0].contains("disk count 12"));
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let (cfg, notes) = parse_config("disks = \"many\"");
        assert_eq!(cfg.disks, DEFAULT_DISKS);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].starts_with("config file unreadable"));
    }

    #[test]
    fn records_keep_the_best_run() {
        let mut cfg = Config::default();
        assert!(cfg.set_record(3, 40, 9));
        assert!(!cfg.set_record(3, 45, 7));
        assert!(cfg.set_record(3, 40, 7));
        assert!(cfg.set_record(2, 10, 3));
        let rec = cfg.get_record(3).unwrap();
        assert_eq!((rec.secs, rec.moves), (40, 7));
        assert_eq!(cfg.records.iter().map(|r| r.disks).collect::<Vec<_>>(), vec![2, 3]);
        assert!(cfg.get_record(7).is_none());
    }

    #[test]
    fn config_survives_toml_round_trip() {
        let mut cfg = Config::default();
        cfg.set_record(4, 61, 15);
        let s = toml::to_string(&cfg).unwrap();
        assert_eq!(parse_config(&s), (cfg, Vec::new()));
    }
}
