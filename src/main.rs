// Entry point for the Towers of Hanoi TUI application
// Parses arguments, loads configuration and logging, then launches the main UI

use std::error::Error;
use std::io::{self, Write};

use clap::Parser;

// Module declarations
mod xth_color;  // Terminal-consistent colors for disks and chrome
mod xth_config; // Preferences and records persisted as TOML
mod xth_error;  // Configuration and illegal-move errors
mod xth_game;   // Tower state and move legality
mod xth_lang;   // Multi-language string resources
mod xth_log;    // File logging setup
mod xth_play;   // Controller and animated-solve playback
mod xth_solver; // Optimal move sequences
mod xth_ui;     // Terminal UI rendering and event handling

use xth_config::{MAX_SOLVE_INTERVAL_MS, MIN_SOLVE_INTERVAL_MS, load_or_create_config};
use xth_game::{GOAL_TOWER, GameState, START_TOWER, check_disk_count};
use xth_lang::Lang;
use xth_solver::generate;
use xth_ui::run as run_ui;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of disks for the first game (1-7)
    #[clap(short, long, value_parser = parse_disks)]
    disks: Option<usize>,

    /// Interface language (en, es)
    #[clap(short, long, value_parser = ["en", "es"])]
    lang: Option<String>,

    /// Delay between animated solver moves in milliseconds
    #[clap(short, long)]
    interval_ms: Option<u64>,

    /// Print the optimal solution and exit without starting the UI
    #[clap(long, action = clap::ArgAction::SetTrue)]
    print_moves: bool,
}

fn parse_disks(s: &str) -> Result<usize, Box<dyn Error + Send + Sync>> {
    let n: usize = s.trim().parse()?;
    Ok(check_disk_count(n)?)
}

/// Write the canonical solution, one numbered move per line
fn print_solution(disks: usize, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let mut game = GameState::new(disks)?;
    for (i, mv) in generate(disks, START_TOWER, GOAL_TOWER).iter().enumerate() {
        let moved = game.attempt_move(mv.from, mv.to)?;
        writeln!(
            out,
            "{:>4}. disk {} : tower {} -> tower {}",
            i + 1,
            moved.disk,
            mv.from + 1,
            mv.to + 1
        )?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // Load or create user configuration (disk count, preferences, records)
    let (mut cfg, config_notes) = load_or_create_config();
    if let Some(disks) = args.disks {
        cfg.disks = disks;
    }
    if let Some(lang) = &args.lang {
        cfg.language = lang.clone();
    }
    if let Some(ms) = args.interval_ms {
        cfg.solve_interval_ms = ms.clamp(MIN_SOLVE_INTERVAL_MS, MAX_SOLVE_INTERVAL_MS);
    }

    if !xth_log::init(&cfg.log_level, &config_notes) {
        eprintln!("log file unavailable, logging disabled");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), disks = cfg.disks, "starting");

    if args.print_moves {
        let stdout = io::stdout();
        return print_solution(cfg.disks, &mut stdout.lock());
    }

    // Initialize language resources based on saved or system language
    let mut lang = Lang::new(&cfg.language);

    // Launch the main UI loop
    run_ui(&mut cfg, &mut lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_argument_is_range_checked() {
        assert_eq!(parse_disks("4").unwrap(), 4);
        let err = parse_disks("9").unwrap_err();
        assert_eq!(err.to_string(), "disk count must be between 1 and 7, got 9");
        assert!(parse_disks("three").is_err());
    }

    #[test]
    fn printed_solution_lists_every_move() {
        let mut out = Vec::new();
        print_solution(2, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "   1. disk 1 : tower 1 -> tower 2",
                "   2. disk 2 : tower 1 -> tower 3",
                "   3. disk 1 : tower 2 -> tower 3",
            ]
        );
    }

    #[test]
    fn arguments_parse() {
        let args = Args::try_parse_from(["xthanoi", "--disks", "5", "--print-moves"]).unwrap();
        assert_eq!(args.disks, Some(5));
        assert!(args.print_moves);
        assert!(Args::try_parse_from(["xthanoi", "--disks", "0"]).is_err());
    }

    #[test]
    fn only_supported_languages_are_accepted() {
        let args = Args::try_parse_from(["xthanoi", "--lang", "es"]).unwrap();
        assert_eq!(args.lang.as_deref(), Some("es"));
        assert!(Args::try_parse_from(["xthanoi", "--lang", "fr"]).is_err());
    }
}
