//! Tollgate check-in station launcher
//!
//! Reads decoded QR lines from stdin (serial or keyboard-wedge scanner
//! hardware), classifies them against the configured token universe, and
//! keeps durable statistics under the tollgate home directory.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tollgate::checkin::TokenUniverse;
use tollgate::config::{
    self, DEFAULT_DEBOUNCE_MS, DEFAULT_PAD_WIDTH, DEFAULT_TICK_MS, DEFAULT_TOKEN_PREFIX,
    DEFAULT_TOTAL_TOKENS,
};
use tollgate_logging::LogConfig;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "tollgate", about = "Single-station QR token check-in scanner")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Store URL: file:<path> or memory:
    #[arg(long, env = "TOLLGATE_STORE", global = true)]
    store: Option<String>,

    /// Size of the generated token universe
    #[arg(long, env = "TOLLGATE_TOTAL_TOKENS", global = true, default_value_t = DEFAULT_TOTAL_TOKENS)]
    total_tokens: usize,

    /// Prefix for generated token identifiers
    #[arg(long, env = "TOLLGATE_TOKEN_PREFIX", global = true, default_value = DEFAULT_TOKEN_PREFIX)]
    token_prefix: String,

    /// Zero-pad width of the generated ordinal
    #[arg(long, env = "TOLLGATE_PAD_WIDTH", global = true, default_value_t = DEFAULT_PAD_WIDTH)]
    pad_width: usize,

    /// Explicit token list file (one token per line) instead of a generated universe
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan tokens from stdin until end of input
    Run {
        /// Minimum spacing (ms) between admitted decode events
        #[arg(long, env = "TOLLGATE_DEBOUNCE_MS", default_value_t = DEFAULT_DEBOUNCE_MS)]
        debounce_ms: u64,

        /// Capture tick cadence (ms)
        #[arg(long, env = "TOLLGATE_TICK_MS", default_value_t = DEFAULT_TICK_MS)]
        tick_ms: u64,
    },

    /// Show check-in statistics
    Stats,

    /// Clear all check-in data
    Reset {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(e) = tollgate_logging::init_logging(LogConfig {
        app_name: "tollgate",
        verbose: args.verbose,
    }) {
        eprintln!("Failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    match dispatch(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch(args: Cli) -> Result<()> {
    let store_url = args.store.unwrap_or_else(config::default_store_url);
    let universe = build_universe(
        args.token_file.as_deref(),
        &args.token_prefix,
        args.total_tokens,
        args.pad_width,
    )?;

    match args.command {
        Commands::Run {
            debounce_ms,
            tick_ms,
        } => cli::run::run(
            universe,
            &store_url,
            Duration::from_millis(debounce_ms),
            Duration::from_millis(tick_ms),
        ),
        Commands::Stats => cli::stats::run(&universe, &store_url),
        Commands::Reset { yes } => cli::reset::run(universe, &store_url, yes),
    }
}

fn build_universe(
    token_file: Option<&std::path::Path>,
    prefix: &str,
    total: usize,
    pad_width: usize,
) -> Result<TokenUniverse> {
    match token_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read token file: {}", path.display()))?;
            let universe = TokenUniverse::from_list(raw.lines());
            anyhow::ensure!(
                !universe.is_empty(),
                "Token file has no tokens: {}",
                path.display()
            );
            Ok(universe)
        }
        None => Ok(TokenUniverse::generate(prefix, total, pad_width)),
    }
}
