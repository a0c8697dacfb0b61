//! `tollgate reset` - clear all check-in data

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};

use tollgate::checkin::{ResetDecision, ScanLedger, ScanSession, TokenUniverse};
use tollgate::config::DEFAULT_DEBOUNCE_MS;
use tollgate_store::StoreUrl;

use super::console::ConsoleSink;

pub fn run(universe: TokenUniverse, store_url: &str, yes: bool) -> Result<()> {
    let store = StoreUrl::parse(store_url)
        .and_then(|url| url.open())
        .with_context(|| format!("Failed to open store: {store_url}"))?;
    let ledger = ScanLedger::new(store);

    let universe_size = universe.len();
    let mut session = ScanSession::new(
        universe,
        ledger,
        Duration::from_millis(DEFAULT_DEBOUNCE_MS),
    )
    .context("Failed to load ledger")?;

    let decision = if yes {
        ResetDecision::Confirmed
    } else {
        confirm(session.snapshot().total_scanned)?
    };

    let mut sink = ConsoleSink::new(universe_size);
    if !session.reset(decision, &mut sink)? {
        println!("Reset cancelled");
    }
    Ok(())
}

/// Map an interactive prompt onto a reset decision.
fn confirm(total_scanned: u64) -> Result<ResetDecision> {
    print!("Erase all check-in data ({total_scanned} scans)? This cannot be undone. [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => ResetDecision::Confirmed,
        _ => ResetDecision::Cancelled,
    })
}
