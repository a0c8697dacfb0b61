//! `tollgate run` - scan tokens from stdin until end of input

use std::time::Duration;

use anyhow::{Context, Result};

use tollgate::checkin::{FeedbackSink, ScanLedger, ScanSession, TokenUniverse};
use tollgate_store::StoreUrl;

use super::console::ConsoleSink;
use super::decoder::StdinDecoder;

pub fn run(
    universe: TokenUniverse,
    store_url: &str,
    debounce: Duration,
    tick_interval: Duration,
) -> Result<()> {
    let store = StoreUrl::parse(store_url)
        .and_then(|url| url.open())
        .with_context(|| format!("Failed to open store: {store_url}"))?;
    let ledger = ScanLedger::new(store);

    let universe_size = universe.len();
    let mut session =
        ScanSession::new(universe, ledger, debounce).context("Failed to load ledger")?;
    let mut sink = ConsoleSink::new(universe_size);

    let mut decoder = match StdinDecoder::spawn() {
        Ok(decoder) => decoder,
        Err(e) => {
            // The scan loop never starts without a capture source.
            sink.failure(&format!("Cannot start scanning: {e}"));
            return Err(anyhow::Error::from(e).context("Capture input unavailable"));
        }
    };

    let snapshot = session.snapshot();
    println!(
        "Scanning ready: {} of {} tokens checked in, {} scans so far",
        snapshot.used_count(),
        universe_size,
        snapshot.total_scanned
    );
    println!("Present one code per line (Ctrl-D to stop).");

    session
        .run(&mut decoder, &mut sink, tick_interval)
        .context("Scan loop failed")?;

    let snapshot = session.snapshot();
    println!(
        "Done: {} scanned, {} valid, {} duplicates, {} invalid, {} remaining",
        snapshot.total_scanned,
        snapshot.valid_scans,
        snapshot.duplicates,
        snapshot.invalid_scans(),
        snapshot.remaining(universe_size)
    );
    Ok(())
}
