//! `tollgate stats` - show check-in statistics

use anyhow::{Context, Result};

use tollgate::checkin::{ScanLedger, TokenUniverse};
use tollgate_store::StoreUrl;

use super::output::{format_timestamp, print_table};

pub fn run(universe: &TokenUniverse, store_url: &str) -> Result<()> {
    let store = StoreUrl::parse(store_url)
        .and_then(|url| url.open())
        .with_context(|| format!("Failed to open store: {store_url}"))?;
    let snapshot = ScanLedger::new(store)
        .load()
        .context("Failed to load ledger")?;

    print_table(
        &["Metric", "Value"],
        vec![
            vec!["Total scanned".to_string(), snapshot.total_scanned.to_string()],
            vec!["Valid".to_string(), snapshot.valid_scans.to_string()],
            vec!["Duplicates".to_string(), snapshot.duplicates.to_string()],
            vec!["Invalid".to_string(), snapshot.invalid_scans().to_string()],
            vec![
                "Remaining".to_string(),
                format!("{} / {}", snapshot.remaining(universe.len()), universe.len()),
            ],
            vec![
                "First scan".to_string(),
                format_timestamp(snapshot.first_scan_time),
            ],
            vec![
                "Last scan".to_string(),
                format_timestamp(snapshot.last_scan_time),
            ],
        ],
    );
    Ok(())
}
