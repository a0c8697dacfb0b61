//! Durable scan ledger over a persistence store
//!
//! The snapshot is persisted as a small set of namespaced string keys and
//! committed as one batch, so the counters can never be observed torn
//! across keys. Malformed stored values fall back to that field's default
//! on load; the store stays authoritative for everything else.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use tollgate_store::PersistenceStore;

use super::error::Result;
use super::types::LedgerSnapshot;

pub const KEY_USED_TOKENS: &str = "checkin.used_tokens";
pub const KEY_TOTAL_SCANNED: &str = "checkin.total_scanned";
pub const KEY_VALID_SCANS: &str = "checkin.valid_scans";
pub const KEY_DUPLICATES: &str = "checkin.duplicates";
pub const KEY_FIRST_SCAN_TIME: &str = "checkin.first_scan_time";
pub const KEY_LAST_SCAN_TIME: &str = "checkin.last_scan_time";

/// The persistent check-in record.
pub struct ScanLedger {
    store: Box<dyn PersistenceStore>,
}

impl ScanLedger {
    pub fn new(store: Box<dyn PersistenceStore>) -> Self {
        Self { store }
    }

    /// Read the persisted snapshot.
    ///
    /// Absent keys default to the empty snapshot's values. A key that is
    /// present but fails to parse also falls back to its default, with a
    /// warning naming the field; a bad counter must not take the whole
    /// ledger down.
    pub fn load(&self) -> Result<LedgerSnapshot> {
        let used_tokens = match self.store.get(KEY_USED_TOKENS)? {
            Some(raw) => match serde_json::from_str::<BTreeMap<String, bool>>(&raw) {
                Ok(map) => map
                    .into_iter()
                    .filter_map(|(token, used)| used.then_some(token))
                    .collect(),
                Err(e) => {
                    warn!(field = KEY_USED_TOKENS, error = %e, "Malformed stored value, using default");
                    Default::default()
                }
            },
            None => Default::default(),
        };

        let snapshot = LedgerSnapshot {
            used_tokens,
            total_scanned: self.load_counter(KEY_TOTAL_SCANNED)?,
            valid_scans: self.load_counter(KEY_VALID_SCANS)?,
            duplicates: self.load_counter(KEY_DUPLICATES)?,
            first_scan_time: self.load_timestamp(KEY_FIRST_SCAN_TIME)?,
            last_scan_time: self.load_timestamp(KEY_LAST_SCAN_TIME)?,
        };
        debug!(
            total = snapshot.total_scanned,
            valid = snapshot.valid_scans,
            duplicates = snapshot.duplicates,
            "Loaded ledger"
        );
        Ok(snapshot)
    }

    /// Persist the full snapshot as one batch.
    ///
    /// A failed commit is surfaced to the caller; the previously persisted
    /// snapshot remains visible on the next load.
    pub fn commit(&mut self, snapshot: &LedgerSnapshot) -> Result<()> {
        let used: BTreeMap<&str, bool> = snapshot
            .used_tokens
            .iter()
            .map(|token| (token.as_str(), true))
            .collect();

        let mut entries = vec![
            (
                KEY_USED_TOKENS.to_string(),
                serde_json::to_string(&used).map_err(tollgate_store::StoreError::from)?,
            ),
            (
                KEY_TOTAL_SCANNED.to_string(),
                snapshot.total_scanned.to_string(),
            ),
            (
                KEY_VALID_SCANS.to_string(),
                snapshot.valid_scans.to_string(),
            ),
            (KEY_DUPLICATES.to_string(), snapshot.duplicates.to_string()),
        ];
        if let Some(first) = snapshot.first_scan_time {
            entries.push((KEY_FIRST_SCAN_TIME.to_string(), first.to_rfc3339()));
        }
        if let Some(last) = snapshot.last_scan_time {
            entries.push((KEY_LAST_SCAN_TIME.to_string(), last.to_rfc3339()));
        }

        self.store.set_many(&entries)?;
        Ok(())
    }

    /// Clear persisted state and return the canonical empty snapshot.
    pub fn reset(&mut self) -> Result<LedgerSnapshot> {
        self.store.clear()?;
        debug!("Ledger reset");
        Ok(LedgerSnapshot::default())
    }

    fn load_counter(&self, key: &'static str) -> Result<u64> {
        Ok(match self.store.get(key)? {
            Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
                warn!(field = key, error = %e, "Malformed stored value, using default");
                0
            }),
            None => 0,
        })
    }

    fn load_timestamp(&self, key: &'static str) -> Result<Option<DateTime<Utc>>> {
        Ok(match self.store.get(key)? {
            Some(raw) => match DateTime::parse_from_rfc3339(raw.trim()) {
                Ok(parsed) => Some(parsed.with_timezone(&Utc)),
                Err(e) => {
                    warn!(field = key, error = %e, "Malformed stored value, using default");
                    None
                }
            },
            None => None,
        })
    }
}
