//! Core types for the check-in system
//!
//! A scan is classified as Valid, Duplicate, or Invalid; every classified
//! scan mutates the ledger snapshot, which is the unit of persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of classifying one decoded presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Token is in the universe and unused; it is now marked used
    Valid,
    /// Token is in the universe but was already used
    Duplicate,
    /// Token is not in the universe
    Invalid,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Duplicate => "duplicate",
            Self::Invalid => "invalid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "valid" => Some(Self::Valid),
            "duplicate" => Some(Self::Duplicate),
            "invalid" => Some(Self::Invalid),
            _ => None,
        }
    }

    /// Feedback cue the presentation layer should play for this outcome
    pub fn cue(&self) -> Cue {
        match self {
            Self::Valid => Cue::Success,
            Self::Duplicate | Self::Invalid => Cue::Error,
        }
    }
}

/// Audio/visual feedback cue. Rendering is entirely the sink's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Success,
    Error,
}

/// The durable ledger state: used tokens plus aggregate counters/timestamps.
///
/// This is both the unit of persistence and the unit of atomic commit. The
/// counters only ever grow; `reset` replaces the whole snapshot with
/// `LedgerSnapshot::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Tokens classified Valid exactly once since the last reset
    pub used_tokens: BTreeSet<String>,
    /// Every classified scan, regardless of outcome
    pub total_scanned: u64,
    /// Scans classified Valid
    pub valid_scans: u64,
    /// Scans classified Duplicate
    pub duplicates: u64,
    /// Set once, on the first classified scan after the ledger was empty
    pub first_scan_time: Option<DateTime<Utc>>,
    /// Overwritten on every classified scan
    pub last_scan_time: Option<DateTime<Utc>>,
}

impl LedgerSnapshot {
    /// Scans classified Invalid. Not stored; derived from the counters.
    pub fn invalid_scans(&self) -> u64 {
        self.total_scanned
            .saturating_sub(self.valid_scans)
            .saturating_sub(self.duplicates)
    }

    pub fn used_count(&self) -> usize {
        self.used_tokens.len()
    }

    /// Tokens in a universe of `total` not yet used
    pub fn remaining(&self, total: usize) -> usize {
        total.saturating_sub(self.used_tokens.len())
    }

    /// Record the wall-clock time of a classified scan
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        if self.first_scan_time.is_none() {
            self.first_scan_time = Some(now);
        }
        self.last_scan_time = Some(now);
    }

    /// Counter/timestamp consistency check used by tests
    pub fn invariants_hold(&self) -> bool {
        self.valid_scans == self.used_tokens.len() as u64
            && self.total_scanned >= self.valid_scans + self.duplicates
            && self.first_scan_time.is_none() == (self.total_scanned == 0)
    }
}
