//! Scan classification
//!
//! Pure decision logic: given a decoded string, the universe, and the
//! current ledger snapshot, produce the classification and the mutated
//! snapshot. The caller commits the result and routes feedback; nothing
//! here touches storage or the presentation layer.

use chrono::{DateTime, Utc};

use super::types::{Classification, LedgerSnapshot};
use super::universe::TokenUniverse;

/// Classify one decoded presentation.
///
/// The input is trimmed before the membership test. Every call counts as a
/// scan: `total_scanned` and the timestamps advance regardless of outcome.
/// `now` is supplied by the caller so the decision is deterministic under
/// test.
pub fn classify(
    decoded_text: &str,
    universe: &TokenUniverse,
    snapshot: &LedgerSnapshot,
    now: DateTime<Utc>,
) -> (Classification, LedgerSnapshot) {
    let token = decoded_text.trim();
    let mut next = snapshot.clone();
    next.total_scanned += 1;
    next.touch(now);

    let classification = if !universe.contains(token) {
        Classification::Invalid
    } else if next.used_tokens.contains(token) {
        next.duplicates += 1;
        Classification::Duplicate
    } else {
        next.used_tokens.insert(token.to_string());
        next.valid_scans += 1;
        Classification::Valid
    };

    (classification, next)
}
