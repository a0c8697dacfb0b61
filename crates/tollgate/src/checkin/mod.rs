//! Check-in core: validation, dedup, and durable scan statistics
//!
//! Data flow: Decoder -> DebounceGate -> classify -> ScanLedger::commit ->
//! FeedbackSink. The ScanSession drives one decode-admit-classify-commit
//! sequence per capture tick.

pub mod classifier;
pub mod debounce;
pub mod error;
pub mod ledger;
pub mod session;
pub mod types;
pub mod universe;

pub use classifier::classify;
pub use debounce::DebounceGate;
pub use error::{CheckinError, Result};
pub use ledger::ScanLedger;
pub use session::{Decode, Decoder, FeedbackSink, ResetDecision, ScanSession, TickOutcome};
pub use types::{Classification, Cue, LedgerSnapshot};
pub use universe::TokenUniverse;
