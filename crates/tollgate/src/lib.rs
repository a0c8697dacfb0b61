//! Tollgate - Core Library
//!
//! Single-station token check-in: validate decoded QR identifiers against a
//! fixed universe, deduplicate repeat presentations, and keep durable running
//! statistics across restarts.

pub mod checkin;
pub mod config;

pub use checkin::{
    classify, Classification, Cue, DebounceGate, Decode, Decoder, FeedbackSink, LedgerSnapshot,
    ResetDecision, ScanLedger, ScanSession, TickOutcome, TokenUniverse,
};
pub use config::SessionConfig;
