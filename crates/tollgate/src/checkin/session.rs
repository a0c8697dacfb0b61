//! Scan session driver
//!
//! The session owns the mutable state of one check-in station: the scanning
//! flag, the debounce gate, the universe, the ledger, and the in-memory
//! snapshot. Each capture tick runs at most one decode-admit-classify-commit
//! sequence; collaborators (capture source, presentation layer) come in
//! through the `Decoder` and `FeedbackSink` traits.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::classifier::classify;
use super::debounce::DebounceGate;
use super::error::Result;
use super::ledger::ScanLedger;
use super::types::{Classification, LedgerSnapshot};
use super::universe::TokenUniverse;

/// One decode attempt from the capture source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decode {
    /// No code in this frame
    NoCode,
    /// A decoded string, treated as opaque text to trim and classify
    Code(String),
    /// The capture source is exhausted or detached
    EndOfInput,
}

/// Capture collaborator. The core never sees frames, only decode results.
pub trait Decoder {
    fn decode(&mut self) -> Result<Decode>;
}

/// Presentation collaborator. Reads state, renders status and cues;
/// never mutates the ledger.
pub trait FeedbackSink {
    /// A scan was classified and committed.
    fn scan(&mut self, classification: Classification, token: &str, snapshot: &LedgerSnapshot);

    /// The ledger was reset to the empty snapshot.
    fn reset(&mut self, snapshot: &LedgerSnapshot);

    /// A failure the operator must see (input unavailable, commit failure).
    fn failure(&mut self, message: &str);
}

/// Explicit reset confirmation, supplied by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetDecision {
    Confirmed,
    Cancelled,
}

/// What one capture tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Scanning inactive, or no code in the frame
    Idle,
    /// A code was decoded but suppressed by the debounce gate
    Suppressed,
    /// A code was admitted, classified, and committed
    Classified(Classification),
    /// The decoder reported end of input
    EndOfInput,
}

/// Driver state for one check-in station.
pub struct ScanSession {
    universe: TokenUniverse,
    ledger: ScanLedger,
    gate: DebounceGate,
    snapshot: LedgerSnapshot,
    scanning: bool,
}

impl ScanSession {
    /// Load the persisted snapshot and start in the scanning state.
    pub fn new(universe: TokenUniverse, ledger: ScanLedger, debounce: Duration) -> Result<Self> {
        let snapshot = ledger.load()?;
        info!(
            universe = universe.len(),
            total = snapshot.total_scanned,
            used = snapshot.used_count(),
            "Scan session ready"
        );
        Ok(Self {
            universe,
            ledger,
            gate: DebounceGate::new(debounce),
            snapshot,
            scanning: true,
        })
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn universe(&self) -> &TokenUniverse {
        &self.universe
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    /// Stop classifying. Ledger state and the debounce gate are retained.
    pub fn pause(&mut self) {
        self.scanning = false;
    }

    /// Resume classifying. The debounce window is still measured against
    /// the last admission before the pause.
    pub fn resume(&mut self) {
        self.scanning = true;
    }

    /// Run one capture tick.
    ///
    /// `wall_now` stamps the classification; `mono_now` feeds the debounce
    /// gate. Both are parameters so tests can script time instead of
    /// sleeping through debounce windows.
    ///
    /// The in-memory snapshot is only replaced after the commit succeeds,
    /// so a failed commit leaves memory and store agreeing on the prior
    /// state.
    pub fn tick(
        &mut self,
        decoder: &mut dyn Decoder,
        sink: &mut dyn FeedbackSink,
        wall_now: DateTime<Utc>,
        mono_now: Instant,
    ) -> Result<TickOutcome> {
        if !self.scanning {
            return Ok(TickOutcome::Idle);
        }

        let text = match decoder.decode()? {
            Decode::NoCode => return Ok(TickOutcome::Idle),
            Decode::EndOfInput => return Ok(TickOutcome::EndOfInput),
            Decode::Code(text) => text,
        };

        if !self.gate.admit(mono_now) {
            return Ok(TickOutcome::Suppressed);
        }

        let (classification, next) = classify(&text, &self.universe, &self.snapshot, wall_now);
        self.ledger.commit(&next)?;
        self.snapshot = next;

        info!(
            token = text.trim(),
            classification = classification.as_str(),
            total = self.snapshot.total_scanned,
            "Scan classified"
        );
        sink.scan(classification, text.trim(), &self.snapshot);
        Ok(TickOutcome::Classified(classification))
    }

    /// Drive ticks at `tick_interval` until the decoder reports end of
    /// input. Commit failures stop the loop and are reported through the
    /// sink before being returned.
    pub fn run(
        &mut self,
        decoder: &mut dyn Decoder,
        sink: &mut dyn FeedbackSink,
        tick_interval: Duration,
    ) -> Result<()> {
        loop {
            match self.tick(decoder, sink, Utc::now(), Instant::now()) {
                Ok(TickOutcome::EndOfInput) => return Ok(()),
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Scan loop stopping");
                    sink.failure(&format!("Scan stopped: {e}"));
                    return Err(e);
                }
            }
            std::thread::sleep(tick_interval);
        }
    }

    /// Reset the ledger, but only on an explicit confirmation. A cancelled
    /// decision leaves every piece of state untouched.
    pub fn reset(&mut self, decision: ResetDecision, sink: &mut dyn FeedbackSink) -> Result<bool> {
        match decision {
            ResetDecision::Cancelled => Ok(false),
            ResetDecision::Confirmed => {
                self.snapshot = self.ledger.reset()?;
                info!("Check-in data reset");
                sink.reset(&self.snapshot);
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use tollgate_store::MemoryStore;

    struct ScriptedDecoder {
        script: VecDeque<Decode>,
    }

    impl ScriptedDecoder {
        fn new(script: impl IntoIterator<Item = Decode>) -> Self {
            Self {
                script: script.into_iter().collect(),
            }
        }
    }

    impl Decoder for ScriptedDecoder {
        fn decode(&mut self) -> Result<Decode> {
            Ok(self.script.pop_front().unwrap_or(Decode::EndOfInput))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        scans: Vec<(Classification, String)>,
        resets: usize,
        failures: Vec<String>,
    }

    impl FeedbackSink for RecordingSink {
        fn scan(&mut self, classification: Classification, token: &str, _: &LedgerSnapshot) {
            self.scans.push((classification, token.to_string()));
        }

        fn reset(&mut self, _: &LedgerSnapshot) {
            self.resets += 1;
        }

        fn failure(&mut self, message: &str) {
            self.failures.push(message.to_string());
        }
    }

    fn session() -> ScanSession {
        let universe = TokenUniverse::generate("TOKEN", 3, 3);
        let ledger = ScanLedger::new(Box::new(MemoryStore::new()));
        ScanSession::new(universe, ledger, Duration::from_millis(1500)).unwrap()
    }

    fn wall(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_tick_classifies_and_notifies() {
        let mut session = session();
        let mut decoder = ScriptedDecoder::new([Decode::Code("TOKEN001".to_string())]);
        let mut sink = RecordingSink::default();

        let outcome = session
            .tick(&mut decoder, &mut sink, wall(0), Instant::now())
            .unwrap();

        assert_eq!(outcome, TickOutcome::Classified(Classification::Valid));
        assert_eq!(sink.scans, vec![(Classification::Valid, "TOKEN001".to_string())]);
        assert_eq!(session.snapshot().total_scanned, 1);
    }

    #[test]
    fn test_no_code_is_idle() {
        let mut session = session();
        let mut decoder = ScriptedDecoder::new([Decode::NoCode]);
        let mut sink = RecordingSink::default();

        let outcome = session
            .tick(&mut decoder, &mut sink, wall(0), Instant::now())
            .unwrap();

        assert_eq!(outcome, TickOutcome::Idle);
        assert!(sink.scans.is_empty());
        assert_eq!(session.snapshot().total_scanned, 0);
    }

    #[test]
    fn test_suppressed_decode_not_classified() {
        let mut session = session();
        let mut decoder = ScriptedDecoder::new([
            Decode::Code("TOKEN001".to_string()),
            Decode::Code("TOKEN002".to_string()),
        ]);
        let mut sink = RecordingSink::default();
        let t0 = Instant::now();

        session.tick(&mut decoder, &mut sink, wall(0), t0).unwrap();
        let outcome = session
            .tick(&mut decoder, &mut sink, wall(1), t0 + Duration::from_millis(200))
            .unwrap();

        assert_eq!(outcome, TickOutcome::Suppressed);
        assert_eq!(sink.scans.len(), 1);
        assert_eq!(session.snapshot().total_scanned, 1);
        assert!(!session.snapshot().used_tokens.contains("TOKEN002"));
    }

    #[test]
    fn test_paused_session_does_not_decode() {
        let mut session = session();
        let mut decoder = ScriptedDecoder::new([Decode::Code("TOKEN001".to_string())]);
        let mut sink = RecordingSink::default();

        session.pause();
        let outcome = session
            .tick(&mut decoder, &mut sink, wall(0), Instant::now())
            .unwrap();

        assert_eq!(outcome, TickOutcome::Idle);
        assert_eq!(session.snapshot().total_scanned, 0);
        // The scripted code is still queued for after resume.
        assert_eq!(decoder.script.len(), 1);

        session.resume();
        let outcome = session
            .tick(&mut decoder, &mut sink, wall(1), Instant::now())
            .unwrap();
        assert_eq!(outcome, TickOutcome::Classified(Classification::Valid));
    }

    #[test]
    fn test_debounce_window_spans_pause() {
        let mut session = session();
        let mut decoder = ScriptedDecoder::new([
            Decode::Code("TOKEN001".to_string()),
            Decode::Code("TOKEN002".to_string()),
        ]);
        let mut sink = RecordingSink::default();
        let t0 = Instant::now();

        session.tick(&mut decoder, &mut sink, wall(0), t0).unwrap();
        session.pause();
        session.resume();

        // Resumed inside the window of the pre-pause admission.
        let outcome = session
            .tick(&mut decoder, &mut sink, wall(1), t0 + Duration::from_millis(1000))
            .unwrap();
        assert_eq!(outcome, TickOutcome::Suppressed);
    }

    #[test]
    fn test_end_of_input() {
        let mut session = session();
        let mut decoder = ScriptedDecoder::new([]);
        let mut sink = RecordingSink::default();

        let outcome = session
            .tick(&mut decoder, &mut sink, wall(0), Instant::now())
            .unwrap();
        assert_eq!(outcome, TickOutcome::EndOfInput);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let mut session = session();
        let mut decoder = ScriptedDecoder::new([Decode::Code("TOKEN001".to_string())]);
        let mut sink = RecordingSink::default();
        session
            .tick(&mut decoder, &mut sink, wall(0), Instant::now())
            .unwrap();

        assert!(!session.reset(ResetDecision::Cancelled, &mut sink).unwrap());
        assert_eq!(session.snapshot().total_scanned, 1);
        assert_eq!(sink.resets, 0);

        assert!(session.reset(ResetDecision::Confirmed, &mut sink).unwrap());
        assert_eq!(session.snapshot(), &LedgerSnapshot::default());
        assert_eq!(sink.resets, 1);
    }

    #[test]
    fn test_run_drains_decoder() {
        let mut session = session();
        let mut decoder = ScriptedDecoder::new([
            Decode::Code("TOKEN001".to_string()),
            Decode::NoCode,
        ]);
        let mut sink = RecordingSink::default();

        session
            .run(&mut decoder, &mut sink, Duration::from_millis(0))
            .unwrap();

        assert_eq!(sink.scans.len(), 1);
        assert!(sink.failures.is_empty());
    }
}
