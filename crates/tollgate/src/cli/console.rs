//! Console feedback sink
//!
//! Prints one status line per classified scan and rings the terminal bell
//! on the error cue, the console stand-in for the station's audio feedback.

use tollgate::checkin::{Classification, Cue, FeedbackSink, LedgerSnapshot};

pub struct ConsoleSink {
    universe_size: usize,
}

impl ConsoleSink {
    pub fn new(universe_size: usize) -> Self {
        Self { universe_size }
    }
}

impl FeedbackSink for ConsoleSink {
    fn scan(&mut self, classification: Classification, token: &str, snapshot: &LedgerSnapshot) {
        let bell = match classification.cue() {
            Cue::Success => "",
            Cue::Error => "\x07",
        };
        match classification {
            Classification::Valid => println!(
                "{bell}VALID      {token}  ({} remaining)",
                snapshot.remaining(self.universe_size)
            ),
            Classification::Duplicate => println!("{bell}DUPLICATE  {token}  (already checked in)"),
            Classification::Invalid => println!("{bell}INVALID    {token}"),
        }
    }

    fn reset(&mut self, _snapshot: &LedgerSnapshot) {
        println!("Check-in data reset");
    }

    fn failure(&mut self, message: &str) {
        eprintln!("{message}");
    }
}
