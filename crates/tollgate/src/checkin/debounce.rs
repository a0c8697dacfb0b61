//! Temporal gate over the decode stream
//!
//! The capture source samples far more often than a human presents a new
//! code, and one physical presentation spans many consecutive ticks. The
//! gate admits a decode only when enough time has passed since the last
//! admitted decode, regardless of content; a different token inside the
//! window of a prior admission is still suppressed.

use std::time::{Duration, Instant};

/// Global debounce over admitted decode events.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    window: Duration,
    last_admitted_at: Option<Instant>,
}

impl DebounceGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_admitted_at: None,
        }
    }

    /// Admit iff more than `window` has elapsed since the last admission,
    /// or nothing has been admitted yet. A gap of exactly the window is
    /// suppressed. `last_admitted_at` only advances on admission, so
    /// suppressed decodes do not extend the window.
    pub fn admit(&mut self, now: Instant) -> bool {
        let admitted = match self.last_admitted_at {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.window,
        };
        if admitted {
            self.last_admitted_at = Some(now);
        }
        admitted
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
