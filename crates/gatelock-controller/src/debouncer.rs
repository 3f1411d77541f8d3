//! Time-windowed acceptance of raw signal samples.
//!
//! The peripheral holds its signal line Active for as long as the button is
//! pressed, and the line bounces on the edges. [`SignalDebouncer`] turns the
//! sampled stream into discrete detections: an Active sample is accepted only
//! if at least one window has elapsed since the last accepted sample.
//!
//! A line held Active therefore produces one detection per window, not one per
//! sample. Rejected samples never move the reference point.
//!
//! # Examples
//!
//! ```
//! use gatelock_controller::SignalDebouncer;
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! let mut debouncer = SignalDebouncer::new(Duration::from_millis(250));
//! let start = Instant::now();
//!
//! assert!(debouncer.check_and_accept(start, true));
//! assert!(!debouncer.check_and_accept(start + Duration::from_millis(100), true));
//! assert!(!debouncer.check_and_accept(start + Duration::from_millis(200), true));
//! assert!(debouncer.check_and_accept(start + Duration::from_millis(300), true));
//! ```

use std::time::Duration;
use tokio::time::Instant;

/// Debouncer for the signal line.
#[derive(Debug, Clone)]
pub struct SignalDebouncer {
    window: Duration,
    last_accepted_at: Option<Instant>,
}

impl SignalDebouncer {
    /// Create a debouncer that has never accepted a sample.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted_at: None,
        }
    }

    /// Decide whether a sample counts as a new detection.
    ///
    /// Returns `true` and records `now` iff `active` is set and at least one
    /// window has elapsed since the last acceptance (or there was none).
    /// Otherwise returns `false` without touching state.
    pub fn check_and_accept(&mut self, now: Instant, active: bool) -> bool {
        if !active {
            return false;
        }

        let ready = match self.last_accepted_at {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.window,
        };

        if ready {
            self.last_accepted_at = Some(now);
        }
        ready
    }

    /// Instant of the last accepted sample.
    #[must_use]
    pub fn last_accepted_at(&self) -> Option<Instant> {
        self.last_accepted_at
    }
}
