//! Timed Active/Inactive pulses on the output lines.
//!
//! A pulse drives a line Active, holds it, then drives it Inactive. Two rules
//! hold for every pulse:
//!
//! - Pulses on the same line never overlap. Callers queue on a per-line async
//!   mutex that is held through the release write.
//! - The line is always released. If the awaiting future is dropped during the
//!   hold, a drop guard writes the Inactive level.
//!
//! Pulses on different lines never contend.

use gatelock_core::{GpioConfig, OutputLine, Polarity, TimingConfig};
use gatelock_hardware::PinInterface;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// How long a pulse holds its line Active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseSpec {
    pub hold: Duration,
}

impl PulseSpec {
    /// Create a pulse with the given hold.
    #[must_use]
    pub const fn new(hold: Duration) -> Self {
        Self { hold }
    }

    /// Relay pulse from timing configuration (500 ms by default).
    #[must_use]
    pub fn relay(timing: &TimingConfig) -> Self {
        Self::new(timing.relay_hold())
    }

    /// Acknowledgement pulse from timing configuration (100 ms by default).
    #[must_use]
    pub fn acknowledge(timing: &TimingConfig) -> Self {
        Self::new(timing.ack_hold())
    }
}

/// Drives the Inactive level when dropped.
struct ReleaseGuard<'a, P: PinInterface> {
    pins: &'a P,
    line: OutputLine,
    polarity: Polarity,
}

impl<P: PinInterface> Drop for ReleaseGuard<'_, P> {
    fn drop(&mut self) {
        let line = self.line;
        if let Err(e) = self.pins.write(line, self.polarity.inactive_level()) {
            warn!(%line, error = %e, "Failed to release output line");
        }
    }
}

/// Serialised pulse generator for the two output lines.
#[derive(Debug)]
pub struct PulseSequencer<P> {
    pins: Arc<P>,
    ack_polarity: Polarity,
    relay_polarity: Polarity,
    ack_lock: Mutex<()>,
    relay_lock: Mutex<()>,
}

impl<P: PinInterface> PulseSequencer<P> {
    /// Create a sequencer over a shared backend.
    pub fn new(pins: Arc<P>, gpio: &GpioConfig) -> Self {
        Self {
            pins,
            ack_polarity: gpio.ack_polarity,
            relay_polarity: gpio.relay_polarity,
            ack_lock: Mutex::new(()),
            relay_lock: Mutex::new(()),
        }
    }

    fn lock_for(&self, line: OutputLine) -> &Mutex<()> {
        match line {
            OutputLine::Acknowledge => &self.ack_lock,
            OutputLine::Relay => &self.relay_lock,
        }
    }

    fn polarity(&self, line: OutputLine) -> Polarity {
        match line {
            OutputLine::Acknowledge => self.ack_polarity,
            OutputLine::Relay => self.relay_polarity,
        }
    }

    /// Whether a pulse is currently holding `line` or waiting for it.
    pub fn is_busy(&self, line: OutputLine) -> bool {
        self.lock_for(line).try_lock().is_err()
    }

    /// Drive `line` Active for `spec.hold`, then Inactive.
    ///
    /// Waits for any earlier pulse on the same line to finish first. Write
    /// failures are logged and skipped; the hold and release still happen.
    pub async fn pulse(&self, line: OutputLine, spec: PulseSpec) {
        let _serial = self.lock_for(line).lock().await;
        let polarity = self.polarity(line);

        info!(%line, hold = ?spec.hold, "Pulse start");
        if let Err(e) = self.pins.write(line, polarity.active_level()) {
            warn!(%line, error = %e, "Failed to activate output line");
        }

        let release = ReleaseGuard {
            pins: self.pins.as_ref(),
            line,
            polarity,
        };
        tokio::time::sleep(spec.hold).await;
        drop(release);

        info!(%line, "Pulse end");
        debug!(%line, "Output line available");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatelock_core::LineState;
    use gatelock_hardware::mock::{MockPins, MockPinsHandle};
    use tokio::time::Instant;

    fn sequencer(gpio: &GpioConfig) -> (Arc<PulseSequencer<MockPins>>, MockPinsHandle) {
        let (pins, handle) = MockPins::new(gpio);
        (Arc::new(PulseSequencer::new(Arc::new(pins), gpio)), handle)
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulse_holds_then_releases() {
        let (sequencer, handle) = sequencer(&GpioConfig::default());
        let start = Instant::now();

        sequencer
            .pulse(OutputLine::Relay, PulseSpec::new(Duration::from_millis(500)))
            .await;

        let history = handle.history_for(OutputLine::Relay);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].state, LineState::High);
        assert_eq!(history[0].at, start);
        assert_eq!(history[1].state, LineState::Low);
        assert_eq!(history[1].at - start, Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulse_respects_active_low_polarity() {
        let gpio = GpioConfig {
            ack_polarity: Polarity::ActiveLow,
            ..GpioConfig::default()
        };
        let (sequencer, handle) = sequencer(&gpio);
        assert_eq!(handle.output(OutputLine::Acknowledge), LineState::High);

        sequencer
            .pulse(
                OutputLine::Acknowledge,
                PulseSpec::new(Duration::from_millis(100)),
            )
            .await;

        let history = handle.history_for(OutputLine::Acknowledge);
        assert_eq!(history[0].state, LineState::Low);
        assert_eq!(history[1].state, LineState::High);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_pulse_still_releases() {
        let (sequencer, handle) = sequencer(&GpioConfig::default());
        let start = Instant::now();

        let pulse = sequencer.pulse(OutputLine::Relay, PulseSpec::new(Duration::from_millis(500)));
        let result = tokio::time::timeout(Duration::from_millis(200), pulse).await;

        assert!(result.is_err());
        assert!(!handle.is_active(OutputLine::Relay));
        let history = handle.history_for(OutputLine::Relay);
        assert_eq!(history.last().unwrap().at - start, Duration::from_millis(200));
        assert!(!sequencer.is_busy(OutputLine::Relay));
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_lines_do_not_contend() {
        let (sequencer, handle) = sequencer(&GpioConfig::default());
        let start = Instant::now();

        tokio::join!(
            sequencer.pulse(OutputLine::Relay, PulseSpec::new(Duration::from_millis(500))),
            sequencer.pulse(
                OutputLine::Acknowledge,
                PulseSpec::new(Duration::from_millis(100))
            ),
        );

        let ack = handle.history_for(OutputLine::Acknowledge);
        let relay = handle.history_for(OutputLine::Relay);
        assert_eq!(ack[0].at, start);
        assert_eq!(relay[0].at, start);
        assert_eq!(ack[1].at - start, Duration::from_millis(100));
        assert_eq!(relay[1].at - start, Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_failure_is_not_fatal() {
        let (sequencer, handle) = sequencer(&GpioConfig::default());
        handle.set_write_failure(true);

        sequencer
            .pulse(
                OutputLine::Acknowledge,
                PulseSpec::new(Duration::from_millis(100)),
            )
            .await;

        assert!(handle.history().is_empty());
        assert!(!sequencer.is_busy(OutputLine::Acknowledge));
    }

    #[test]
    fn test_pulse_spec_from_timing() {
        let timing = TimingConfig::default();
        assert_eq!(PulseSpec::relay(&timing).hold, Duration::from_millis(500));
        assert_eq!(
            PulseSpec::acknowledge(&timing).hold,
            Duration::from_millis(100)
        );
    }
}
