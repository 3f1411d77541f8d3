//! Unlock orchestration.
//!
//! [`UnlockOrchestrator`] ties the pieces together. On every poll tick it
//! samples the signal line, runs the sample through the debouncer and, when a
//! detection is accepted, runs the acknowledgement sequence:
//!
//! 1. Ask the announcer (if enabled) to play the doorbell, bounded by the
//!    announcement timeout. A successful call yields the voice clip length.
//! 2. Wait a quarter of that length (zero on any failure or when disabled).
//! 3. Pulse the acknowledgement line.
//!
//! Independently, [`trigger_relay`](UnlockOrchestrator::trigger_relay) pulses
//! the relay line on command. Relay pulses may overlap an acknowledgement
//! sequence; same-kind pulses queue.
//!
//! # States
//!
//! Each output path reports an [`OrchestratorState`]:
//!
//! - acknowledgement path: `Idle` → `AwaitingAnnouncementDelay` →
//!   `Acknowledging` → `Idle`
//! - relay path: `Idle` ↔ `RelayPulsing`
//!
//! # Ticks
//!
//! Ticks are non-reentrant. A tick that arrives while an earlier one is still
//! running (for example, blocked on a slow announcer) returns
//! [`TickOutcome::Skipped`] without sampling the line.

use crate::announce::{Announcer, announcement_delay};
use crate::debouncer::SignalDebouncer;
use crate::error::AnnouncementError;
use crate::pulse::{PulseSequencer, PulseSpec};
use chrono::{DateTime, Utc};
use gatelock_core::{Config, OutputLine, Polarity};
use gatelock_hardware::{HardwareError, PinInterface};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicU32, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Phase of one output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    Idle,
    AwaitingAnnouncementDelay,
    Acknowledging,
    RelayPulsing,
}

impl OrchestratorState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::AwaitingAnnouncementDelay,
            2 => Self::Acknowledging,
            3 => Self::RelayPulsing,
            _ => Self::Idle,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::AwaitingAnnouncementDelay => 1,
            Self::Acknowledging => 2,
            Self::RelayPulsing => 3,
        }
    }
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AwaitingAnnouncementDelay => "awaiting_announcement_delay",
            Self::Acknowledging => "acknowledging",
            Self::RelayPulsing => "relay_pulsing",
        };
        f.write_str(name)
    }
}

/// Result of one poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No detection on this tick.
    Idle,

    /// An earlier tick was still running; nothing was sampled.
    Skipped,

    /// A detection was accepted and the acknowledgement pulse has completed.
    Acknowledged {
        /// Delay applied before the acknowledgement pulse.
        delay: Duration,
    },
}

/// Read-only snapshot of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerStatus {
    /// Acknowledgement path phase.
    pub acknowledgement: OrchestratorState,

    /// Relay path phase.
    pub relay: OrchestratorState,

    /// Accepted detections since start.
    pub detections: u64,

    /// Completed relay pulses since start.
    pub relay_pulses: u64,

    /// Wall-clock time of the last accepted detection.
    pub last_detection_at: Option<DateTime<Utc>>,
}

/// Resets the acknowledgement phase to Idle, even if the tick is dropped.
struct PhaseReset<'a>(&'a AtomicU8);

impl Drop for PhaseReset<'_> {
    fn drop(&mut self) {
        self.0.store(OrchestratorState::Idle.as_u8(), Ordering::Release);
    }
}

/// Decrements the in-flight relay counter when a trigger finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Stateful unlock controller shared by the poll loop and command handlers.
///
/// # Examples
///
/// ```
/// use gatelock_controller::{DisabledAnnouncer, TickOutcome, UnlockOrchestrator};
/// use gatelock_core::Config;
/// use gatelock_hardware::mock::MockPins;
/// use std::sync::Arc;
/// use tokio::time::Instant;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let config = Config::default();
/// let (pins, handle) = MockPins::new(&config.gpio);
/// let orchestrator = UnlockOrchestrator::new(Arc::new(pins), DisabledAnnouncer, &config);
///
/// handle.press();
/// let outcome = orchestrator.on_poll_tick(Instant::now()).await;
/// assert!(matches!(outcome, TickOutcome::Acknowledged { .. }));
/// assert_eq!(orchestrator.status().detections, 1);
/// # }
/// ```
#[derive(Debug)]
pub struct UnlockOrchestrator<P, A> {
    pins: Arc<P>,
    announcer: A,
    sequencer: PulseSequencer<P>,
    signal_polarity: Polarity,
    ack_pulse: PulseSpec,
    relay_pulse: PulseSpec,
    announcement_timeout: Duration,

    /// Held for the whole tick; owns the debounce state.
    tick: Mutex<SignalDebouncer>,

    pending_injections: AtomicU32,
    ack_phase: AtomicU8,
    relay_in_flight: AtomicUsize,
    detections: AtomicU64,
    relay_pulses: AtomicU64,
    last_detection_at: StdMutex<Option<DateTime<Utc>>>,
}

impl<P: PinInterface, A: Announcer> UnlockOrchestrator<P, A> {
    /// Create an orchestrator over an open backend.
    pub fn new(pins: Arc<P>, announcer: A, config: &Config) -> Self {
        let timing = &config.timing;
        Self {
            sequencer: PulseSequencer::new(Arc::clone(&pins), &config.gpio),
            pins,
            announcer,
            signal_polarity: config.gpio.signal_polarity,
            ack_pulse: PulseSpec::acknowledge(timing),
            relay_pulse: PulseSpec::relay(timing),
            announcement_timeout: timing.announcement_timeout(),
            tick: Mutex::new(SignalDebouncer::new(timing.debounce_window())),
            pending_injections: AtomicU32::new(0),
            ack_phase: AtomicU8::new(OrchestratorState::Idle.as_u8()),
            relay_in_flight: AtomicUsize::new(0),
            detections: AtomicU64::new(0),
            relay_pulses: AtomicU64::new(0),
            last_detection_at: StdMutex::new(None),
        }
    }

    /// Process one poll tick at `now`.
    ///
    /// Returns after the full acknowledgement sequence when a detection is
    /// accepted. Read failures count as an Inactive sample.
    pub async fn on_poll_tick(&self, now: Instant) -> TickOutcome {
        let Ok(mut debouncer) = self.tick.try_lock() else {
            debug!("Previous tick still running, skipping");
            return TickOutcome::Skipped;
        };

        let line_active = match self.pins.read_signal() {
            Ok(level) => self.signal_polarity.is_active(level),
            Err(e) => {
                warn!(error = %e, "Signal read failed, treating as inactive");
                false
            }
        };
        let injected = self.pending_injections.load(Ordering::Acquire) > 0;

        if !debouncer.check_and_accept(now, line_active || injected) {
            return TickOutcome::Idle;
        }

        if injected {
            // Only this task decrements, so the count is still positive.
            self.pending_injections.fetch_sub(1, Ordering::AcqRel);
        }
        self.record_detection(injected && !line_active);

        let _reset = PhaseReset(&self.ack_phase);
        self.set_ack_phase(OrchestratorState::AwaitingAnnouncementDelay);

        let delay = self.announcement_delay().await;
        if !delay.is_zero() {
            debug!(?delay, "Waiting before acknowledgement");
            tokio::time::sleep(delay).await;
        }

        self.set_ack_phase(OrchestratorState::Acknowledging);
        self.sequencer.pulse(OutputLine::Acknowledge, self.ack_pulse).await;

        TickOutcome::Acknowledged { delay }
    }

    /// Pulse the relay line.
    ///
    /// Bypasses the debouncer. Concurrent callers queue behind each other;
    /// an acknowledgement sequence in progress does not block this.
    pub async fn trigger_relay(&self) {
        self.relay_in_flight.fetch_add(1, Ordering::AcqRel);
        let _in_flight = InFlight(&self.relay_in_flight);

        info!(hold = ?self.relay_pulse.hold, "Relay triggered");
        self.sequencer.pulse(OutputLine::Relay, self.relay_pulse).await;
        self.relay_pulses.fetch_add(1, Ordering::Relaxed);
    }

    /// Queue one synthetic Active sample.
    ///
    /// The sample is consumed by the next tick whose detection is accepted,
    /// so it waits out the debounce window like a held line would.
    pub fn inject_signal(&self) {
        let pending = self.pending_injections.fetch_add(1, Ordering::AcqRel) + 1;
        info!(pending, "Synthetic signal queued");
    }

    /// Synthetic samples not yet consumed.
    pub fn pending_injections(&self) -> u32 {
        self.pending_injections.load(Ordering::Acquire)
    }

    /// Current status snapshot.
    pub fn status(&self) -> ControllerStatus {
        let relay = if self.relay_in_flight.load(Ordering::Acquire) > 0 {
            OrchestratorState::RelayPulsing
        } else {
            OrchestratorState::Idle
        };

        ControllerStatus {
            acknowledgement: OrchestratorState::from_u8(self.ack_phase.load(Ordering::Acquire)),
            relay,
            detections: self.detections.load(Ordering::Relaxed),
            relay_pulses: self.relay_pulses.load(Ordering::Relaxed),
            last_detection_at: *self
                .last_detection_at
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        }
    }

    /// Drive both outputs Inactive and release the backend.
    ///
    /// # Errors
    ///
    /// Returns the backend error if releasing an output fails.
    pub fn close(&self) -> Result<(), HardwareError> {
        self.pins.close()
    }

    /// Shared backend.
    pub fn pins(&self) -> &Arc<P> {
        &self.pins
    }

    fn set_ack_phase(&self, state: OrchestratorState) {
        self.ack_phase.store(state.as_u8(), Ordering::Release);
    }

    fn record_detection(&self, synthetic: bool) {
        let count = self.detections.fetch_add(1, Ordering::Relaxed) + 1;
        let at = Utc::now();
        *self
            .last_detection_at
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(at);

        info!(detection = count, synthetic, at = %at, "Signal detected");
    }

    async fn announcement_delay(&self) -> Duration {
        if !self.announcer.is_enabled() {
            return Duration::ZERO;
        }

        let timeout_ms =
            u64::try_from(self.announcement_timeout.as_millis()).unwrap_or(u64::MAX);
        let result =
            match tokio::time::timeout(self.announcement_timeout, self.announcer.announce()).await {
                Ok(result) => result,
                Err(_) => Err(AnnouncementError::Timeout { timeout_ms }),
            };

        match result {
            Ok(voice_length_ms) => {
                let delay = announcement_delay(voice_length_ms);
                info!(voice_length_ms, ?delay, "Announcement played");
                delay
            }
            Err(e) => {
                warn!(error = %e, "Announcement failed, acknowledging without delay");
                Duration::ZERO
            }
        }
    }
}
