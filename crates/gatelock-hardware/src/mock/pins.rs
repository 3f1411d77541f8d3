//! Mock pin backend for testing and development.
//!
//! This module provides a simulated set of GPIO lines that can be driven and
//! observed programmatically without requiring physical hardware.

use crate::{
    HardwareError, Result,
    traits::PinInterface,
    types::BackendInfo,
};
use gatelock_core::{GpioConfig, LineState, OutputLine, Polarity};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::{debug, info};

/// A level change observed on an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEvent {
    /// Line that changed.
    pub line: OutputLine,

    /// New level.
    pub state: LineState,

    /// When the change happened (tokio clock, so paused-time tests are exact).
    pub at: Instant,
}

#[derive(Debug)]
struct MockState {
    signal: LineState,
    ack: LineState,
    relay: LineState,
    closed: bool,
    fail_reads: bool,
    fail_writes: bool,
    history: Vec<OutputEvent>,
}

impl MockState {
    fn output_mut(&mut self, line: OutputLine) -> &mut LineState {
        match line {
            OutputLine::Acknowledge => &mut self.ack,
            OutputLine::Relay => &mut self.relay,
        }
    }

    fn set_output(&mut self, line: OutputLine, state: LineState) {
        let current = self.output_mut(line);
        if *current != state {
            *current = state;
            self.history.push(OutputEvent {
                line,
                state,
                at: Instant::now(),
            });
        }
    }
}

#[derive(Debug)]
struct Shared {
    state: Mutex<MockState>,
    gpio: GpioConfig,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panic while holding the lock cannot leave the plain-data state
        // inconsistent, so a poisoned lock is still usable.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn polarity(&self, line: OutputLine) -> Polarity {
        self.gpio.output_polarity(line)
    }
}

/// Mock pin backend for testing and development.
///
/// The signal line is driven through a [`MockPinsHandle`]; output writes are
/// recorded so tests can inspect exact pulse timing.
///
/// # Examples
///
/// ```
/// use gatelock_core::{GpioConfig, LineState, OutputLine};
/// use gatelock_hardware::mock::MockPins;
/// use gatelock_hardware::traits::PinInterface;
///
/// let (pins, handle) = MockPins::new(&GpioConfig::default());
///
/// pins.write(OutputLine::Acknowledge, LineState::High).unwrap();
/// assert_eq!(handle.output(OutputLine::Acknowledge), LineState::High);
/// assert_eq!(handle.history().len(), 1);
/// ```
#[derive(Debug)]
pub struct MockPins {
    shared: Arc<Shared>,
}

impl MockPins {
    /// Create a new mock backend with every line at its Inactive level.
    ///
    /// Returns a tuple of (MockPins, MockPinsHandle) where the handle can be
    /// used to drive the signal line and observe the outputs.
    pub fn new(gpio: &GpioConfig) -> (Self, MockPinsHandle) {
        info!(
            backend = "mock",
            signal_pin = %gpio.signal_pin,
            ack_pin = %gpio.ack_pin,
            relay_pin = %gpio.relay_pin,
            "Simulating GPIO pins"
        );

        let state = MockState {
            signal: gpio.signal_polarity.inactive_level(),
            ack: gpio.ack_polarity.inactive_level(),
            relay: gpio.relay_polarity.inactive_level(),
            closed: false,
            fail_reads: false,
            fail_writes: false,
            history: Vec::new(),
        };

        let shared = Arc::new(Shared {
            state: Mutex::new(state),
            gpio: gpio.clone(),
        });

        let handle = MockPinsHandle {
            shared: Arc::clone(&shared),
        };

        (Self { shared }, handle)
    }

    /// Get another handle to this backend.
    pub fn handle(&self) -> MockPinsHandle {
        MockPinsHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl PinInterface for MockPins {
    fn read_signal(&self) -> Result<LineState> {
        let state = self.shared.lock();
        if state.closed {
            return Err(HardwareError::Closed);
        }
        if state.fail_reads {
            return Err(HardwareError::line_io("signal", "simulated read failure"));
        }
        Ok(state.signal)
    }

    fn write(&self, line: OutputLine, level: LineState) -> Result<()> {
        let mut state = self.shared.lock();
        if state.closed {
            return Err(HardwareError::Closed);
        }
        if state.fail_writes {
            return Err(HardwareError::line_io(
                line.to_string(),
                "simulated write failure",
            ));
        }

        debug!(backend = "mock", %line, %level, "Output line write");
        state.set_output(line, level);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut state = self.shared.lock();
        if state.closed {
            return Ok(());
        }

        for line in OutputLine::ALL {
            let inactive = self.shared.polarity(line).inactive_level();
            state.set_output(line, inactive);
        }
        state.closed = true;

        info!(backend = "mock", "Closed GPIO lines");
        Ok(())
    }

    fn info(&self) -> BackendInfo {
        BackendInfo::new("mock", &self.shared.gpio)
    }
}

/// Handle for controlling a mock pin backend.
///
/// This handle drives the signal line and inspects the outputs. It can be
/// cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockPinsHandle {
    shared: Arc<Shared>,
}

impl MockPinsHandle {
    /// Set the signal line to a raw level.
    pub fn set_signal(&self, level: LineState) {
        self.shared.lock().signal = level;
    }

    /// Drive the signal line Active (peripheral reports a press).
    pub fn press(&self) {
        let level = self.shared.gpio.signal_polarity.active_level();
        self.set_signal(level);
    }

    /// Drive the signal line Inactive.
    pub fn release(&self) {
        let level = self.shared.gpio.signal_polarity.inactive_level();
        self.set_signal(level);
    }

    /// Current level of an output line.
    pub fn output(&self, line: OutputLine) -> LineState {
        match line {
            OutputLine::Acknowledge => self.shared.lock().ack,
            OutputLine::Relay => self.shared.lock().relay,
        }
    }

    /// Whether an output line is currently Active.
    pub fn is_active(&self, line: OutputLine) -> bool {
        self.shared.polarity(line).is_active(self.output(line))
    }

    /// All recorded output level changes, oldest first.
    pub fn history(&self) -> Vec<OutputEvent> {
        self.shared.lock().history.clone()
    }

    /// Recorded level changes for one line, oldest first.
    pub fn history_for(&self, line: OutputLine) -> Vec<OutputEvent> {
        self.shared
            .lock()
            .history
            .iter()
            .filter(|event| event.line == line)
            .copied()
            .collect()
    }

    /// Whether the backend has been closed.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }

    /// Make subsequent signal reads fail.
    pub fn set_read_failure(&self, fail: bool) {
        self.shared.lock().fail_reads = fail;
    }

    /// Make subsequent output writes fail.
    pub fn set_write_failure(&self, fail: bool) {
        self.shared.lock().fail_writes = fail;
    }
}
