//! Pin backend trait definition.
//!
//! [`PinInterface`] is the contract between the unlock controller and the
//! three GPIO lines it owns: one readable signal line and two writable output
//! lines. It is pure point-in-time I/O with no buffering or debouncing.
//!
//! Methods take `&self` so a single backend can be shared (behind an `Arc`)
//! by the poll loop and by concurrent relay triggers. Implementations provide
//! their own interior synchronisation.

use crate::error::Result;
use crate::types::BackendInfo;
use gatelock_core::{LineState, OutputLine};

/// Readable signal line plus two writable output lines.
///
/// # Polarity
///
/// All levels are logical [`LineState`] values. Implementations know the
/// configured polarity of each line so [`close`](PinInterface::close) can
/// drive both outputs to their Inactive level.
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
/// handle.set_signal(LineState::High);
/// assert_eq!(pins.read_signal().unwrap(), LineState::High);
///
/// pins.write(OutputLine::Relay, LineState::High).unwrap();
/// pins.close().unwrap();
/// assert_eq!(handle.output(OutputLine::Relay), LineState::Low);
/// ```
pub trait PinInterface: Send + Sync {
    /// Sample the signal line.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is closed or the read fails.
    fn read_signal(&self) -> Result<LineState>;

    /// Drive an output line to a level.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is closed or the write fails.
    fn write(&self, line: OutputLine, state: LineState) -> Result<()>;

    /// Drive both outputs Inactive and release the backend.
    ///
    /// Idempotent: calling it again after a successful close returns `Ok`.
    /// Both outputs are attempted even if the first write fails.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while releasing the outputs.
    fn close(&self) -> Result<()>;

    /// Backend metadata for logging and status reporting.
    fn info(&self) -> BackendInfo;
}
