//! Output line pair guarded by a shared closed flag.
//!
//! Each line has its own lock so the acknowledgement and relay paths never
//! wait on each other. The closed flag is only read while the line lock is
//! held: once [`OutputLatch::close`] has released a line, no later write can
//! drive it again.

use crate::{HardwareError, Result};
use gatelock_core::OutputLine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

#[derive(Debug)]
pub(crate) struct OutputLatch<O> {
    ack: Mutex<O>,
    relay: Mutex<O>,
    closed: AtomicBool,
}

impl<O> OutputLatch<O> {
    pub(crate) fn new(ack: O, relay: O) -> Self {
        Self {
            ack: Mutex::new(ack),
            relay: Mutex::new(relay),
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn lock(&self, line: OutputLine) -> Result<MutexGuard<'_, O>> {
        let output = match line {
            OutputLine::Acknowledge => &self.ack,
            OutputLine::Relay => &self.relay,
        };
        output
            .lock()
            .map_err(|_| HardwareError::line_io(line.to_string(), "output lock poisoned"))
    }

    /// Apply `drive` to one line unless the latch is closed.
    pub(crate) fn write(&self, line: OutputLine, drive: impl FnOnce(&mut O)) -> Result<()> {
        let mut output = self.lock(line)?;
        if self.is_closed() {
            return Err(HardwareError::Closed);
        }
        drive(&mut output);
        Ok(())
    }

    /// Mark the latch closed, then apply `release` to both lines.
    ///
    /// Returns `Ok(false)` if the latch was already closed. Both lines are
    /// attempted; the first failure is returned.
    pub(crate) fn close(&self, mut release: impl FnMut(OutputLine, &mut O)) -> Result<bool> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(false);
        }

        let mut first_error = None;
        for line in OutputLine::ALL {
            match self.lock(line) {
                Ok(mut output) => release(line, &mut output),
                Err(e) => {
                    warn!(%line, error = %e, "Failed to release output");
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(true), Err)
    }
}
