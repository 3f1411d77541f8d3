//! Unlock control core for the gate-lock controller.
//!
//! A peripheral device (a door intercom) raises a signal line when someone
//! presses its call button. This crate samples that line, debounces it, and
//! answers each detection with a timed acknowledgement pulse, optionally
//! delayed so a doorbell announcement can play first. It also pulses a relay
//! wired across the peripheral's own unlock button on command.
//!
//! # Components
//!
//! - [`SignalDebouncer`]: time-windowed acceptance of Active samples.
//! - [`PulseSequencer`]: serialised, always-released output pulses.
//! - [`UnlockOrchestrator`]: the stateful service object tying them together.
//! - [`PollLoop`]: the periodic driver.
//! - [`Announcer`]: contract for the optional announcement collaborator.
//!
//! # Example
//!
//! ```no_run
//! use gatelock_controller::{DisabledAnnouncer, PollLoop, UnlockOrchestrator};
//! use gatelock_core::Config;
//! use gatelock_hardware::mock::MockPins;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let config = Config::default();
//! let (pins, _handle) = MockPins::new(&config.gpio);
//! let orchestrator = Arc::new(UnlockOrchestrator::new(
//!     Arc::new(pins),
//!     DisabledAnnouncer,
//!     &config,
//! ));
//!
//! let shutdown = CancellationToken::new();
//! let poll = PollLoop::new(Arc::clone(&orchestrator), config.timing.poll_interval());
//! let task = tokio::spawn(poll.run(shutdown.clone()));
//!
//! // ... later
//! shutdown.cancel();
//! task.await.unwrap();
//! orchestrator.close().unwrap();
//! # }
//! ```

pub mod announce;
pub mod debouncer;
pub mod error;
pub mod orchestrator;
pub mod poll;
pub mod pulse;

pub use announce::{Announcer, DisabledAnnouncer, announcement_delay};
pub use debouncer::SignalDebouncer;
pub use error::AnnouncementError;
pub use orchestrator::{ControllerStatus, OrchestratorState, TickOutcome, UnlockOrchestrator};
pub use poll::{PollLoop, PollStats};
pub use pulse::{PulseSequencer, PulseSpec};
