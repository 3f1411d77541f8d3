//! GPIO pin abstraction for the gate-lock controller.
//!
//! The controller owns exactly three lines: one input carrying the button
//! signal from the peripheral, one output acknowledging the signal back to the
//! peripheral, and one output driving a relay wired across the peripheral's
//! physical button. This crate defines the [`PinInterface`] contract for those
//! lines and the backends that implement it.
//!
//! # Backends
//!
//! - [`mock::MockPins`]: simulated lines, driven and observed through a
//!   [`mock::MockPinsHandle`]. Used in tests and on development machines.
//! - `rpi::RpiPins`: Raspberry Pi GPIO via `rppal`, compiled only with the
//!   `hardware-rpi` feature.
//!
//! [`devices::AnyPinBackend`] wraps whichever backend configuration selects:
//!
//! ```
//! use gatelock_core::{BackendKind, GpioConfig, LineState, OutputLine};
//! use gatelock_hardware::devices::AnyPinBackend;
//! use gatelock_hardware::traits::PinInterface;
//!
//! let pins = AnyPinBackend::open(&GpioConfig::default(), BackendKind::Mock)?;
//! pins.write(OutputLine::Acknowledge, LineState::High)?;
//! pins.close()?;
//! # Ok::<(), gatelock_hardware::HardwareError>(())
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] with a
//! [`HardwareError`]. Only initialization failures are fatal; read and write
//! failures on an open backend are reported to the caller, which logs them
//! and carries on.
//!
//! # Thread Safety
//!
//! [`PinInterface`] requires `Send + Sync` and takes `&self` everywhere, so a
//! backend can sit behind an `Arc` shared by the poll loop and concurrent
//! relay triggers.

pub mod devices;
pub mod error;
pub mod mock;
#[cfg(any(feature = "hardware-rpi", test))]
mod outputs;
#[cfg(feature = "hardware-rpi")]
pub mod rpi;
pub mod traits;
pub mod types;

pub use devices::{AnyPinBackend, resolve_backend};
pub use error::{HardwareError, Result};
pub use traits::PinInterface;
pub use types::BackendInfo;
