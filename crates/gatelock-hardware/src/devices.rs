//! Enum wrapper for pin backend dispatch.
//!
//! The controller is generic over [`PinInterface`]; the binary picks the
//! concrete backend at runtime from configuration. [`AnyPinBackend`] gives it
//! one concrete type to hold either way, with the real GPIO variant only
//! present when the `hardware-rpi` feature is enabled.
//!
//! # Examples
//!
//! ```
//! use gatelock_core::{BackendKind, GpioConfig};
//! use gatelock_hardware::devices::AnyPinBackend;
//! use gatelock_hardware::traits::PinInterface;
//!
//! let pins = AnyPinBackend::open(&GpioConfig::default(), BackendKind::Mock).unwrap();
//! assert_eq!(pins.info().name, "mock");
//! ```

use crate::mock::MockPins;
#[cfg(feature = "hardware-rpi")]
use crate::rpi::RpiPins;
use crate::traits::PinInterface;
use crate::{BackendInfo, Result};
use gatelock_core::{BackendKind, GpioConfig, LineState, OutputLine};
use tracing::info;

/// Whether real GPIO can be used by this build on this platform.
pub const HARDWARE_AVAILABLE: bool = cfg!(all(
    feature = "hardware-rpi",
    target_os = "linux",
    target_arch = "aarch64"
));

/// Resolve `auto` to a concrete backend kind.
///
/// Explicit choices are returned unchanged.
#[must_use]
pub fn resolve_backend(kind: BackendKind) -> BackendKind {
    match kind {
        BackendKind::Auto if HARDWARE_AVAILABLE => BackendKind::Rpi,
        BackendKind::Auto => BackendKind::Mock,
        explicit => explicit,
    }
}

/// Concrete pin backend selected at runtime.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyPinBackend {
    /// Simulated lines.
    Mock(MockPins),

    /// Raspberry Pi GPIO.
    #[cfg(feature = "hardware-rpi")]
    Rpi(RpiPins),
}

impl AnyPinBackend {
    /// Open the backend selected by `kind` for the given pin assignment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HardwareError::InitializationFailed`] if the real backend
    /// cannot be opened or was not compiled into this build.
    pub fn open(gpio: &GpioConfig, kind: BackendKind) -> Result<Self> {
        let resolved = resolve_backend(kind);
        info!(requested = ?kind, resolved = ?resolved, "Selecting pin backend");

        match resolved {
            BackendKind::Rpi => Self::open_rpi(gpio),
            _ => {
                let (pins, _handle) = MockPins::new(gpio);
                Ok(Self::Mock(pins))
            }
        }
    }

    #[cfg(feature = "hardware-rpi")]
    fn open_rpi(gpio: &GpioConfig) -> Result<Self> {
        RpiPins::open(gpio).map(Self::Rpi)
    }

    #[cfg(not(feature = "hardware-rpi"))]
    fn open_rpi(_gpio: &GpioConfig) -> Result<Self> {
        Err(crate::HardwareError::initialization_failed(
            "rpi backend requested but this build lacks the hardware-rpi feature",
        ))
    }
}

impl From<MockPins> for AnyPinBackend {
    fn from(pins: MockPins) -> Self {
        Self::Mock(pins)
    }
}

impl PinInterface for AnyPinBackend {
    fn read_signal(&self) -> Result<LineState> {
        match self {
            Self::Mock(pins) => pins.read_signal(),
            #[cfg(feature = "hardware-rpi")]
            Self::Rpi(pins) => pins.read_signal(),
        }
    }

    fn write(&self, line: OutputLine, state: LineState) -> Result<()> {
        match self {
            Self::Mock(pins) => pins.write(line, state),
            #[cfg(feature = "hardware-rpi")]
            Self::Rpi(pins) => pins.write(line, state),
        }
    }

    fn close(&self) -> Result<()> {
        match self {
            Self::Mock(pins) => pins.close(),
            #[cfg(feature = "hardware-rpi")]
            Self::Rpi(pins) => pins.close(),
        }
    }

    fn info(&self) -> BackendInfo {
        match self {
            Self::Mock(pins) => pins.info(),
            #[cfg(feature = "hardware-rpi")]
            Self::Rpi(pins) => pins.info(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_backend_unchanged() {
        assert_eq!(resolve_backend(BackendKind::Mock), BackendKind::Mock);
        assert_eq!(resolve_backend(BackendKind::Rpi), BackendKind::Rpi);
    }

    #[test]
    fn test_resolve_auto_backend() {
        let expected = if HARDWARE_AVAILABLE {
            BackendKind::Rpi
        } else {
            BackendKind::Mock
        };
        assert_eq!(resolve_backend(BackendKind::Auto), expected);
    }

    #[test]
    fn test_open_mock_backend() {
        let pins = AnyPinBackend::open(&GpioConfig::default(), BackendKind::Mock).unwrap();
        assert!(pins.info().is_mock());
        assert_eq!(pins.read_signal().unwrap(), LineState::Low);
    }

    #[cfg(not(feature = "hardware-rpi"))]
    #[test]
    fn test_open_rpi_without_feature_is_fatal() {
        let error = AnyPinBackend::open(&GpioConfig::default(), BackendKind::Rpi).unwrap_err();
        assert!(error.is_fatal());
    }

    #[test]
    fn test_dispatch_close_releases_outputs() {
        let (mock, handle) = MockPins::new(&GpioConfig::default());
        let pins = AnyPinBackend::from(mock);

        pins.write(OutputLine::Relay, LineState::High).unwrap();
        assert!(handle.is_active(OutputLine::Relay));

        pins.close().unwrap();
        assert!(!handle.is_active(OutputLine::Relay));
        assert!(handle.is_closed());
    }
}
