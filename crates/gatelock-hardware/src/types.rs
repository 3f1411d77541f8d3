//! Common types shared across pin backend implementations.

use gatelock_core::{GpioConfig, PinNumber};
use serde::{Deserialize, Serialize};

/// Backend metadata.
///
/// Contains the backend name and the pin assignment it was opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Backend name (e.g., "mock", "rpi").
    pub name: String,

    /// Signal input pin.
    pub signal_pin: PinNumber,

    /// Acknowledgement output pin.
    pub ack_pin: PinNumber,

    /// Relay output pin.
    pub relay_pin: PinNumber,
}

impl BackendInfo {
    /// Create backend info from a pin assignment.
    pub fn new(name: impl Into<String>, gpio: &GpioConfig) -> Self {
        Self {
            name: name.into(),
            signal_pin: gpio.signal_pin,
            ack_pin: gpio.ack_pin,
            relay_pin: gpio.relay_pin,
        }
    }

    /// Whether this is a simulated backend.
    pub fn is_mock(&self) -> bool {
        self.name == "mock"
    }
}
