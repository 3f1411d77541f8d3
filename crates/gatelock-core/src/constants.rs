//! Timing and wiring constants for the gate controller.
//!
//! These values describe the contract with the peripheral device (the
//! microcontroller that owns the physical button and the lock relay). The
//! peripheral samples our acknowledgement line and its own button input, so
//! the hold durations below are long enough for it to observe a level change
//! on a light-sleep wake.
//!
//! # Line Roles
//!
//! | Role | Direction | Default GPIO | Meaning when Active |
//! |------|-----------|--------------|---------------------|
//! | Signal | input | 26 | Peripheral reports a button press |
//! | Acknowledgement | output | 15 | Tell the peripheral to unlock |
//! | Relay | output | 25 | Simulate a press on the peripheral's button |
//!
//! # Usage
//!
//! ```
//! use gatelock_core::constants::*;
//! use std::time::Duration;
//!
//! let window = Duration::from_millis(DEFAULT_DEBOUNCE_WINDOW_MS);
//! assert_eq!(window.as_millis(), 250);
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

// ============================================================================
// Debounce and Polling
// ============================================================================

/// Minimum spacing between two accepted detections on the signal line (milliseconds).
///
/// # Value: 250ms
pub const DEFAULT_DEBOUNCE_WINDOW_MS: u64 = 250;

/// Period of the poll loop that samples the signal line (milliseconds).
///
/// # Value: 100ms
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// ============================================================================
// Pulse Holds
// ============================================================================

/// How long the relay line is held Active to simulate a button press (milliseconds).
///
/// The relay is wired in parallel with the physical button, so the hold must
/// exceed the peripheral's own button debounce.
///
/// # Value: 500ms
pub const DEFAULT_RELAY_HOLD_MS: u64 = 500;

/// How long the acknowledgement line is held Active (milliseconds).
///
/// # Value: 100ms
pub const DEFAULT_ACK_HOLD_MS: u64 = 100;

// ============================================================================
// Announcement
// ============================================================================

/// Upper bound on a single announcement call (milliseconds).
///
/// The peripheral gives up waiting for an acknowledgement after 5 seconds, so
/// an announcement slower than this would forfeit the unlock entirely.
///
/// # Value: 5000ms
pub const DEFAULT_ANNOUNCEMENT_TIMEOUT_MS: u64 = 5000;

/// Divisor applied to the reported voice length to get the unlock delay.
///
/// The acknowledgement fires a quarter of the way into the announcement. No
/// upper bound is applied to the result.
///
/// # Examples
///
/// ```
/// use gatelock_core::constants::ANNOUNCEMENT_DELAY_DIVISOR;
///
/// let voice_length_ms = 2000;
/// assert_eq!(voice_length_ms / ANNOUNCEMENT_DELAY_DIVISOR, 500);
/// ```
pub const ANNOUNCEMENT_DELAY_DIVISOR: u64 = 4;

/// Default host (and port) of the announcement service.
pub const DEFAULT_ANNOUNCEMENT_HOST: &str = "lightning-control.local:8080";

/// Path of the announcement trigger endpoint.
pub const ANNOUNCEMENT_PATH: &str = "/doorbell";

// ============================================================================
// Wiring
// ============================================================================

/// Default GPIO for the signal input (peripheral's DEVICE_SIGNAL output).
pub const DEFAULT_SIGNAL_PIN: u8 = 26;

/// Default GPIO for the acknowledgement output (peripheral's DEVICE_RESPONSE input).
pub const DEFAULT_ACK_PIN: u8 = 15;

/// Default GPIO for the relay output (wired parallel to the physical button).
pub const DEFAULT_RELAY_PIN: u8 = 25;

/// Highest BCM GPIO number exposed on the 40-pin header.
pub const MAX_GPIO_PIN: u8 = 27;

// ============================================================================
// Service
// ============================================================================

/// Default bind address of the command API.
pub const DEFAULT_API_BIND_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "gatelock.json";

/// Environment variable overriding the configuration file path.
pub const CONFIG_ENV_VAR: &str = "GATELOCK_CONFIG";

/// Message returned by the status endpoint.
pub const MSG_RUNNING: &str = "Gate locker is running";

/// Message returned by the unlock endpoint.
pub const MSG_UNLOCK_TRIGGERED: &str = "Unlock triggered";
