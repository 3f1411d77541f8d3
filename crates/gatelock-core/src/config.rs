//! Service configuration.
//!
//! Configuration is a single JSON document. Every section and every field has
//! a default, so an empty object (or a missing file) yields a working
//! configuration for the reference wiring.
//!
//! ```
//! use gatelock_core::Config;
//!
//! let config: Config = serde_json::from_str(r#"{ "announcement": { "enabled": true } }"#).unwrap();
//! assert!(config.announcement.enabled);
//! assert_eq!(config.gpio.signal_pin.as_u8(), 26);
//! ```

use crate::constants::*;
use crate::error::{Error, Result};
use crate::types::{OutputLine, PinNumber, Polarity};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pin roles and backend selection.
    pub gpio: GpioConfig,

    /// Command API.
    pub api: ApiConfig,

    /// Announcement collaborator.
    pub announcement: AnnouncementConfig,

    /// Debounce, poll and pulse timings.
    pub timing: TimingConfig,
}

/// Which pin backend to open at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Real GPIO on 64-bit ARM Linux builds with hardware support, mock otherwise.
    #[default]
    Auto,

    /// Simulated pins.
    Mock,

    /// Raspberry Pi GPIO.
    Rpi,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "mock" => Ok(Self::Mock),
            "rpi" => Ok(Self::Rpi),
            other => Err(Error::Config(format!(
                "Unknown backend '{other}' (expected auto, mock or rpi)"
            ))),
        }
    }
}

/// Pin role assignment. Immutable once the controller has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpioConfig {
    /// Input: receives the button signal from the peripheral device.
    pub signal_pin: PinNumber,

    /// Output: tells the peripheral device to unlock.
    pub ack_pin: PinNumber,

    /// Output: drives the relay that simulates a button press.
    pub relay_pin: PinNumber,

    pub signal_polarity: Polarity,
    pub ack_polarity: Polarity,
    pub relay_polarity: Polarity,

    /// Backend selection.
    pub backend: BackendKind,
}

impl GpioConfig {
    /// Polarity for an output line.
    #[must_use]
    pub fn output_polarity(&self, line: OutputLine) -> Polarity {
        match line {
            OutputLine::Acknowledge => self.ack_polarity,
            OutputLine::Relay => self.relay_polarity,
        }
    }

    fn validate(&self) -> Result<()> {
        let roles = [
            ("signal", self.signal_pin),
            ("acknowledge", self.ack_pin),
            ("relay", self.relay_pin),
        ];

        for (i, (first, pin)) in roles.iter().enumerate() {
            if let Some((second, _)) = roles[i + 1..].iter().find(|(_, other)| other == pin) {
                return Err(Error::DuplicatePin {
                    pin: pin.as_u8(),
                    first: (*first).to_string(),
                    second: (*second).to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            signal_pin: PinNumber(DEFAULT_SIGNAL_PIN),
            ack_pin: PinNumber(DEFAULT_ACK_PIN),
            relay_pin: PinNumber(DEFAULT_RELAY_PIN),
            signal_polarity: Polarity::ActiveHigh,
            ack_polarity: Polarity::ActiveHigh,
            relay_polarity: Polarity::ActiveHigh,
            backend: BackendKind::Auto,
        }
    }
}

/// Command API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address the HTTP command surface listens on.
    pub bind_addr: SocketAddr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_API_BIND_ADDR,
        }
    }
}

/// Announcement collaborator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncementConfig {
    /// When false the collaborator is never called and the unlock delay is 0.
    pub enabled: bool,

    /// `host:port` of the announcement service.
    pub host: String,
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: DEFAULT_ANNOUNCEMENT_HOST.to_string(),
        }
    }
}

/// Timing parameters, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub debounce_window_ms: u64,
    pub poll_interval_ms: u64,
    pub ack_hold_ms: u64,
    pub relay_hold_ms: u64,
    pub announcement_timeout_ms: u64,
}

impl TimingConfig {
    #[must_use]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn ack_hold(&self) -> Duration {
        Duration::from_millis(self.ack_hold_ms)
    }

    #[must_use]
    pub fn relay_hold(&self) -> Duration {
        Duration::from_millis(self.relay_hold_ms)
    }

    #[must_use]
    pub fn announcement_timeout(&self) -> Duration {
        Duration::from_millis(self.announcement_timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("debounce_window_ms", self.debounce_window_ms),
            ("poll_interval_ms", self.poll_interval_ms),
            ("ack_hold_ms", self.ack_hold_ms),
            ("relay_hold_ms", self.relay_hold_ms),
            ("announcement_timeout_ms", self.announcement_timeout_ms),
        ];

        match fields.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(Error::Config(format!("{name} must be greater than 0"))),
            None => Ok(()),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: DEFAULT_DEBOUNCE_WINDOW_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            ack_hold_ms: DEFAULT_ACK_HOLD_MS,
            relay_hold_ms: DEFAULT_RELAY_HOLD_MS,
            announcement_timeout_ms: DEFAULT_ANNOUNCEMENT_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// A missing file is not an error: the defaults are returned.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, is not valid
    /// JSON, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load configuration, writing the defaults back if the file is missing.
    ///
    /// Failure to write the default file is logged and ignored.
    ///
    /// # Errors
    /// Same as [`Config::load`].
    pub fn load_or_init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let existed = path.exists();
        let config = Self::load(path)?;

        if !existed {
            info!(path = %path.display(), "Config file not found, creating default config");
            if let Err(e) = config.save(path) {
                warn!(path = %path.display(), error = %e, "Failed to save default config");
            }
        }

        Ok(config)
    }

    /// Write configuration as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns `Error::DuplicatePin` if two roles share a pin, or
    /// `Error::Config` if any duration is zero.
    pub fn validate(&self) -> Result<()> {
        self.gpio.validate()?;
        self.timing.validate()?;
        if self.announcement.enabled && self.announcement.host.trim().is_empty() {
            return Err(Error::Config(
                "announcement.host must be set when announcements are enabled".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_match_reference_wiring() {
        let config = Config::default();
        assert_eq!(config.gpio.signal_pin.as_u8(), 26);
        assert_eq!(config.gpio.ack_pin.as_u8(), 15);
        assert_eq!(config.gpio.relay_pin.as_u8(), 25);
        assert_eq!(config.api.bind_addr.port(), 8080);
        assert!(!config.announcement.enabled);
        assert_eq!(config.timing.debounce_window(), Duration::from_millis(250));
        assert_eq!(config.timing.relay_hold(), Duration::from_millis(500));
        assert_eq!(config.timing.ack_hold(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let json = r#"{ "gpio": { "relay_pin": 17 }, "timing": { "ack_hold_ms": 150 } }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.gpio.relay_pin.as_u8(), 17);
        assert_eq!(config.gpio.signal_pin.as_u8(), 26);
        assert_eq!(config.timing.ack_hold_ms, 150);
        assert_eq!(config.timing.relay_hold_ms, DEFAULT_RELAY_HOLD_MS);
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let mut config = Config::default();
        config.gpio.relay_pin = config.gpio.signal_pin;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::DuplicatePin { pin: 26, .. }));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut config = Config::default();
        config.timing.poll_interval_ms = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn test_enabled_announcement_requires_host() {
        let mut config = Config::default();
        config.announcement.enabled = true;
        config.announcement.host = "  ".to_string();

        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_pins_and_polarity() {
        let gpio = GpioConfig::default();
        assert_eq!(gpio.ack_pin.as_u8(), 15);
        assert_eq!(gpio.relay_pin.as_u8(), 25);
        assert_eq!(gpio.output_polarity(OutputLine::Relay), Polarity::ActiveHigh);
    }

    #[rstest]
    #[case("auto", BackendKind::Auto)]
    #[case("MOCK", BackendKind::Mock)]
    #[case(" rpi ", BackendKind::Rpi)]
    fn test_backend_kind_from_str(#[case] input: &str, #[case] expected: BackendKind) {
        assert_eq!(input.parse::<BackendKind>().unwrap(), expected);
    }

    #[test]
    fn test_backend_kind_unknown() {
        assert!("sysfs".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gatelock.json");

        let config = Config::load_or_init(&path).unwrap();
        assert!(path.exists());

        let reloaded = Config::load(&path).unwrap();
        assert_eq!(config, reloaded);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_load_rejects_invalid_pin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad-pin.json");
        std::fs::write(&path, r#"{ "gpio": { "signal_pin": 99 } }"#).unwrap();

        assert!(Config::load(&path).is_err());
    }
}
