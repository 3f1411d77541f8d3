use crate::{Result, constants::MAX_GPIO_PIN, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// BCM GPIO pin number (0-27)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PinNumber(pub(crate) u8);

impl PinNumber {
    /// Create a new pin number with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidPin` if the number is above the highest header GPIO.
    pub fn new(pin: u8) -> Result<Self> {
        if pin > MAX_GPIO_PIN {
            return Err(Error::InvalidPin(format!(
                "GPIO must be 0-{MAX_GPIO_PIN}, got {pin}"
            )));
        }
        Ok(PinNumber(pin))
    }

    /// Get the raw pin number.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for PinNumber {
    type Error = Error;

    fn try_from(pin: u8) -> Result<Self> {
        PinNumber::new(pin)
    }
}

impl From<PinNumber> for u8 {
    fn from(pin: PinNumber) -> Self {
        pin.0
    }
}

impl fmt::Display for PinNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Logical level of a digital line.
///
/// Reasoning in the controller is always done in terms of Active/Inactive;
/// [`Polarity`] maps those onto a `LineState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineState {
    Low,
    High,
}

impl LineState {
    #[must_use]
    pub fn from_bool(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl fmt::Display for LineState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Which level of a line counts as Active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Active when the line is HIGH (pull-down input, relay energised on HIGH).
    #[default]
    ActiveHigh,

    /// Active when the line is LOW (pull-up input, open-drain style output).
    ActiveLow,
}

impl Polarity {
    /// Level that represents Active for this polarity.
    #[must_use]
    pub fn active_level(&self) -> LineState {
        match self {
            Self::ActiveHigh => LineState::High,
            Self::ActiveLow => LineState::Low,
        }
    }

    /// Level that represents Inactive for this polarity.
    #[must_use]
    pub fn inactive_level(&self) -> LineState {
        match self {
            Self::ActiveHigh => LineState::Low,
            Self::ActiveLow => LineState::High,
        }
    }

    /// Check whether an observed level is Active.
    #[must_use]
    pub fn is_active(&self, level: LineState) -> bool {
        level == self.active_level()
    }
}

/// The two writable lines owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLine {
    /// Acknowledgement to the peripheral device ("proceed with unlock").
    Acknowledge,

    /// Relay wired in parallel with the peripheral's physical button.
    Relay,
}

impl OutputLine {
    /// Both output lines, in release order used by `close()`.
    pub const ALL: [OutputLine; 2] = [OutputLine::Acknowledge, OutputLine::Relay];
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Acknowledge => write!(f, "acknowledge"),
            Self::Relay => write!(f, "relay"),
        }
    }
}
