//! Raspberry Pi GPIO backend built on `rppal`.
//!
//! Only compiled with the `hardware-rpi` feature. The signal line is opened
//! with the pull resistor that holds it Inactive when nothing drives it;
//! both outputs start at their Inactive level.

use crate::outputs::OutputLatch;
use crate::{HardwareError, Result, traits::PinInterface, types::BackendInfo};
use gatelock_core::{GpioConfig, LineState, OutputLine, Polarity};
use rppal::gpio::{Gpio, InputPin, Level, OutputPin};
use tracing::{debug, info, warn};

fn to_level(state: LineState) -> Level {
    match state {
        LineState::High => Level::High,
        LineState::Low => Level::Low,
    }
}

fn from_level(level: Level) -> LineState {
    LineState::from_bool(level == Level::High)
}

/// GPIO lines on a Raspberry Pi header.
#[derive(Debug)]
pub struct RpiPins {
    signal: InputPin,
    outputs: OutputLatch<OutputPin>,
    gpio: GpioConfig,
}
impl RpiPins {
    /// Open the three configured lines.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::InitializationFailed`] if the GPIO peripheral
    /// cannot be accessed or any pin is already in use.
    pub fn open(gpio: &GpioConfig) -> Result<Self> {
        let chip = Gpio::new().map_err(|e| {
            HardwareError::initialization_failed(format!("cannot access GPIO: {e}"))
        })?;

        let get = |pin: gatelock_core::PinNumber| {
            chip.get(pin.as_u8()).map_err(|e| {
                HardwareError::initialization_failed(format!("cannot claim {pin}: {e}"))
            })
        };

        let signal_pin = get(gpio.signal_pin)?;
        let signal = match gpio.signal_polarity {
            Polarity::ActiveHigh => signal_pin.into_input_pulldown(),
            Polarity::ActiveLow => signal_pin.into_input_pullup(),
        };

        let ack = Self::open_output(get(gpio.ack_pin)?, gpio.ack_polarity);
        let relay = Self::open_output(get(gpio.relay_pin)?, gpio.relay_polarity);

        info!(
            backend = "rpi",
            signal_pin = %gpio.signal_pin,
            ack_pin = %gpio.ack_pin,
            relay_pin = %gpio.relay_pin,
            "Opened GPIO lines"
        );

        Ok(Self {
            signal,
            outputs: OutputLatch::new(ack, relay),
            gpio: gpio.clone(),
        })
    }

    fn open_output(pin: rppal::gpio::Pin, polarity: Polarity) -> OutputPin {
        let mut output = match polarity.inactive_level() {
            LineState::Low => pin.into_output_low(),
            LineState::High => pin.into_output_high(),
        };
        // close() leaves the line Inactive; keep it that way after drop.
        output.set_reset_on_drop(false);
        output
    }
}

impl PinInterface for RpiPins {
    fn read_signal(&self) -> Result<LineState> {
        if self.outputs.is_closed() {
            return Err(HardwareError::Closed);
        }
        Ok(from_level(self.signal.read()))
    }

    fn write(&self, line: OutputLine, state: LineState) -> Result<()> {
        debug!(backend = "rpi", %line, level = %state, "Output line write");
        self.outputs.write(line, |pin| pin.write(to_level(state)))
    }

    fn close(&self) -> Result<()> {
        let released = self.outputs.close(|line, pin| {
            let inactive = self.gpio.output_polarity(line).inactive_level();
            pin.write(to_level(inactive));
        })?;

        if released {
            info!(backend = "rpi", "Closed GPIO lines");
        }
        Ok(())
    }

    fn info(&self) -> BackendInfo {
        BackendInfo::new("rpi", &self.gpio)
    }
}

impl Drop for RpiPins {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(backend = "rpi", error = %e, "Close on drop failed");
        }
    }
}
