//! rppal-backed coil outputs and zero sensor input.

use gauge_traits::{Clock, ZeroSensor};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use tracing::{debug, trace};

use crate::error::{HwError, Result};
use crate::stepper::{CoilOutput, FourWireStepper};

fn gpio_err(e: rppal::gpio::Error) -> HwError {
    HwError::Gpio(e.to_string())
}

/// Four coil lines in driver order.
pub struct GpioCoils {
    lines: [OutputPin; 4],
}

impl GpioCoils {
    pub fn open(gpio: &Gpio, pins: [u8; 4]) -> Result<Self> {
        let [a, b, c, d] = pins;
        let mut lines = [
            gpio.get(a).map_err(gpio_err)?.into_output(),
            gpio.get(b).map_err(gpio_err)?.into_output(),
            gpio.get(c).map_err(gpio_err)?.into_output(),
            gpio.get(d).map_err(gpio_err)?.into_output(),
        ];
        for line in &mut lines {
            line.set_low();
        }
        debug!(?pins, "coil lines opened");
        Ok(Self { lines })
    }
}

impl CoilOutput for GpioCoils {
    fn energize(&mut self, mask: u8) -> Result<()> {
        for (i, line) in self.lines.iter_mut().enumerate() {
            if mask & (1 << i) != 0 {
                line.set_high();
            } else {
                line.set_low();
            }
        }
        Ok(())
    }
}

/// Ramped 4-wire stepper on GPIO lines.
pub type GpioStepper<C> = FourWireStepper<GpioCoils, C>;

/// Open a 4-wire stepper on the given pins, already in driver order.
pub fn open_four_wire<C: Clock>(pins: [u8; 4], clock: C) -> Result<GpioStepper<C>> {
    let gpio = Gpio::new().map_err(gpio_err)?;
    let coils = GpioCoils::open(&gpio, pins)?;
    Ok(FourWireStepper::new(coils, clock))
}

/// Hall/opto zero sensor with pull-up; the line reads low on the mark.
pub struct GpioZeroSensor {
    pin: InputPin,
}

impl GpioZeroSensor {
    pub fn open(pin: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(gpio_err)?;
        let pin = gpio.get(pin).map_err(gpio_err)?.into_input_pullup();
        Ok(Self { pin })
    }
}

impl ZeroSensor for GpioZeroSensor {
    fn is_active(&mut self) -> std::result::Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let active = self.pin.is_low();
        trace!(active, "zero sensor poll");
        Ok(active)
    }
}
