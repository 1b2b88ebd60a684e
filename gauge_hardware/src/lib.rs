//! Motor and sensor backends for the gauge controller.
//!
//! - `sim`: deterministic stepper/sensor pair sharing one needle, used by
//!   tests and by the CLI when built without the `hardware` feature.
//! - `stepper`: `accel-stepper` driver stepping any `CoilOutput` in full steps.
//! - `gpio` (feature `hardware`, Linux): rppal coil lines and zero sensor.
pub mod error;
#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod gpio;
pub mod sim;
pub mod stepper;

pub use error::HwError;
pub use sim::{Needle, SimulatedStepper, SimulatedZeroSensor, simulated_pair};
pub use stepper::{CoilOutput, FULL_STEP, FourWireStepper};
