//! 4-wire full-step motor on top of the `accel-stepper` driver.
//!
//! Speed ramping and step timing belong to `accel_stepper::Driver`; this
//! module only turns each step it emits into a coil pattern.

use std::time::Instant;

use accel_stepper::{Device, Driver, StepContext, SystemClock};
use gauge_traits::{Clock, MotorDriver};
use tracing::trace;

use crate::error::{HwError, Result};

/// Full-step energizing pattern for coils 1..4 (bit 0 = coil 1).
pub const FULL_STEP: [u8; 4] = [0b0101, 0b0110, 0b1010, 0b1001];

/// Something that can energize the four coil lines of a stepper.
pub trait CoilOutput {
    /// Drive the lines according to `mask` (bit i -> line i).
    fn energize(&mut self, mask: u8) -> Result<()>;
}

struct CoilDevice<'a, O>(&'a mut O);

/// Fixed elapsed-time reading handed to `Driver::poll`.
struct Elapsed(std::time::Duration);

impl SystemClock for Elapsed {
    fn elapsed(&self) -> std::time::Duration {
        self.0
    }
}

impl<O: CoilOutput> Device for CoilDevice<'_, O> {
    type Error = HwError;

    fn step(&mut self, ctx: &StepContext) -> Result<()> {
        let phase = ctx.position.rem_euclid(4) as usize;
        trace!(position = ctx.position, "step");
        self.0.energize(FULL_STEP[phase])
    }
}

pub struct FourWireStepper<O: CoilOutput, C: Clock> {
    driver: Driver,
    coils: O,
    clock: C,
    epoch: Instant,
}

impl<O: CoilOutput, C: Clock> core::fmt::Debug for FourWireStepper<O, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FourWireStepper")
            .field("current", &self.driver.current_position())
            .field("target", &self.driver.target_position())
            .field("speed", &self.driver.speed())
            .finish_non_exhaustive()
    }
}

impl<O: CoilOutput, C: Clock> FourWireStepper<O, C> {
    pub fn new(coils: O, clock: C) -> Self {
        let epoch = clock.now();
        Self {
            driver: Driver::new(),
            coils,
            clock,
            epoch,
        }
    }

    /// Current signed speed in steps/s.
    pub fn speed(&self) -> f32 {
        self.driver.speed()
    }

    pub fn coils(&self) -> &O {
        &self.coils
    }
}

impl<O: CoilOutput, C: Clock> MotorDriver for FourWireStepper<O, C> {
    fn move_to(&mut self, absolute: i64) {
        self.driver.move_to(absolute);
    }

    fn move_by(&mut self, relative: i64) {
        self.driver.move_by(relative);
    }

    fn run(&mut self) -> std::result::Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let elapsed = self.clock.now().saturating_duration_since(self.epoch);
        self.driver
            .poll(CoilDevice(&mut self.coils), Elapsed(elapsed))?;
        Ok(self.driver.is_running())
    }

    fn current_position(&self) -> i64 {
        self.driver.current_position()
    }

    fn target_position(&self) -> i64 {
        self.driver.target_position()
    }

    fn distance_to_go(&self) -> i64 {
        self.driver.distance_to_go()
    }

    fn set_current_position(&mut self, position: i64) {
        self.driver.set_current_position(position);
    }

    fn stop(&mut self) {
        self.driver.stop();
    }

    fn set_max_speed(&mut self, steps_per_sec: f32) {
        self.driver.set_max_speed(steps_per_sec.abs());
    }

    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        self.driver.set_acceleration(steps_per_sec2.abs());
    }
}
