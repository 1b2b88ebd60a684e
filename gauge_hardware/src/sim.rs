//! Simulated gauge mechanics: a stepper that moves a shared needle and a
//! zero sensor that watches the same needle.

use std::cell::Cell;
use std::rc::Rc;

use gauge_traits::{MotorDriver, ZeroSensor};
use tracing::trace;

/// Physical needle position in steps, shared by a simulated motor and sensor.
///
/// The value is the needle's true position on the dial and is independent of
/// the driver's logical step counter, so re-referencing the driver does not
/// move the needle.
#[derive(Debug, Clone, Default)]
pub struct Needle(Rc<Cell<i64>>);

impl Needle {
    pub fn new(position: i64) -> Self {
        Self(Rc::new(Cell::new(position)))
    }

    pub fn position(&self) -> i64 {
        self.0.get()
    }

    pub fn set_position(&self, position: i64) {
        self.0.set(position);
    }

    fn nudge(&self, delta: i64) {
        self.0.set(self.0.get() + delta);
    }
}

/// Stepper that takes exactly one step per `run` call while it has distance
/// to go. Speed and acceleration settings are recorded but do not pace it.
#[derive(Debug)]
pub struct SimulatedStepper {
    needle: Needle,
    current: i64,
    target: i64,
    max_speed: f32,
    acceleration: f32,
    steps_taken: u64,
}

impl SimulatedStepper {
    pub fn new(needle: Needle) -> Self {
        Self {
            needle,
            current: 0,
            target: 0,
            max_speed: 1.0,
            acceleration: 1.0,
            steps_taken: 0,
        }
    }

    pub fn needle(&self) -> &Needle {
        &self.needle
    }

    /// Last speed limit applied, in steps/s.
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Last acceleration applied, in steps/s².
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Total steps emitted since construction.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }
}

impl MotorDriver for SimulatedStepper {
    fn move_to(&mut self, absolute: i64) {
        self.target = absolute;
    }

    fn run(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let delta = (self.target - self.current).signum();
        if delta != 0 {
            self.current += delta;
            self.needle.nudge(delta);
            self.steps_taken += 1;
            trace!(
                position = self.current,
                needle = self.needle.position(),
                "sim step"
            );
        }
        Ok(self.current != self.target)
    }

    fn current_position(&self) -> i64 {
        self.current
    }

    fn target_position(&self) -> i64 {
        self.target
    }

    fn set_current_position(&mut self, position: i64) {
        self.current = position;
        self.target = position;
    }

    fn stop(&mut self) {
        self.target = self.current;
    }

    fn set_max_speed(&mut self, steps_per_sec: f32) {
        self.max_speed = steps_per_sec;
    }

    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        self.acceleration = steps_per_sec2;
    }
}

/// Zero sensor that is active while the needle is inside `[0, width)`.
///
/// With a revolution length set, the needle position is reduced modulo that
/// length first, so the mark is seen once per turn.
#[derive(Debug, Clone)]
pub struct SimulatedZeroSensor {
    needle: Needle,
    width: i64,
    revolution: Option<i64>,
    reads: Rc<Cell<u64>>,
}

impl SimulatedZeroSensor {
    pub fn new(needle: Needle, width: i64) -> Self {
        Self {
            needle,
            width: width.max(1),
            revolution: None,
            reads: Rc::new(Cell::new(0)),
        }
    }

    /// Treat the dial as continuous with the given steps per turn.
    pub fn with_revolution(mut self, steps_per_revolution: i64) -> Self {
        self.revolution = (steps_per_revolution > 0).then_some(steps_per_revolution);
        self
    }

    /// Number of times the sensor has been polled.
    pub fn reads(&self) -> u64 {
        self.reads.get()
    }
}

impl ZeroSensor for SimulatedZeroSensor {
    fn is_active(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.reads.set(self.reads.get() + 1);
        let pos = match self.revolution {
            Some(rev) => self.needle.position().rem_euclid(rev),
            None => self.needle.position(),
        };
        Ok((0..self.width).contains(&pos))
    }
}

/// Build a stepper and its zero sensor over one needle.
pub fn simulated_pair(start: i64, sensor_width: i64) -> (SimulatedStepper, SimulatedZeroSensor) {
    let needle = Needle::new(start);
    (
        SimulatedStepper::new(needle.clone()),
        SimulatedZeroSensor::new(needle, sensor_width),
    )
}
