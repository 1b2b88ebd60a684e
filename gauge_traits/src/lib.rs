//! Collaborator seams for the gauge controller.
//!
//! The controller never touches pins directly. Everything it needs from the
//! outside world goes through these traits so the same core drives real
//! hardware, the simulator, and test spies.
pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// A stepper driver that keeps its own absolute step counter.
///
/// Position commands are bookkeeping only; pulses are produced by `run`,
/// which advances at most one step per call and never blocks.
pub trait MotorDriver {
    /// Set an absolute target position in steps.
    fn move_to(&mut self, absolute: i64);

    /// Set a target relative to the current position.
    fn move_by(&mut self, relative: i64) {
        let target = self.current_position() + relative;
        self.move_to(target);
    }

    /// Take at most one step if one is due. Returns true while the motor
    /// still has distance to go.
    fn run(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    fn current_position(&self) -> i64;

    fn target_position(&self) -> i64;

    fn distance_to_go(&self) -> i64 {
        self.target_position() - self.current_position()
    }

    /// Redefine the current position. Also cancels any pending move: the
    /// target becomes `position` and the speed drops to zero.
    fn set_current_position(&mut self, position: i64);

    /// Decelerating stop using the configured acceleration.
    fn stop(&mut self);

    /// Cancel the pending move immediately, without deceleration.
    fn hard_stop(&mut self) {
        let here = self.current_position();
        self.set_current_position(here);
    }

    fn set_max_speed(&mut self, steps_per_sec: f32);

    fn set_acceleration(&mut self, steps_per_sec2: f32);
}

/// Binary reference sensor marking the needle's physical zero.
pub trait ZeroSensor {
    /// True while the needle sits on the reference mark.
    fn is_active(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: MotorDriver + ?Sized> MotorDriver for Box<T> {
    fn move_to(&mut self, absolute: i64) {
        (**self).move_to(absolute);
    }
    fn move_by(&mut self, relative: i64) {
        (**self).move_by(relative);
    }
    fn run(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        (**self).run()
    }
    fn current_position(&self) -> i64 {
        (**self).current_position()
    }
    fn target_position(&self) -> i64 {
        (**self).target_position()
    }
    fn distance_to_go(&self) -> i64 {
        (**self).distance_to_go()
    }
    fn set_current_position(&mut self, position: i64) {
        (**self).set_current_position(position);
    }
    fn stop(&mut self) {
        (**self).stop();
    }
    fn hard_stop(&mut self) {
        (**self).hard_stop();
    }
    fn set_max_speed(&mut self, steps_per_sec: f32) {
        (**self).set_max_speed(steps_per_sec);
    }
    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        (**self).set_acceleration(steps_per_sec2);
    }
}

impl<T: ZeroSensor + ?Sized> ZeroSensor for Box<T> {
    fn is_active(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        (**self).is_active()
    }
}
