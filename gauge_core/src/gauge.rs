//! One gauge: geometry, runtime state, and its exclusively owned collaborators.
//!
//! `GaugeCore` is generic over the motor driver and zero sensor so tests and
//! the simulator get static dispatch; `Gauge` is the boxed form used by the
//! panel and the CLI.

use std::sync::Arc;

use eyre::WrapErr;
use gauge_traits::{Clock, MotorDriver, ZeroSensor};
use tracing::{debug, info, trace};

use crate::config::{HomingCfg, MotionCfg, MotionProfile, RunCfg};
use crate::error::Result;
use crate::geometry::GaugeConfig;
use crate::hw_error::map_hw_error;
use crate::resolver::{self, MoveCommand, Resolution, Trend};
use crate::state::GaugeState;
use crate::status::TickStatus;

/// Boxed gauge used where motors and sensors are chosen at runtime.
pub type Gauge = GaugeCore<Box<dyn MotorDriver>, Box<dyn ZeroSensor>>;

pub struct GaugeCore<M: MotorDriver, Z: ZeroSensor> {
    pub(crate) config: GaugeConfig,
    pub(crate) state: GaugeState,
    pub(crate) motor: M,
    pub(crate) sensor: Z,
    pub(crate) motion: MotionCfg,
    pub(crate) homing: HomingCfg,
    pub(crate) run: RunCfg,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
}

impl<M: MotorDriver, Z: ZeroSensor> core::fmt::Debug for GaugeCore<M, Z> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GaugeCore")
            .field("name", &self.config.name)
            .field("kind", &self.config.kind)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<M: MotorDriver, Z: ZeroSensor> GaugeCore<M, Z> {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn state(&self) -> &GaugeState {
        &self.state
    }

    pub fn motor(&self) -> &M {
        &self.motor
    }

    pub fn sensor(&self) -> &Z {
        &self.sensor
    }

    pub fn motion(&self) -> &MotionCfg {
        &self.motion
    }

    /// True when the motor has no distance left to go.
    pub fn is_idle(&self) -> bool {
        self.motor.distance_to_go() == 0
    }

    pub(crate) fn apply_profile(&mut self, profile: MotionProfile) {
        self.motor.set_max_speed(profile.max_speed);
        self.motor.set_acceleration(profile.acceleration);
    }

    /// Apply the startup motion profile and sync state with the driver.
    pub fn initialize(&mut self) {
        self.apply_profile(self.motion.initial);
        let here = self.motor.current_position();
        self.state.current_position_steps = here;
        self.state.target_position_steps = here;
        debug!(
            gauge = %self.config.name,
            wiring = ?self.config.wiring_order,
            motor = %self.config.motor_variant,
            max_speed = self.motion.initial.max_speed,
            "gauge initialized"
        );
    }

    /// Resolve a raw host value and command the motor toward it.
    ///
    /// `climb_rate` only matters for rotational gauges: non-negative turns the
    /// needle forward, negative turns it backward.
    pub fn update_target(&mut self, raw: u16, climb_rate: i32) -> Resolution {
        let trend = Trend::from_rate(climb_rate);
        // relative moves are applied to the driver's counter
        self.state.current_position_steps = self.motor.current_position();
        let res = resolver::resolve(&self.config, raw, trend, self.state.current_position_steps);
        self.state.target_position_steps = res.target;
        match res.command {
            MoveCommand::Absolute(target) => self.motor.move_to(target),
            MoveCommand::Relative(delta) => self.motor.move_by(delta),
        }
        debug!(
            gauge = %self.config.name,
            raw,
            ?trend,
            target = res.target,
            relative = res.relative,
            "target updated"
        );
        res
    }

    /// One non-blocking run-loop iteration.
    ///
    /// Advances the motor by at most one step, refreshes the tracked position
    /// and, for zeroable gauges, re-references the position when the sensor
    /// fires outside the debounce window.
    pub fn tick(&mut self) -> Result<TickStatus> {
        let moving = self
            .motor
            .run()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("motor run")?;
        self.state.current_position_steps = self.motor.current_position();

        if self.config.zeroable {
            let active = self
                .sensor
                .is_active()
                .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
                .wrap_err("zero sensor read")?;
            if active {
                let now = self.clock.now();
                if self.state.debounce_elapsed(now, self.run.debounce_ms) {
                    return self.rezero(now);
                }
                trace!(gauge = %self.config.name, "zero sensor active inside debounce window");
            }
        }

        Ok(if moving {
            TickStatus::Moving
        } else {
            TickStatus::Idle
        })
    }

    fn rezero(&mut self, now: std::time::Instant) -> Result<TickStatus> {
        let home = self.config.home_position_steps;
        let mut drift = self.motor.current_position() - home;

        self.motor.set_current_position(home);
        self.state.current_position_steps = self.motor.current_position();

        if self.config.is_rotational() {
            // Drop whole turns the logical frame picked up so the stored
            // target stays within a revolution of the new reference.
            let n = i64::from(self.config.steps_per_revolution.max(1));
            let turns = (drift + n / 2).div_euclid(n);
            self.state.target_position_steps -= turns * n;
            drift -= turns * n;
        }

        self.motor.move_to(self.state.target_position_steps);
        self.motor
            .run()
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("motor run after re-reference")?;
        self.state.current_position_steps = self.motor.current_position();
        self.state.last_zero_trigger = Some(now);

        info!(
            gauge = %self.config.name,
            drift_steps = drift,
            target = self.state.target_position_steps,
            "position re-referenced at zero sensor"
        );
        Ok(TickStatus::Rezeroed { drift_steps: drift })
    }

    /// Cancel any pending move at once and hold position.
    pub fn hard_stop(&mut self) {
        self.motor.hard_stop();
        let here = self.motor.current_position();
        self.state.current_position_steps = here;
        self.state.target_position_steps = here;
    }
}
