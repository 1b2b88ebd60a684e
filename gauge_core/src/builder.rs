//! Type-state builder for `Gauge` and generic `build_gauge` constructor.
//!
//! The builder enforces at compile time that a motor and a gauge config are
//! provided before `build()` is available. `try_build()` is always available
//! for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use gauge_traits::clock::{Clock, MonotonicClock};
use gauge_traits::{MotorDriver, ZeroSensor};

use crate::config::{HomingCfg, MotionCfg, MotionProfile, RunCfg};
use crate::error::{BuildError, Result};
use crate::gauge::{Gauge, GaugeCore};
use crate::geometry::GaugeConfig;
use crate::mocks::NoSensor;
use crate::state::GaugeState;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Gauge`. All fields are validated on `build()`.
pub struct GaugeBuilder<M, C> {
    motor: Option<Box<dyn MotorDriver>>,
    config: Option<GaugeConfig>,
    sensor: Option<Box<dyn ZeroSensor>>,
    motion: Option<MotionCfg>,
    homing: Option<HomingCfg>,
    run: Option<RunCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _m: PhantomData<M>,
    _c: PhantomData<C>,
}

impl Default for GaugeBuilder<Missing, Missing> {
    fn default() -> Self {
        Self {
            motor: None,
            config: None,
            sensor: None,
            motion: None,
            homing: None,
            run: None,
            clock: None,
            _m: PhantomData,
            _c: PhantomData,
        }
    }
}

impl Gauge {
    /// Start building a boxed gauge.
    pub fn builder() -> GaugeBuilder<Missing, Missing> {
        GaugeBuilder::default()
    }
}

fn check_profile(p: MotionProfile, what: &'static str) -> Result<()> {
    if !(p.max_speed.is_finite() && p.max_speed > 0.0 && p.acceleration.is_finite() && p.acceleration > 0.0)
    {
        return Err(eyre::Report::new(BuildError::InvalidConfig(what)));
    }
    Ok(())
}

/// Validate configuration and construct a `GaugeCore`.
///
/// Shared by `GaugeBuilder::try_build()` and `build_gauge()`.
fn validate_and_build<M: MotorDriver, Z: ZeroSensor>(
    config: GaugeConfig,
    motor: M,
    sensor: Z,
    motion: MotionCfg,
    homing: HomingCfg,
    run: RunCfg,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<GaugeCore<M, Z>> {
    if config.steps_per_revolution == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "steps_per_revolution must be > 0",
        )));
    }
    check_profile(motion.initial, "initial motion profile must be positive")?;
    check_profile(motion.homing, "homing motion profile must be positive")?;
    check_profile(motion.run, "run motion profile must be positive")?;
    if homing.seek_steps <= 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "seek_steps must be > 0",
        )));
    }
    if homing.offset_forward_steps < 0 || homing.fine_forward_steps < 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "forward homing moves must be >= 0",
        )));
    }
    if run.debounce_ms == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "debounce_ms must be >= 1",
        )));
    }

    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };

    Ok(GaugeCore {
        config,
        state: GaugeState::new(),
        motor,
        sensor,
        motion,
        homing,
        run,
        clock,
    })
}

impl<M, C> GaugeBuilder<M, C> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<Gauge> {
        let motor = self
            .motor
            .ok_or_else(|| eyre::Report::new(BuildError::MissingMotor))?;
        let config = self
            .config
            .ok_or_else(|| eyre::Report::new(BuildError::MissingConfig))?;
        let sensor: Box<dyn ZeroSensor> = match self.sensor {
            Some(s) => s,
            None if config.zeroable => {
                return Err(eyre::Report::new(BuildError::MissingSensor(
                    config.name.clone(),
                )));
            }
            None => Box::new(NoSensor),
        };

        validate_and_build(
            config,
            motor,
            sensor,
            self.motion.unwrap_or_default(),
            self.homing.unwrap_or_default(),
            self.run.unwrap_or_default(),
            self.clock,
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<M, C> GaugeBuilder<M, C> {
    pub fn with_sensor(mut self, sensor: impl ZeroSensor + 'static) -> Self {
        self.sensor = Some(Box::new(sensor));
        self
    }
    pub fn with_motion(mut self, motion: MotionCfg) -> Self {
        self.motion = Some(motion);
        self
    }
    pub fn with_homing(mut self, homing: HomingCfg) -> Self {
        self.homing = Some(homing);
        self
    }
    pub fn with_run(mut self, run: RunCfg) -> Self {
        self.run = Some(run);
        self
    }
    /// Provide a custom clock implementation; defaults to `MonotonicClock` when not provided.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setters that advance type-state
impl<C> GaugeBuilder<Missing, C> {
    pub fn with_motor(self, motor: impl MotorDriver + 'static) -> GaugeBuilder<Set, C> {
        GaugeBuilder {
            motor: Some(Box::new(motor)),
            config: self.config,
            sensor: self.sensor,
            motion: self.motion,
            homing: self.homing,
            run: self.run,
            clock: self.clock,
            _m: PhantomData,
            _c: PhantomData,
        }
    }
}

impl<M> GaugeBuilder<M, Missing> {
    pub fn with_config(self, config: GaugeConfig) -> GaugeBuilder<M, Set> {
        GaugeBuilder {
            motor: self.motor,
            config: Some(config),
            sensor: self.sensor,
            motion: self.motion,
            homing: self.homing,
            run: self.run,
            clock: self.clock,
            _m: PhantomData,
            _c: PhantomData,
        }
    }
}

impl GaugeBuilder<Set, Set> {
    /// Validate and build the gauge. Only available when motor and config are set.
    pub fn build(self) -> Result<Gauge> {
        self.try_build()
    }
}

/// Build a statically-dispatched gauge from a concrete motor and sensor.
///
/// Delegates to the shared `validate_and_build`. Gauges without a sensor can
/// pass `NoSensor`.
pub fn build_gauge<M, Z>(
    config: GaugeConfig,
    motor: M,
    sensor: Z,
    motion: Option<MotionCfg>,
    homing: Option<HomingCfg>,
    run: Option<RunCfg>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<GaugeCore<M, Z>>
where
    M: MotorDriver,
    Z: ZeroSensor,
{
    validate_and_build(
        config,
        motor,
        sensor,
        motion.unwrap_or_default(),
        homing.unwrap_or_default(),
        run.unwrap_or_default(),
        clock,
    )
}
