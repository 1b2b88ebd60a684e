//! Runtime configuration for the gauge controller.
//!
//! These are separate from the TOML-deserialized config in `gauge_config`;
//! see `conversions` for the mapping.

/// Speed/acceleration pair applied to a motor driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProfile {
    /// steps per second
    pub max_speed: f32,
    /// steps per second squared
    pub acceleration: f32,
}

impl MotionProfile {
    pub const fn new(max_speed: f32, acceleration: f32) -> Self {
        Self {
            max_speed,
            acceleration,
        }
    }
}

/// The three profiles a gauge moves through over its lifetime.
#[derive(Debug, Clone, Copy)]
pub struct MotionCfg {
    /// Applied by `initialize()` at startup.
    pub initial: MotionProfile,
    /// Used for the whole homing sequence.
    pub homing: MotionProfile,
    /// Restored when homing finishes.
    pub run: MotionProfile,
}

impl Default for MotionCfg {
    fn default() -> Self {
        Self {
            initial: MotionProfile::new(600.0, 400.0),
            homing: MotionProfile::new(300.0, 200.0),
            run: MotionProfile::new(500.0, 250.0),
        }
    }
}

/// Homing sequence magnitudes and delays.
#[derive(Debug, Clone)]
pub struct HomingCfg {
    /// Forward move that clears an already-active sensor before the first seek.
    pub offset_forward_steps: i64,
    /// Backward travel commanded per seek; exhausting it without a sensor
    /// edge fails the seek.
    pub seek_steps: i64,
    /// Forward move that clears the sensor between the two seeks.
    pub fine_forward_steps: i64,
    pub settle_ms: u64,
    pub final_settle_ms: u64,
    /// Upper bound per stage; 0 disables it.
    pub stage_timeout_ms: u64,
}

impl Default for HomingCfg {
    fn default() -> Self {
        Self {
            offset_forward_steps: 40,
            seek_steps: 800,
            fine_forward_steps: 100,
            settle_ms: 500,
            final_settle_ms: 50,
            stage_timeout_ms: 30_000,
        }
    }
}

/// Run-loop tuning.
#[derive(Debug, Clone)]
pub struct RunCfg {
    /// Zero-sensor readings closer together than this are ignored.
    pub debounce_ms: u64,
}

impl Default for RunCfg {
    fn default() -> Self {
        Self { debounce_ms: 1000 }
    }
}
