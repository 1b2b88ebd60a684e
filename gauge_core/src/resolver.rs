//! Raw host input to motor command.
//!
//! Pure: takes geometry, the input value, the climb trend and the current
//! position, and returns the command to issue. Nothing here touches a motor.

use crate::geometry::{GaugeConfig, GaugeKind};
use crate::util::{RAW_INPUT_MAX, map_range};

/// Direction the host reports the measured quantity is moving in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
}

impl Trend {
    /// Non-negative rates count as rising.
    pub fn from_rate(climb_rate: i32) -> Self {
        if climb_rate >= 0 {
            Self::Rising
        } else {
            Self::Falling
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCommand {
    /// Absolute step target (linear gauges).
    Absolute(i64),
    /// Step delta from the current position (rotational gauges).
    Relative(i64),
}

/// Outcome of resolving one input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Absolute step target in the motor's frame.
    pub target: i64,
    /// `target - current`.
    pub relative: i64,
    pub command: MoveCommand,
}

/// Rotational step delta from `current` to `target` on a dial of `n` steps.
///
/// Rising always turns forward by the clockwise distance and falling always
/// turns backward by the counter-clockwise distance, even when the other way
/// round is shorter.
pub fn rotational_move(current: i64, target: i64, n: i64, trend: Trend) -> i64 {
    let current = current.rem_euclid(n);
    match trend {
        Trend::Rising => (target - current + n).rem_euclid(n),
        Trend::Falling => -(current - target + n).rem_euclid(n),
    }
}

/// Resolve `raw` against the gauge's policy.
pub fn resolve(cfg: &GaugeConfig, raw: u16, trend: Trend, current: i64) -> Resolution {
    let raw = i64::from(raw);
    match cfg.kind {
        GaugeKind::Rotational => {
            let n = i64::from(cfg.steps_per_revolution.max(1));
            let target_in_turn = map_range(raw, 0, RAW_INPUT_MAX, 0, n - 1);
            let relative = rotational_move(current, target_in_turn, n, trend);
            Resolution {
                target: current.saturating_add(relative),
                relative,
                command: MoveCommand::Relative(relative),
            }
        }
        GaugeKind::Linear => {
            let target = map_range(
                raw,
                0,
                RAW_INPUT_MAX,
                cfg.min_travel_steps,
                cfg.max_travel_steps,
            );
            Resolution {
                target,
                relative: target.saturating_sub(current),
                command: MoveCommand::Absolute(target),
            }
        }
    }
}
