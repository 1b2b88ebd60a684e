//! Mutable runtime tracking for one gauge.

use std::time::Instant;

/// Position/target bookkeeping and the zero-sensor debounce stamp.
///
/// Mutated only by the homing sequence and the run loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GaugeState {
    /// Last known motor position, refreshed from the driver every tick.
    pub current_position_steps: i64,
    /// Last resolved target; survives ticks and sensor re-referencing.
    pub target_position_steps: i64,
    /// Time of the last accepted zero-sensor correction; `None` means never.
    pub last_zero_trigger: Option<Instant>,
}

impl GaugeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a sensor reading at `now` falls outside the debounce window.
    pub fn debounce_elapsed(&self, now: Instant, debounce_ms: u64) -> bool {
        match self.last_zero_trigger {
            None => true,
            Some(last) => now.saturating_duration_since(last).as_millis() >= u128::from(debounce_ms),
        }
    }
}
