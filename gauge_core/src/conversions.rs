//! `From` implementations bridging `gauge_config` types to `gauge_core` types.

use crate::config::{HomingCfg, MotionCfg, MotionProfile, RunCfg};
use crate::geometry::{GaugeKind, GaugeSpec};

// ── Geometry ─────────────────────────────────────────────────────────────────

impl From<gauge_config::GaugeKindCfg> for GaugeKind {
    fn from(k: gauge_config::GaugeKindCfg) -> Self {
        match k {
            gauge_config::GaugeKindCfg::Rotational => Self::Rotational,
            gauge_config::GaugeKindCfg::Linear => Self::Linear,
        }
    }
}

impl From<&gauge_config::GaugeCfg> for GaugeSpec {
    fn from(g: &gauge_config::GaugeCfg) -> Self {
        Self {
            name: g.name.clone(),
            kind: g.effective_kind().into(),
            steps_per_revolution: g.steps_per_revolution,
            home_deg: g.home_deg,
            initial_deg: g.initial_deg,
            min_travel_deg: g.min_travel_deg,
            max_travel_deg: g.max_travel_deg,
            zeroable: g.zeroable,
            zero_sensor_id: g.zero_pin,
            coil_lines: g.coil_pins,
            motor_type: g.motor_type.clone(),
        }
    }
}

// ── Motion ───────────────────────────────────────────────────────────────────

impl From<&gauge_config::ProfileCfg> for MotionProfile {
    fn from(p: &gauge_config::ProfileCfg) -> Self {
        Self::new(p.max_speed, p.acceleration)
    }
}

impl From<&gauge_config::MotionCfg> for MotionCfg {
    fn from(m: &gauge_config::MotionCfg) -> Self {
        Self {
            initial: (&m.initial).into(),
            homing: (&m.homing).into(),
            run: (&m.run).into(),
        }
    }
}

// ── Homing / run loop ────────────────────────────────────────────────────────

impl From<&gauge_config::HomingCfg> for HomingCfg {
    fn from(h: &gauge_config::HomingCfg) -> Self {
        Self {
            offset_forward_steps: i64::from(h.offset_forward_steps),
            seek_steps: i64::from(h.seek_steps),
            fine_forward_steps: i64::from(h.fine_forward_steps),
            settle_ms: h.settle_ms,
            final_settle_ms: h.final_settle_ms,
            stage_timeout_ms: h.stage_timeout_ms,
        }
    }
}

impl From<&gauge_config::RunCfg> for RunCfg {
    fn from(r: &gauge_config::RunCfg) -> Self {
        Self {
            debounce_ms: r.debounce_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{GaugeConfig, MotorVariant};

    #[test]
    fn toml_gauge_becomes_step_geometry() {
        let cfg = gauge_config::load_toml(
            r#"
            [homing]
            seek_steps = 1200

            [[gauge]]
            name = "ALT"
            steps_per_revolution = 720
            initial_deg = 90.0
            max_travel_deg = 360.0
            zeroable = true
            zero_pin = 17
            coil_pins = [2, 3, 4, 5]
            motor_type = "BKA-30"
            "#,
        )
        .unwrap();
        let spec = GaugeSpec::from(&cfg.gauges[0]);
        let g = GaugeConfig::from_spec(&spec);
        assert_eq!(g.kind, GaugeKind::Rotational);
        assert_eq!(g.initial_position_steps, 180);
        assert_eq!(g.motor_variant, MotorVariant::Bka30);
        assert_eq!(g.wiring_order, [4, 5, 2, 3]);
        assert_eq!(g.zero_sensor_id, Some(17));

        let homing = HomingCfg::from(&cfg.homing);
        assert_eq!(homing.seek_steps, 1200);
        assert_eq!(homing.offset_forward_steps, 40);
        let motion = MotionCfg::from(&cfg.motion);
        assert_eq!(motion.run, MotionProfile::new(500.0, 250.0));
    }
}
