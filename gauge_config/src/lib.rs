#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for a panel of stepper-driven gauges.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Angles are given in degrees; the core converts them to steps once.
//! - Every section except `[[gauge]]` has defaults matching the stock
//!   standby-instrument firmware.
use std::collections::HashSet;

use serde::Deserialize;

/// Gauge name that selects the rotational policy when `kind` is omitted.
pub const LEGACY_ROTATIONAL_NAME: &str = "ALT";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GaugeKindCfg {
    /// Continuous dial; input wraps once per revolution.
    Rotational,
    /// Bounded sweep between min and max travel.
    Linear,
}

/// Simulator-only placement of the needle and reference mark.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SimCfg {
    /// Physical needle position at power-up, in steps from the mark.
    pub start_steps: i64,
    /// Width of the sensor window in steps.
    pub sensor_width_steps: i64,
}

impl Default for SimCfg {
    fn default() -> Self {
        Self {
            start_steps: 120,
            sensor_width_steps: 4,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GaugeCfg {
    pub name: String,
    /// Explicit gauge kind; when absent, derived from the name.
    #[serde(default)]
    pub kind: Option<GaugeKindCfg>,
    pub steps_per_revolution: u32,
    #[serde(default)]
    pub home_deg: f32,
    #[serde(default)]
    pub initial_deg: f32,
    #[serde(default)]
    pub min_travel_deg: f32,
    pub max_travel_deg: f32,
    #[serde(default)]
    pub zeroable: bool,
    pub zero_pin: Option<u8>,
    /// Coil lines in declared (datasheet) order.
    pub coil_pins: [u8; 4],
    /// Motor part name, e.g. "BKA-30" or "VID-29". Unknown names use identity wiring.
    #[serde(default)]
    pub motor_type: String,
    #[serde(default)]
    pub sim: SimCfg,
}

impl GaugeCfg {
    /// Kind after applying the name-based default.
    pub fn effective_kind(&self) -> GaugeKindCfg {
        self.kind.unwrap_or(if self.name == LEGACY_ROTATIONAL_NAME {
            GaugeKindCfg::Rotational
        } else {
            GaugeKindCfg::Linear
        })
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ProfileCfg {
    /// steps per second
    pub max_speed: f32,
    /// steps per second squared
    pub acceleration: f32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MotionCfg {
    /// Applied at initialization, before homing.
    pub initial: ProfileCfg,
    /// Slow, gentle profile used while homing.
    pub homing: ProfileCfg,
    /// Profile for normal tracking once homed.
    pub run: ProfileCfg,
}

impl Default for MotionCfg {
    fn default() -> Self {
        Self {
            initial: ProfileCfg {
                max_speed: 600.0,
                acceleration: 400.0,
            },
            homing: ProfileCfg {
                max_speed: 300.0,
                acceleration: 200.0,
            },
            run: ProfileCfg {
                max_speed: 500.0,
                acceleration: 250.0,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HomingCfg {
    pub offset_forward_steps: u32,
    /// Backward travel commanded for each sensor seek.
    pub seek_steps: u32,
    pub fine_forward_steps: u32,
    pub settle_ms: u64,
    pub final_settle_ms: u64,
    /// Per-stage time bound; 0 disables it.
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

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunCfg {
    /// Minimum spacing between accepted zero-sensor corrections.
    pub debounce_ms: u64,
    /// Pacing of the run loop when driven by the CLI.
    pub tick_hz: u32,
}

impl Default for RunCfg {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            tick_hz: 2000,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(rename = "gauge", default)]
    pub gauges: Vec<GaugeCfg>,
    #[serde(default)]
    pub motion: MotionCfg,
    #[serde(default)]
    pub homing: HomingCfg,
    #[serde(default)]
    pub run: RunCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file (no validation).
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))
}

fn validate_profile(section: &str, p: &ProfileCfg) -> eyre::Result<()> {
    if !(p.max_speed.is_finite() && p.max_speed > 0.0) {
        eyre::bail!("motion.{section}.max_speed must be > 0");
    }
    if !(p.acceleration.is_finite() && p.acceleration > 0.0) {
        eyre::bail!("motion.{section}.acceleration must be > 0");
    }
    Ok(())
}

impl GaugeCfg {
    pub fn validate(&self) -> eyre::Result<()> {
        let name = &self.name;
        if name.trim().is_empty() {
            eyre::bail!("gauge.name must not be empty");
        }
        if self.steps_per_revolution == 0 {
            eyre::bail!("gauge '{name}': steps_per_revolution must be > 0");
        }
        for (field, v) in [
            ("home_deg", self.home_deg),
            ("initial_deg", self.initial_deg),
            ("min_travel_deg", self.min_travel_deg),
            ("max_travel_deg", self.max_travel_deg),
        ] {
            if !v.is_finite() {
                eyre::bail!("gauge '{name}': {field} must be finite");
            }
        }
        if self.zeroable && self.zero_pin.is_none() {
            eyre::bail!("gauge '{name}': zero_pin is required when zeroable = true");
        }
        if self.effective_kind() == GaugeKindCfg::Linear
            && self.min_travel_deg > self.max_travel_deg
        {
            eyre::bail!("gauge '{name}': min_travel_deg must be <= max_travel_deg");
        }
        if self.sim.sensor_width_steps < 1 {
            eyre::bail!("gauge '{name}': sim.sensor_width_steps must be >= 1");
        }
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Gauges
        if self.gauges.is_empty() {
            eyre::bail!("config must declare at least one [[gauge]]");
        }
        let mut seen = HashSet::new();
        for g in &self.gauges {
            g.validate()?;
            if !seen.insert(g.name.as_str()) {
                eyre::bail!("gauge name '{}' is declared more than once", g.name);
            }
        }

        // Motion
        validate_profile("initial", &self.motion.initial)?;
        validate_profile("homing", &self.motion.homing)?;
        validate_profile("run", &self.motion.run)?;

        // Homing
        if self.homing.seek_steps == 0 {
            eyre::bail!("homing.seek_steps must be > 0");
        }
        if self.homing.settle_ms > 60_000 || self.homing.final_settle_ms > 60_000 {
            eyre::bail!("homing settle delays are unreasonably large (>60s)");
        }

        // Run loop
        if self.run.debounce_ms == 0 {
            eyre::bail!("run.debounce_ms must be >= 1");
        }
        if self.run.tick_hz == 0 {
            eyre::bail!("run.tick_hz must be > 0");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }

    /// Look up a gauge by name.
    pub fn gauge(&self, name: &str) -> Option<&GaugeCfg> {
        self.gauges.iter().find(|g| g.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge(name: &str) -> GaugeCfg {
        GaugeCfg {
            name: name.to_string(),
            kind: None,
            steps_per_revolution: 720,
            home_deg: 0.0,
            initial_deg: 0.0,
            min_travel_deg: 0.0,
            max_travel_deg: 300.0,
            zeroable: false,
            zero_pin: None,
            coil_pins: [1, 2, 3, 4],
            motor_type: String::new(),
            sim: SimCfg::default(),
        }
    }

    #[test]
    fn alt_defaults_to_rotational() {
        assert_eq!(gauge("ALT").effective_kind(), GaugeKindCfg::Rotational);
        assert_eq!(gauge("ASI").effective_kind(), GaugeKindCfg::Linear);
    }

    #[test]
    fn explicit_kind_overrides_name() {
        let mut g = gauge("ALT");
        g.kind = Some(GaugeKindCfg::Linear);
        assert_eq!(g.effective_kind(), GaugeKindCfg::Linear);
        let mut h = gauge("HDG");
        h.kind = Some(GaugeKindCfg::Rotational);
        assert_eq!(h.effective_kind(), GaugeKindCfg::Rotational);
    }

    #[test]
    fn rotational_gauge_may_have_inverted_travel() {
        let mut g = gauge("ALT");
        g.min_travel_deg = 360.0;
        g.max_travel_deg = 0.0;
        g.validate().expect("rotational gauges ignore travel order");
    }
}
