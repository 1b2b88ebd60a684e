//! Immutable per-gauge geometry and coil wiring.
//!
//! Angular calibration arrives in degrees and is converted to whole steps
//! exactly once, when the `GaugeConfig` is derived from a `GaugeSpec`.

use std::fmt;

/// How raw input maps onto the dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeKind {
    /// Continuous dial (altimeter); input wraps once per revolution and the
    /// needle turns in the direction of the climb trend.
    Rotational,
    /// Bounded sweep between min and max travel.
    Linear,
}

/// Motor families with different coil order on the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotorVariant {
    /// BKA-30 style: coil pairs are swapped relative to the declared order.
    Bka30,
    /// VID-29 style: declared order is driver order.
    #[default]
    Vid29,
}

impl MotorVariant {
    /// Parse a motor part name. Total: unknown names fall back to the default.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "BKA-30" | "BKA30" | "VARIANTA" => Self::Bka30,
            _ => Self::Vid29,
        }
    }
}

impl From<&str> for MotorVariant {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl fmt::Display for MotorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bka30 => f.write_str("BKA-30"),
            Self::Vid29 => f.write_str("VID-29"),
        }
    }
}

/// Reorder declared coil lines into the order the driver expects.
///
/// `[a, b, c, d]` becomes `[c, d, a, b]` for BKA-30 and stays as is otherwise.
pub fn resolve_wiring<T: Copy>(lines: [T; 4], variant: MotorVariant) -> [T; 4] {
    let [a, b, c, d] = lines;
    match variant {
        MotorVariant::Bka30 => [c, d, a, b],
        MotorVariant::Vid29 => [a, b, c, d],
    }
}

/// `round(degrees * steps_per_revolution / 360)`, ties away from zero.
pub fn angle_to_steps(degrees: f32, steps_per_revolution: u32) -> i64 {
    (f64::from(degrees) * f64::from(steps_per_revolution) / 360.0).round() as i64
}

/// Externally supplied calibration for one gauge, angles in degrees.
#[derive(Debug, Clone)]
pub struct GaugeSpec {
    pub name: String,
    pub kind: GaugeKind,
    pub steps_per_revolution: u32,
    pub home_deg: f32,
    pub initial_deg: f32,
    pub min_travel_deg: f32,
    pub max_travel_deg: f32,
    pub zeroable: bool,
    pub zero_sensor_id: Option<u8>,
    /// Coil lines in declared order.
    pub coil_lines: [u8; 4],
    pub motor_type: String,
}

/// Derived, step-based geometry. Never mutated after construction.
///
/// `min_travel_steps <= max_travel_steps` is expected for linear gauges but
/// is not checked here; inverted bounds produce an inverted mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeConfig {
    pub name: String,
    pub kind: GaugeKind,
    pub steps_per_revolution: u32,
    pub home_position_steps: i64,
    pub initial_position_steps: i64,
    pub min_travel_steps: i64,
    pub max_travel_steps: i64,
    pub zeroable: bool,
    pub zero_sensor_id: Option<u8>,
    pub motor_variant: MotorVariant,
    /// Coil lines in driver order.
    pub wiring_order: [u8; 4],
}

impl GaugeConfig {
    pub fn from_spec(spec: &GaugeSpec) -> Self {
        let spr = spec.steps_per_revolution;
        let motor_variant = MotorVariant::parse(&spec.motor_type);
        Self {
            name: spec.name.clone(),
            kind: spec.kind,
            steps_per_revolution: spr,
            home_position_steps: angle_to_steps(spec.home_deg, spr),
            initial_position_steps: angle_to_steps(spec.initial_deg, spr),
            min_travel_steps: angle_to_steps(spec.min_travel_deg, spr),
            max_travel_steps: angle_to_steps(spec.max_travel_deg, spr),
            zeroable: spec.zeroable,
            zero_sensor_id: spec.zero_sensor_id,
            motor_variant,
            wiring_order: resolve_wiring(spec.coil_lines, motor_variant),
        }
    }

    pub fn is_rotational(&self) -> bool {
        self.kind == GaugeKind::Rotational
    }
}

impl From<&GaugeSpec> for GaugeConfig {
    fn from(spec: &GaugeSpec) -> Self {
        Self::from_spec(spec)
    }
}
