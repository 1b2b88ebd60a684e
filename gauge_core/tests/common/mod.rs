#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use gauge_core::{GaugeConfig, GaugeCore, GaugeKind, MotorVariant, build_gauge};
use gauge_hardware::{SimulatedStepper, SimulatedZeroSensor, simulated_pair};
use gauge_traits::Clock;

/// Deterministic clock; `sleep` advances time without blocking.
#[derive(Clone)]
pub struct TestClock {
    origin: Instant,
    ms: Arc<AtomicU64>,
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.ms.fetch_add(ms, Ordering::Relaxed);
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.ms.load(Ordering::Relaxed)
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.ms.load(Ordering::Relaxed))
    }

    fn sleep(&self, d: Duration) {
        self.advance(d.as_millis() as u64);
    }
}

pub type SimGauge = GaugeCore<SimulatedStepper, SimulatedZeroSensor>;

pub fn linear(name: &str, zeroable: bool, initial: i64, min: i64, max: i64) -> GaugeConfig {
    GaugeConfig {
        name: name.into(),
        kind: GaugeKind::Linear,
        steps_per_revolution: 720,
        home_position_steps: 0,
        initial_position_steps: initial,
        min_travel_steps: min,
        max_travel_steps: max,
        zeroable,
        zero_sensor_id: zeroable.then_some(17),
        motor_variant: MotorVariant::Vid29,
        wiring_order: [2, 3, 4, 5],
    }
}

pub fn rotational(steps_per_revolution: u32) -> GaugeConfig {
    GaugeConfig {
        name: "ALT".into(),
        kind: GaugeKind::Rotational,
        steps_per_revolution,
        max_travel_steps: i64::from(steps_per_revolution),
        ..linear("ALT", true, 0, 0, 0)
    }
}

/// Gauge over a simulated needle starting at `needle_start` with a 4-step
/// sensor window at needle position 0.
pub fn sim_gauge(cfg: GaugeConfig, needle_start: i64, clock: &TestClock) -> SimGauge {
    let spr = i64::from(cfg.steps_per_revolution);
    let rotational = cfg.kind == GaugeKind::Rotational;
    let (motor, sensor) = simulated_pair(needle_start, 4);
    let sensor = if rotational {
        sensor.with_revolution(spr)
    } else {
        sensor
    };
    build_gauge(cfg, motor, sensor, None, None, None, Some(Box::new(clock.clone())))
        .expect("valid gauge")
}

/// Tick until the motor is idle, returning every status seen.
pub fn tick_until_idle<M, Z>(g: &mut GaugeCore<M, Z>, max_ticks: usize) -> Vec<gauge_core::TickStatus>
where
    M: gauge_traits::MotorDriver,
    Z: gauge_traits::ZeroSensor,
{
    let mut seen = Vec::new();
    for _ in 0..max_ticks {
        let status = g.tick().expect("tick");
        seen.push(status);
        if g.is_idle() {
            break;
        }
    }
    seen
}

/// Raw input whose rotational target on an `n`-step dial is `steps`.
pub fn raw_for_turn_step(steps: i64, n: i64) -> u16 {
    let raw = (steps * 65_535 + n - 2) / (n - 1);
    u16::try_from(raw).expect("raw in range")
}
