mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{TestClock, linear, rotational, sim_gauge};
use gauge_core::{GaugeError, HomingCfg, HomingFailure, HomingStage, NoSensor, build_gauge};
use gauge_hardware::{SimulatedStepper, simulated_pair};
use gauge_traits::MotorDriver;
use rstest::rstest;

#[rstest]
#[case::clear_of_sensor(120, 157)]
#[case::already_on_sensor(2, 39)]
#[case::far_side(600, 637)]
fn homing_parks_needle_at_initial_position(#[case] needle_start: i64, #[case] coarse: u64) {
    let clock = TestClock::new();
    let mut g = sim_gauge(linear("VSI", true, 50, 0, 540), needle_start, &clock);
    g.initialize();

    let report = g.home().expect("homing succeeds");

    assert!(report.performed);
    assert_eq!(report.coarse_seek_steps, coarse);
    assert_eq!(report.fine_seek_steps, 100);
    assert_eq!(report.final_position_steps, 50);
    assert_eq!(g.state().current_position_steps, 50);
    assert_eq!(g.state().target_position_steps, 50);
    assert_eq!(g.motor().current_position(), 50);
    // zero is the first step inside the 4-step window
    assert_eq!(g.motor().needle().position(), 53);
}

#[test]
fn homing_switches_motion_profiles_and_settles_on_the_clock() {
    let clock = TestClock::new();
    let mut g = sim_gauge(linear("VSI", true, 0, 0, 540), 120, &clock);

    g.initialize();
    assert_eq!(g.motor().max_speed(), 600.0);
    assert_eq!(g.motor().acceleration(), 400.0);

    g.home().expect("homing succeeds");
    assert_eq!(g.motor().max_speed(), 500.0);
    assert_eq!(g.motor().acceleration(), 250.0);
    // two settle delays plus the final one
    assert_eq!(clock.elapsed_ms(), 500 + 500 + 50);
}

#[test]
fn non_zeroable_homing_leaves_everything_alone() {
    let clock = TestClock::new();
    let mut g = sim_gauge(linear("ASI", false, 50, 0, 1000), 120, &clock);
    g.initialize();
    g.update_target(32768, 0);
    for _ in 0..5 {
        g.tick().expect("tick");
    }
    let before = g.state().clone();
    let steps = g.motor().steps_taken();
    assert_eq!(before.current_position_steps, 5);
    assert_eq!(before.target_position_steps, 500);

    let report = g.home().expect("no-op");

    assert!(!report.performed);
    assert_eq!(report.final_position_steps, 5);
    assert_eq!(g.state(), &before);
    assert_eq!(g.sensor().reads(), 0);
    assert_eq!(g.motor().steps_taken(), steps);
    assert_eq!(g.motor().max_speed(), 600.0);
    assert_eq!(clock.elapsed_ms(), 0);
}

#[test]
fn rotational_gauge_homes_on_any_turn() {
    let clock = TestClock::new();
    let mut g = sim_gauge(rotational(720), 1000, &clock);
    g.initialize();

    let report = g.home().expect("homing succeeds");

    assert_eq!(report.coarse_seek_steps, 317);
    assert_eq!(g.state().current_position_steps, 0);
    assert_eq!(g.motor().needle().position().rem_euclid(720), 3);
}

#[test]
fn seek_without_sensor_edge_fails_and_stops() {
    let clock = TestClock::new();
    // 940 steps above the mark after the offset move; one seek covers 800
    let mut g = sim_gauge(linear("VSI", true, 50, 0, 540), 900, &clock);
    g.initialize();

    let err = g.home().expect_err("sensor is out of reach");

    match err.downcast_ref::<GaugeError>() {
        Some(GaugeError::Homing(HomingFailure::SensorNotFound { stage, travelled })) => {
            assert_eq!(*stage, HomingStage::CoarseSeek);
            assert_eq!(*travelled, 800);
        }
        other => panic!("expected SensorNotFound, got: {other:?}"),
    }
    assert!(g.is_idle());
    assert_eq!(g.state().current_position_steps, g.motor().current_position());
    // still on the homing profile; run profile is only applied on success
    assert_eq!(g.motor().max_speed(), 300.0);
}

/// Motor that never moves but burns 10 ms of clock per run call.
struct StuckMotor {
    clock: TestClock,
    position: i64,
    target: i64,
}

impl MotorDriver for StuckMotor {
    fn move_to(&mut self, absolute: i64) {
        self.target = absolute;
    }
    fn run(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.clock.advance(10);
        Ok(self.position != self.target)
    }
    fn current_position(&self) -> i64 {
        self.position
    }
    fn target_position(&self) -> i64 {
        self.target
    }
    fn set_current_position(&mut self, position: i64) {
        self.position = position;
        self.target = position;
    }
    fn stop(&mut self) {
        self.target = self.position;
    }
    fn set_max_speed(&mut self, _steps_per_sec: f32) {}
    fn set_acceleration(&mut self, _steps_per_sec2: f32) {}
}

#[test]
fn stalled_stage_times_out() {
    let clock = TestClock::new();
    let motor = StuckMotor {
        clock: clock.clone(),
        position: 0,
        target: 0,
    };
    let homing = HomingCfg {
        stage_timeout_ms: 200,
        ..HomingCfg::default()
    };
    let mut g = build_gauge(
        linear("VSI", true, 0, 0, 540),
        motor,
        NoSensor,
        None,
        Some(homing),
        None,
        Some(Box::new(clock.clone())),
    )
    .expect("valid gauge");

    let err = g.home().expect_err("motor never arrives");

    match err.downcast_ref::<GaugeError>() {
        Some(GaugeError::Homing(HomingFailure::Timeout { stage, timeout_ms })) => {
            assert_eq!(*stage, HomingStage::OffsetForward);
            assert_eq!(*timeout_ms, 200);
        }
        other => panic!("expected Timeout, got: {other:?}"),
    }
    assert!(g.is_idle());
    assert!(clock.elapsed_ms() >= 200);
}

/// Simulated stepper that counts decelerating and immediate stops.
struct StopCounter {
    inner: SimulatedStepper,
    stops: Rc<Cell<u32>>,
    hard_stops: Rc<Cell<u32>>,
}

impl MotorDriver for StopCounter {
    fn move_to(&mut self, absolute: i64) {
        self.inner.move_to(absolute);
    }
    fn run(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.inner.run()
    }
    fn current_position(&self) -> i64 {
        self.inner.current_position()
    }
    fn target_position(&self) -> i64 {
        self.inner.target_position()
    }
    fn set_current_position(&mut self, position: i64) {
        self.inner.set_current_position(position);
    }
    fn stop(&mut self) {
        self.stops.set(self.stops.get() + 1);
        self.inner.stop();
    }
    fn hard_stop(&mut self) {
        self.hard_stops.set(self.hard_stops.get() + 1);
        self.inner.hard_stop();
    }
    fn set_max_speed(&mut self, steps_per_sec: f32) {
        self.inner.set_max_speed(steps_per_sec);
    }
    fn set_acceleration(&mut self, steps_per_sec2: f32) {
        self.inner.set_acceleration(steps_per_sec2);
    }
}

#[test]
fn seeks_end_with_an_immediate_stop() {
    let clock = TestClock::new();
    let (inner, sensor) = simulated_pair(120, 4);
    let stops = Rc::new(Cell::new(0));
    let hard_stops = Rc::new(Cell::new(0));
    let motor = StopCounter {
        inner,
        stops: Rc::clone(&stops),
        hard_stops: Rc::clone(&hard_stops),
    };
    let mut g = build_gauge(
        linear("VSI", true, 50, 0, 540),
        motor,
        sensor,
        None,
        None,
        None,
        Some(Box::new(clock.clone())),
    )
    .expect("valid gauge");

    g.home().expect("homing succeeds");

    assert_eq!(stops.get(), 0);
    assert_eq!(hard_stops.get(), 2);
}
