mod common;

use common::linear;
use gauge_core::error::BuildError;
use gauge_core::{Gauge, HomingCfg, NoSensor, RunCfg};
use gauge_hardware::simulated_pair;
use rstest::rstest;

#[rstest]
fn builder_missing_motor_yields_typed_build_error() {
    let err = Gauge::builder()
        // missing with_motor()
        .with_config(linear("ASI", false, 0, 0, 540))
        .try_build()
        .expect_err("should fail with MissingMotor");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingMotor) => {}
        other => panic!("expected MissingMotor, got: {other:?}"),
    }
}

#[rstest]
fn builder_missing_config_yields_typed_build_error() {
    let (motor, _) = simulated_pair(0, 4);
    let err = Gauge::builder()
        .with_motor(motor)
        .try_build()
        .expect_err("should fail with MissingConfig");

    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::MissingConfig)
    ));
}

#[rstest]
fn zeroable_gauge_needs_a_sensor() {
    let (motor, _) = simulated_pair(0, 4);
    let err = Gauge::builder()
        .with_motor(motor)
        .with_config(linear("VSI", true, 0, 0, 540))
        .build()
        .expect_err("no sensor");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingSensor(name)) => assert_eq!(name, "VSI"),
        other => panic!("expected MissingSensor, got: {other:?}"),
    }
}

#[rstest]
fn non_zeroable_gauge_builds_without_sensor() {
    let (motor, _) = simulated_pair(0, 4);
    let g = Gauge::builder()
        .with_motor(motor)
        .with_config(linear("ASI", false, 0, 0, 540))
        .build()
        .expect("valid");
    assert_eq!(g.name(), "ASI");
    assert!(g.is_idle());
}

#[rstest]
#[case::zero_revolution(
    |b: gauge_core::GaugeBuilder<gauge_core::Set, gauge_core::Missing>| {
        let mut cfg = linear("ASI", false, 0, 0, 540);
        cfg.steps_per_revolution = 0;
        b.with_config(cfg)
    },
    "steps_per_revolution"
)]
#[case::zero_seek(
    |b: gauge_core::GaugeBuilder<gauge_core::Set, gauge_core::Missing>| {
        b.with_config(linear("ASI", false, 0, 0, 540))
            .with_homing(HomingCfg { seek_steps: 0, ..HomingCfg::default() })
    },
    "seek_steps"
)]
#[case::zero_debounce(
    |b: gauge_core::GaugeBuilder<gauge_core::Set, gauge_core::Missing>| {
        b.with_config(linear("ASI", false, 0, 0, 540))
            .with_run(RunCfg { debounce_ms: 0 })
    },
    "debounce_ms"
)]
fn invalid_settings_are_rejected(
    #[case] configure: fn(
        gauge_core::GaugeBuilder<gauge_core::Set, gauge_core::Missing>,
    ) -> gauge_core::GaugeBuilder<gauge_core::Set, gauge_core::Set>,
    #[case] needle: &str,
) {
    let (motor, _) = simulated_pair(0, 4);
    let err = configure(Gauge::builder().with_motor(motor).with_sensor(NoSensor))
        .build()
        .expect_err("invalid");
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::InvalidConfig(msg)) => assert!(msg.contains(needle), "{msg}"),
        other => panic!("expected InvalidConfig, got: {other:?}"),
    }
}
