//! Panel assembly: geometry from config, motors and sensors from the selected backend.

use eyre::WrapErr;
use gauge_config::GaugeCfg;
use gauge_core::{
    Gauge, GaugeBuilder, GaugeConfig, GaugeSpec, HomingCfg, Missing, MotionCfg, Panel, RunCfg,
    Set,
};

/// Build every configured gauge. The config must already be validated.
pub fn build_panel(cfg: &gauge_config::Config) -> eyre::Result<Panel> {
    let motion: MotionCfg = (&cfg.motion).into();
    let homing: HomingCfg = (&cfg.homing).into();
    let run: RunCfg = (&cfg.run).into();

    let mut gauges = Vec::with_capacity(cfg.gauges.len());
    for g in &cfg.gauges {
        let geometry = GaugeConfig::from_spec(&GaugeSpec::from(g));
        tracing::debug!(
            gauge = %geometry.name,
            kind = ?geometry.kind,
            motor = %geometry.motor_variant,
            wiring = ?geometry.wiring_order,
            home = geometry.home_position_steps,
            initial = geometry.initial_position_steps,
            "gauge geometry"
        );
        let builder = Gauge::builder()
            .with_config(geometry.clone())
            .with_motion(motion)
            .with_homing(homing.clone())
            .with_run(run.clone());
        let gauge = attach_backend(builder, g, &geometry)
            .wrap_err_with(|| format!("build gauge '{}'", g.name))?;
        gauges.push(gauge);
    }
    Panel::new(gauges)
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn attach_backend(
    builder: GaugeBuilder<Missing, Set>,
    g: &GaugeCfg,
    geometry: &GaugeConfig,
) -> eyre::Result<Gauge> {
    let (motor, sensor) =
        gauge_hardware::simulated_pair(g.sim.start_steps, g.sim.sensor_width_steps);
    let sensor = if geometry.is_rotational() {
        sensor.with_revolution(i64::from(geometry.steps_per_revolution))
    } else {
        sensor
    };
    builder.with_motor(motor).with_sensor(sensor).build()
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn attach_backend(
    builder: GaugeBuilder<Missing, Set>,
    _g: &GaugeCfg,
    geometry: &GaugeConfig,
) -> eyre::Result<Gauge> {
    use gauge_hardware::gpio::{GpioZeroSensor, open_four_wire};
    use gauge_traits::MonotonicClock;

    let motor = open_four_wire(geometry.wiring_order, MonotonicClock::new())
        .wrap_err("open coil lines")?;
    let builder = builder.with_motor(motor);
    let builder = match geometry.zero_sensor_id {
        Some(pin) if geometry.zeroable => {
            builder.with_sensor(GpioZeroSensor::open(pin).wrap_err("open zero sensor")?)
        }
        _ => builder,
    };
    builder.build()
}
