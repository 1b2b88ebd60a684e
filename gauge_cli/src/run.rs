//! Command handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use gauge_core::{GaugeError, GaugeKind, Panel, TickStatus};
use gauge_traits::{Clock, MonotonicClock};
use serde_json::json;

fn emit(json_mode: bool, value: &serde_json::Value, human: &str) {
    if json_mode {
        println!("{value}");
    } else {
        println!("{human}");
    }
}

fn kind_name(kind: GaugeKind) -> &'static str {
    match kind {
        GaugeKind::Rotational => "rotational",
        GaugeKind::Linear => "linear",
    }
}

pub fn self_check(panel: &Panel, json_mode: bool) {
    for g in panel.iter() {
        let c = g.config();
        emit(
            json_mode,
            &json!({
                "gauge": c.name,
                "kind": kind_name(c.kind),
                "steps_per_revolution": c.steps_per_revolution,
                "motor": c.motor_variant.to_string(),
                "wiring": c.wiring_order,
                "zeroable": c.zeroable,
                "home_steps": c.home_position_steps,
                "initial_steps": c.initial_position_steps,
            }),
            &format!(
                "{}: {} {} steps/rev, motor {} wiring {:?}, zeroable={}",
                c.name,
                kind_name(c.kind),
                c.steps_per_revolution,
                c.motor_variant,
                c.wiring_order,
                c.zeroable
            ),
        );
    }
    emit(
        json_mode,
        &json!({ "status": "ok", "gauges": panel.len() }),
        &format!("self-check ok ({} gauges)", panel.len()),
    );
}

pub fn home(panel: &mut Panel, json_mode: bool) -> eyre::Result<()> {
    panel.initialize_all();
    for (name, report) in panel.home_all()? {
        let human = if report.performed {
            format!(
                "{name}: homed (coarse seek {} steps, fine seek {} steps), at {}",
                report.coarse_seek_steps, report.fine_seek_steps, report.final_position_steps
            )
        } else {
            format!("{name}: skipped (not zeroable), at {}", report.final_position_steps)
        };
        emit(
            json_mode,
            &json!({
                "gauge": name,
                "homed": report.performed,
                "coarse_seek_steps": report.coarse_seek_steps,
                "fine_seek_steps": report.fine_seek_steps,
                "position": report.final_position_steps,
            }),
            &human,
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn set(
    panel: &mut Panel,
    gauge: &str,
    value: u16,
    climb: i32,
    max_ticks: u64,
    tick_hz: u32,
    shutdown: &Arc<AtomicBool>,
    json_mode: bool,
) -> eyre::Result<()> {
    // Reject unknown names before spending time homing.
    if panel.get(gauge).is_none() {
        return Err(eyre::Report::new(GaugeError::Config(format!(
            "unknown gauge '{gauge}'"
        ))));
    }
    panel.initialize_all();
    panel.home_all()?;

    let res = panel.set_value(gauge, value, climb)?;
    let clock = MonotonicClock::new();
    let period = Duration::from_micros(gauge_core::util::period_us(tick_hz));
    let mut ticks: u64 = 0;
    let mut rezeroed = 0usize;

    while !panel.is_idle() {
        if shutdown.load(Ordering::Relaxed) {
            panel.hard_stop_all();
            eyre::bail!("interrupted; all motors stopped");
        }
        if ticks >= max_ticks {
            panel.hard_stop_all();
            eyre::bail!("gauge '{gauge}' did not settle within {max_ticks} ticks");
        }
        rezeroed += panel
            .tick_all()?
            .iter()
            .filter(|s| matches!(s, TickStatus::Rezeroed { .. }))
            .count();
        ticks += 1;
        clock.sleep(period);
    }

    let position = panel
        .get(gauge)
        .map_or(res.target, |g| g.state().current_position_steps);
    tracing::info!(gauge, value, climb, target = res.target, position, ticks, "gauge settled");
    emit(
        json_mode,
        &json!({
            "gauge": gauge,
            "value": value,
            "target": res.target,
            "relative": res.relative,
            "position": position,
            "ticks": ticks,
            "rezeroed": rezeroed,
        }),
        &format!(
            "{gauge}: target {} (moved {:+}), position {position} after {ticks} ticks",
            res.target, res.relative
        ),
    );
    Ok(())
}

pub fn health(panel: &Panel, json_mode: bool) {
    emit(
        json_mode,
        &json!({ "status": "ok", "gauges": panel.len(), "idle": panel.is_idle() }),
        &format!("ok: {} gauges", panel.len()),
    );
}
