//! Human-readable error descriptions and structured JSON error formatting.

use gauge_core::error::{BuildError, GaugeError, HomingFailure};

/// First error of type `E` anywhere in the report's chain.
fn find<'a, E: std::error::Error + 'static>(err: &'a eyre::Report) -> Option<&'a E> {
    err.chain().find_map(|e| e.downcast_ref::<E>())
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = find::<BuildError>(err) {
        return match be {
            BuildError::MissingMotor => {
                "What happened: A gauge was built without a motor driver.\nLikely causes: The motor backend failed to initialize.\nHow to fix: Check the coil_pins of every [[gauge]] and rerun with --log-level=debug.".to_string()
            }
            BuildError::MissingConfig => {
                "What happened: A gauge was built without its geometry.\nLikely causes: Internal wiring bug.\nHow to fix: Re-run with --log-level=debug and report the output.".to_string()
            }
            BuildError::MissingSensor(name) => format!(
                "What happened: Gauge '{name}' is zeroable but has no zero sensor.\nLikely causes: zero_pin missing or the sensor failed to open.\nHow to fix: Set zero_pin for the gauge or set zeroable = false."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(ge) = find::<GaugeError>(err) {
        return match ge {
            GaugeError::Homing(HomingFailure::SensorNotFound { stage, travelled }) => format!(
                "What happened: Homing failed: zero sensor not found during {stage} after {travelled} steps.\nLikely causes: Needle stuck, sensor unplugged, or homing.seek_steps too small for the dial.\nHow to fix: Check the sensor wiring and zero_pin, or raise homing.seek_steps."
            ),
            GaugeError::Homing(HomingFailure::Timeout { stage, timeout_ms }) => format!(
                "What happened: Homing stage {stage} did not finish within {timeout_ms} ms.\nLikely causes: Motor not stepping (power, wiring) or motion.homing too slow.\nHow to fix: Check the driver supply and coil_pins, or raise homing.stage_timeout_ms."
            ),
            GaugeError::Config(msg) => format!(
                "What happened: Configuration error: {msg}.\nLikely causes: Missing or out-of-range values in the TOML, or an unknown gauge name.\nHow to fix: Edit the config file or the command arguments, then rerun."
            ),
            GaugeError::Hardware(msg) | GaugeError::HardwareFault(msg) => format!(
                "What happened: Hardware error: {msg}.\nLikely causes: GPIO permissions or wiring.\nHow to fix: Check coil_pins and zero_pin; ensure the process may access GPIO."
            ),
        };
    }

    if let Some(te) = find::<toml::de::Error>(err) {
        return format!(
            "What happened: The config file is not valid TOML for a gauge panel.\nDetails: {te}\nHow to fix: Correct the reported line and rerun."
        );
    }

    if let Some(hw) = find::<gauge_hardware::HwError>(err) {
        return format!(
            "What happened: Failed to initialize hardware ({hw}).\nLikely causes: Incorrect pin numbers or insufficient GPIO permissions.\nHow to fix: Fix coil_pins / zero_pin in the config; ensure the process has permission to access GPIO."
        );
    }

    // Generic fallback
    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable reason name for JSON output.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if find::<BuildError>(err).is_some() || find::<toml::de::Error>(err).is_some() {
        return "Config";
    }
    match find::<GaugeError>(err) {
        Some(GaugeError::Homing(HomingFailure::SensorNotFound { .. })) => "SensorNotFound",
        Some(GaugeError::Homing(HomingFailure::Timeout { .. })) => "HomingTimeout",
        Some(GaugeError::Config(_)) => "Config",
        Some(GaugeError::Hardware(_) | GaugeError::HardwareFault(_)) => "Hardware",
        None => "Error",
    }
}

/// Map error kinds to stable exit codes.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match reason_name(err) {
        "Config" => 2,
        "SensorNotFound" => 3,
        "HomingTimeout" => 4,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = reason_name(err);
    let details = match find::<GaugeError>(err) {
        Some(GaugeError::Homing(HomingFailure::SensorNotFound { stage, travelled })) => {
            Some(json!({ "stage": stage.to_string(), "travelled_steps": travelled }))
        }
        Some(GaugeError::Homing(HomingFailure::Timeout { stage, timeout_ms })) => {
            Some(json!({ "stage": stage.to_string(), "timeout_ms": timeout_ms }))
        }
        _ => None,
    };

    let obj = if let Some(d) = details {
        json!({ "reason": reason, "details": d, "message": humanize(err) })
    } else {
        json!({ "reason": reason, "message": humanize(err) })
    };
    obj.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::WrapErr;
    use gauge_core::HomingStage;

    fn homing(f: HomingFailure) -> eyre::Report {
        Err::<(), _>(eyre::Report::new(GaugeError::Homing(f)))
            .wrap_err("homing gauge 'ALT'")
            .unwrap_err()
    }

    #[test]
    fn sensor_not_found_has_its_own_exit_code() {
        let e = homing(HomingFailure::SensorNotFound {
            stage: HomingStage::CoarseSeek,
            travelled: 800,
        });
        assert_eq!(exit_code_for_error(&e), 3);
        assert!(humanize(&e).contains("coarse-seek"));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(v["reason"], "SensorNotFound");
        assert_eq!(v["details"]["travelled_steps"], 800);
    }

    #[test]
    fn timeout_exit_code() {
        let e = homing(HomingFailure::Timeout {
            stage: HomingStage::FineForward,
            timeout_ms: 10,
        });
        assert_eq!(exit_code_for_error(&e), 4);
    }

    #[test]
    fn build_errors_are_config_errors() {
        let e = eyre::Report::new(BuildError::InvalidConfig("seek_steps must be > 0"));
        assert_eq!(exit_code_for_error(&e), 2);
        assert!(humanize(&e).contains("seek_steps"));
    }

    #[test]
    fn untyped_errors_fall_back() {
        let e = eyre::eyre!("interrupted");
        assert_eq!(exit_code_for_error(&e), 1);
        assert!(humanize(&e).contains("interrupted"));
    }
}
