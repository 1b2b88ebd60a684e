#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsing, validation and geometry derivation must never panic.
    let Ok(cfg) = toml::from_str::<gauge_config::Config>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    for g in &cfg.gauges {
        let geometry = gauge_core::GaugeConfig::from_spec(&gauge_core::GaugeSpec::from(g));
        let _ = gauge_core::resolver::resolve(
            &geometry,
            u16::MAX,
            gauge_core::Trend::Falling,
            geometry.initial_position_steps,
        );
    }
});
