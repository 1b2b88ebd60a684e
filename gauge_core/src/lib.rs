#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Stepper-driven gauge motion control (hardware-agnostic).
//!
//! All hardware interactions go through `gauge_traits::MotorDriver` and
//! `gauge_traits::ZeroSensor`.
//!
//! ## Architecture
//!
//! - **Geometry**: degrees to steps and coil wiring, resolved once (`geometry`)
//! - **Homing**: multi-stage seek against the zero sensor (`homing`)
//! - **Resolver**: raw input to motor command, rotational or linear (`resolver`)
//! - **Run loop**: non-blocking tick with debounced drift correction (`GaugeCore::tick`)
//! - **Panel**: named collection of independent gauges (`panel`)

pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod gauge;
pub mod geometry;
pub mod homing;
pub mod hw_error;
pub mod mocks;
pub mod panel;
pub mod resolver;
pub mod state;
pub mod status;
pub mod util;

pub use builder::{GaugeBuilder, Missing, Set, build_gauge};
pub use config::{HomingCfg, MotionCfg, MotionProfile, RunCfg};
pub use error::{BuildError, GaugeError, HomingFailure, Result};
pub use gauge::{Gauge, GaugeCore};
pub use geometry::{GaugeConfig, GaugeKind, GaugeSpec, MotorVariant, angle_to_steps, resolve_wiring};
pub use mocks::NoSensor;
pub use panel::Panel;
pub use resolver::{MoveCommand, Resolution, Trend};
pub use state::GaugeState;
pub use status::{HomingReport, HomingStage, TickStatus};
