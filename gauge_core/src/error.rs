use thiserror::Error;

use crate::status::HomingStage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HomingFailure {
    #[error("sensor not found during {stage} after {travelled} steps")]
    SensorNotFound { stage: HomingStage, travelled: u64 },
    #[error("{stage} did not finish within {timeout_ms} ms")]
    Timeout { stage: HomingStage, timeout_ms: u64 },
}

#[derive(Debug, Error, Clone)]
pub enum GaugeError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("homing failed: {0}")]
    Homing(#[from] HomingFailure),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing motor driver")]
    MissingMotor,
    #[error("missing gauge config")]
    MissingConfig,
    #[error("gauge '{0}' is zeroable but has no zero sensor")]
    MissingSensor(String),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
