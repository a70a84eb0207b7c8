//! Error types for the degradation simulation

use thiserror::Error;

/// Everything that can go wrong inside the simulation core.
///
/// All variants are recoverable: a kinetics fault pauses the run and is
/// surfaced in the snapshot, parameter and wizard errors leave state as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("parameter {name} = {value} is outside [{min}, {max}]")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("kinetics produced a non-finite {quantity} at t = {time_minutes:.2} min")]
    NonFiniteResult {
        quantity: &'static str,
        time_minutes: f64,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("project wizard: {0}")]
    Wizard(String),

    #[error("no async runtime to drive the ticker: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
