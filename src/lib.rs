//! Photocatalytic Degradation Simulator Library
//!
//! Live-tunable first-order decay simulation for the governance screen of
//! the unmanned pollutant laboratory. The core runs headless; the `desktop`
//! feature wraps it in Tauri commands.

pub mod config;
pub mod error;
pub mod history;
pub mod kinetics;
pub mod parameters;
pub mod project;
pub mod runner;
pub mod simulation;
#[cfg(feature = "desktop")]
pub mod commands;

pub use config::SimulationConfig;
pub use error::SimulationError;
pub use history::{SampleHistory, SamplePoint};
pub use parameters::{ParameterName, SimulationParameters};
pub use runner::SimulationRunner;
pub use simulation::{ActiveProject, RunState, Simulation, SimulationSnapshot};
#[cfg(feature = "desktop")]
pub use commands::SimulatorState;
