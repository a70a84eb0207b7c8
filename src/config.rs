//! Run-loop configuration
//!
//! Defaults live in [`constants`]; an optional `config/simulation.json`
//! overrides them.

use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::{Result, SimulationError};
use crate::parameters::SimulationParameters;

/// Default run-loop constants
pub mod constants {
    /// Virtual minutes advanced per real second
    pub const TIME_SCALE: f64 = 5.0;
    /// Minimum virtual gap between two plotted samples [min]
    pub const SAMPLING_INTERVAL_MINUTES: f64 = 0.5;
    /// Virtual time at which a run stops [min]
    pub const HORIZON_MINUTES: f64 = 60.0;
    /// Ticker period, roughly one display frame [ms]
    pub const TICK_INTERVAL_MS: u64 = 16;
}

const CONFIG_PATHS: [&str; 2] = ["config/simulation.json", "../config/simulation.json"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub time_scale: f64,
    pub sampling_interval_minutes: f64,
    pub horizon_minutes: f64,
    pub tick_interval_ms: u64,
    pub initial_parameters: SimulationParameters,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: constants::TIME_SCALE,
            sampling_interval_minutes: constants::SAMPLING_INTERVAL_MINUTES,
            horizon_minutes: constants::HORIZON_MINUTES,
            tick_interval_ms: constants::TICK_INTERVAL_MS,
            initial_parameters: SimulationParameters::default(),
        }
    }
}

impl SimulationConfig {
    /// Load from the first readable config path, falling back to defaults.
    ///
    /// A file that exists but does not parse or validate is an error rather
    /// than a silent fallback.
    pub fn load() -> Result<Self> {
        for path in &CONFIG_PATHS {
            if let Ok(content) = fs::read_to_string(path) {
                let config = Self::from_json(&content)?;
                log::info!("[config] Loaded simulation config from {}", path);
                return Ok(config);
            }
        }

        log::warn!("[config] No simulation config found, using built-in defaults");
        Ok(Self::default())
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(content)
            .map_err(|e| SimulationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("time_scale", self.time_scale),
            ("sampling_interval_minutes", self.sampling_interval_minutes),
            ("horizon_minutes", self.horizon_minutes),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimulationError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.tick_interval_ms == 0 {
            return Err(SimulationError::Config("tick_interval_ms must be at least 1".into()));
        }
        self.initial_parameters.validate()
    }
}
