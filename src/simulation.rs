//! Degradation run state and the tick loop body
//!
//! `Simulation` is a plain single-owner state machine. Advancing it is an
//! explicit `tick(dt_seconds)`, so the same logic runs under the tokio
//! ticker, the desktop shell, or a test that feeds hand-picked deltas.

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::history::{SampleHistory, SamplePoint};
use crate::kinetics;
use crate::parameters::{ParameterName, SimulationParameters};

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Virtual process clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    pub virtual_time_minutes: f64,
    pub running: bool,
    pub horizon_minutes: f64,
}

impl SimulationClock {
    pub fn new(horizon_minutes: f64) -> Self {
        Self {
            virtual_time_minutes: 0.0,
            running: false,
            horizon_minutes,
        }
    }

    pub fn at_horizon(&self) -> bool {
        self.virtual_time_minutes >= self.horizon_minutes
    }
}

/// Project whose run is on screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveProject {
    pub id: String,
    pub name: String,
}

/// Everything a host needs to draw the run screen
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSnapshot {
    pub run_state: RunState,
    pub is_running: bool,
    pub virtual_time_minutes: f64,
    pub horizon_minutes: f64,
    pub progress_percent: f64,
    pub parameters: SimulationParameters,
    pub rate_constant: f64,       // [1/min], 0 if the parameters are faulty
    pub half_life_minutes: Option<f64>,
    pub active_project: Option<ActiveProject>,
    pub latest_sample: SamplePoint,
    pub sample_count: usize,
    pub removal_rate_percent: f64,
    pub energy_consumption_kwh: f64,
    pub fault: Option<String>,
    pub log: Vec<String>,
}

/// Degradation simulation engine
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    parameters: SimulationParameters,
    clock: SimulationClock,
    history: SampleHistory,
    fault: Option<SimulationError>,
    active_project: Option<ActiveProject>,
    // Bumped by start/pause/reset; a scheduled ticker holding an older
    // epoch must not write.
    epoch: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            parameters: config.initial_parameters,
            clock: SimulationClock::new(config.horizon_minutes),
            history: SampleHistory::new(),
            fault: None,
            active_project: None,
            epoch: 0,
            config,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run_state(&self) -> RunState {
        if self.clock.running {
            RunState::Running
        } else if self.clock.at_horizon() {
            RunState::Finished
        } else if self.clock.virtual_time_minutes > 0.0 {
            RunState::Paused
        } else {
            RunState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.clock.running
    }

    pub fn virtual_time_minutes(&self) -> f64 {
        self.clock.virtual_time_minutes
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn fault(&self) -> Option<&SimulationError> {
        self.fault.as_ref()
    }

    // ------------------------------------------------------------------
    // Controls
    // ------------------------------------------------------------------

    /// Start or resume. No-op when already running or at the horizon.
    pub fn start(&mut self) -> RunState {
        match self.run_state() {
            RunState::Running => {}
            RunState::Finished => {
                log::debug!("[simulation] start ignored: horizon reached, reset to run again");
            }
            RunState::Idle | RunState::Paused => {
                self.clock.running = true;
                self.fault = None;
                self.epoch += 1;
                log::info!(
                    "[simulation] Running from t={:.2} min",
                    self.clock.virtual_time_minutes
                );
            }
        }
        self.run_state()
    }

    /// Freeze virtual time where it is
    pub fn pause(&mut self) -> RunState {
        if self.clock.running {
            self.clock.running = false;
            self.epoch += 1;
            log::info!(
                "[simulation] Paused at t={:.2} min",
                self.clock.virtual_time_minutes
            );
        }
        self.run_state()
    }

    pub fn toggle(&mut self) -> RunState {
        if self.clock.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Back to Idle: t = 0, history truncated to the seed. Parameters stay.
    pub fn reset(&mut self) -> RunState {
        self.clock = SimulationClock::new(self.config.horizon_minutes);
        self.history.reset();
        self.fault = None;
        self.epoch += 1;
        log::info!("[simulation] Reset");
        self.run_state()
    }

    /// Put a project on the run screen, starting from a fresh run
    pub fn open_project(&mut self, project: ActiveProject) -> RunState {
        log::info!("[simulation] Opened project {} '{}'", project.id, project.name);
        self.active_project = Some(project);
        self.reset()
    }

    pub fn active_project(&self) -> Option<&ActiveProject> {
        self.active_project.as_ref()
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Slider entry point: clamps, takes effect on the next tick
    pub fn set_parameter(&mut self, name: ParameterName, value: f64) -> Result<f64> {
        let stored = self.parameters.set(name, value)?;
        log::debug!("[simulation] {} = {}", name.as_str(), stored);
        Ok(stored)
    }

    /// Programmatic entry point: all-or-nothing, strictly validated
    pub fn replace_parameters(&mut self, parameters: SimulationParameters) -> Result<()> {
        parameters.validate()?;
        self.parameters = parameters;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance by `dt_seconds` of wall-clock time.
    ///
    /// Returns whether a sample was appended. Does nothing unless running.
    /// A kinetics fault pauses the run and is kept for the snapshot.
    pub fn tick(&mut self, dt_seconds: f64) -> Result<bool> {
        if !self.clock.running {
            return Ok(false);
        }

        let dt_seconds = if dt_seconds.is_finite() { dt_seconds.max(0.0) } else { 0.0 };
        let mut time = self.clock.virtual_time_minutes + dt_seconds * self.config.time_scale;
        let reached_horizon = time >= self.clock.horizon_minutes;
        if reached_horizon {
            time = self.clock.horizon_minutes;
        }

        let point = match kinetics::sample_at(&self.parameters, time) {
            Ok(point) => point,
            Err(err) => {
                let err = match err {
                    SimulationError::NonFiniteResult { quantity, .. } => {
                        SimulationError::NonFiniteResult {
                            quantity,
                            time_minutes: time,
                        }
                    }
                    other => other,
                };
                log::error!("[simulation] Run stopped: {}", err);
                self.clock.running = false;
                self.epoch += 1;
                self.fault = Some(err.clone());
                return Err(err);
            }
        };
        self.clock.virtual_time_minutes = time;

        // The horizon always gets a sample so a finished run reports C/C0 at t = horizon
        let mut appended = false;
        let gap = time - self.history.latest().time_minutes;
        if gap > self.config.sampling_interval_minutes || reached_horizon {
            appended = self.history.push(SamplePoint {
                time_minutes: time,
                concentration_ratio: point.concentration_ratio,
                intermediate_ratio: point.intermediate_ratio,
            });
            if appended {
                log::debug!(
                    "[simulation] t={:.2} C/C0={:.4} inter={:.4}",
                    time,
                    point.concentration_ratio,
                    point.intermediate_ratio
                );
            }
        }

        if reached_horizon {
            self.clock.running = false;
            self.epoch += 1;
            log::info!(
                "[simulation] Finished at t={:.0} min, removal {:.1}%",
                time,
                self.removal_rate_percent()
            );
        }

        Ok(appended)
    }

    // ------------------------------------------------------------------
    // Derived values
    // ------------------------------------------------------------------

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    pub fn latest_sample(&self) -> &SamplePoint {
        self.history.latest()
    }

    pub fn removal_rate_percent(&self) -> f64 {
        ((1.0 - self.history.latest().concentration_ratio) * 100.0).clamp(0.0, 100.0)
    }

    /// Lamp energy so far [kWh]
    pub fn energy_consumption_kwh(&self) -> f64 {
        self.clock.virtual_time_minutes * (self.parameters.uv_intensity * 0.5) / 60.0
    }

    pub fn progress_percent(&self) -> f64 {
        (self.clock.virtual_time_minutes / self.clock.horizon_minutes * 100.0).clamp(0.0, 100.0)
    }

    /// Lines for the run screen's output console
    pub fn status_log(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self.run_state() {
            RunState::Running => {
                let latest = self.history.latest();
                lines.push("> Initializing ODE solver... OK".to_string());
                lines.push(format!(
                    "> Time scale: {}x | Sampling interval: {} min",
                    self.config.time_scale, self.config.sampling_interval_minutes
                ));
                lines.push(format!(
                    "> t={:.1}m | C/C0={:.4} | Inter={:.4}",
                    self.clock.virtual_time_minutes,
                    latest.concentration_ratio,
                    latest.intermediate_ratio
                ));
            }
            RunState::Paused => lines.push("> Simulation Paused.".to_string()),
            RunState::Finished => lines.push("> Simulation Finished.".to_string()),
            RunState::Idle => lines.push("> Ready to start.".to_string()),
        }
        if let Some(fault) = &self.fault {
            lines.push(format!("> ERROR: {}", fault));
        }
        lines
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        let k = kinetics::rate_constant(&self.parameters).ok();
        SimulationSnapshot {
            run_state: self.run_state(),
            is_running: self.clock.running,
            virtual_time_minutes: self.clock.virtual_time_minutes,
            horizon_minutes: self.clock.horizon_minutes,
            progress_percent: self.progress_percent(),
            parameters: self.parameters,
            rate_constant: k.unwrap_or(0.0),
            half_life_minutes: k.and_then(kinetics::half_life_minutes),
            active_project: self.active_project.clone(),
            latest_sample: *self.history.latest(),
            sample_count: self.history.len(),
            removal_rate_percent: self.removal_rate_percent(),
            energy_consumption_kwh: self.energy_consumption_kwh(),
            fault: self.fault.as_ref().map(|e| e.to_string()),
            log: self.status_log(),
        }
    }
}
