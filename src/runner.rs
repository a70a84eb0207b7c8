//! Real-time driver for a [`Simulation`]
//!
//! A single tokio task fires on a fixed interval, measures the wall-clock
//! delta since its previous tick and feeds it to `Simulation::tick`. Pause
//! and reset abort the task and bump the run epoch, so a tick that was
//! already scheduled finds a stale epoch and exits without writing.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::history::SamplePoint;
use crate::parameters::{ParameterName, SimulationParameters};
use crate::simulation::{ActiveProject, RunState, Simulation, SimulationSnapshot};

/// Shared simulation plus its ticker task
pub struct SimulationRunner {
    core: Arc<Mutex<Simulation>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    tick_interval: Duration,
}

impl Default for SimulationRunner {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

fn lock_core(core: &Mutex<Simulation>) -> MutexGuard<'_, Simulation> {
    // A panic mid-tick leaves plain data behind; keep serving it
    core.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig) -> Self {
        let tick_interval = Duration::from_millis(config.tick_interval_ms.max(1));
        Self {
            core: Arc::new(Mutex::new(Simulation::new(config))),
            ticker: Mutex::new(None),
            tick_interval,
        }
    }

    fn core(&self) -> MutexGuard<'_, Simulation> {
        lock_core(&self.core)
    }

    fn take_ticker(&self) -> Option<JoinHandle<()>> {
        self.ticker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    fn cancel_ticker(&self) {
        if let Some(handle) = self.take_ticker() {
            handle.abort();
        }
    }

    /// Start or resume the run on the ambient tokio runtime.
    ///
    /// Without one the run stays where it was and `Runtime` is returned.
    pub fn start(&self) -> Result<SimulationSnapshot> {
        let runtime = Handle::try_current().map_err(|e| {
            log::error!("[runner] Cannot start ticker: {}", e);
            SimulationError::Runtime(e.to_string())
        })?;

        let epoch = {
            let mut sim = self.core();
            let was_running = sim.is_running();
            if was_running || sim.start() != RunState::Running {
                return Ok(sim.snapshot());
            }
            sim.epoch()
        };

        self.cancel_ticker();
        let handle = runtime.spawn(run_ticker(Arc::clone(&self.core), epoch, self.tick_interval));
        *self
            .ticker
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(handle);

        Ok(self.snapshot())
    }

    pub fn pause(&self) -> SimulationSnapshot {
        let snapshot = {
            let mut sim = self.core();
            sim.pause();
            sim.snapshot()
        };
        self.cancel_ticker();
        snapshot
    }

    pub fn toggle(&self) -> Result<SimulationSnapshot> {
        if self.is_running() {
            Ok(self.pause())
        } else {
            self.start()
        }
    }

    pub fn reset(&self) -> SimulationSnapshot {
        let snapshot = {
            let mut sim = self.core();
            sim.reset();
            sim.snapshot()
        };
        self.cancel_ticker();
        snapshot
    }

    /// Switch the run screen to another project, from a fresh run
    pub fn open_project(&self, project: ActiveProject) -> SimulationSnapshot {
        let snapshot = {
            let mut sim = self.core();
            sim.open_project(project);
            sim.snapshot()
        };
        self.cancel_ticker();
        snapshot
    }

    /// Wait for the current ticker to stop (horizon, pause, reset or fault)
    pub async fn join(&self) {
        if let Some(handle) = self.take_ticker() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    log::error!("[runner] Ticker task failed: {}", e);
                }
            }
        }
    }

    pub fn set_parameter(&self, name: ParameterName, value: f64) -> Result<SimulationParameters> {
        let mut sim = self.core();
        sim.set_parameter(name, value)?;
        Ok(*sim.parameters())
    }

    /// Apply a full parameter set, rejecting it whole if any value is out of range
    pub fn replace_parameters(&self, parameters: SimulationParameters) -> Result<SimulationParameters> {
        let mut sim = self.core();
        sim.replace_parameters(parameters)?;
        Ok(*sim.parameters())
    }

    pub fn parameters(&self) -> SimulationParameters {
        *self.core().parameters()
    }

    pub fn history(&self) -> Vec<SamplePoint> {
        self.core().history().snapshot()
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        self.core().snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.core().is_running()
    }

    pub fn virtual_time_minutes(&self) -> f64 {
        self.core().virtual_time_minutes()
    }

    /// Run a closure against the locked simulation
    pub fn with_simulation<R>(&self, f: impl FnOnce(&Simulation) -> R) -> R {
        let sim = self.core();
        f(&*sim)
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

/// Ticker loop body; exits as soon as its epoch is no longer current
async fn run_ticker(core: Arc<Mutex<Simulation>>, epoch: u64, period: Duration) {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // First tick completes immediately; measure from there so a resumed
    // run never catches up on time spent paused.
    timer.tick().await;
    let mut last = Instant::now();

    loop {
        timer.tick().await;
        let now = Instant::now();
        let dt_seconds = now.duration_since(last).as_secs_f64();
        last = now;

        let mut sim = lock_core(&core);
        if sim.epoch() != epoch || !sim.is_running() {
            log::debug!("[runner] Ticker for epoch {} retired", epoch);
            break;
        }
        if let Err(e) = sim.tick(dt_seconds) {
            log::error!("[runner] Tick failed, run paused: {}", e);
            break;
        }
        if !sim.is_running() {
            break;
        }
    }
}
