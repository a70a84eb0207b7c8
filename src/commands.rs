//! Tauri commands for the degradation simulation
//!
//! These commands are exposed to the frontend via Tauri's IPC mechanism

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tauri::State;

use crate::history::SamplePoint;
use crate::kinetics;
use crate::parameters::{ParameterName, ParameterRange, SimulationParameters};
use crate::project::{
    DigitalOperator, ProjectCatalog, ProjectDraft, ProjectStatus, ProjectWizard, SimulationKind,
    SimulationKindOption, SimulationProject, WizardView, OPERATOR_CATALOG,
};
use crate::runner::SimulationRunner;
use crate::simulation::{ActiveProject, SimulationSnapshot};

/// Simulation state wrapper for Tauri
pub struct SimulatorState {
    pub runner: Arc<SimulationRunner>,
    pub wizard: Mutex<ProjectWizard>,
    pub catalog: Mutex<ProjectCatalog>,
}

impl SimulatorState {
    pub fn new(runner: SimulationRunner) -> Self {
        Self {
            runner: Arc::new(runner),
            wizard: Mutex::new(ProjectWizard::new()),
            catalog: Mutex::new(ProjectCatalog::seeded()),
        }
    }
}

/// Slider description for one parameter
#[derive(Serialize)]
pub struct ParameterDescriptor {
    pub name: ParameterName,
    pub range: ParameterRange,
    pub value: f64,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// Run control
// ============================================================================

/// Get current simulation status and derived metrics
#[tauri::command]
pub fn get_simulation_state(simulator: State<SimulatorState>) -> SimulationSnapshot {
    simulator.runner.snapshot()
}

/// Start or resume the run (spawns the ticker on Tauri's tokio runtime)
#[tauri::command]
pub async fn start_simulation(simulator: State<'_, SimulatorState>) -> Result<SimulationSnapshot, String> {
    simulator.runner.start().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn pause_simulation(simulator: State<SimulatorState>) -> SimulationSnapshot {
    simulator.runner.pause()
}

/// Start/pause button
#[tauri::command]
pub async fn toggle_simulation(simulator: State<'_, SimulatorState>) -> Result<SimulationSnapshot, String> {
    simulator.runner.toggle().map_err(|e| e.to_string())
}

/// Reset simulation to t = 0 with only the seed sample
#[tauri::command]
pub fn reset_simulation(simulator: State<SimulatorState>) -> SimulationSnapshot {
    simulator.runner.reset()
}

// ============================================================================
// Parameters
// ============================================================================

#[tauri::command]
pub fn get_parameters(simulator: State<SimulatorState>) -> Vec<ParameterDescriptor> {
    let params = simulator.runner.parameters();
    ParameterName::ALL
        .iter()
        .map(|name| ParameterDescriptor {
            name: *name,
            range: name.range(),
            value: params.get(*name),
        })
        .collect()
}

/// Move one slider; the value is clamped to its range
#[tauri::command]
pub fn set_parameter(
    simulator: State<SimulatorState>,
    name: String,
    value: f64,
) -> Result<SimulationParameters, String> {
    let name: ParameterName = name.parse().map_err(|e: crate::SimulationError| e.to_string())?;
    simulator.runner.set_parameter(name, value).map_err(|e| e.to_string())
}

/// Apply a whole parameter set at once; nothing changes if any value is out of range
#[tauri::command]
pub fn set_parameters(
    simulator: State<SimulatorState>,
    parameters: SimulationParameters,
) -> Result<SimulationParameters, String> {
    simulator.runner.replace_parameters(parameters).map_err(|e| e.to_string())
}

// ============================================================================
// Chart data
// ============================================================================

#[tauri::command]
pub fn get_history(simulator: State<SimulatorState>) -> Vec<SamplePoint> {
    simulator.runner.history()
}

/// History as rows of [time, C/C0, intermediate]
#[tauri::command]
pub fn get_history_matrix(simulator: State<SimulatorState>) -> Vec<Vec<f64>> {
    simulator.runner.with_simulation(|sim| {
        sim.history()
            .to_array()
            .outer_iter()
            .map(|row| row.to_vec())
            .collect()
    })
}

/// Predicted C/C0 over the whole horizon for the current parameters
#[tauri::command]
pub fn predict_curve(simulator: State<SimulatorState>, points: usize) -> Result<Vec<f64>, String> {
    let (params, horizon) = simulator
        .runner
        .with_simulation(|sim| (*sim.parameters(), sim.config().horizon_minutes));
    let times = ndarray::Array1::linspace(0.0, horizon, points.clamp(2, 1000));
    kinetics::predict_curve(&params, &times)
        .map(|curve| curve.to_vec())
        .map_err(|e| e.to_string())
}

// ============================================================================
// Project wizard and catalog
// ============================================================================

#[tauri::command]
pub fn list_projects(simulator: State<SimulatorState>) -> Vec<SimulationProject> {
    lock(&simulator.catalog).list().to_vec()
}

#[tauri::command]
pub fn list_operators() -> Vec<DigitalOperator> {
    OPERATOR_CATALOG.to_vec()
}

#[tauri::command]
pub fn list_simulation_kinds() -> Vec<SimulationKindOption> {
    SimulationKind::options()
}

#[tauri::command]
pub fn set_project_status(
    simulator: State<SimulatorState>,
    id: String,
    status: ProjectStatus,
) -> Result<SimulationProject, String> {
    let mut catalog = lock(&simulator.catalog);
    if !catalog.set_status(&id, status) {
        return Err(format!("unknown project {}", id));
    }
    catalog.get(&id).cloned().ok_or_else(|| format!("unknown project {}", id))
}

/// Put an existing project on the run screen with a fresh run
#[tauri::command]
pub fn open_project(simulator: State<SimulatorState>, id: String) -> Result<SimulationSnapshot, String> {
    let active = lock(&simulator.catalog)
        .get(&id)
        .map(ActiveProject::from)
        .ok_or_else(|| format!("unknown project {}", id))?;
    Ok(simulator.runner.open_project(active))
}

#[tauri::command]
pub fn wizard_state(simulator: State<SimulatorState>) -> WizardView {
    lock(&simulator.wizard).view()
}

#[tauri::command]
pub fn wizard_set_basics(
    simulator: State<SimulatorState>,
    name: String,
    target: String,
    kind: SimulationKind,
) -> WizardView {
    let mut wizard = lock(&simulator.wizard);
    wizard.set_name(name);
    wizard.set_target(target);
    wizard.set_kind(kind);
    wizard.view()
}

#[tauri::command]
pub fn wizard_add_operator(simulator: State<SimulatorState>, operator_id: String) -> Result<WizardView, String> {
    let mut wizard = lock(&simulator.wizard);
    wizard.add_operator(&operator_id).map_err(|e| e.to_string())?;
    Ok(wizard.view())
}

#[tauri::command]
pub fn wizard_remove_step(simulator: State<SimulatorState>, index: usize) -> Result<WizardView, String> {
    let mut wizard = lock(&simulator.wizard);
    wizard.remove_step(index).map_err(|e| e.to_string())?;
    Ok(wizard.view())
}

#[tauri::command]
pub fn wizard_next(simulator: State<SimulatorState>) -> Result<WizardView, String> {
    let mut wizard = lock(&simulator.wizard);
    wizard.next().map_err(|e| e.to_string())?;
    Ok(wizard.view())
}

#[tauri::command]
pub fn wizard_back(simulator: State<SimulatorState>) -> WizardView {
    let mut wizard = lock(&simulator.wizard);
    wizard.back();
    wizard.view()
}

/// Finish the wizard, register the project and open it on the run screen
#[tauri::command]
pub fn wizard_complete(simulator: State<SimulatorState>, owner: String) -> Result<SimulationProject, String> {
    let draft: ProjectDraft = {
        let mut wizard = lock(&simulator.wizard);
        let finished = std::mem::take(&mut *wizard);
        match finished.clone().complete() {
            Ok(draft) => draft,
            Err(e) => {
                *wizard = finished;
                return Err(e.to_string());
            }
        }
    };

    let project = lock(&simulator.catalog).register(draft, owner).clone();
    simulator.runner.open_project(ActiveProject::from(&project));
    Ok(project)
}
