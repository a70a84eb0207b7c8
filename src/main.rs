//! Photocatalytic Degradation Simulator - Main Entry Point
//!
//! With the `desktop` feature this is the Tauri application; otherwise it
//! runs one simulation to the horizon in the terminal.

#![cfg_attr(all(feature = "desktop", not(debug_assertions)), windows_subsystem = "windows")]

use photolysis_simulator_lib::{SimulationConfig, SimulationRunner};

#[cfg(feature = "desktop")]
fn main() {
    use photolysis_simulator_lib::commands::*;

    // Initialize logging
    env_logger::init();

    let config = SimulationConfig::load().unwrap_or_else(|e| {
        log::error!("{}; falling back to defaults", e);
        SimulationConfig::default()
    });

    // Build and run Tauri application
    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .manage(SimulatorState::new(SimulationRunner::new(config)))
        .invoke_handler(tauri::generate_handler![
            get_simulation_state,
            start_simulation,
            pause_simulation,
            toggle_simulation,
            reset_simulation,
            get_parameters,
            set_parameter,
            set_parameters,
            get_history,
            get_history_matrix,
            predict_curve,
            // Project wizard and list
            list_projects,
            list_operators,
            list_simulation_kinds,
            set_project_status,
            open_project,
            wizard_state,
            wizard_set_basics,
            wizard_add_operator,
            wizard_remove_step,
            wizard_next,
            wizard_back,
            wizard_complete,
        ])
        .run(tauri::generate_context!())
        .expect("Error while running Photolysis Simulator");
}

#[cfg(not(feature = "desktop"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let config = SimulationConfig::load()?;
    log::info!(
        "Headless run: {}x time scale, {} min sampling, {} min horizon",
        config.time_scale,
        config.sampling_interval_minutes,
        config.horizon_minutes
    );

    let runner = SimulationRunner::new(config);
    runner.start()?;

    // Progress report every 2 s of wall time (10 virtual minutes at 5x)
    let mut report = tokio::time::interval(std::time::Duration::from_secs(2));
    while runner.is_running() {
        report.tick().await;
        for line in runner.snapshot().log {
            log::info!("{}", line);
        }
    }
    runner.join().await;

    let snapshot = runner.snapshot();
    if let Some(fault) = &snapshot.fault {
        log::error!("Run stopped early: {}", fault);
    }
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
