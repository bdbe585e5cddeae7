//! Scanview - Barcode scanner view
//!
//! Main entry point for the GUI application.
//!
//! # Overview
//!
//! This binary crate provides the Slint frontend. It initializes:
//! - Configuration loading ([`ConfigManager`], `Scanview Data/Scanview Settings.yaml` + `SCANVIEW_*` env)
//! - Logging infrastructure (file rotation + optional console output)
//! - Tokio async runtime (permission requests, simulated capture)
//! - State management ([`StateManager`])
//! - GUI controller ([`GuiController`] - the window acting as the scanner view)
//!
//! # Execution Flow
//!
//! 1. Load settings (logging needs the log directory from them)
//! 2. Initialize logging → logs/scanview.<date>
//! 3. Create tokio runtime with 2 worker threads
//! 4. Create StateManager and GuiController (loads the view, builds the scanner)
//! 5. Run Slint event loop: the window appearing requests permission and starts scanning
//! 6. Closing the window stops the scanner; shutdown the runtime with a 5s timeout

use anyhow::Result;
use scanview::ui::GuiController;
use scanview::{APP_NAME, ConfigManager, StateManager, VERSION};
use std::sync::Arc;

fn main() -> Result<()> {
    let config_manager = ConfigManager::new("Scanview Data")?;
    let user_config = config_manager.load_user_config()?;

    // Keep the guard alive so the non-blocking file writer keeps flushing
    let _log_guard = scanview::logging::setup_logging(&user_config.logging, "scanview")?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("scanview-worker")
        .build()?;

    tracing::info!("Tokio runtime initialized with {} worker threads", 2);

    let state_manager = Arc::new(StateManager::new());

    let gui_controller = GuiController::new(
        Arc::clone(&state_manager),
        user_config.scanner,
        runtime.handle().clone(),
    )?;

    tracing::info!(
        "GUI controller initialized, launching window ({} camera)",
        gui_controller.camera_side()
    );

    // Blocks until the window is closed
    let result = gui_controller.run();

    tracing::info!("GUI closed, shutting down");

    let codes_found = state_manager.read(|s| s.codes_found);
    tracing::info!("Session summary: {} code(s) found", codes_found);

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    tracing::info!("Application shutdown complete");

    result.map_err(|e| {
        tracing::error!("GUI error: {}", e);
        anyhow::anyhow!("GUI error: {}", e)
    })
}
