// Scanview - Barcode scanner view driven by a lifecycle-aware controller
//
// This is the library crate containing the scanner controller, its collaborator
// interfaces and the supporting state/config/logging plumbing.
// The binary crate (main.rs) provides the GUI entry point.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{CameraSide, Code, ScannerSettings, ScannerState, Symbology, UserConfig};
pub use state::{StateChange, StateManager};
pub use ui::{AppearOutcome, Appearance, ScannerCollaborators, ScannerController};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
