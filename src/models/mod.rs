//! Data models for the scanner application.
//!
//! - [`Code`] / [`Symbology`]: Decoded barcodes as reported by the scanner collaborator
//! - [`CameraSide`]: Front, back, or collaborator default camera
//! - [`ScannerState`]: Runtime state of the scanner screen, owned by [`StateManager`](crate::state::StateManager)
//! - [`UserConfig`]: Settings loaded from `Scanview Settings.yaml`

pub mod camera;
pub mod code;
pub mod config;
pub mod scanner_state;

pub use camera::CameraSide;
pub use code::{Code, Symbology};
pub use config::{LoggingSettings, ScannerSettings, UserConfig};
pub use scanner_state::{PermissionStatus, ScanStatus, ScannerState};
