//! Services module - Scanner collaborators and their interfaces.
//!
//! The controller in [`crate::ui::scanner_controller`] never talks to a camera directly. It
//! drives a set of collaborator traits defined here, which keeps it testable without a GUI
//! host or capture device.
//!
//! # Components
//!
//! - [`BarcodeScanner`]: Start/stop/flip capture and deliver decoded [`Code`](crate::models::Code) batches
//! - [`PreviewSurface`]: Where the scanner renders its preview frames
//! - [`CameraPermission`]: Asynchronous permission decision (`oneshot` receiver)
//! - [`AlertPresenter`]: Modal alerts, e.g. [`Alert::scanning_unavailable`]
//! - [`ScanLog`]: Diagnostic log for found codes and start failures ([`TracingScanLog`] by default)
//!
//! # Implementations
//!
//! - [`SimulatedScanner`]: Replays code batches from settings on a tokio task
//! - [`ConfiguredPermission`]: Answers the permission request from settings

pub mod permission;
pub mod scanner;
pub mod simulated;

pub use permission::ConfiguredPermission;
pub use scanner::{
    Alert, AlertAction, AlertPresenter, BarcodeScanner, CameraPermission,
    PreviewFrame, PreviewSurface, ResultHandler, ScanError, ScanLog, ScannerFactory,
    TracingScanLog,
};
pub use simulated::SimulatedScanner;
