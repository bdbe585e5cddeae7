use crate::models::{CameraSide, Code};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;

/// Callback invoked by the scanner with each batch of decoded codes.
///
/// Batches arrive on the collaborator's own task, so the handler must be
/// `Send + Sync`. One call corresponds to one camera frame.
pub type ResultHandler = Arc<dyn Fn(Vec<Code>) + Send + Sync>;

/// Builds the scanner once the preview surface exists
pub type ScannerFactory = Box<dyn FnOnce(Arc<dyn PreviewSurface>) -> Box<dyn BarcodeScanner> + Send>;

/// Errors reported by a scanner collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("{0} camera is not available")]
    CameraUnavailable(CameraSide),

    #[error("Scanner is already running")]
    AlreadyRunning,

    #[error("Camera cannot be flipped while the scanner is stopped")]
    FlipUnsupported,

    #[error("Scanner backend error: {0}")]
    Backend(String),
}

/// Camera capture + barcode decoding collaborator.
///
/// The controller owns exactly one of these and never shares it. Implementations
/// run capture on their own task and report results through the [`ResultHandler`]
/// passed to [`start`](Self::start).
#[cfg_attr(test, mockall::automock)]
pub trait BarcodeScanner: Send {
    /// Begin capturing with `camera`, delivering code batches to `on_result`.
    ///
    /// Fails with [`ScanError::CameraUnavailable`] when the device has no such
    /// camera and [`ScanError::AlreadyRunning`] when a session is live.
    fn start(&mut self, camera: CameraSide, on_result: ResultHandler) -> Result<(), ScanError>;

    /// Stop capturing. Stopping an idle scanner is a no-op.
    fn stop(&mut self);

    /// Switch to the opposite camera, returning the camera now in use
    fn flip_camera(&mut self) -> Result<CameraSide, ScanError>;

    fn is_scanning(&self) -> bool;
}

/// A rendered preview frame
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    pub camera: CameraSide,
    pub sequence: u64,
    /// Codes decoded in this frame, after symbology filtering
    pub codes: Vec<Code>,
}

/// GUI-owned region the scanner renders its preview into
pub trait PreviewSurface: Send + Sync {
    fn render(&self, frame: &PreviewFrame);

    /// Blank the surface after capture stops
    fn clear(&self);
}

/// Source of the camera permission decision.
///
/// The answer arrives asynchronously. A receiver whose sender is dropped
/// without an answer is treated as a denial.
pub trait CameraPermission: Send + Sync {
    fn request_permission(&self) -> oneshot::Receiver<bool>;
}

/// Button that dismisses an alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertAction {
    pub title: String,
}

/// Modal informational dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub actions: Vec<AlertAction>,
}

impl Alert {
    /// Shown when camera permission is denied
    pub fn scanning_unavailable() -> Self {
        Self {
            title: "Scanning Unavailable".to_string(),
            message: "This app does not have permission to access the camera".to_string(),
            actions: vec![AlertAction {
                title: "Ok".to_string(),
            }],
        }
    }
}

/// Presents alerts to the user. Implementations marshal onto the GUI thread.
pub trait AlertPresenter: Send + Sync {
    fn present(&self, alert: Alert);
}

/// Diagnostic log for scan results and start failures
pub trait ScanLog: Send + Sync {
    fn info(&self, line: &str);
    fn error(&self, line: &str);
}

/// [`ScanLog`] that writes through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingScanLog;

impl ScanLog for TracingScanLog {
    fn info(&self, line: &str) {
        tracing::info!(target: "scanview::scan", "{}", line);
    }

    fn error(&self, line: &str) {
        tracing::error!(target: "scanview::scan", "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanning_unavailable_alert() {
        let alert = Alert::scanning_unavailable();
        assert_eq!(alert.title, "Scanning Unavailable");
        assert_eq!(alert.actions.len(), 1);
        assert_eq!(alert.actions[0].title, "Ok");
    }

    #[test]
    fn test_scan_error_messages() {
        assert_eq!(
            ScanError::CameraUnavailable(CameraSide::Front).to_string(),
            "Front camera is not available"
        );
        assert_eq!(ScanError::AlreadyRunning.to_string(), "Scanner is already running");
    }
}
