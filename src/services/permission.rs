use crate::services::scanner::CameraPermission;
use tokio::sync::oneshot;

/// Permission collaborator whose answer comes from settings.
///
/// Desktop hosts have no per-app camera prompt, so the decision is made up
/// front in `Scanview Settings.yaml` (or `SCANVIEW_SCANNER__PERMISSION_GRANTED`).
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredPermission {
    granted: bool,
}

impl ConfiguredPermission {
    pub fn new(granted: bool) -> Self {
        Self { granted }
    }
}

impl CameraPermission for ConfiguredPermission {
    fn request_permission(&self) -> oneshot::Receiver<bool> {
        let (tx, rx) = oneshot::channel();
        tracing::debug!("Camera permission resolved from settings: granted={}", self.granted);
        // The receiver is still in scope, so this send cannot fail
        let _ = tx.send(self.granted);
        rx
    }
}
