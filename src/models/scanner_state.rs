use crate::models::CameraSide;

/// Whether a scanning session is live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanStatus {
    #[default]
    Idle,
    Scanning,
}

/// Result of the most recent permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    #[default]
    NotDetermined,
    Granted,
    Denied,
}

/// Single source of truth for the scanner screen.
///
/// `ScannerState` is wrapped in `Arc<RwLock<ScannerState>>` by
/// [`crate::state::StateManager`]. Never mutate it directly; go through
/// [`update()`](crate::state::StateManager::update) so change events fire.
///
/// # Related Types
///
/// - [`crate::state::StateChange`]: Events emitted on mutation
/// - [`crate::ui::ScannerController`]: The only writer during a session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScannerState {
    pub status: ScanStatus,
    pub permission: PermissionStatus,
    pub active_camera: Option<CameraSide>,

    // Session results
    pub codes_found: usize,
    pub last_code: Option<String>,
    pub last_error: Option<String>,
}

impl ScannerState {
    pub fn is_scanning(&self) -> bool {
        self.status == ScanStatus::Scanning
    }

    /// One-line summary for the preview overlay
    pub fn status_message(&self) -> String {
        match (self.status, self.permission) {
            (ScanStatus::Scanning, _) => match self.active_camera {
                Some(camera) => format!("Scanning with {} camera", camera.label().to_lowercase()),
                None => "Scanning".to_string(),
            },
            (ScanStatus::Idle, PermissionStatus::Denied) => "Camera access denied".to_string(),
            (ScanStatus::Idle, _) => match &self.last_error {
                Some(error) => format!("Scanner stopped: {}", error),
                None => "Scanner idle".to_string(),
            },
        }
    }

    /// Reset per-session results, keeping the permission outcome
    pub fn reset_session(&mut self) {
        self.codes_found = 0;
        self.last_code = None;
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = ScannerState::default();
        assert!(!state.is_scanning());
        assert_eq!(state.permission, PermissionStatus::NotDetermined);
        assert_eq!(state.status_message(), "Scanner idle");
    }

    #[test]
    fn test_status_message_variants() {
        let mut state = ScannerState {
            status: ScanStatus::Scanning,
            active_camera: Some(CameraSide::Front),
            ..Default::default()
        };
        assert_eq!(state.status_message(), "Scanning with front camera");

        state.status = ScanStatus::Idle;
        state.permission = PermissionStatus::Denied;
        assert_eq!(state.status_message(), "Camera access denied");

        state.permission = PermissionStatus::Granted;
        state.last_error = Some("camera unavailable".to_string());
        assert_eq!(state.status_message(), "Scanner stopped: camera unavailable");
    }

    #[test]
    fn test_reset_session_keeps_permission() {
        let mut state = ScannerState {
            permission: PermissionStatus::Granted,
            codes_found: 3,
            last_code: Some("X".to_string()),
            ..Default::default()
        };
        state.reset_session();
        assert_eq!(state.codes_found, 0);
        assert_eq!(state.last_code, None);
        assert_eq!(state.permission, PermissionStatus::Granted);
    }
}
