// State management module
//
// This module provides the StateManager which wraps ScannerState with thread-safe access
// using Arc<RwLock<T>> and emits change events for GUI updates.

use crate::models::{CameraSide, Code, PermissionStatus, ScanStatus, ScannerState};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

/// Change events emitted when state is modified
///
/// These events let the GUI follow the scanner session without polling.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The permission request has been answered
    PermissionResolved { granted: bool },

    /// A scanning session has started
    ScanningStarted { camera: CameraSide },

    /// The scanning session has ended
    ScanningStopped { codes_found: usize },

    /// The active camera changed during a session
    CameraChanged { camera: CameraSide },

    /// New codes were decoded
    CodesDetected {
        codes_found: usize,
        last_code: Option<String>,
    },

    /// Starting the scanner failed
    ScanFailed { message: String },
}

/// Thread-safe state manager with event emission
///
/// - [`read()`](Self::read) for reading state
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to state changes
///
/// # Related Types
///
/// - [`crate::models::ScannerState`]: The underlying state structure
/// - [`crate::ui::ScannerController`]: Writes session transitions
/// - [`crate::ui::GuiController`]: Primary consumer of state events
pub struct StateManager {
    state: Arc<RwLock<ScannerState>>,

    /// Broadcast channel for emitting state change events
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state
    ///
    /// The broadcast channel buffers 100 events.
    pub fn new() -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(ScannerState::default())),
            state_tx,
        }
    }

    /// Get a clone of the current state
    pub fn snapshot(&self) -> ScannerState {
        self.state.read().unwrap().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let scanning = state_manager.read(|state| state.is_scanning());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ScannerState) -> R,
    {
        let state = self.state.read().unwrap();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// Captures the old state, applies `update_fn`, diffs the two and broadcasts
    /// one event per detected change.
    ///
    /// # Returns
    /// The StateChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut ScannerState),
    {
        let mut state = self.state.write().unwrap();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = Self::detect_changes(&old_state, &state);

        for change in &changes {
            // No subscribers is fine
            let _ = self.state_tx.send(change.clone());
        }

        changes
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    fn detect_changes(old: &ScannerState, new: &ScannerState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.permission != new.permission && new.permission != PermissionStatus::NotDetermined {
            changes.push(StateChange::PermissionResolved {
                granted: new.permission == PermissionStatus::Granted,
            });
        }

        if old.status != new.status {
            match new.status {
                ScanStatus::Scanning => changes.push(StateChange::ScanningStarted {
                    camera: new.active_camera.unwrap_or_default(),
                }),
                ScanStatus::Idle => changes.push(StateChange::ScanningStopped {
                    codes_found: new.codes_found,
                }),
            }
        } else if old.active_camera != new.active_camera
            && let Some(camera) = new.active_camera
        {
            changes.push(StateChange::CameraChanged { camera });
        }

        if new.codes_found > old.codes_found {
            changes.push(StateChange::CodesDetected {
                codes_found: new.codes_found,
                last_code: new.last_code.clone(),
            });
        }

        if old.last_error != new.last_error
            && let Some(message) = &new.last_error
        {
            changes.push(StateChange::ScanFailed {
                message: message.clone(),
            });
        }

        changes
    }

    // Convenience methods for session transitions

    /// Record the answer to a permission request
    pub fn set_permission(&self, granted: bool) -> Vec<StateChange> {
        self.update(|state| {
            state.permission = if granted {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
        })
    }

    /// Clear results from the previous session before a new start attempt
    pub fn begin_session(&self) -> Vec<StateChange> {
        self.update(|state| state.reset_session())
    }

    /// Mark the scanner as running on `camera`
    pub fn start_scanning(&self, camera: CameraSide) -> Vec<StateChange> {
        self.update(|state| {
            state.status = ScanStatus::Scanning;
            state.active_camera = Some(camera);
        })
    }

    /// Mark the scanner as stopped
    pub fn stop_scanning(&self) -> Vec<StateChange> {
        self.update(|state| {
            state.status = ScanStatus::Idle;
            state.active_camera = None;
        })
    }

    /// Record a failed start; the scanner stays idle
    pub fn record_start_failure(&self, message: String) -> Vec<StateChange> {
        self.update(|state| {
            state.status = ScanStatus::Idle;
            state.active_camera = None;
            state.last_error = Some(message);
        })
    }

    pub fn set_active_camera(&self, camera: CameraSide) -> Vec<StateChange> {
        self.update(|state| state.active_camera = Some(camera))
    }

    /// Count a batch of decoded codes. Codes without a string value are counted
    /// but never become `last_code`.
    pub fn record_codes(&self, codes: &[Code]) -> Vec<StateChange> {
        if codes.is_empty() {
            return Vec::new();
        }

        self.update(|state| {
            state.codes_found += codes.len();
            if let Some(value) = codes.iter().rev().find_map(|code| code.string_value()) {
                state.last_code = Some(value.to_string());
            }
        })
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Symbology;

    #[test]
    fn test_new_state_manager() {
        let manager = StateManager::new();
        let state = manager.snapshot();

        assert!(!state.is_scanning());
        assert_eq!(state.permission, PermissionStatus::NotDetermined);
        assert_eq!(state.codes_found, 0);
    }

    #[test]
    fn test_update_with_change_detection() {
        let manager = StateManager::new();

        let changes = manager.update(|state| {
            state.permission = PermissionStatus::Granted;
            state.status = ScanStatus::Scanning;
            state.active_camera = Some(CameraSide::Front);
        });

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0], StateChange::PermissionResolved { granted: true });
        assert_eq!(
            changes[1],
            StateChange::ScanningStarted {
                camera: CameraSide::Front
            }
        );
    }

    #[test]
    fn test_stop_when_idle_emits_nothing() {
        let manager = StateManager::new();
        assert!(manager.stop_scanning().is_empty());
    }

    #[test]
    fn test_camera_change_only_while_status_unchanged() {
        let manager = StateManager::new();
        manager.start_scanning(CameraSide::Back);

        let changes = manager.set_active_camera(CameraSide::Front);
        assert_eq!(
            changes,
            vec![StateChange::CameraChanged {
                camera: CameraSide::Front
            }]
        );
    }

    #[test]
    fn test_record_codes() {
        let manager = StateManager::new();
        let changes = manager.record_codes(&[
            Code::new("ABC123", Symbology::Code128),
            Code::new("XYZ789", Symbology::Qr),
            Code::binary(Symbology::Aztec),
        ]);

        assert_eq!(
            changes,
            vec![StateChange::CodesDetected {
                codes_found: 3,
                last_code: Some("XYZ789".to_string()),
            }]
        );
        assert!(manager.record_codes(&[]).is_empty());
    }

    #[test]
    fn test_start_failure_leaves_scanner_idle() {
        let manager = StateManager::new();
        let changes = manager.record_start_failure("Front camera is not available".to_string());

        assert_eq!(
            changes,
            vec![StateChange::ScanFailed {
                message: "Front camera is not available".to_string()
            }]
        );
        assert!(!manager.read(|s| s.is_scanning()));
    }

    #[test]
    fn test_begin_session_clears_results() {
        let manager = StateManager::new();
        manager.record_codes(&[Code::new("A", Symbology::Qr)]);
        manager.record_start_failure("boom".to_string());

        let changes = manager.begin_session();
        assert!(changes.is_empty());

        let state = manager.snapshot();
        assert_eq!(state.codes_found, 0);
        assert_eq!(state.last_error, None);
    }

    #[test]
    fn test_clone_shares_state() {
        let manager = StateManager::new();
        let clone = manager.clone();

        manager.start_scanning(CameraSide::Back);
        assert!(clone.read(|s| s.is_scanning()));
    }
}
