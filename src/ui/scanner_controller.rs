// Scanner Controller - Lifecycle-driven orchestration of the scanner collaborator
//
// The GUI calls four lifecycle hooks on this controller:
// - on_view_load: build the scanner bound to the preview surface
// - on_view_appear: ask for camera permission, then start scanning
// - on_view_disappear: stop scanning
// - on_switch_camera_tapped: flip between front and back cameras
//
// Everything else (capture, decoding, the permission prompt, drawing the alert) belongs
// to the injected collaborators.

use crate::models::{CameraSide, Code};
use crate::services::scanner::{
    Alert, AlertPresenter, BarcodeScanner, CameraPermission, PreviewSurface, ResultHandler,
    ScanError, ScanLog, ScannerFactory,
};
use crate::state::StateManager;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// How an appearance ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppearOutcome {
    /// Permission granted and the scanner is running
    Started,
    /// Permission denied; the "Scanning Unavailable" alert was presented
    PermissionDenied,
    /// Permission granted but the scanner refused to start
    StartFailed(ScanError),
    /// The scanner was already running; nothing was started
    AlreadyScanning,
    /// `on_view_load` has not built a scanner yet
    NoScanner,
    /// The view disappeared before permission was answered
    Cancelled,
}

/// Marks one appearance of the view; stale once the view disappears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance(u64);

/// Everything the controller needs from its host
pub struct ScannerCollaborators {
    pub preview: Weak<dyn PreviewSurface>,
    pub scanner_factory: ScannerFactory,
    pub permission: Arc<dyn CameraPermission>,
    pub alerts: Arc<dyn AlertPresenter>,
    pub log: Arc<dyn ScanLog>,
}

/// Mediates between a view lifecycle and a [`BarcodeScanner`].
///
/// Scanning only runs between a permission grant and the next disappearance.
/// Every appearance asks for permission again. The scanner handle is owned
/// exclusively by the controller and its lock is never held across an `.await`.
///
/// # Example
/// ```ignore
/// let controller = ScannerController::new(collaborators, CameraSide::Back, state_manager);
/// controller.on_view_load();
/// match controller.on_view_appear().await {
///     AppearOutcome::Started => { /* codes are being logged */ }
///     outcome => tracing::info!("Not scanning: {:?}", outcome),
/// }
/// controller.on_view_disappear();
/// ```
pub struct ScannerController {
    camera_side: CameraSide,
    preview: Weak<dyn PreviewSurface>,
    scanner_factory: Mutex<Option<ScannerFactory>>,
    scanner: Mutex<Option<Box<dyn BarcodeScanner>>>,
    permission: Arc<dyn CameraPermission>,
    alerts: Arc<dyn AlertPresenter>,
    log: Arc<dyn ScanLog>,
    state_manager: Arc<StateManager>,

    /// Bumped on every disappearance so a permission answer that arrives
    /// after the view left cannot start a session
    appearance: AtomicU64,
}

impl ScannerController {
    pub fn new(
        collaborators: ScannerCollaborators,
        camera_side: CameraSide,
        state_manager: Arc<StateManager>,
    ) -> Self {
        Self {
            camera_side,
            preview: collaborators.preview,
            scanner_factory: Mutex::new(Some(collaborators.scanner_factory)),
            scanner: Mutex::new(None),
            permission: collaborators.permission,
            alerts: collaborators.alerts,
            log: collaborators.log,
            state_manager,
            appearance: AtomicU64::new(0),
        }
    }

    pub fn camera_side(&self) -> CameraSide {
        self.camera_side
    }

    pub fn has_scanner(&self) -> bool {
        self.scanner_guard().is_some()
    }

    /// Build the scanner bound to the preview surface.
    ///
    /// Runs once per controller. Later calls, or a call after the surface was
    /// dropped, leave the controller without a new scanner.
    pub fn on_view_load(&self) {
        let Some(factory) = self
            .scanner_factory
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            tracing::warn!("View already loaded; keeping the existing scanner");
            return;
        };

        let Some(preview) = self.preview.upgrade() else {
            tracing::warn!("Preview surface is gone; scanner not created");
            return;
        };

        *self.scanner_guard() = Some(factory(preview));
        tracing::debug!("Scanner created for {} camera", self.camera_side);
    }

    /// Ask for camera permission and start scanning if it is granted.
    ///
    /// The appearance is recorded when this is called, not when the returned
    /// future is first polled, so a disappearance in between cancels it.
    /// A denial presents [`Alert::scanning_unavailable`]. A start failure is
    /// written to the diagnostic log only. Neither is retried.
    pub fn on_view_appear(&self) -> impl Future<Output = AppearOutcome> + Send + '_ {
        let appearance = self.begin_appear();
        self.finish_appear(appearance)
    }

    /// Record that the view appeared.
    ///
    /// Pair with [`finish_appear`](Self::finish_appear) when the permission
    /// round trip runs on another task.
    pub fn begin_appear(&self) -> Appearance {
        Appearance(self.appearance.load(Ordering::SeqCst))
    }

    /// Resolve permission for an appearance recorded by [`begin_appear`](Self::begin_appear)
    pub async fn finish_appear(&self, appearance: Appearance) -> AppearOutcome {
        tracing::debug!("View appeared, requesting camera permission");
        let granted = match self.permission.request_permission().await {
            Ok(granted) => granted,
            Err(_) => {
                tracing::warn!("Permission request ended without an answer, treating as denied");
                false
            }
        };

        if self.appearance.load(Ordering::SeqCst) != appearance.0 {
            tracing::debug!("View disappeared while waiting for permission");
            return AppearOutcome::Cancelled;
        }

        self.state_manager.set_permission(granted);

        if !granted {
            tracing::info!("Camera permission denied");
            self.alerts.present(Alert::scanning_unavailable());
            return AppearOutcome::PermissionDenied;
        }

        self.start_scanning()
    }

    /// Stop scanning because the view is going away.
    ///
    /// The stop request reaches the scanner exactly once per call, whether or
    /// not a session was running.
    pub fn on_view_disappear(&self) {
        self.appearance.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("View disappearing, stopping scanner");
        self.stop_scanning();
    }

    /// Flip between front and back cameras.
    ///
    /// Returns the camera now in use, or `None` when there is no scanner or the
    /// scanner cannot flip in its current state.
    pub fn on_switch_camera_tapped(&self) -> Option<CameraSide> {
        let mut scanner = self.scanner_guard();
        let Some(scanner) = scanner.as_mut() else {
            tracing::debug!("Switch camera tapped before the scanner exists");
            return None;
        };

        match scanner.flip_camera() {
            Ok(camera) => {
                tracing::info!("Switched to {} camera", camera);
                self.state_manager.set_active_camera(camera);
                Some(camera)
            }
            Err(e) => {
                tracing::debug!("Camera flip ignored: {}", e);
                None
            }
        }
    }

    /// Stop the scanner. Safe to call when it never started.
    pub fn stop_scanning(&self) {
        match self.scanner_guard().as_mut() {
            Some(scanner) => scanner.stop(),
            None => tracing::debug!("No scanner to stop"),
        }
        self.state_manager.stop_scanning();
    }

    fn start_scanning(&self) -> AppearOutcome {
        let mut scanner = self.scanner_guard();
        let Some(scanner) = scanner.as_mut() else {
            tracing::warn!("Permission granted but no scanner was created");
            return AppearOutcome::NoScanner;
        };

        if scanner.is_scanning() {
            tracing::warn!("Start requested while already scanning; ignoring");
            return AppearOutcome::AlreadyScanning;
        }

        self.state_manager.begin_session();

        match scanner.start(self.camera_side, self.result_handler()) {
            Ok(()) => {
                tracing::info!("Scanning started with {} camera", self.camera_side);
                self.state_manager.start_scanning(self.camera_side);
                AppearOutcome::Started
            }
            Err(e) => {
                self.log.error(&format!("Unable to start scanning: {}", e));
                self.state_manager.record_start_failure(e.to_string());
                AppearOutcome::StartFailed(e)
            }
        }
    }

    /// Logs every code in a batch, in delivery order, then counts the batch
    fn result_handler(&self) -> ResultHandler {
        let log = Arc::clone(&self.log);
        let state_manager = Arc::clone(&self.state_manager);

        Arc::new(move |codes: Vec<Code>| {
            for code in &codes {
                match code.string_value() {
                    Some(value) => log.info(&format!("Found code: {}", value)),
                    None => tracing::debug!("Skipping {} code without a string value", code.symbology()),
                }
            }
            state_manager.record_codes(&codes);
        })
    }

    fn scanner_guard(&self) -> MutexGuard<'_, Option<Box<dyn BarcodeScanner>>> {
        self.scanner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
