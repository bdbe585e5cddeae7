// GUI Controller - Bridges the Slint window with the scanner controller
//
// This module contains the GuiController which coordinates between:
// - Slint UI (MainWindow)
// - ScannerController (view lifecycle → scanner collaborator)
// - StateManager (session state and change events)
// - EventLoopBridge (async/GUI coordination)
//
// The window plays the role of the scanner view: showing it is an appearance,
// hiding or closing it is a disappearance.

use crate::models::{CameraSide, ScannerSettings};
use crate::services::scanner::{
    Alert, AlertPresenter, BarcodeScanner, PreviewFrame, PreviewSurface, TracingScanLog,
};
use crate::services::{ConfiguredPermission, SimulatedScanner};
use crate::state::{StateChange, StateManager};
use crate::ui::bridge::{EventLoopBridge, EventLoopBridgeHandle};
use crate::ui::scanner_controller::{AppearOutcome, ScannerCollaborators, ScannerController};
use anyhow::{Context, Result};
use slint::ComponentHandle;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

// Include the generated Slint code
slint::include_modules!();

/// What a window action means for the scanner view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewTransition {
    Appear,
    Disappear,
}

/// Hide Scanner leaves the view, Show Scanner brings it back
fn toggle_transition(preview_visible: bool) -> ViewTransition {
    if preview_visible {
        ViewTransition::Disappear
    } else {
        ViewTransition::Appear
    }
}

/// Closing the window only counts as a disappearance while the view is shown
fn close_transition(preview_visible: bool) -> Option<ViewTransition> {
    preview_visible.then_some(ViewTransition::Disappear)
}

/// One line per decoded code, drawn over the preview
fn overlay_text(frame: &PreviewFrame) -> String {
    frame
        .codes
        .iter()
        .map(|code| match code.string_value() {
            Some(value) => format!("{}: {}", code.symbology(), value),
            None => code.symbology().to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Label of the button that dismisses the alert
fn alert_button_title(alert: &Alert) -> String {
    alert
        .actions
        .first()
        .map(|action| action.title.clone())
        .unwrap_or_else(|| "Ok".to_string())
}

/// Preview surface that draws frames into the Slint window
struct SlintPreviewSurface {
    bridge: EventLoopBridgeHandle<MainWindow>,
}

impl PreviewSurface for SlintPreviewSurface {
    fn render(&self, frame: &PreviewFrame) {
        let camera = frame.camera.label();
        let sequence = frame.sequence;
        let overlay = overlay_text(frame);

        self.bridge.update_ui(move |ui| {
            ui.set_preview_active(true);
            ui.set_preview_camera(camera.into());
            ui.set_frame_counter(sequence.min(i32::MAX as u64) as i32);
            if !overlay.is_empty() {
                ui.set_overlay_text(overlay.into());
            }
        });
    }

    fn clear(&self) {
        self.bridge.update_ui(|ui| {
            ui.set_preview_active(false);
            ui.set_frame_counter(0);
            ui.set_overlay_text("".into());
        });
    }
}

/// Presents alerts as an overlay inside the main window
struct SlintAlertPresenter {
    bridge: EventLoopBridgeHandle<MainWindow>,
}

impl AlertPresenter for SlintAlertPresenter {
    fn present(&self, alert: Alert) {
        let action = alert_button_title(&alert);

        self.bridge.update_ui(move |ui| {
            ui.set_alert_title(alert.title.into());
            ui.set_alert_message(alert.message.into());
            ui.set_alert_action(action.into());
            ui.set_show_alert(true);
        });
    }
}

/// GUI Controller that wires the Slint window to the scanner controller
///
/// # Example
/// ```ignore
/// let state_manager = Arc::new(StateManager::new());
/// let runtime = tokio::runtime::Runtime::new()?;
///
/// let controller = GuiController::new(state_manager, settings, runtime.handle().clone())?;
/// controller.run()?;  // Blocks until window is closed
/// ```
pub struct GuiController {
    ui: MainWindow,
    bridge: EventLoopBridge<MainWindow>,
    scanner_controller: Arc<ScannerController>,

    /// Owns the preview surface; the scanner controller only holds a weak reference
    _preview: Arc<dyn PreviewSurface>,
}

impl GuiController {
    /// Create the window, build the scanner collaborators and load the view
    ///
    /// # Arguments
    /// * `state_manager` - Shared scanner state
    /// * `settings` - Scanner settings (camera side, simulated script, permission)
    /// * `tokio_handle` - Runtime the scanner and lifecycle tasks run on
    pub fn new(
        state_manager: Arc<StateManager>,
        settings: ScannerSettings,
        tokio_handle: tokio::runtime::Handle,
    ) -> Result<Self> {
        let ui = MainWindow::new().context("Failed to create Slint UI")?;
        let bridge = EventLoopBridge::new(&ui, tokio_handle.clone());

        let preview: Arc<dyn PreviewSurface> = Arc::new(SlintPreviewSurface {
            bridge: bridge.clone_handle(),
        });

        let camera_side = settings.camera_side;
        let permission = Arc::new(ConfiguredPermission::new(settings.permission_granted));
        let scanner_settings = settings;
        let scanner_controller = Arc::new(ScannerController::new(
            ScannerCollaborators {
                preview: Arc::downgrade(&preview),
                scanner_factory: Box::new(move |surface: Arc<dyn PreviewSurface>| {
                    let scanner = SimulatedScanner::new(scanner_settings, surface, tokio_handle);
                    if !scanner.scanning_is_available() {
                        tracing::warn!("No cameras configured; scanning will fail to start");
                    }
                    Box::new(scanner) as Box<dyn BarcodeScanner>
                }),
                permission,
                alerts: Arc::new(SlintAlertPresenter {
                    bridge: bridge.clone_handle(),
                }),
                log: Arc::new(TracingScanLog),
            },
            camera_side,
            Arc::clone(&state_manager),
        ));

        scanner_controller.on_view_load();

        Self::sync_ui_with_state(&ui, &state_manager);
        Self::setup_callbacks(&ui, &bridge, &scanner_controller);
        Self::setup_state_subscription(&bridge, &state_manager);

        tracing::info!("GUI controller initialized ({} camera)", camera_side);

        Ok(Self {
            ui,
            bridge,
            scanner_controller,
            _preview: preview,
        })
    }

    /// Show the window and run the event loop until it is closed
    ///
    /// The first appearance is scheduled before the loop starts; its UI updates
    /// are queued and applied once the loop is running.
    pub fn run(self) -> Result<(), slint::PlatformError> {
        Self::spawn_appear(&self.bridge.clone_handle(), &self.scanner_controller);

        tracing::info!("Starting GUI event loop");
        self.ui.run()
    }

    /// Current camera the controller was configured with
    pub fn camera_side(&self) -> CameraSide {
        self.scanner_controller.camera_side()
    }

    fn spawn_appear(
        bridge: &EventLoopBridgeHandle<MainWindow>,
        scanner_controller: &Arc<ScannerController>,
    ) {
        // Recorded here so a Hide before the task runs still cancels it
        let appearance = scanner_controller.begin_appear();
        let controller = Arc::clone(scanner_controller);
        bridge.spawn_async(move || async move {
            match controller.finish_appear(appearance).await {
                AppearOutcome::Started => {}
                outcome => tracing::info!("Scanner not started: {:?}", outcome),
            }
        });
    }

    fn apply_transition(
        transition: ViewTransition,
        bridge: &EventLoopBridgeHandle<MainWindow>,
        scanner_controller: &Arc<ScannerController>,
    ) {
        tracing::debug!("View transition: {:?}", transition);
        match transition {
            ViewTransition::Appear => Self::spawn_appear(bridge, scanner_controller),
            ViewTransition::Disappear => scanner_controller.on_view_disappear(),
        }
    }

    /// Initialize the window from the current state
    fn sync_ui_with_state(ui: &MainWindow, state_manager: &StateManager) {
        let state = state_manager.snapshot();

        ui.set_status_text(state.status_message().into());
        ui.set_scanning(state.is_scanning());
        ui.set_codes_found(state.codes_found.min(i32::MAX as usize) as i32);
        ui.set_last_code(state.last_code.clone().unwrap_or_default().into());
    }

    fn setup_callbacks(
        ui: &MainWindow,
        bridge: &EventLoopBridge<MainWindow>,
        scanner_controller: &Arc<ScannerController>,
    ) {
        // Switch camera button
        let controller = Arc::clone(scanner_controller);
        ui.on_switch_camera(move || {
            tracing::debug!("Switch camera button clicked");
            controller.on_switch_camera_tapped();
        });

        // Hide/show toggles the view lifecycle
        let controller = Arc::clone(scanner_controller);
        let bridge_handle = bridge.clone_handle();
        let ui_weak = ui.as_weak();
        ui.on_toggle_preview(move || {
            let Some(ui) = ui_weak.upgrade() else {
                return;
            };

            let transition = toggle_transition(ui.get_preview_visible());
            ui.set_preview_visible(transition == ViewTransition::Appear);
            Self::apply_transition(transition, &bridge_handle, &controller);
        });

        let ui_weak = ui.as_weak();
        ui.on_dismiss_alert(move || {
            if let Some(ui) = ui_weak.upgrade() {
                ui.set_show_alert(false);
            }
        });

        // Closing the window is the final disappearance
        let controller = Arc::clone(scanner_controller);
        let bridge_handle = bridge.clone_handle();
        let ui_weak = ui.as_weak();
        ui.window().on_close_requested(move || {
            let visible = ui_weak
                .upgrade()
                .map(|ui| ui.get_preview_visible())
                .unwrap_or(false);
            if let Some(transition) = close_transition(visible) {
                Self::apply_transition(transition, &bridge_handle, &controller);
            }
            slint::CloseRequestResponse::HideWindow
        });
    }

    /// Subscribe to state changes and update the window
    ///
    /// Runs on a background thread; every UI mutation goes through the bridge.
    fn setup_state_subscription(
        bridge: &EventLoopBridge<MainWindow>,
        state_manager: &Arc<StateManager>,
    ) {
        let bridge_handle = bridge.clone_handle();
        let state_manager_clone = Arc::clone(state_manager);
        let mut rx = state_manager.subscribe();

        std::thread::spawn(move || {
            tracing::debug!("State subscription thread started");

            loop {
                match rx.blocking_recv() {
                    Ok(change) => {
                        tracing::trace!("State change received: {:?}", change);

                        if let StateChange::CodesDetected {
                            codes_found,
                            last_code,
                        } = &change
                        {
                            let codes_found = (*codes_found).min(i32::MAX as usize) as i32;
                            let last_code = last_code.clone().unwrap_or_default();
                            bridge_handle.update_ui(move |ui| {
                                ui.set_codes_found(codes_found);
                                ui.set_last_code(last_code.into());
                            });
                            continue;
                        }

                        let state = state_manager_clone.snapshot();
                        bridge_handle.update_ui(move |ui| {
                            ui.set_status_text(state.status_message().into());
                            ui.set_scanning(state.is_scanning());
                            ui.set_codes_found(state.codes_found.min(i32::MAX as usize) as i32);
                            ui.set_last_code(state.last_code.clone().unwrap_or_default().into());
                        });
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("State subscription lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            tracing::debug!("State subscription thread terminated");
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Code, Symbology};
    use crate::services::scanner::MockBarcodeScanner;
    use std::time::{Duration, Instant};

    struct NullSurface;

    impl PreviewSurface for NullSurface {
        fn render(&self, _frame: &PreviewFrame) {}
        fn clear(&self) {}
    }

    struct NullAlerts;

    impl AlertPresenter for NullAlerts {
        fn present(&self, _alert: Alert) {}
    }

    fn scanner_controller(
        scanner: MockBarcodeScanner,
        state_manager: Arc<StateManager>,
    ) -> (Arc<ScannerController>, Arc<dyn PreviewSurface>) {
        let surface: Arc<dyn PreviewSurface> = Arc::new(NullSurface);
        let controller = Arc::new(ScannerController::new(
            ScannerCollaborators {
                preview: Arc::downgrade(&surface),
                scanner_factory: Box::new(move |_surface: Arc<dyn PreviewSurface>| {
                    Box::new(scanner) as Box<dyn BarcodeScanner>
                }),
                permission: Arc::new(ConfiguredPermission::new(true)),
                alerts: Arc::new(NullAlerts),
                log: Arc::new(TracingScanLog),
            },
            CameraSide::Back,
            state_manager,
        ));
        controller.on_view_load();
        (controller, surface)
    }

    #[test]
    fn test_toggle_hides_visible_view_and_shows_hidden_one() {
        assert_eq!(toggle_transition(true), ViewTransition::Disappear);
        assert_eq!(toggle_transition(false), ViewTransition::Appear);
    }

    #[test]
    fn test_close_disappears_only_when_visible() {
        assert_eq!(close_transition(true), Some(ViewTransition::Disappear));
        assert_eq!(close_transition(false), None);
    }

    #[test]
    fn test_overlay_lists_each_code() {
        let frame = PreviewFrame {
            camera: CameraSide::Back,
            sequence: 3,
            codes: vec![
                Code::new("ABC123", Symbology::Qr),
                Code::binary(Symbology::Aztec),
            ],
        };

        let expected = format!("{}: ABC123\n{}", Symbology::Qr, Symbology::Aztec);
        assert_eq!(overlay_text(&frame), expected);
    }

    #[test]
    fn test_alert_presenter_queues_one_update() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (bridge, mut rx) =
            EventLoopBridgeHandle::<MainWindow>::detached(rt.handle().clone(), 4);
        let presenter = SlintAlertPresenter { bridge };

        presenter.present(Alert::scanning_unavailable());

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_alert_button_falls_back_to_ok() {
        let mut alert = Alert::scanning_unavailable();
        assert_eq!(alert_button_title(&alert), "Ok");

        alert.actions.clear();
        assert_eq!(alert_button_title(&alert), "Ok");
    }

    #[test]
    fn test_close_while_visible_stops_scanner_once() {
        let mut scanner = MockBarcodeScanner::new();
        scanner.expect_stop().times(1).return_const(());
        scanner.expect_start().never();

        let rt = tokio::runtime::Runtime::new().unwrap();
        let (bridge, _rx) =
            EventLoopBridgeHandle::<MainWindow>::detached(rt.handle().clone(), 4);
        let (controller, _surface) = scanner_controller(scanner, Arc::new(StateManager::new()));

        for visible in [false, true] {
            if let Some(transition) = close_transition(visible) {
                GuiController::apply_transition(transition, &bridge, &controller);
            }
        }
    }

    #[test]
    fn test_hide_then_show_restarts_scanning() {
        let mut scanner = MockBarcodeScanner::new();
        scanner.expect_stop().times(1).return_const(());
        scanner.expect_is_scanning().return_const(false);
        scanner.expect_start().times(1).returning(|_, _| Ok(()));

        let rt = tokio::runtime::Runtime::new().unwrap();
        let (bridge, _rx) =
            EventLoopBridgeHandle::<MainWindow>::detached(rt.handle().clone(), 4);
        let state_manager = Arc::new(StateManager::new());
        let (controller, _surface) = scanner_controller(scanner, Arc::clone(&state_manager));

        GuiController::apply_transition(toggle_transition(true), &bridge, &controller);
        assert!(!state_manager.read(|s| s.is_scanning()));

        GuiController::apply_transition(toggle_transition(false), &bridge, &controller);

        let deadline = Instant::now() + Duration::from_secs(2);
        while !state_manager.read(|s| s.is_scanning()) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(state_manager.read(|s| s.is_scanning()));

        rt.shutdown_timeout(Duration::from_secs(1));
    }
}
