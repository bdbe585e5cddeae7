use crate::models::{CameraSide, Code, ScannerSettings};
use crate::services::scanner::{
    BarcodeScanner, PreviewFrame, PreviewSurface, ResultHandler, ScanError,
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Scripted scanner that replays configured code batches.
///
/// Each tick of the frame interval renders one [`PreviewFrame`] and, when the
/// current batch is non-empty, hands it to the result handler. Batches cycle
/// until the scanner is stopped. Codes whose symbology is not accepted by the
/// settings are dropped before delivery.
///
/// `stop` waits for a delivery already in progress, so nothing reaches the
/// handler or the preview once it returns. The handler must not call back into
/// the scanner.
pub struct SimulatedScanner {
    settings: ScannerSettings,
    preview: Arc<dyn PreviewSurface>,
    runtime: tokio::runtime::Handle,
    session: Option<Session>,
}

struct Session {
    camera_tx: watch::Sender<CameraSide>,
    /// Held for each frame; cleared by `stop`
    live: Arc<Mutex<bool>>,
    task: JoinHandle<()>,
}

impl SimulatedScanner {
    pub fn new(
        settings: ScannerSettings,
        preview: Arc<dyn PreviewSurface>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        Self {
            settings,
            preview,
            runtime,
            session: None,
        }
    }

    /// Whether this machine has any camera to scan with
    pub fn scanning_is_available(&self) -> bool {
        !self.settings.available_cameras.is_empty()
    }

    fn resolve_camera(&self, requested: CameraSide) -> Result<CameraSide, ScanError> {
        let available = &self.settings.available_cameras;
        match requested {
            CameraSide::Unspecified => available
                .iter()
                .copied()
                .find(|side| *side != CameraSide::Unspecified)
                .ok_or(ScanError::CameraUnavailable(requested)),
            side if available.contains(&side) => Ok(side),
            side => Err(ScanError::CameraUnavailable(side)),
        }
    }

    /// Configured batches with unaccepted symbologies removed
    fn filtered_batches(&self) -> Vec<Vec<Code>> {
        self.settings
            .simulated_batches
            .iter()
            .map(|batch| {
                batch
                    .iter()
                    .filter(|code| self.settings.accepts(code.symbology()))
                    .cloned()
                    .collect()
            })
            .collect()
    }
}

impl BarcodeScanner for SimulatedScanner {
    fn start(&mut self, camera: CameraSide, on_result: ResultHandler) -> Result<(), ScanError> {
        if self.is_scanning() {
            return Err(ScanError::AlreadyRunning);
        }

        let camera = self.resolve_camera(camera)?;
        let batches = self.filtered_batches();
        let interval = Duration::from_millis(self.settings.frame_interval_ms.max(1));
        let preview = Arc::clone(&self.preview);
        let (camera_tx, camera_rx) = watch::channel(camera);
        let live = Arc::new(Mutex::new(true));
        let task_live = Arc::clone(&live);

        let task = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut sequence: u64 = 0;

            loop {
                ticker.tick().await;

                let codes = if batches.is_empty() {
                    Vec::new()
                } else {
                    batches[(sequence % batches.len() as u64) as usize].clone()
                };

                {
                    let live = task_live.lock().unwrap_or_else(PoisonError::into_inner);
                    if !*live {
                        break;
                    }

                    let camera = *camera_rx.borrow();
                    preview.render(&PreviewFrame {
                        camera,
                        sequence,
                        codes: codes.clone(),
                    });

                    if !codes.is_empty() {
                        tracing::trace!("Frame {} decoded {} code(s)", sequence, codes.len());
                        on_result(codes);
                    }
                }

                sequence += 1;
            }
        });

        tracing::debug!("Simulated scanner started on {} camera", camera);
        self.session = Some(Session {
            camera_tx,
            live,
            task,
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            *session.live.lock().unwrap_or_else(PoisonError::into_inner) = false;
            session.task.abort();
            self.preview.clear();
            tracing::debug!("Simulated scanner stopped");
        }
    }

    fn flip_camera(&mut self) -> Result<CameraSide, ScanError> {
        let Some(session) = self.session.as_ref() else {
            return Err(ScanError::FlipUnsupported);
        };

        let target = session.camera_tx.borrow().flipped();
        if !self.settings.available_cameras.contains(&target) {
            return Err(ScanError::CameraUnavailable(target));
        }

        session.camera_tx.send_replace(target);
        tracing::debug!("Simulated scanner flipped to {} camera", target);
        Ok(target)
    }

    fn is_scanning(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.task.is_finished())
    }
}

impl Drop for SimulatedScanner {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            *session.live.lock().unwrap_or_else(PoisonError::into_inner) = false;
            session.task.abort();
        }
    }
}
