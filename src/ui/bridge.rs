// EventLoopBridge - Coordinates between tokio async runtime and Slint event loop
//
// Scanner collaborators report from tokio tasks (permission answers, preview frames,
// decoded code batches), but Slint components may only be touched on the event loop
// thread. The bridge provides:
// - Safe UI updates from any thread via upgrade_in_event_loop
// - Spawning async lifecycle work (on_view_appear) from Slint callbacks

use slint::{ComponentHandle, Weak};
use std::future::Future;
use tokio::sync::mpsc;

/// Boxed UI mutation queued for the event loop
pub(crate) type UiUpdate<T> = Box<dyn FnOnce(&T) + Send>;

/// Coordinates between tokio async runtime and Slint event loop
///
/// # Example
/// ```ignore
/// let bridge = EventLoopBridge::new(&ui, runtime.handle().clone());
/// let handle = bridge.clone_handle();
///
/// handle.clone().spawn_async(move || async move {
///     let outcome = controller.on_view_appear().await;
///     handle.update_ui(move |ui| ui.set_status_text(format!("{:?}", outcome).into()));
/// });
/// ```
pub struct EventLoopBridge<T: ComponentHandle> {
    tokio_handle: tokio::runtime::Handle,

    /// Bounded to 100 updates so a stalled UI cannot grow memory without limit
    ui_update_tx: mpsc::Sender<UiUpdate<T>>,
}

impl<T: ComponentHandle + 'static> EventLoopBridge<T> {
    /// Create a new EventLoopBridge
    ///
    /// Starts a handler thread that forwards queued updates to the Slint event
    /// loop. The thread exits once the event loop stops accepting work or every
    /// sender is dropped.
    pub fn new(ui: &T, tokio_handle: tokio::runtime::Handle) -> Self {
        let ui_weak: Weak<T> = ui.as_weak();
        let (ui_update_tx, mut ui_update_rx) = mpsc::channel::<UiUpdate<T>>(100);

        std::thread::spawn(move || {
            tracing::debug!("EventLoopBridge handler thread started");

            while let Some(update_fn) = ui_update_rx.blocking_recv() {
                let result = ui_weak.upgrade_in_event_loop(move |ui| {
                    update_fn(&ui);
                });

                if let Err(e) = result {
                    tracing::warn!("Failed to queue UI update to event loop: {:?}", e);
                    break;
                }
            }

            tracing::debug!("EventLoopBridge handler thread terminated");
        });

        Self {
            tokio_handle,
            ui_update_tx,
        }
    }

    /// Cloneable handle for capturing in callbacks and collaborators
    pub fn clone_handle(&self) -> EventLoopBridgeHandle<T> {
        EventLoopBridgeHandle {
            tokio_handle: self.tokio_handle.clone(),
            ui_update_tx: self.ui_update_tx.clone(),
        }
    }
}

/// Cloneable sender side of an [`EventLoopBridge`]
pub struct EventLoopBridgeHandle<T> {
    tokio_handle: tokio::runtime::Handle,
    ui_update_tx: mpsc::Sender<UiUpdate<T>>,
}

// Manual Clone implementation to avoid requiring T: Clone
impl<T> Clone for EventLoopBridgeHandle<T> {
    fn clone(&self) -> Self {
        Self {
            tokio_handle: self.tokio_handle.clone(),
            ui_update_tx: self.ui_update_tx.clone(),
        }
    }
}

impl<T: 'static> EventLoopBridgeHandle<T> {
    /// Schedule a UI update from any thread
    pub fn update_ui<F>(&self, update: F)
    where
        F: FnOnce(&T) + Send + 'static,
    {
        send_update(&self.ui_update_tx, Box::new(update));
    }

    /// Spawn an async task on the tokio runtime from a Slint callback
    pub fn spawn_async<F, Fut>(&self, future_factory: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.tokio_handle.spawn(async move {
            future_factory().await;
        });
    }
}

#[cfg(test)]
impl<T> EventLoopBridgeHandle<T> {
    /// Handle whose updates land in the returned receiver instead of a window
    pub(crate) fn detached(
        tokio_handle: tokio::runtime::Handle,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<UiUpdate<T>>) {
        let (ui_update_tx, ui_update_rx) = mpsc::channel(capacity);
        (
            Self {
                tokio_handle,
                ui_update_tx,
            },
            ui_update_rx,
        )
    }
}

fn send_update<T>(tx: &mpsc::Sender<UiUpdate<T>>, update: UiUpdate<T>) {
    match tx.try_send(update) {
        Ok(_) => {}
        Err(mpsc::error::TrySendError::Full(_)) => {
            tracing::warn!("UI update channel full - skipping update to prevent backpressure");
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            tracing::warn!("Failed to send UI update - handler thread has stopped");
        }
    }
}
