// UI module - view lifecycle, GUI wiring and event loop bridge
//
// This module contains:
// - ScannerController: Lifecycle hooks driving the scanner collaborator (GUI-agnostic)
// - EventLoopBridge: Coordinates between tokio async runtime and Slint event loop
// - GuiController: Slint window acting as the scanner view

pub mod bridge;
pub mod controller;
pub mod scanner_controller;

pub use bridge::{EventLoopBridge, EventLoopBridgeHandle};
pub use controller::GuiController;
pub use scanner_controller::{AppearOutcome, Appearance, ScannerCollaborators, ScannerController};
