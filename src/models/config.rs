use crate::models::{CameraSide, Code, Symbology};
use serde::{Deserialize, Serialize};

/// User configuration from `Scanview Settings.yaml`
///
/// Every field has a default so a partial (or missing) file still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub scanner: ScannerSettings,
    pub logging: LoggingSettings,
}

/// Scanner behavior: which camera to open, which symbologies to report,
/// and the script the simulated collaborator replays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSettings {
    pub camera_side: CameraSide,

    /// Cameras present on this machine. Starting on a side not listed here fails.
    pub available_cameras: Vec<CameraSide>,

    /// Symbologies to report. Empty means all.
    pub symbologies: Vec<Symbology>,

    /// Outcome of the camera permission request
    pub permission_granted: bool,

    /// Delay between simulated frames
    pub frame_interval_ms: u64,

    /// Code batches delivered by the simulated scanner, one batch per frame, cycled
    pub simulated_batches: Vec<Vec<Code>>,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            camera_side: CameraSide::Back,
            available_cameras: vec![CameraSide::Back, CameraSide::Front],
            symbologies: Vec::new(),
            permission_granted: true,
            frame_interval_ms: default_frame_interval_ms(),
            simulated_batches: vec![
                vec![Code::new("ABC123", Symbology::Code128)],
                Vec::new(),
                vec![
                    Code::new("https://example.com/item/42", Symbology::Qr),
                    Code::new("4006381333931", Symbology::Ean13),
                ],
                Vec::new(),
            ],
        }
    }
}

impl ScannerSettings {
    /// Whether codes of `symbology` should be reported
    pub fn accepts(&self, symbology: Symbology) -> bool {
        self.symbologies.is_empty() || self.symbologies.contains(&symbology)
    }
}

/// Logging destination and verbosity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub debug_mode: bool,
    pub console_output: bool,
    pub log_dir: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            debug_mode: false,
            console_output: true,
            log_dir: "logs".to_string(),
        }
    }
}

fn default_frame_interval_ms() -> u64 {
    500
}
