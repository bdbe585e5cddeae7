use serde::{Deserialize, Serialize};
use std::fmt;

/// Which physical camera a scanning session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraSide {
    Front,
    #[default]
    Back,
    /// Let the collaborator pick its default device
    Unspecified,
}

impl CameraSide {
    /// The camera on the opposite face of the device.
    ///
    /// An unspecified camera resolves to the back camera once scanning starts,
    /// so flipping it lands on the front one.
    pub fn flipped(self) -> CameraSide {
        match self {
            CameraSide::Front => CameraSide::Back,
            CameraSide::Back | CameraSide::Unspecified => CameraSide::Front,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CameraSide::Front => "Front",
            CameraSide::Back => "Back",
            CameraSide::Unspecified => "Default",
        }
    }
}

impl fmt::Display for CameraSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
