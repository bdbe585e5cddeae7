use serde::{Deserialize, Serialize};
use std::fmt;

/// Barcode symbologies the scanner collaborator can report.
///
/// The list mirrors the machine-readable object types exposed by common camera
/// metadata pipelines. An empty symbology filter in [`ScannerSettings`](crate::models::ScannerSettings)
/// means every type is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Qr,
    Ean13,
    Ean8,
    UpcE,
    Code39,
    Code93,
    Code128,
    Pdf417,
    Aztec,
    DataMatrix,
    Itf14,
}

impl Symbology {
    /// Every symbology, in declaration order
    pub const ALL: [Symbology; 11] = [
        Symbology::Qr,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcE,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Code128,
        Symbology::Pdf417,
        Symbology::Aztec,
        Symbology::DataMatrix,
        Symbology::Itf14,
    ];

    /// Human-readable name used in log lines and the preview overlay
    pub fn display_name(&self) -> &'static str {
        match self {
            Symbology::Qr => "QR Code",
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::UpcE => "UPC-E",
            Symbology::Code39 => "Code 39",
            Symbology::Code93 => "Code 93",
            Symbology::Code128 => "Code 128",
            Symbology::Pdf417 => "PDF417",
            Symbology::Aztec => "Aztec",
            Symbology::DataMatrix => "Data Matrix",
            Symbology::Itf14 => "ITF-14",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single decoded barcode.
///
/// Codes are produced in batches (one batch per camera frame) and consumed
/// immediately by the result handler; nothing in the controller retains them.
/// Binary payloads have no textual form, so [`string_value`](Self::string_value)
/// is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    #[serde(default)]
    value: Option<String>,
    symbology: Symbology,
}

impl Code {
    /// Create a code with a textual payload
    pub fn new(value: impl Into<String>, symbology: Symbology) -> Self {
        Self {
            value: Some(value.into()),
            symbology,
        }
    }

    /// Create a code whose payload has no string representation
    pub fn binary(symbology: Symbology) -> Self {
        Self {
            value: None,
            symbology,
        }
    }

    pub fn string_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn symbology(&self) -> Symbology {
        self.symbology
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_string_value() {
        let code = Code::new("ABC123", Symbology::Code128);
        assert_eq!(code.string_value(), Some("ABC123"));
        assert_eq!(code.symbology(), Symbology::Code128);

        let binary = Code::binary(Symbology::Aztec);
        assert_eq!(binary.string_value(), None);
    }

    #[test]
    fn test_code_deserializes_without_value() {
        let code: Code = serde_yaml_ng::from_str("symbology: data_matrix").unwrap();
        assert_eq!(code, Code::binary(Symbology::DataMatrix));
    }

    #[test]
    fn test_symbology_display() {
        assert_eq!(Symbology::Qr.to_string(), "QR Code");
        assert_eq!(Symbology::Ean13.to_string(), "EAN-13");
        assert_eq!(Symbology::ALL.len(), 11);
    }
}
