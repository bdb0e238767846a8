//! Barcode symbologies a decoder may be restricted to.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    QrCode,
    DataMatrix,
    Aztec,
    Pdf417,
    Code128,
    Ean13,
}

impl Symbology {
    pub const ALL: [Symbology; 6] = [
        Symbology::QrCode,
        Symbology::DataMatrix,
        Symbology::Aztec,
        Symbology::Pdf417,
        Symbology::Code128,
        Symbology::Ean13,
    ];
}
