//! # PC-02: QR Identifier Codec
//!
//! Encodes a canonical product id into a scannable payload and extracts raw
//! text from scanned or uploaded payloads. Validation of the extracted text
//! is left to the Identifier Sanitizer (pc-01).
//!
//! ## Architecture
//!
//! - **Domain**: Payload encoding/decoding, symbologies
//! - **Ports**: Inbound (`QrCodecApi`) and Outbound (`ImageDecoder`, `FrameSource`)
//! - **Adapters**: Pre-decoded payload text, recorded frame replay
//! - **Service**: `QrCodecService` and the capture-stream loop (`CaptureHandle`)
//!
//! ## Decode sources
//!
//! ```text
//! uploaded image ──ImageDecoder [QR only]──→ text | DecodeFailed
//! camera frames ──ImageDecoder (per frame)──→ first text wins → stop
//!                         │
//!                         └── miss: keep scanning
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{PayloadTextDecoder, ReplayFrames};
pub use config::{ScannerConfig, MAX_FPS};
pub use domain::payload::{decode, decode_text, encode, Payload};
pub use domain::symbology::Symbology;
pub use ports::inbound::QrCodecApi;
pub use ports::outbound::{CaptureError, DecodeError, DecodedSymbol, FrameSource, ImageDecoder};
pub use service::{CaptureHandle, CaptureOutcome, QrCodecService};
