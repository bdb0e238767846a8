//! Ports module for the QR Identifier Codec
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::QrCodecApi;
pub use outbound::{FrameSource, ImageDecoder};
