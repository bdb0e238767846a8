//! Domain module for the QR Identifier Codec

pub mod payload;
pub mod symbology;
