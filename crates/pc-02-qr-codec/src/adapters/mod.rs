//! Adapters for the outbound ports.
//!
//! Pixel-level decoding and camera access are external; these adapters
//! accept input that an external scanner has already turned into symbol
//! bytes.

pub mod payload_text;
pub mod replay;

pub use payload_text::PayloadTextDecoder;
pub use replay::ReplayFrames;
