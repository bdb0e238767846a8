//! Outbound Ports (Driven Ports / SPI)
//!
//! Camera capture and image decoding are external collaborators; these
//! traits are the only surface the codec consumes.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::symbology::Symbology;

/// A symbol located in an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedSymbol {
    pub symbology: Symbology,
    pub bytes: Vec<u8>,
}

/// Image decoding error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no symbol found")]
    NotFound,

    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("decoder failure: {0}")]
    Backend(String),
}

/// Capture device error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("capture device error: {0}")]
    Device(String),
}

/// Locates and reads a barcode in an image buffer.
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    /// Decode `image`, considering only `symbologies`.
    async fn decode_image(
        &self,
        image: &[u8],
        symbologies: &[Symbology],
    ) -> Result<DecodedSymbol, DecodeError>;
}

/// A continuous stream of camera frames.
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame, or `None` once the device has no more frames.
    async fn next_frame(&mut self) -> Option<Vec<u8>>;

    /// Release the device. Called at most once by the capture loop.
    async fn stop(&mut self) -> Result<(), CaptureError>;
}

/// Mock implementations for testing
#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Decoder that treats the image bytes as the symbol content, failing on
    /// images starting with `!`.
    pub struct EchoDecoder;

    #[async_trait]
    impl ImageDecoder for EchoDecoder {
        async fn decode_image(
            &self,
            image: &[u8],
            symbologies: &[Symbology],
        ) -> Result<DecodedSymbol, DecodeError> {
            if image.first() == Some(&b'!') || symbologies.is_empty() {
                return Err(DecodeError::NotFound);
            }
            Ok(DecodedSymbol {
                symbology: symbologies[0],
                bytes: image.to_vec(),
            })
        }
    }

    /// Frame source replaying a fixed list, then idling forever.
    pub struct ScriptedFrames {
        pub frames: VecDeque<Vec<u8>>,
        pub stops: Arc<AtomicUsize>,
        pub idle_when_empty: bool,
    }

    impl ScriptedFrames {
        pub fn new(frames: &[&[u8]]) -> Self {
            Self {
                frames: frames.iter().map(|f| f.to_vec()).collect(),
                stops: Arc::new(AtomicUsize::new(0)),
                idle_when_empty: true,
            }
        }
    }

    #[async_trait]
    impl FrameSource for ScriptedFrames {
        async fn next_frame(&mut self) -> Option<Vec<u8>> {
            match self.frames.pop_front() {
                Some(frame) => Some(frame),
                None if self.idle_when_empty => {
                    std::future::pending::<()>().await;
                    None
                }
                None => None,
            }
        }

        async fn stop(&mut self) -> Result<(), CaptureError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
