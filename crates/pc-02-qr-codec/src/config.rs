//! Configuration for the QR Identifier Codec

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::symbology::Symbology;

/// Highest frame rate a capture session honors.
pub const MAX_FPS: u32 = 1000;

/// Scanner configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Upper bound on frames decoded per second from a capture stream
    pub max_fps: u32,
    /// Symbologies accepted from the capture stream
    pub capture_symbologies: Vec<Symbology>,
    /// Symbologies accepted from an uploaded image
    pub upload_symbologies: Vec<Symbology>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            max_fps: 10,
            capture_symbologies: Symbology::ALL.to_vec(),
            // A single symbology avoids ambiguous matches on still images
            upload_symbologies: vec![Symbology::QrCode],
        }
    }
}

impl ScannerConfig {
    /// Minimum spacing between two decoded frames.
    ///
    /// Never zero: rates above [`MAX_FPS`] are paced at `MAX_FPS`.
    pub fn frame_interval(&self) -> Duration {
        let fps = self.max_fps.clamp(1, MAX_FPS);
        Duration::from_secs(1) / fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScannerConfig::default();
        assert_eq!(config.max_fps, 10);
        assert_eq!(config.frame_interval(), Duration::from_millis(100));
        assert_eq!(config.upload_symbologies, vec![Symbology::QrCode]);
    }

    #[test]
    fn test_zero_fps_does_not_divide_by_zero() {
        let config = ScannerConfig {
            max_fps: 0,
            ..Default::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_high_fps_interval_is_never_zero() {
        for max_fps in [1001, 2000, u32::MAX] {
            let config = ScannerConfig {
                max_fps,
                ..Default::default()
            };
            assert_eq!(config.frame_interval(), Duration::from_millis(1));
        }
        let config = ScannerConfig {
            max_fps: 3,
            ..Default::default()
        };
        assert!(config.frame_interval() > Duration::ZERO);
    }
}
