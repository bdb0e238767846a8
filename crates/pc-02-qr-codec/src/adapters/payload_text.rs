//! Decoder for buffers that already hold a symbol's content.

use async_trait::async_trait;

use crate::domain::symbology::Symbology;
use crate::ports::outbound::{DecodeError, DecodedSymbol, ImageDecoder};

/// Treats the buffer as the text content of a QR symbol, as exported by an
/// external scanner. Blank buffers hold no symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadTextDecoder;

#[async_trait]
impl ImageDecoder for PayloadTextDecoder {
    async fn decode_image(
        &self,
        image: &[u8],
        symbologies: &[Symbology],
    ) -> Result<DecodedSymbol, DecodeError> {
        if !symbologies.contains(&Symbology::QrCode) {
            return Err(DecodeError::UnsupportedImage(
                "only QR payloads are accepted".into(),
            ));
        }
        if image.iter().all(|b| b.is_ascii_whitespace() || *b == 0) {
            return Err(DecodeError::NotFound);
        }

        Ok(DecodedSymbol {
            symbology: Symbology::QrCode,
            bytes: image.to_vec(),
        })
    }
}
