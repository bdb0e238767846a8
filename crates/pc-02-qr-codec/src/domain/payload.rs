//! Payload encoding and best-effort text extraction.

use std::fmt;

use shared_types::ProductId;

/// Content of a product QR code: the decimal id, with no framing, so any
/// general-purpose scanner reads it back unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Payload(String);

impl Payload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn encode(id: ProductId) -> Payload {
    Payload(id.to_string())
}

/// Extract text from raw payload bytes.
///
/// Invalid UTF-8 is replaced rather than rejected; surrounding whitespace
/// and NUL padding are trimmed. The numeric shape is not checked here.
pub fn decode(bytes: &[u8]) -> String {
    decode_text(&String::from_utf8_lossy(bytes))
}

/// Same as [`decode`] for payloads already delivered as text.
pub fn decode_text(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}
