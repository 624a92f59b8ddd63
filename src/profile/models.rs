//! Request and response types for profiles

use crate::error::ServiceError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// An image travelling over the wire as base64 inside `{bufferData}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferData {
    pub buffer_data: String,
}

impl BufferData {
    /// The payload returned when no picture exists
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            buffer_data: BASE64.encode(bytes),
        }
    }

    /// Decode the payload, rejecting empty or non-base64 data
    pub fn decode(&self) -> Result<Vec<u8>, ServiceError> {
        let bytes = BASE64
            .decode(self.buffer_data.trim().as_bytes())
            .map_err(|e| ServiceError::invalid(format!("bufferData is not valid base64: {}", e)))?;
        if bytes.is_empty() {
            return Err(ServiceError::invalid("bufferData must not be empty"));
        }
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ExperienceRequest {
    pub accuracy: f64,
}

/// Best-effort image format from leading magic bytes
pub fn sniff_format(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "png",
        [0xFF, 0xD8, 0xFF, ..] => "jpeg",
        [b'G', b'I', b'F', b'8', ..] => "gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
        _ => "bin",
    }
}
