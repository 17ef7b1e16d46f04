use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

use crate::error::MaskError;

/// Encode raw image bytes as a mask string (standard alphabet, padded)
pub fn encode_mask(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Decode the mask at `index`.
///
/// Line-wrapped base64 is accepted; any other non-alphabet byte is an error.
pub fn decode_mask(index: usize, mask: &Value) -> Result<Vec<u8>, MaskError> {
    let encoded = mask.as_str().ok_or_else(|| MaskError::Decode {
        index,
        message: "mask entry is not a string".to_string(),
    })?;

    let compact: Vec<u8> = encoded
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    general_purpose::STANDARD
        .decode(&compact)
        .map_err(|err| MaskError::Decode {
            index,
            message: err.to_string(),
        })
}
