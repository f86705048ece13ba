//! Plain text and source code extractor.

use crate::types::{AppError, AppResult};

/// Strict UTF-8 decode
pub fn extract(bytes: &[u8]) -> AppResult<String> {
    decode_utf8(bytes)
}

pub(crate) fn decode_utf8(bytes: &[u8]) -> AppResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|e| {
        let err = e.utf8_error();
        AppError::Decode(format!(
            "'utf-8' codec can't decode byte 0x{:02x} in position {}",
            bytes.get(err.valid_up_to()).copied().unwrap_or_default(),
            err.valid_up_to()
        ))
    })
}
