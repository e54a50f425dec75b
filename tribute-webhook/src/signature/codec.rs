//! Hex and base64 conversions for digests and signature headers.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::CodecError;

/// Lowercase hex, two characters per byte, no separators.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string of either case.
///
/// Fails on odd length or any character outside `[0-9a-fA-F]`.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, CodecError> {
    Ok(hex::decode(hex)?)
}

/// Standard alphabet, padded.
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded base64. Invalid characters or padding fail.
pub fn base64_to_bytes(encoded: &str) -> Result<Vec<u8>, CodecError> {
    Ok(STANDARD.decode(encoded)?)
}
