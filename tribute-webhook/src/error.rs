//! Error types shared across the crate.

use thiserror::Error;

/// Failure to decode a textual signature representation.
///
/// Inside the verifier these are swallowed and treated as a non-match; they
/// only surface to callers using the codec directly.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Failure of the HMAC primitive itself.
///
/// This is an operational misconfiguration, never a verdict on the
/// signature the client sent.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("HMAC key rejected: {0}")]
    InvalidKey(#[from] hmac::digest::InvalidLength),
}
