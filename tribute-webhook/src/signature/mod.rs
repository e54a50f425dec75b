//! Signature verification for inbound webhooks.
//!
//! - `codec`: hex and base64 conversions
//! - `compare`: constant-time byte comparison
//! - `signer`: HMAC-SHA256
//! - `verify`: the multi-format Tribute signature check

pub mod codec;
pub mod compare;
pub mod signer;
pub mod verify;

pub use codec::{base64_to_bytes, bytes_to_base64, bytes_to_hex, hex_to_bytes};
pub use compare::constant_time_eq;
pub use signer::{compute_hmac_sha256, DIGEST_LEN};
pub use verify::verify_tribute_signature;
