//! HMAC-SHA256 signing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::SignatureError;

type HmacSha256 = Hmac<Sha256>;

/// Length of an HMAC-SHA256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// Compute `HMAC-SHA256(secret, message)`.
///
/// The keyed MAC lives only for this call; nothing about the key is retained.
pub fn compute_hmac_sha256(
    secret: &[u8],
    message: &[u8],
) -> Result<[u8; DIGEST_LEN], SignatureError> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(message);

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2
        let digest = compute_hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(digest),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_deterministic() {
        let a = compute_hmac_sha256(b"test-secret", b"payload").unwrap();
        let b = compute_hmac_sha256(b"test-secret", b"payload").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_and_message_both_matter() {
        let base = compute_hmac_sha256(b"test-secret", b"payload").unwrap();
        assert_ne!(base, compute_hmac_sha256(b"other-secret", b"payload").unwrap());
        assert_ne!(base, compute_hmac_sha256(b"test-secret", b"payload ").unwrap());
    }
}
