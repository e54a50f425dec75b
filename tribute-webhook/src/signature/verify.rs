//! Tribute webhook signature verification.
//!
//! Tribute signs the raw request body with HMAC-SHA256 and sends the digest
//! in the `trbt-signature` header. The encoding has not been stable across
//! API versions: deployments have been seen sending lowercase hex, uppercase
//! hex, base64, and either of those behind a `sha256=` prefix. Every accepted
//! form still has to match the one digest computed under the endpoint secret.

use tracing::debug;

use crate::error::SignatureError;
use crate::signature::codec::{base64_to_bytes, bytes_to_base64, bytes_to_hex, hex_to_bytes};
use crate::signature::compare::constant_time_eq;
use crate::signature::signer::compute_hmac_sha256;

const PREFIX: &str = "sha256=";

/// Verify a Tribute signature header against the raw request body.
///
/// `raw_body` must be the exact bytes received on the wire. Re-serialized
/// JSON will not verify.
///
/// Malformed header input never produces an error, only `Ok(false)`. An
/// `Err` means the HMAC primitive refused the secret.
///
/// # Arguments
///
/// * `header_signature` - Value of the signature header, if present
/// * `secret` - Shared secret for the endpoint that received the request
/// * `raw_body` - Request body bytes
pub fn verify_tribute_signature(
    header_signature: Option<&str>,
    secret: impl AsRef<[u8]>,
    raw_body: &[u8],
) -> Result<bool, SignatureError> {
    let secret = secret.as_ref();
    let header = match header_signature {
        Some(h) => h,
        None => return Ok(false),
    };
    if secret.is_empty() {
        return Ok(false);
    }

    let cleaned = clean_header(header);
    if cleaned.is_empty() {
        return Ok(false);
    }

    let expected = compute_hmac_sha256(secret, raw_body)?;
    let expected_hex = bytes_to_hex(&expected);
    let expected_base64 = bytes_to_base64(&expected);

    // Text forms, compared as sent.
    let header_bytes = cleaned.as_bytes();
    if constant_time_eq(header_bytes, expected_hex.as_bytes()) {
        debug!(form = "hex_text", "signature_matched");
        return Ok(true);
    }
    if constant_time_eq(header_bytes, expected_base64.as_bytes()) {
        debug!(form = "base64_text", "signature_matched");
        return Ok(true);
    }

    // Decoded forms, compared against the digest bytes.
    if is_hex(cleaned) {
        if let Ok(candidate) = hex_to_bytes(cleaned) {
            if constant_time_eq(&candidate, &expected) {
                debug!(form = "hex_decoded", "signature_matched");
                return Ok(true);
            }
        }
    }

    if let Ok(candidate) = base64_to_bytes(cleaned) {
        if constant_time_eq(&candidate, &expected) {
            debug!(form = "base64_decoded", "signature_matched");
            return Ok(true);
        }
    }

    Ok(false)
}

/// Strip surrounding whitespace and an optional case-insensitive `sha256=` prefix.
fn clean_header(header: &str) -> &str {
    let trimmed = header.trim();
    let unprefixed = match trimmed.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => &trimmed[PREFIX.len()..],
        _ => trimmed,
    };
    unprefixed.trim()
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> [u8; 32] {
        compute_hmac_sha256(secret.as_bytes(), body).unwrap()
    }

    #[test]
    fn test_accepts_hex_signature() {
        let secret = "test-secret";
        let body = br#"{"hello":"world"}"#;
        let signature = bytes_to_hex(&sign(secret, body));

        assert!(verify_tribute_signature(Some(signature.as_str()), secret, body).unwrap());
        assert!(
            verify_tribute_signature(Some(format!("sha256={}", signature).as_str()), secret, body)
                .unwrap()
        );
    }

    #[test]
    fn test_accepts_prefix_in_any_case_with_whitespace() {
        let secret = "test-secret";
        let body = br#"{"hello":"world"}"#;
        let signature = bytes_to_hex(&sign(secret, body));

        let header = format!("  SHA256= {}\n", signature);
        assert!(verify_tribute_signature(Some(header.as_str()), secret, body).unwrap());
    }

    #[test]
    fn test_accepts_uppercase_hex() {
        let secret = "test-secret";
        let body = br#"{"hello":"world"}"#;
        let signature = bytes_to_hex(&sign(secret, body)).to_uppercase();

        assert!(verify_tribute_signature(Some(signature.as_str()), secret, body).unwrap());
    }

    #[test]
    fn test_accepts_base64_signature() {
        let secret = "base64-secret";
        let body = br#"{"foo":"bar"}"#;
        let signature = bytes_to_base64(&sign(secret, body));

        assert!(verify_tribute_signature(Some(signature.as_str()), secret, body).unwrap());
        assert!(
            verify_tribute_signature(Some(format!("sha256={}", signature).as_str()), secret, body)
                .unwrap()
        );
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let body = b"payload";
        let signature = bytes_to_hex(&sign("test-secret", body));

        assert!(!verify_tribute_signature(Some(signature.as_str()), "other-secret", body).unwrap());
    }

    #[test]
    fn test_rejects_missing_header() {
        assert!(!verify_tribute_signature(None, "test-secret", b"payload").unwrap());
        assert!(!verify_tribute_signature(None, "", b"").unwrap());
    }

    #[test]
    fn test_rejects_empty_secret() {
        let body = b"payload";
        let signature = bytes_to_hex(&sign("x", body));
        assert!(!verify_tribute_signature(Some(signature.as_str()), "", body).unwrap());
    }

    #[test]
    fn test_rejects_empty_after_cleaning() {
        assert!(!verify_tribute_signature(Some(""), "s", b"p").unwrap());
        assert!(!verify_tribute_signature(Some("   "), "s", b"p").unwrap());
        assert!(!verify_tribute_signature(Some("sha256="), "s", b"p").unwrap());
        assert!(!verify_tribute_signature(Some("sha256=  "), "s", b"p").unwrap());
    }

    #[test]
    fn test_malformed_headers_are_non_matches() {
        let secret = "test-secret";
        let body = b"payload";
        for header in ["deadbeef", "abc", "not base64!", "====", "\u{1F600}", "sha256=zz"] {
            assert!(!verify_tribute_signature(Some(header), secret, body).unwrap());
        }
    }

    #[test]
    fn test_truncated_signature_rejected() {
        let secret = "test-secret";
        let body = b"payload";
        let signature = bytes_to_hex(&sign(secret, body));

        assert!(!verify_tribute_signature(Some(&signature[..62]), secret, body).unwrap());
        assert!(!verify_tribute_signature(Some(&signature[..32]), secret, body).unwrap());
    }

    #[test]
    fn test_body_bytes_are_exact() {
        let secret = "test-secret";
        let body = br#"{"hello":"world"}"#;
        let reformatted = br#"{ "hello": "world" }"#;
        let signature = bytes_to_hex(&sign(secret, body));

        assert!(!verify_tribute_signature(Some(signature.as_str()), secret, reformatted).unwrap());
    }

    #[test]
    fn test_secret_accepts_bytes() {
        let secret: &[u8] = &[0x00, 0xff, 0x10];
        let body = b"binary secret";
        let digest = compute_hmac_sha256(secret, body).unwrap();

        assert!(verify_tribute_signature(Some(bytes_to_hex(&digest).as_str()), secret, body).unwrap());
    }

    #[test]
    fn test_repeated_verification_is_stable() {
        let secret = "test-secret";
        let body = b"payload";
        let good = bytes_to_hex(&sign(secret, body));

        for _ in 0..5 {
            assert!(verify_tribute_signature(Some(good.as_str()), secret, body).unwrap());
            assert!(!verify_tribute_signature(Some("deadbeef"), secret, body).unwrap());
        }
    }

    #[test]
    fn test_clean_header() {
        assert_eq!(clean_header("sha256=abc"), "abc");
        assert_eq!(clean_header("Sha256=abc"), "abc");
        assert_eq!(clean_header(" abc "), "abc");
        assert_eq!(clean_header("sha25"), "sha25");
        assert_eq!(clean_header("é"), "é");
    }
}
