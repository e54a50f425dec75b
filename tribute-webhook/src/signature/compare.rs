//! Timing-safe byte comparison.

use subtle::ConstantTimeEq;

/// Compare two byte slices without an early exit on the first mismatch.
///
/// Length is not secret, so a length mismatch returns immediately. For equal
/// lengths every position is folded into one accumulator before the result
/// is inspected.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }

    bool::from(diff.ct_eq(&0u8))
}
