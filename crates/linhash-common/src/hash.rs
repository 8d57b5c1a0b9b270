//! Key hashing and power-of-two helpers used by linear-hash addressing.

use crate::page::Key;

/// Hashes a key to its 64-bit address space.
///
/// The key is reinterpreted as unsigned and reduced modulo `2^64 - 1`, so
/// non-negative keys hash to themselves.
#[inline]
pub fn hash_key(key: Key) -> u64 {
    (key as u64) % u64::MAX
}

/// Returns `2^n`, saturating at `u64::MAX` for `n >= 64`.
#[inline]
pub fn pow2(n: u32) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        1u64 << n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_non_negative_is_identity() {
        assert_eq!(hash_key(0), 0);
        assert_eq!(hash_key(1), 1);
        assert_eq!(hash_key(123_456_789), 123_456_789);
        assert_eq!(hash_key(i64::MAX), i64::MAX as u64);
    }

    #[test]
    fn test_hash_negative_keys() {
        // -1 reinterprets as u64::MAX, which reduces to zero.
        assert_eq!(hash_key(-1), 0);
        assert_eq!(hash_key(-2), u64::MAX - 1);
        assert_eq!(hash_key(i64::MIN), 1u64 << 63);
    }

    #[test]
    fn test_pow2() {
        assert_eq!(pow2(0), 1);
        assert_eq!(pow2(1), 2);
        assert_eq!(pow2(10), 1024);
        assert_eq!(pow2(63), 1u64 << 63);
    }

    #[test]
    fn test_pow2_saturates() {
        assert_eq!(pow2(64), u64::MAX);
        assert_eq!(pow2(100), u64::MAX);
    }
}
