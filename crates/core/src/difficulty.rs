//! Proof-of-work difficulty predicate over hex digests

/// Check if a hex digest meets the required difficulty
///
/// Difficulty is the number of leading `'0'` hex characters required. A
/// difficulty longer than the digest can never be met.
///
/// # Example
///
/// ```rust
/// use cahash_core::valid_hash;
///
/// assert!(valid_hash("000f3a", 3));
/// assert!(!valid_hash("000f3a", 4));
/// assert!(valid_hash("f3a", 0));
/// ```
#[inline(always)]
pub fn valid_hash(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|c| c == b'0')
}

/// Number of leading `'0'` hex characters in a digest
pub fn leading_zero_nibbles(hash: &str) -> usize {
    hash.bytes().take_while(|&c| c == b'0').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hash() {
        let hash = "0000a1b2";
        assert!(valid_hash(hash, 0));
        assert!(valid_hash(hash, 4));
        assert!(!valid_hash(hash, 5));
        assert!(!valid_hash("a000", 1));
    }

    #[test]
    fn test_difficulty_longer_than_hash() {
        assert!(!valid_hash("0000", 5));
        assert!(!valid_hash("", 1));
        assert!(valid_hash("", 0));
    }

    #[test]
    fn test_leading_zero_nibbles() {
        assert_eq!(leading_zero_nibbles("000f00"), 3);
        assert_eq!(leading_zero_nibbles("f000"), 0);
        assert_eq!(leading_zero_nibbles("0000"), 4);
    }
}
