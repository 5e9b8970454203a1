//! Key-length policies.
//!
//! The trie never interprets key bytes beyond the bit length a policy
//! assigns them, so one trie can hold byte strings while another holds
//! fixed-width binary keys such as IPv4 addresses.

/// How a trie determines the bit length of a key.
///
/// # Examples
///
/// ```
/// use patricia_arena::{KeyLength, Trie};
///
/// // 32-bit keys regardless of slice length, for IPv4 addresses.
/// let trie: Trie<[u8; 4], &str> = Trie::with_key_length(KeyLength::Fixed(32));
/// assert!(trie.is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub enum KeyLength {
    /// Every byte of the key counts: bits = length × 8. The default.
    ByteLength,
    /// All keys have this bit length, independent of slice length.
    Fixed(u32),
    /// A caller-supplied function computes the bit length per key.
    Custom(fn(&[u8]) -> u32),
}

impl KeyLength {
    /// Bit length of `key` under this policy.
    pub(crate) fn bits_of(&self, key: &[u8]) -> u32 {
        match self {
            KeyLength::ByteLength => key.len() as u32 * 8,
            KeyLength::Fixed(bits) => *bits,
            KeyLength::Custom(f) => f(key),
        }
    }
}

impl Default for KeyLength {
    fn default() -> Self {
        KeyLength::ByteLength
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_length() {
        assert_eq!(KeyLength::ByteLength.bits_of(b"abc"), 24);
        assert_eq!(KeyLength::ByteLength.bits_of(b""), 0);
    }

    #[test]
    fn test_fixed() {
        assert_eq!(KeyLength::Fixed(32).bits_of(&[192, 168, 0, 1]), 32);
        assert_eq!(KeyLength::Fixed(32).bits_of(b""), 32);
    }

    #[test]
    fn test_custom() {
        // Count bytes up to the first NUL, like C string keys.
        fn nul_terminated(key: &[u8]) -> u32 {
            key.iter().position(|&b| b == 0).unwrap_or(key.len()) as u32 * 8
        }
        assert_eq!(KeyLength::Custom(nul_terminated).bits_of(b"ab\0cd"), 16);
    }
}
