//! Bit-level key utilities.
//!
//! All branching decisions in the trie come through this module. Bit
//! indices are 1-based and counted from the most significant bit of
//! byte 0, so index 1 is the top bit of the first byte. Index 0 is a
//! sentinel meaning "no bit" and always reads as 0.

/// Outcome of comparing two keys bit by bit.
///
/// This replaces the classic signed-integer diffbit encoding with an
/// explicit direction flag: `first_has_one` is true when the *first*
/// key holds the 1 at the differing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyDiff {
    /// The keys are bitwise indistinguishable.
    Equal,
    /// The keys first differ at `bit` (1-based, MSB-first).
    Differs { bit: u32, first_has_one: bool },
}

/// Reads byte `idx` of a key, treating everything past the end as 0.
#[inline]
fn byte_at(key: &[u8], idx: usize) -> u8 {
    key.get(idx).copied().unwrap_or(0)
}

/// Returns the bit of `key` at the 1-based index `bit`, as 0 or 1.
///
/// `key_bits` is the key's bit length, which may be shorter than the
/// slice. Index 0 and any index past `key_bits` or past the end of the
/// slice read as 0.
#[inline]
pub(crate) fn bit_at(key: &[u8], key_bits: u32, bit: u32) -> usize {
    if bit == 0 || bit > key_bits {
        return 0;
    }
    let bit = bit - 1;
    let byte = (bit >> 3) as usize;
    if byte >= key.len() {
        return 0;
    }
    ((key[byte] >> (7 - (bit & 7))) & 1) as usize
}

/// Finds the first bit at which two keys differ.
///
/// Bytes past a key's end compare as 0, so a shorter key behaves as if
/// zero-padded. As a consequence, keys that agree except for trailing
/// zero bytes (such as `b"aa"` and `b"aa\0"`) report [`KeyDiff::Equal`]
/// even though their lengths differ; such keys cannot coexist in the
/// trie.
pub(crate) fn first_diff_bit(key1: &[u8], bits1: u32, key2: &[u8], bits2: u32) -> KeyDiff {
    let nbytes = bytes_for(bits1).max(bytes_for(bits2));
    for i in 0..nbytes {
        let b1 = byte_at(key1, i);
        let b2 = byte_at(key2, i);
        if b1 != b2 {
            // leading_zeros on the xor locates the first differing bit
            // within the byte (0 = MSB).
            let within = (b1 ^ b2).leading_zeros();
            let bit = i as u32 * 8 + within + 1;
            let first_has_one = (b1 >> (7 - within)) & 1 == 1;
            return KeyDiff::Differs { bit, first_has_one };
        }
    }
    KeyDiff::Equal
}

/// Returns true iff both keys have the same bit length and the same
/// byte content over that length.
pub(crate) fn keys_equal(key1: &[u8], bits1: u32, key2: &[u8], bits2: u32) -> bool {
    if bits1 != bits2 {
        return false;
    }
    let nbytes = bytes_for(bits1);
    (0..nbytes).all(|i| byte_at(key1, i) == byte_at(key2, i))
}

/// Returns true iff the first `nbits` bits of `key` match `prefix`.
pub(crate) fn shares_prefix(key: &[u8], key_bits: u32, prefix: &[u8], nbits: u32) -> bool {
    match first_diff_bit(key, key_bits, prefix, nbits.min(prefix.len() as u32 * 8)) {
        KeyDiff::Equal => true,
        KeyDiff::Differs { bit, .. } => bit > nbits,
    }
}

#[inline]
fn bytes_for(bits: u32) -> usize {
    ((bits + 7) / 8) as usize
}
