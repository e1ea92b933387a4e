//! Store-key handling for block-index entries.

use crate::error::DecodeError;

/// Record-type tag leading every block-index key.
pub const BLOCK_KEY_PREFIX: u8 = b'b';

/// Total length of a block-index key: 1-byte tag + 32-byte hash.
pub const KEY_LEN: usize = 33;

/// Extract the block hash embedded in a raw store key.
///
/// The hash comes back in storage byte order, exactly as keyed; it is the
/// identity records are compared by. Reversing for human display lives in
/// the display module and never feeds back into lookups.
pub fn parse_key(raw: &[u8]) -> Result<[u8; 32], DecodeError> {
    if raw.len() != KEY_LEN {
        return Err(DecodeError::InvalidKey {
            len: raw.len(),
            expected: KEY_LEN,
        });
    }
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&raw[1..]);
    Ok(hash)
}

/// Build the store key for a hash under the given record-type tag.
pub fn make_key(prefix: u8, hash: &[u8; 32]) -> Vec<u8> {
    let mut key = Vec::with_capacity(KEY_LEN);
    key.push(prefix);
    key.extend_from_slice(hash);
    key
}

// ─── Tests ────────────────────────────────────────────────────────────────────
