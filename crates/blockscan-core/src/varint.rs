//! The block-index varint: 7 bits per byte, accumulate and increment.
//!
//! This is **not** the wire protocol's CompactSize encoding and not plain
//! LEB128 either. Each byte contributes its low 7 bits; a set top bit means
//! the value continues AND the accumulated value is bumped by one before the
//! next byte is folded in. Skipping the bump silently corrupts every
//! multi-byte value, which is why the reference vectors below are pinned in
//! tests.
//!
//! ```text
//! [0x00]       → 0
//! [0x7F]       → 127
//! [0x80, 0x00] → 128
//! [0x81, 0x00] → 256
//! ```

use crate::cursor::Cursor;
use crate::error::DecodeError;

/// Longest legal encoding of a 64-bit value.
///
/// The format itself has no length marker, so the decoder caps iterations
/// here and reports malformed input instead of spinning.
pub const MAX_VARINT_LEN: usize = 10;

/// Decode one varint at the cursor's position.
///
/// Bytes consumed can be observed through [`Cursor::position`].
pub fn decode_varint(cursor: &mut Cursor<'_>) -> Result<u64, DecodeError> {
    let start = cursor.position();
    let mut value: u64 = 0;
    for _ in 0..MAX_VARINT_LEN {
        let byte = cursor.read_u8()?;
        if value > u64::MAX >> 7 {
            return Err(DecodeError::VarintOverflow { offset: start });
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        value = value
            .checked_add(1)
            .ok_or(DecodeError::VarintOverflow { offset: start })?;
    }
    Err(DecodeError::VarintOverflow { offset: start })
}

/// Encode a value in the same format, for fixtures and snapshot dumps.
///
/// The byte string is built last-byte-first: the final byte carries no
/// continuation bit, and each earlier byte holds `(n & 0x7F) | 0x80` after
/// `n` is shifted down and decremented. Exact inverse of [`decode_varint`].
pub fn encode_varint(mut n: u64) -> Vec<u8> {
    let mut tmp = [0u8; MAX_VARINT_LEN];
    let mut len = 0;
    loop {
        tmp[len] = (n & 0x7F) as u8 | if len > 0 { 0x80 } else { 0x00 };
        if n <= 0x7F {
            break;
        }
        n = (n >> 7) - 1;
        len += 1;
    }
    let mut out = Vec::with_capacity(len + 1);
    for i in (0..=len).rev() {
        out.push(tmp[i]);
    }
    out
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8]) -> (u64, usize) {
        let mut c = Cursor::new(bytes);
        let v = decode_varint(&mut c).unwrap();
        (v, c.position())
    }

    #[test]
    fn zero_is_one_byte() {
        assert_eq!(decode_all(&[0x00]), (0, 1));
    }

    #[test]
    fn reference_vector_256() {
        // 0x81: value = 1, continuation → bump to 2; 0x00: value = 2<<7 = 256.
        assert_eq!(decode_all(&[0x81, 0x00]), (256, 2));
    }

    #[test]
    fn single_byte_boundary() {
        assert_eq!(decode_all(&[0x7F]), (127, 1));
        assert_eq!(decode_all(&[0x80, 0x00]), (128, 1 + 1));
    }

    #[test]
    fn stops_at_terminator_byte() {
        // Trailing bytes past the terminator are untouched.
        let mut c = Cursor::new(&[0x05, 0xAA, 0xBB]);
        assert_eq!(decode_varint(&mut c).unwrap(), 5);
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn truncated_mid_value() {
        let mut c = Cursor::new(&[0x81]);
        assert!(matches!(
            decode_varint(&mut c),
            Err(DecodeError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn empty_input_is_truncated() {
        let mut c = Cursor::new(&[]);
        assert!(matches!(
            decode_varint(&mut c),
            Err(DecodeError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn all_continuation_bytes_overflow() {
        let mut c = Cursor::new(&[0xFF; 16]);
        assert!(matches!(
            decode_varint(&mut c),
            Err(DecodeError::VarintOverflow { offset: 0 })
        ));
    }

    #[test]
    fn encode_reference_vectors() {
        assert_eq!(encode_varint(0), vec![0x00]);
        assert_eq!(encode_varint(127), vec![0x7F]);
        assert_eq!(encode_varint(128), vec![0x80, 0x00]);
        assert_eq!(encode_varint(256), vec![0x81, 0x00]);
    }

    #[test]
    fn round_trip_boundaries() {
        for n in [
            0u64,
            1,
            126,
            127,
            128,
            129,
            255,
            256,
            16_383,
            16_384,
            u32::MAX as u64,
            u64::MAX - 1,
            u64::MAX,
        ] {
            let bytes = encode_varint(n);
            let mut c = Cursor::new(&bytes);
            assert_eq!(decode_varint(&mut c).unwrap(), n, "value {n}");
            assert_eq!(c.position(), bytes.len(), "value {n} length");
        }
    }

    #[test]
    fn max_value_fits_in_cap() {
        assert!(encode_varint(u64::MAX).len() <= MAX_VARINT_LEN);
    }
}
