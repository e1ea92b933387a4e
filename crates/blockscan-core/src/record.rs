//! Decoding of one stored block-index value into a typed record.
//!
//! The stored layout is positional with no framing: four mandatory
//! varints, up to three varints gated by status bits decoded moments
//! earlier in the same buffer, then an 80-byte fixed block header. The
//! decoder must consume the value exactly: leftover or missing bytes
//! mean the flags and the payload disagree, and the record cannot be
//! trusted.

use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::error::DecodeError;
use crate::key::parse_key;
use crate::status::BlockStatus;
use crate::varint::{decode_varint, encode_varint};

/// Byte length of the fixed header fields at the tail of every record:
/// version (4) + prev hash (32) + merkle root (32) + time (4) + bits (4)
/// + nonce (4).
pub const FIXED_TAIL_LEN: usize = 80;

/// One decoded block-index entry.
///
/// `file_index`, `data_offset` and `undo_offset` are only meaningful when
/// the corresponding [`BlockStatus`] bit is set; when absent on disk they
/// stay at 0, which the format cannot distinguish from a genuine zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIndexRecord {
    /// Block hash from the store key, in storage byte order.
    #[serde(with = "hex::serde")]
    pub hash: [u8; 32],
    /// On-disk serialization format version.
    pub format_version: u64,
    pub height: u64,
    pub status: BlockStatus,
    pub tx_count: u64,
    /// Which numbered block file holds the block, if any.
    pub file_index: u64,
    /// Byte offset of the block inside its block file.
    pub data_offset: u64,
    /// Byte offset of the undo data inside its undo file.
    pub undo_offset: u64,
    pub header_version: i32,
    #[serde(with = "hex::serde")]
    pub prev_hash: [u8; 32],
    #[serde(with = "hex::serde")]
    pub merkle_root: [u8; 32],
    /// Block time, seconds since the Unix epoch.
    pub timestamp: u32,
    /// Compact difficulty target, kept as an opaque bit pattern.
    pub difficulty_bits: u32,
    pub nonce: u32,
}

impl BlockIndexRecord {
    /// Decode one stored value. `value.len()` is the declared record
    /// length; consuming anything else fails with
    /// [`DecodeError::SizeMismatch`].
    pub fn decode(hash: [u8; 32], value: &[u8]) -> Result<Self, DecodeError> {
        let mut cursor = Cursor::new(value);

        let format_version = decode_varint(&mut cursor)?;
        let height = decode_varint(&mut cursor)?;
        let status = BlockStatus::new(decode_varint(&mut cursor)?);
        let tx_count = decode_varint(&mut cursor)?;

        let file_index = if status.has_file_info() {
            decode_varint(&mut cursor)?
        } else {
            0
        };
        let data_offset = if status.has_data() {
            decode_varint(&mut cursor)?
        } else {
            0
        };
        let undo_offset = if status.has_undo() {
            decode_varint(&mut cursor)?
        } else {
            0
        };

        let header_version = cursor.read_i32_le()?;
        let prev_hash = cursor.read_array()?;
        let merkle_root = cursor.read_array()?;
        let timestamp = cursor.read_u32_le()?;
        let difficulty_bits = cursor.read_u32_le()?;
        let nonce = cursor.read_u32_le()?;

        if cursor.position() != value.len() {
            return Err(DecodeError::SizeMismatch {
                expected: value.len(),
                actual: cursor.position(),
            });
        }

        Ok(Self {
            hash,
            format_version,
            height,
            status,
            tx_count,
            file_index,
            data_offset,
            undo_offset,
            header_version,
            prev_hash,
            merkle_root,
            timestamp,
            difficulty_bits,
            nonce,
        })
    }

    /// Encode back to the stored layout. Exact inverse of [`decode`] for
    /// any record whose absent file fields are 0; used for fixtures and
    /// snapshot dumps.
    ///
    /// [`decode`]: BlockIndexRecord::decode
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(FIXED_TAIL_LEN + 16);
        out.extend_from_slice(&encode_varint(self.format_version));
        out.extend_from_slice(&encode_varint(self.height));
        out.extend_from_slice(&encode_varint(self.status.bits()));
        out.extend_from_slice(&encode_varint(self.tx_count));
        if self.status.has_file_info() {
            out.extend_from_slice(&encode_varint(self.file_index));
        }
        if self.status.has_data() {
            out.extend_from_slice(&encode_varint(self.data_offset));
        }
        if self.status.has_undo() {
            out.extend_from_slice(&encode_varint(self.undo_offset));
        }
        out.extend_from_slice(&self.header_version.to_le_bytes());
        out.extend_from_slice(&self.prev_hash);
        out.extend_from_slice(&self.merkle_root);
        out.extend_from_slice(&self.timestamp.to_le_bytes());
        out.extend_from_slice(&self.difficulty_bits.to_le_bytes());
        out.extend_from_slice(&self.nonce.to_le_bytes());
        out
    }
}

/// Decode one `(key, value)` pair as handed out by the store scan.
pub fn decode_entry(raw_key: &[u8], value: &[u8]) -> Result<BlockIndexRecord, DecodeError> {
    let hash = parse_key(raw_key)?;
    BlockIndexRecord::decode(hash, value)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(height: u64, status: u64, tx_count: u64) -> BlockIndexRecord {
        BlockIndexRecord {
            hash: [0xAB; 32],
            format_version: 1,
            height,
            status: BlockStatus::new(status),
            tx_count,
            file_index: 0,
            data_offset: 0,
            undo_offset: 0,
            header_version: 2,
            prev_hash: [0x11; 32],
            merkle_root: [0x22; 32],
            timestamp: 1_364_818_265,
            difficulty_bits: 0x1A05_7E08,
            nonce: 0x8D5A_4D36,
        }
    }

    #[test]
    fn no_flag_record_is_varints_plus_fixed_tail() {
        let rec = sample(300, 5, 7);
        let bytes = rec.encode();
        // format=1, height=300 (2 bytes), status=5, tx=7 → 5 varint bytes.
        assert_eq!(bytes.len(), 5 + FIXED_TAIL_LEN);

        let back = BlockIndexRecord::decode(rec.hash, &bytes).unwrap();
        assert_eq!(back, rec);
        assert_eq!(back.file_index, 0);
        assert_eq!(back.data_offset, 0);
        assert_eq!(back.undo_offset, 0);
    }

    #[test]
    fn status_bits_gate_file_fields() {
        let mut rec = sample(1000, 5 | BlockStatus::HAVE_DATA | BlockStatus::HAVE_UNDO, 42);
        rec.file_index = 12;
        rec.data_offset = 129_332;
        rec.undo_offset = 11_223;
        let bytes = rec.encode();
        assert_eq!(BlockIndexRecord::decode(rec.hash, &bytes).unwrap(), rec);

        // Data without undo: the undo offset never hits the wire.
        let mut data_only = sample(1001, 5 | BlockStatus::HAVE_DATA, 42);
        data_only.file_index = 12;
        data_only.data_offset = 400;
        let with_undo_len = bytes.len();
        let bytes = data_only.encode();
        assert!(bytes.len() < with_undo_len);
        let back = BlockIndexRecord::decode(data_only.hash, &bytes).unwrap();
        assert_eq!(back.undo_offset, 0);
        assert_eq!(back.data_offset, 400);
    }

    #[test]
    fn trailing_bytes_are_a_size_mismatch() {
        let rec = sample(300, 5, 7);
        let mut bytes = rec.encode();
        let good_len = bytes.len();
        bytes.push(0xFF);
        let err = BlockIndexRecord::decode(rec.hash, &bytes).unwrap_err();
        match err {
            DecodeError::SizeMismatch { expected, actual } => {
                assert_eq!(expected, good_len + 1);
                assert_eq!(actual, good_len);
            }
            other => panic!("expected SizeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn short_value_is_truncated() {
        let rec = sample(300, 5, 7);
        let bytes = rec.encode();
        let err = BlockIndexRecord::decode(rec.hash, &bytes[..bytes.len() - 10]).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedInput { .. }));
    }

    #[test]
    fn flags_demanding_missing_fields_fail() {
        // Encoded without file fields, then status patched to claim
        // have-data: the decoder mis-walks into the fixed tail and must
        // fail rather than hand back a shifted record.
        let rec = sample(2, 5, 1);
        let mut bytes = rec.encode();
        assert_eq!(bytes[2], 5); // status varint, single byte
        bytes[2] = (5 | BlockStatus::HAVE_DATA) as u8;
        assert!(BlockIndexRecord::decode(rec.hash, &bytes).is_err());
    }

    #[test]
    fn decode_entry_joins_key_and_value() {
        let rec = sample(77, 5, 3);
        let mut key = vec![b'b'];
        key.extend_from_slice(&rec.hash);
        let back = decode_entry(&key, &rec.encode()).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn decode_entry_rejects_bad_key() {
        let rec = sample(77, 5, 3);
        let err = decode_entry(&[b'b', 0x01, 0x02], &rec.encode()).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidKey { len: 3, expected: 33 }));
    }
}
