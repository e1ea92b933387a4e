//! Human-readable rendering of decoded records.
//!
//! Everything here is cosmetic. Hashes are stored and compared little-end
//! first; explorers and log output show them byte-reversed, so that is
//! what [`display_hash`] produces. None of these strings ever round-trip
//! back into keys or lookups.

use chrono::DateTime;

use crate::record::BlockIndexRecord;

/// Hex-encode a hash byte-reversed, the conventional display order.
pub fn display_hash(hash: &[u8; 32]) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

/// Format a block timestamp as a UTC wall-clock string.
pub fn format_timestamp(ts: u32) -> String {
    match DateTime::from_timestamp(i64::from(ts), 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("invalid time ({ts})"),
    }
}

/// Multi-line dump of every decoded field, one record per call.
///
/// File positions print as 0 when the status flags say they were never
/// stored; the flag summary on the status line is the thing to check.
pub fn render_record(rec: &BlockIndexRecord) -> String {
    format!(
        "hash        : {hash}\n\
         format      : {format}\n\
         height      : {height}\n\
         status      : {status_bits:#010x} ({status})\n\
         txs         : {txs}\n\
         file index  : {file_index}\n\
         data offset : {data_offset}\n\
         undo offset : {undo_offset}\n\
         version     : {version}\n\
         prev        : {prev}\n\
         merkle root : {merkle}\n\
         time        : {time} ({ts})\n\
         bits        : {bits:#010x}\n\
         nonce       : {nonce:#010x}\n",
        hash = display_hash(&rec.hash),
        format = rec.format_version,
        height = rec.height,
        status_bits = rec.status.bits(),
        status = rec.status.describe(),
        txs = rec.tx_count,
        file_index = rec.file_index,
        data_offset = rec.data_offset,
        undo_offset = rec.undo_offset,
        version = rec.header_version,
        prev = display_hash(&rec.prev_hash),
        merkle = display_hash(&rec.merkle_root),
        time = format_timestamp(rec.timestamp),
        ts = rec.timestamp,
        bits = rec.difficulty_bits,
        nonce = rec.nonce,
    )
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::BlockStatus;

    #[test]
    fn hash_display_reverses_all_bytes() {
        let mut hash = [0u8; 32];
        hash[0] = 0xAA;
        hash[31] = 0xFF;
        let s = display_hash(&hash);
        assert_eq!(s.len(), 64);
        assert!(s.starts_with("ff"));
        assert!(s.ends_with("aa"));
    }

    #[test]
    fn timestamp_renders_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(1_364_818_265), "2013-04-01 12:11:05 UTC");
    }

    #[test]
    fn render_covers_every_field() {
        let rec = BlockIndexRecord {
            hash: [0x01; 32],
            format_version: 1,
            height: 227_836,
            status: BlockStatus::new(5 | BlockStatus::HAVE_DATA),
            tx_count: 462,
            file_index: 12,
            data_offset: 129_332,
            undo_offset: 0,
            header_version: 2,
            prev_hash: [0x02; 32],
            merkle_root: [0x03; 32],
            timestamp: 1_364_818_265,
            difficulty_bits: 0x1A05_7E08,
            nonce: 0x8D5A_4D36,
        };
        let out = render_record(&rec);
        assert!(out.contains("height      : 227836"));
        assert!(out.contains("scripts, have-data"));
        assert!(out.contains("2013-04-01"));
        assert!(out.contains("0x1a057e08"));
    }
}
