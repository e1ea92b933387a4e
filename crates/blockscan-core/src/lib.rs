//! blockscan-core — pure decode layer for block-index records.
//!
//! A blockchain client persists one compact binary record per block in its
//! index database. This crate turns those raw bytes back into typed data:
//!
//! ```text
//! (key, value) bytes
//!     ├── key.rs     strip the 1-byte tag, keep the 32-byte hash
//!     ├── varint.rs  the accumulate-and-increment integer encoding
//!     ├── record.rs  flag-conditional field walk → BlockIndexRecord
//!     └── display.rs reversed-hex / wall-clock rendering (cosmetic)
//! ```
//!
//! Everything is a pure function over its inputs; no I/O, no logging, no
//! global state. Scanning a store and aggregating the results live in
//! `blockscan-index`.

pub mod cursor;
pub mod display;
pub mod error;
pub mod key;
pub mod record;
pub mod status;
pub mod varint;

pub use cursor::Cursor;
pub use display::{display_hash, format_timestamp, render_record};
pub use error::DecodeError;
pub use key::{make_key, parse_key, BLOCK_KEY_PREFIX, KEY_LEN};
pub use record::{decode_entry, BlockIndexRecord, FIXED_TAIL_LEN};
pub use status::{BlockStatus, ValidityLevel};
pub use varint::{decode_varint, encode_varint, MAX_VARINT_LEN};
