//! blockscan-index — turns a raw key-value scan into queryable tables.
//!
//! # Architecture
//!
//! ```text
//! KeyValueStore (trait, backends in blockscan-store)
//!      │ scan_prefix(b"b")
//!      ▼
//! BlockIndex::ingest       decode each entry, index by height,
//!      │                   count failures, find duplicates and gaps
//!      ▼
//! DayLedger::build         bucket by UTC date, assign dense day numbers
//!      │
//!      ▼
//! ChainView                lookups by height / day number / date
//! ```
//!
//! One sequential pass builds everything; the resulting tables are
//! immutable and safe to read from anywhere.

pub mod days;
pub mod error;
pub mod index;
pub mod options;
pub mod store;
pub mod view;

pub use days::{DayBucket, DayLedger};
pub use error::IngestError;
pub use index::{BlockIndex, EntryDiagnostic, IngestReport};
pub use options::IngestOptions;
pub use store::{KeyValueStore, ScanIter, StoreError};
pub use view::ChainView;
