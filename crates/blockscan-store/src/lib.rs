//! blockscan-store — store backends behind the prefix-scan boundary.
//!
//! Backends:
//! - [`memory`] — in-memory BTreeMap, loadable from snapshot dumps
//! - [`sqlite`] — single-file SQLite kv table (feature `sqlite`)
//!
//! Every backend implements [`blockscan_index::KeyValueStore`]; the
//! ingest layer neither knows nor cares which one it scans.

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
