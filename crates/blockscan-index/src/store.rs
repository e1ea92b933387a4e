//! Boundary to the external key-value store.
//!
//! The index layer never touches a database directly; it asks for a
//! prefix scan and consumes whatever `(key, value)` pairs come back, in
//! whatever order the backend produces them. Concrete backends live in
//! `blockscan-store`.

use thiserror::Error;

/// Errors surfaced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dump line {line}: {reason}")]
    Dump { line: usize, reason: String },

    #[error("backend error: {0}")]
    Backend(String),
}

/// Fallible stream of raw `(key, value)` pairs from one prefix scan.
pub type ScanIter<'a> = Box<dyn Iterator<Item = Result<(Vec<u8>, Vec<u8>), StoreError>> + 'a>;

/// A key-value store that can enumerate entries under a key prefix.
///
/// `scan_prefix` must yield every entry whose key starts with `prefix`
/// and nothing else. Order is backend-defined; callers must not assume
/// height order or any other ordering.
pub trait KeyValueStore {
    fn scan_prefix<'a>(&'a self, prefix: &[u8]) -> Result<ScanIter<'a>, StoreError>;
}
