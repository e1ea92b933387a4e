//! Error types for the ingest pipeline.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that abort a whole ingest.
///
/// Per-entry decode failures are not here on purpose: a corrupt record is
/// skipped and counted in the [`IngestReport`](crate::index::IngestReport),
/// while these errors mean the result as a whole cannot be trusted.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("duplicate height {height}: record {hash} collides with an earlier record")]
    DuplicateHeight { height: u64, hash: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
