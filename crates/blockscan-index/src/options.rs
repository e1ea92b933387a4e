//! Ingest configuration.

use serde::{Deserialize, Serialize};

use blockscan_core::BLOCK_KEY_PREFIX;

/// Tunables for one ingest pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Record-type tag to scan under.
    pub key_prefix: u8,
    /// Warn when the lowest ingested height is not 0. A store copied
    /// mid-sync legitimately starts higher; turn this off to silence it.
    pub expect_genesis: bool,
    /// How many per-entry decode diagnostics to keep in the report.
    /// Failures past the cap are still counted, just not itemized.
    pub max_diagnostics: usize,
    /// How many missing heights to itemize in the report. The gap count
    /// stays exact past the cap.
    pub max_missing: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            key_prefix: BLOCK_KEY_PREFIX,
            expect_genesis: true,
            max_diagnostics: 32,
            max_missing: 32,
        }
    }
}
