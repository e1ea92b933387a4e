//! Height-keyed record table built from one full store scan.
//!
//! The scan order coming out of the store is whatever the backend's key
//! order happens to be, so nothing here may conclude anything about
//! duplicates or gaps until the scan is exhausted. Decode failures are
//! isolated per entry; a height collision poisons the whole table and
//! aborts.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use blockscan_core::{decode_entry, display_hash, BlockIndexRecord};

use crate::error::IngestError;
use crate::options::IngestOptions;
use crate::store::KeyValueStore;

/// One decode failure retained for the ingest report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDiagnostic {
    /// Hex of the raw store key that failed.
    pub key: String,
    pub reason: String,
}

/// Outcome of one ingest pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    /// Entries decoded and indexed.
    pub decoded: u64,
    /// Entries skipped because they would not decode.
    pub failed: u64,
    /// The first failures in scan order, capped by
    /// [`IngestOptions::max_diagnostics`].
    pub diagnostics: Vec<EntryDiagnostic>,
    /// The first heights absent from the observed `[min, max]` range,
    /// ascending, capped by [`IngestOptions::max_missing`].
    pub missing_heights: Vec<u64>,
    /// Exact count of absent heights in `[min, max]`; never capped.
    pub missing_count: u64,
    /// Observed height range; `None` when nothing decoded.
    pub height_range: Option<(u64, u64)>,
}

/// The height-keyed table of decoded block-index records.
///
/// Built once by [`BlockIndex::ingest`] and read-only afterwards. Heights
/// are unique by construction; inserting a colliding record fails without
/// touching the first one.
#[derive(Debug)]
pub struct BlockIndex {
    records: BTreeMap<u64, BlockIndexRecord>,
    report: IngestReport,
}

impl BlockIndex {
    /// An empty table, for building programmatically (mostly in tests).
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            report: IngestReport::default(),
        }
    }

    /// Insert one record, keyed by its height.
    ///
    /// A record for an already-present height is rejected and the
    /// existing record stays untouched.
    pub fn insert(&mut self, record: BlockIndexRecord) -> Result<(), IngestError> {
        match self.records.entry(record.height) {
            Entry::Occupied(_) => Err(IngestError::DuplicateHeight {
                height: record.height,
                hash: display_hash(&record.hash),
            }),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Scan `store` under the configured key prefix and build the table.
    ///
    /// Undecodable entries are counted, logged and skipped. A duplicate
    /// height aborts with [`IngestError::DuplicateHeight`]; so does any
    /// store failure, including failing to open the scan at all.
    pub fn ingest(
        store: &dyn KeyValueStore,
        options: &IngestOptions,
    ) -> Result<Self, IngestError> {
        let mut index = Self::new();

        let scan = store.scan_prefix(&[options.key_prefix])?;
        for entry in scan {
            let (key, value) = entry?;
            match decode_entry(&key, &value) {
                Ok(record) => {
                    if let Err(err) = index.insert(record) {
                        tracing::warn!(error = %err, "aborting ingest");
                        return Err(err);
                    }
                    index.report.decoded += 1;
                }
                Err(err) => {
                    index.report.failed += 1;
                    if index.report.diagnostics.len() < options.max_diagnostics {
                        index.report.diagnostics.push(EntryDiagnostic {
                            key: hex::encode(&key),
                            reason: err.to_string(),
                        });
                    }
                    tracing::warn!(
                        key = %hex::encode(&key),
                        error = %err,
                        "skipping undecodable entry"
                    );
                }
            }
        }

        index.finish_report(options);
        Ok(index)
    }

    /// Post-scan validation: record the range, warn when the table does
    /// not start at height 0, and tally gaps.
    fn finish_report(&mut self, options: &IngestOptions) {
        let Some((min, max)) = self.height_range() else {
            tracing::info!("scan produced no records");
            return;
        };

        if options.expect_genesis && min != 0 {
            tracing::warn!(min_height = min, "lowest height is not the genesis block");
        }

        // A lone record at an absurd height must not turn this into a
        // walk over the hole: count exactly, itemize up to the cap.
        let mut missing = Vec::new();
        let mut missing_count = 0u64;
        let mut prev = min;
        for &height in self.records.keys().skip(1) {
            missing_count += height - prev - 1;
            let room = options.max_missing - missing.len();
            missing.extend((prev + 1..height).take(room));
            prev = height;
        }
        if missing_count > 0 {
            tracing::warn!(
                gaps = missing_count,
                itemized = missing.len(),
                "height sequence has gaps"
            );
        }

        self.report.height_range = Some((min, max));
        self.report.missing_heights = missing;
        self.report.missing_count = missing_count;
        tracing::info!(
            decoded = self.report.decoded,
            failed = self.report.failed,
            min,
            max,
            "ingest complete"
        );
    }

    pub fn get(&self, height: u64) -> Option<&BlockIndexRecord> {
        self.records.get(&height)
    }

    /// Lowest and highest ingested heights.
    pub fn height_range(&self) -> Option<(u64, u64)> {
        let min = self.records.keys().next()?;
        let max = self.records.keys().next_back()?;
        Some((*min, *max))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in ascending height order.
    pub fn records(&self) -> impl Iterator<Item = &BlockIndexRecord> {
        self.records.values()
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }
}

impl Default for BlockIndex {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use blockscan_core::BlockStatus;

    fn record(height: u64, seed: u8) -> BlockIndexRecord {
        BlockIndexRecord {
            hash: [seed; 32],
            format_version: 1,
            height,
            status: BlockStatus::new(5),
            tx_count: 1,
            file_index: 0,
            data_offset: 0,
            undo_offset: 0,
            header_version: 2,
            prev_hash: [0; 32],
            merkle_root: [0; 32],
            timestamp: 1_000_000,
            difficulty_bits: 0x1D00_FFFF,
            nonce: 0,
        }
    }

    #[test]
    fn duplicate_height_rejected_without_overwrite() {
        let mut index = BlockIndex::new();
        index.insert(record(7, 0xAA)).unwrap();

        let err = index.insert(record(7, 0xBB)).unwrap_err();
        match err {
            IngestError::DuplicateHeight { height, .. } => assert_eq!(height, 7),
            other => panic!("expected DuplicateHeight, got {other:?}"),
        }

        // First record survives.
        assert_eq!(index.get(7).unwrap().hash, [0xAA; 32]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn height_range_tracks_extremes() {
        let mut index = BlockIndex::new();
        assert_eq!(index.height_range(), None);
        for h in [4u64, 0, 9] {
            index.insert(record(h, h as u8)).unwrap();
        }
        assert_eq!(index.height_range(), Some((0, 9)));
    }

    #[test]
    fn records_iterate_in_height_order() {
        let mut index = BlockIndex::new();
        for h in [5u64, 1, 3] {
            index.insert(record(h, h as u8)).unwrap();
        }
        let heights: Vec<u64> = index.records().map(|r| r.height).collect();
        assert_eq!(heights, vec![1, 3, 5]);
    }
}
