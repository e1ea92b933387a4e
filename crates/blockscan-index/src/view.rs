//! One-call facade over ingest and aggregation.

use chrono::NaiveDate;

use blockscan_core::BlockIndexRecord;

use crate::days::{DayBucket, DayLedger};
use crate::error::IngestError;
use crate::index::{BlockIndex, IngestReport};
use crate::options::IngestOptions;
use crate::store::KeyValueStore;

/// An ingested chain snapshot: the height table plus its day ledger.
///
/// This is the surface a shell or dispatcher talks to: lookups by
/// height, by day number, by date, and the ingest statistics. Everything
/// is immutable after construction; re-ingest to refresh.
#[derive(Debug)]
pub struct ChainView {
    index: BlockIndex,
    days: DayLedger,
}

impl ChainView {
    /// Scan `store` and build both tables.
    pub fn ingest(
        store: &dyn KeyValueStore,
        options: &IngestOptions,
    ) -> Result<Self, IngestError> {
        let index = BlockIndex::ingest(store, options)?;
        let days = DayLedger::build(index.records());
        Ok(Self { index, days })
    }

    pub fn block_by_height(&self, height: u64) -> Option<&BlockIndexRecord> {
        self.index.get(height)
    }

    pub fn day_by_number(&self, number: u32) -> Option<&DayBucket> {
        self.days.bucket_for_day(number)
    }

    pub fn day_by_date(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.bucket_for_date(date)
    }

    pub fn day_count(&self) -> u32 {
        self.days.day_count()
    }

    pub fn height_range(&self) -> Option<(u64, u64)> {
        self.index.height_range()
    }

    pub fn report(&self) -> &IngestReport {
        self.index.report()
    }

    pub fn index(&self) -> &BlockIndex {
        &self.index
    }

    pub fn days(&self) -> &DayLedger {
        &self.days
    }
}
