//! Calendar-day aggregation over a built height table.
//!
//! Day numbers must come out dense and chronological no matter what order
//! records were scanned in, so the build runs in two passes: accumulate
//! buckets keyed by date, then walk the dates in order and hand out
//! numbers.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use blockscan_core::BlockIndexRecord;

/// Aggregate of every record whose timestamp lands on one UTC date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Dense index in ascending date order, starting at 0.
    pub day_number: u32,
    /// Timestamp of the first record that contributed, for display.
    pub representative_timestamp: u32,
    pub min_height: u64,
    pub max_height: u64,
    pub block_count: u64,
    /// Sum of the transaction counts of every contributing record.
    pub tx_count: u64,
}

/// Date-keyed summary table, immutable once built.
#[derive(Debug)]
pub struct DayLedger {
    buckets: BTreeMap<NaiveDate, DayBucket>,
    by_number: Vec<NaiveDate>,
    skipped: u64,
}

impl DayLedger {
    /// Aggregate `records` into day buckets.
    ///
    /// The date comes from each record's own timestamp converted to a UTC
    /// calendar date, never from the process clock. A timestamp that does
    /// not map to a date leaves its record out of the totals, with a
    /// warning.
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a BlockIndexRecord>,
    {
        let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
        let mut skipped = 0u64;

        for rec in records {
            let Some(date) = utc_date(rec.timestamp) else {
                tracing::warn!(
                    height = rec.height,
                    timestamp = rec.timestamp,
                    "timestamp does not map to a calendar date; record left out of day totals"
                );
                skipped += 1;
                continue;
            };
            buckets
                .entry(date)
                .and_modify(|b| {
                    b.min_height = b.min_height.min(rec.height);
                    b.max_height = b.max_height.max(rec.height);
                    b.block_count += 1;
                    b.tx_count += rec.tx_count;
                })
                .or_insert_with(|| DayBucket {
                    date,
                    day_number: 0,
                    representative_timestamp: rec.timestamp,
                    min_height: rec.height,
                    max_height: rec.height,
                    block_count: 1,
                    tx_count: rec.tx_count,
                });
        }

        // Second pass: number the dates now that all of them are known.
        let mut by_number = Vec::with_capacity(buckets.len());
        for (number, (date, bucket)) in buckets.iter_mut().enumerate() {
            bucket.day_number = number as u32;
            by_number.push(*date);
        }

        Self {
            buckets,
            by_number,
            skipped,
        }
    }

    /// Number of distinct dates observed.
    pub fn day_count(&self) -> u32 {
        self.by_number.len() as u32
    }

    pub fn bucket_for_date(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.buckets.get(&date)
    }

    pub fn bucket_for_day(&self, number: u32) -> Option<&DayBucket> {
        let date = self.by_number.get(number as usize)?;
        self.buckets.get(date)
    }

    /// All buckets in chronological order.
    pub fn buckets(&self) -> impl Iterator<Item = &DayBucket> {
        self.buckets.values()
    }

    /// Records dropped because their timestamp had no calendar date.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

fn utc_date(timestamp: u32) -> Option<NaiveDate> {
    DateTime::from_timestamp(i64::from(timestamp), 0).map(|dt| dt.date_naive())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
