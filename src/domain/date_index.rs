//! Calendar date <-> global day offset mapping.
//!
//! Offsets count whole days from a fixed epoch: the epoch itself is offset 0,
//! the day after is 1, the day before is -1. The epoch and the "today" upper
//! bound are injected at construction so the mapping is deterministic.

use crate::domain::quote::QuoteRecord;
use chrono::{Duration, NaiveDate};

pub const MS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// A quote converted into offset space. `date` is the quote's own date and is
/// carried through densification as row metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SparsePoint {
    pub offset: i64,
    pub value: f64,
    pub date: NaiveDate,
}

/// Valid offset range of a track: `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqInfo {
    pub seq_name: String,
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateIndexer {
    epoch: NaiveDate,
    today: NaiveDate,
    epoch_day: i64,
}

impl DateIndexer {
    pub fn new(epoch: NaiveDate, today: NaiveDate) -> Self {
        Self {
            epoch,
            today,
            epoch_day: unix_day(epoch),
        }
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    pub fn to_offset(&self, date: NaiveDate) -> i64 {
        date.signed_duration_since(self.epoch).num_days()
    }

    /// Offset of a Unix millisecond timestamp, discarding time of day.
    ///
    /// Uses floor division, so a timestamp one millisecond before midnight
    /// 1970-01-01 belongs to 1969-12-31.
    pub fn to_offset_millis(&self, ms: i64) -> i64 {
        ms.div_euclid(MS_PER_DAY) - self.epoch_day
    }

    /// Inverse of [`to_offset`](Self::to_offset). `None` only when the offset
    /// falls outside the calendar chrono can represent.
    pub fn to_date(&self, offset: i64) -> Option<NaiveDate> {
        let delta = Duration::try_days(offset)?;
        self.epoch.checked_add_signed(delta)
    }

    /// Offset of the injected "today"; the upper end of the valid domain.
    pub fn latest_offset(&self) -> i64 {
        self.to_offset(self.today)
    }

    pub fn seq_info(&self, seq_name: &str) -> SeqInfo {
        SeqInfo {
            seq_name: seq_name.to_string(),
            min: 0,
            max: self.latest_offset(),
        }
    }

    pub fn contains(&self, offset: i64) -> bool {
        (0..=self.latest_offset()).contains(&offset)
    }

    /// Convert quotes to offset space, preserving their order.
    pub fn index_quotes(&self, quotes: &[QuoteRecord]) -> Vec<SparsePoint> {
        quotes
            .iter()
            .map(|q| SparsePoint {
                offset: self.to_offset(q.date),
                value: q.close,
                date: q.date,
            })
            .collect()
    }
}

/// 1-based row id of an offset (the epoch is row 1).
pub fn row_id(offset: i64) -> i64 {
    offset + 1
}

fn unix_day(date: NaiveDate) -> i64 {
    // NaiveDate::default() is 1970-01-01
    date.signed_duration_since(NaiveDate::default()).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn indexer() -> DateIndexer {
        DateIndexer::new(date(1980, 12, 12), date(2024, 6, 30))
    }

    #[test]
    fn epoch_is_offset_zero() {
        let ix = indexer();
        assert_eq!(ix.to_offset(date(1980, 12, 12)), 0);
        assert_eq!(ix.to_offset(date(1980, 12, 13)), 1);
        assert_eq!(ix.to_offset(date(1980, 12, 11)), -1);
    }

    #[test]
    fn offsets_cross_leap_days() {
        let ix = DateIndexer::new(date(2024, 2, 28), date(2024, 3, 31));
        assert_eq!(ix.to_offset(date(2024, 2, 29)), 1);
        assert_eq!(ix.to_offset(date(2024, 3, 1)), 2);
    }

    #[test]
    fn to_date_inverts_to_offset() {
        let ix = indexer();
        for d in [date(1980, 12, 12), date(1999, 12, 31), date(2024, 2, 29), date(1970, 1, 1)] {
            let offset = ix.to_offset(d);
            assert_eq!(ix.to_date(offset), Some(d));
        }
    }

    #[test]
    fn to_date_out_of_calendar_is_none() {
        let ix = indexer();
        assert_eq!(ix.to_date(i64::MAX), None);
        assert_eq!(ix.to_date(i64::MIN), None);
    }

    #[test]
    fn millis_truncate_to_day() {
        let ix = indexer();
        let day_start = date(1980, 12, 13)
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(ix.to_offset_millis(day_start), 1);
        assert_eq!(ix.to_offset_millis(day_start + MS_PER_DAY - 1), 1);
        assert_eq!(ix.to_offset_millis(day_start - 1), 0);
    }

    #[test]
    fn millis_before_unix_epoch_floor() {
        let ix = DateIndexer::new(date(1970, 1, 1), date(1970, 1, 2));
        assert_eq!(ix.to_offset_millis(0), 0);
        assert_eq!(ix.to_offset_millis(-1), -1);
        assert_eq!(ix.to_offset_millis(-MS_PER_DAY), -1);
        assert_eq!(ix.to_offset_millis(-MS_PER_DAY - 1), -2);
    }

    #[test]
    fn seq_info_spans_epoch_to_today() {
        let ix = DateIndexer::new(date(2024, 1, 1), date(2024, 1, 31));
        let info = ix.seq_info("stocks");
        assert_eq!(info.seq_name, "stocks");
        assert_eq!(info.min, 0);
        assert_eq!(info.max, 30);
        assert!(ix.contains(0));
        assert!(ix.contains(30));
        assert!(!ix.contains(31));
        assert!(!ix.contains(-1));
    }

    #[test]
    fn row_ids_are_one_based() {
        assert_eq!(row_id(0), 1);
        assert_eq!(row_id(15_000), 15_001);
    }

    #[test]
    fn index_quotes_preserves_order() {
        let ix = DateIndexer::new(date(2024, 1, 1), date(2024, 1, 31));
        let quotes = vec![
            QuoteRecord::new(date(2024, 1, 5), 10.0),
            QuoteRecord::new(date(2024, 1, 2), 20.0),
        ];
        let points = ix.index_quotes(&quotes);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].offset, 4);
        assert_eq!(points[0].value, 10.0);
        assert_eq!(points[1].offset, 1);
        assert_eq!(points[1].date, date(2024, 1, 2));
    }
}
