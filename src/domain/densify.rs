//! Date-aligned densification of sparse quotes.
//!
//! A feed reports trading days only. The track needs one value for every
//! calendar day of a requested `[start, end]` offset range, so gaps are filled
//! from the quotes that bound them.
//!
//! Records are walked in their given order, which must be latest date first.
//! Each record that is not behind the cursor fills every offset from the
//! cursor through its own offset (clipped to `end`) with its own value. Older
//! records are then behind the cursor and skipped, so in practice the newest
//! record at or after `start` covers the leading span.

use crate::domain::date_index::{row_id, SparsePoint};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct DensePoint {
    pub offset: i64,
    pub value: f64,
    /// Date of the quote the value was taken from.
    pub date: NaiveDate,
}

/// Presentation form of a dense point, carrying its 1-based row id.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub id: i64,
    pub offset: i64,
    pub value: f64,
    pub date: NaiveDate,
}

/// Filled run of consecutive offsets beginning at `start`.
///
/// `points` covers `start..=end` completely, or a prefix of it when the
/// records ran out.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseSeries {
    pub start: i64,
    pub end: i64,
    pub points: Vec<DensePoint>,
}

impl DenseSeries {
    pub fn empty(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            points: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of offsets requested, zero when `start > end`.
    pub fn requested_len(&self) -> u64 {
        if self.start > self.end {
            0
        } else {
            self.end.abs_diff(self.start) + 1
        }
    }

    /// True when every requested offset received a value.
    pub fn is_complete(&self) -> bool {
        self.len() as u64 == self.requested_len()
    }

    pub fn offsets(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.offset).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Row id of the first requested offset, or `None` when nothing was filled.
    pub fn global_start_index(&self) -> Option<i64> {
        if self.is_empty() {
            None
        } else {
            Some(row_id(self.start))
        }
    }

    pub fn aligned_rows(&self) -> Vec<AlignedRow> {
        self.points
            .iter()
            .map(|p| AlignedRow {
                id: row_id(p.offset),
                offset: p.offset,
                value: p.value,
                date: p.date,
            })
            .collect()
    }
}

/// Densify `records` (latest first) over `start..=end`.
///
/// `start > end` or no records yields an empty series. The ordering of
/// `records` is not checked.
pub fn densify(start: i64, end: i64, records: &[SparsePoint]) -> DenseSeries {
    let mut series = DenseSeries::empty(start, end);
    if start > end {
        return series;
    }

    let mut cursor = start;
    for record in records {
        if record.offset < cursor {
            continue;
        }

        let last = record.offset.min(end);
        series
            .points
            .extend((cursor..=last).map(|offset| DensePoint {
                offset,
                value: record.value,
                date: record.date,
            }));

        if last == end {
            break;
        }
        cursor = last + 1;
    }

    series
}
