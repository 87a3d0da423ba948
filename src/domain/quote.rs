//! Daily quote record as delivered by a feed.

use chrono::NaiveDate;

/// One trading day's closing price.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    pub date: NaiveDate,
    pub close: f64,
}

impl QuoteRecord {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Order records latest date first, the order densification expects.
///
/// The sort is stable, so records sharing a date keep their feed order.
pub fn sort_latest_first(records: &mut [QuoteRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

/// True when dates never increase from one record to the next.
pub fn is_latest_first(records: &[QuoteRecord]) -> bool {
    records.windows(2).all(|w| w[0].date >= w[1].date)
}
