#![allow(dead_code)]

use chrono::NaiveDate;
use quotetrack::domain::date_index::SparsePoint;
use quotetrack::domain::error::QuoteTrackError;
use quotetrack::domain::instrument::default_instruments;
pub use quotetrack::domain::quote::QuoteRecord;
use quotetrack::domain::track_config::{FeedConfig, FeedKind, TrackConfig};
use quotetrack::ports::quote_port::QuotePort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory feed. Returns stored quotes in insertion order, filtered to the
/// requested window, and records every call.
pub struct MockQuotePort {
    pub data: HashMap<String, Vec<QuoteRecord>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_quotes(mut self, symbol: &str, quotes: Vec<QuoteRecord>) -> Self {
        self.data.insert(symbol.to_string(), quotes);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl QuotePort for MockQuotePort {
    fn fetch_quotes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<QuoteRecord>, QuoteTrackError> {
        self.calls.borrow_mut().push((symbol.to_string(), from, to));
        if let Some(reason) = self.errors.get(symbol) {
            return Err(QuoteTrackError::Feed {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|quotes| {
                quotes
                    .iter()
                    .filter(|q| q.date >= from && q.date <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn quote(day: &str, close: f64) -> QuoteRecord {
    QuoteRecord::new(NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap(), close)
}

pub fn point(offset: i64, value: f64) -> SparsePoint {
    SparsePoint {
        offset,
        value,
        date: date(2000, 1, 1),
    }
}

/// Stock track with epoch 2024-01-01 and "today" 2024-12-31.
pub fn sample_config() -> TrackConfig {
    TrackConfig {
        seq_name: "stocks".to_string(),
        epoch: date(2024, 1, 1),
        as_of: date(2024, 12, 31),
        feed: FeedConfig {
            kind: FeedKind::Csv,
            path: PathBuf::from("unused"),
        },
        instruments: default_instruments("stocks"),
    }
}

/// Trading days of the first two weeks of January 2024, latest first.
pub fn january_quotes() -> Vec<QuoteRecord> {
    vec![
        quote("2024-01-12", 185.92),
        quote("2024-01-11", 185.59),
        quote("2024-01-10", 186.19),
        quote("2024-01-09", 185.14),
        quote("2024-01-08", 185.56),
        quote("2024-01-05", 181.18),
        quote("2024-01-04", 181.91),
        quote("2024-01-03", 184.25),
        quote("2024-01-02", 185.64),
    ]
}
