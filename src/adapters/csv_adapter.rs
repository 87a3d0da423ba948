//! CSV file quote feed.
//!
//! One file per symbol, `<base>/<SYMBOL>.csv`, with a header row. The `date`
//! and `close` columns are located by name (case-insensitive), so the usual
//! `Date,Open,High,Low,Close,Adj Close,Volume` export works as-is. When there
//! is no `close` column, `adj close` is used.

use crate::domain::error::QuoteTrackError;
use crate::domain::quote::QuoteRecord;
use crate::ports::quote_port::QuotePort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol.to_uppercase()))
    }
}

fn column_index(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    })
}

impl QuotePort for CsvAdapter {
    fn fetch_quotes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<QuoteRecord>, QuoteTrackError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| QuoteTrackError::Feed {
            symbol: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let format_err = |reason: String| QuoteTrackError::FeedFormat {
            symbol: symbol.to_string(),
            reason,
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| format_err(format!("CSV header error: {}", e)))?
            .clone();
        let date_col = column_index(&headers, &["date"])
            .ok_or_else(|| format_err("missing date column".into()))?;
        let close_col = column_index(&headers, &["close", "adj close"])
            .ok_or_else(|| format_err("missing close column".into()))?;

        let mut quotes = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| format_err(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_col)
                .ok_or_else(|| format_err("missing date value".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| format_err(format!("invalid date '{}': {}", date_str, e)))?;

            if date < from || date > to {
                continue;
            }

            let close_str = record
                .get(close_col)
                .ok_or_else(|| format_err("missing close value".into()))?
                .trim();
            // exports mark non-trading rows with "null"
            if close_str.is_empty() || close_str.eq_ignore_ascii_case("null") {
                debug!(symbol, %date, "skipping row without close");
                continue;
            }
            let close: f64 = close_str
                .parse()
                .map_err(|e| format_err(format!("invalid close '{}': {}", close_str, e)))?;

            quotes.push(QuoteRecord::new(date, close));
        }

        Ok(quotes)
    }
}
