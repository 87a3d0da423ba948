//! JSON quote-envelope feed.
//!
//! Reads `<base>/<SYMBOL>.json` files holding the historical-data envelope the
//! upstream quote service returns:
//!
//! ```json
//! { "query": { "count": 2, "results": { "quote": [
//!     { "Date": "2014-05-02", "Close": "592.58" },
//!     { "Date": "2014-05-01", "Close": "591.48" } ] } } }
//! ```
//!
//! A missing `query`, a zero `count`, or missing `results` all mean "no data".
//! The service sends numbers as strings and collapses single-element arrays to
//! a bare object; both are accepted.

use crate::domain::error::QuoteTrackError;
use crate::domain::quote::QuoteRecord;
use crate::ports::quote_port::QuotePort;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Envelope {
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    count: Option<u64>,
    results: Option<Results>,
}

#[derive(Debug, Deserialize)]
struct Results {
    quote: Option<OneOrMany<RawQuote>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Close")]
    close: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

pub struct JsonFeedAdapter {
    base_path: PathBuf,
}

impl JsonFeedAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn json_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", symbol.to_uppercase()))
    }

    /// Parse an envelope body. Quote order is kept as delivered.
    pub fn parse_envelope(symbol: &str, body: &str) -> Result<Vec<QuoteRecord>, QuoteTrackError> {
        let format_err = |reason: String| QuoteTrackError::FeedFormat {
            symbol: symbol.to_string(),
            reason,
        };

        let envelope: Envelope = serde_json::from_str(body)
            .map_err(|e| format_err(format!("invalid JSON envelope: {e}")))?;

        let Some(query) = envelope.query else {
            return Ok(Vec::new());
        };
        if query.count.unwrap_or(0) == 0 {
            return Ok(Vec::new());
        }
        let raw = query
            .results
            .and_then(|r| r.quote)
            .map(OneOrMany::into_vec)
            .unwrap_or_default();

        let mut quotes = Vec::with_capacity(raw.len());
        for item in raw {
            let date = parse_quote_date(&item.date)
                .ok_or_else(|| format_err(format!("invalid date '{}'", item.date)))?;
            let close = match item.close {
                Some(NumberOrString::Number(n)) => n,
                Some(NumberOrString::Text(s)) => s
                    .trim()
                    .parse()
                    .map_err(|e| format_err(format!("invalid close '{s}': {e}")))?,
                None => {
                    debug!(symbol, %date, "skipping quote without close");
                    continue;
                }
            };
            quotes.push(QuoteRecord::new(date, close));
        }
        Ok(quotes)
    }
}

/// `YYYY-MM-DD`, or an RFC 3339 timestamp truncated to its UTC day.
fn parse_quote_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

impl QuotePort for JsonFeedAdapter {
    fn fetch_quotes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<QuoteRecord>, QuoteTrackError> {
        let path = self.json_path(symbol);
        let body = fs::read_to_string(&path).map_err(|e| QuoteTrackError::Feed {
            symbol: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut quotes = Self::parse_envelope(symbol, &body)?;
        quotes.retain(|q| q.date >= from && q.date <= to);
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const ENVELOPE: &str = r#"{
        "query": {
            "count": 3,
            "created": "2014-05-05T03:12:44Z",
            "results": { "quote": [
                { "Symbol": "aapl", "Date": "2014-05-02", "Open": "592.34", "Close": "592.58" },
                { "Symbol": "aapl", "Date": "2014-05-01", "Open": "592.00", "Close": 591.48 },
                { "Symbol": "aapl", "Date": "2014-04-30", "Open": "592.64", "Close": "590.09" }
            ] }
        }
    }"#;

    #[test]
    fn parses_string_and_number_closes() {
        let quotes = JsonFeedAdapter::parse_envelope("AAPL", ENVELOPE).unwrap();
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].date, date(2014, 5, 2));
        assert_relative_eq!(quotes[0].close, 592.58);
        assert_relative_eq!(quotes[1].close, 591.48);
        assert_eq!(quotes[2].date, date(2014, 4, 30));
    }

    #[test]
    fn zero_count_and_missing_query_are_empty() {
        let zero = r#"{ "query": { "count": 0, "results": null } }"#;
        assert!(JsonFeedAdapter::parse_envelope("AAPL", zero).unwrap().is_empty());

        let missing = r#"{ "error": { "description": "no such table" } }"#;
        assert!(JsonFeedAdapter::parse_envelope("AAPL", missing).unwrap().is_empty());
    }

    #[test]
    fn single_quote_object_is_accepted() {
        let body = r#"{ "query": { "count": 1, "results": { "quote":
            { "Date": "2014-05-02", "Close": "592.58" } } } }"#;
        let quotes = JsonFeedAdapter::parse_envelope("AAPL", body).unwrap();
        assert_eq!(quotes.len(), 1);
    }

    #[test]
    fn timestamp_dates_truncate_to_utc_day() {
        assert_eq!(parse_quote_date("2014-05-02T23:59:59Z"), Some(date(2014, 5, 2)));
        assert_eq!(parse_quote_date("2014-05-02T22:00:00-04:00"), Some(date(2014, 5, 3)));
        assert_eq!(parse_quote_date("May 2, 2014"), None);
    }

    #[test]
    fn malformed_values_are_format_errors() {
        let body = r#"{ "query": { "count": 1, "results": { "quote":
            [ { "Date": "2014-05-02", "Close": "n/a" } ] } } }"#;
        assert!(matches!(
            JsonFeedAdapter::parse_envelope("AAPL", body),
            Err(QuoteTrackError::FeedFormat { .. })
        ));
        assert!(matches!(
            JsonFeedAdapter::parse_envelope("AAPL", "not json"),
            Err(QuoteTrackError::FeedFormat { .. })
        ));
    }

    #[test]
    fn fetch_quotes_filters_window() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("AAPL.json"), ENVELOPE).unwrap();
        let adapter = JsonFeedAdapter::new(dir.path().to_path_buf());

        let quotes = adapter
            .fetch_quotes("aapl", date(2014, 5, 1), date(2014, 5, 31))
            .unwrap();
        assert_eq!(quotes.len(), 2);

        let missing = adapter.fetch_quotes("AMZN", date(2014, 5, 1), date(2014, 5, 31));
        assert!(matches!(missing, Err(QuoteTrackError::Feed { .. })));
    }
}
