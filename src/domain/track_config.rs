//! Track configuration: building and validation.
//!
//! Every key is optional; an empty configuration yields the stock track with
//! the AAPL/AMZN pair read from `./data` CSV files.

use crate::domain::date_index::DateIndexer;
use crate::domain::error::QuoteTrackError;
use crate::domain::instrument::{default_instruments, find, Instrument};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::PathBuf;

pub const DEFAULT_SEQ_NAME: &str = "stocks";
pub const DEFAULT_EPOCH: &str = "1980-12-12";
pub const DEFAULT_FEED_PATH: &str = "data";
const DEFAULT_MAX_VALUE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Csv,
    Json,
}

impl std::str::FromStr for FeedKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(FeedKind::Csv),
            "json" => Ok(FeedKind::Json),
            other => Err(format!("unknown feed kind '{other}' (expected csv or json)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub kind: FeedKind,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackConfig {
    pub seq_name: String,
    pub epoch: NaiveDate,
    pub as_of: NaiveDate,
    pub feed: FeedConfig,
    pub instruments: Vec<Instrument>,
}

impl TrackConfig {
    pub fn indexer(&self) -> DateIndexer {
        DateIndexer::new(self.epoch, self.as_of)
    }
}

/// Build the track configuration. `today` is used when `[track] as_of` is unset.
pub fn build_track_config(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<TrackConfig, QuoteTrackError> {
    let seq_name = config
        .get_string("track", "seq_name")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| DEFAULT_SEQ_NAME.to_string());
    if seq_name.is_empty() {
        return Err(invalid("track", "seq_name", "seq_name must not be empty"));
    }

    let epoch = match config.get_date("track", "epoch") {
        Some(parsed) => parsed.map_err(|_| invalid_date("track", "epoch"))?,
        None => NaiveDate::parse_from_str(DEFAULT_EPOCH, "%Y-%m-%d")
            .map_err(|_| invalid_date("track", "epoch"))?,
    };
    let as_of = match config.get_date("track", "as_of") {
        Some(parsed) => parsed.map_err(|_| invalid_date("track", "as_of"))?,
        None => today,
    };
    if as_of < epoch {
        return Err(invalid("track", "as_of", "as_of must not precede epoch"));
    }

    let feed = build_feed_config(config)?;
    let instruments = build_instruments(config, &seq_name)?;

    Ok(TrackConfig {
        seq_name,
        epoch,
        as_of,
        feed,
        instruments,
    })
}

fn build_feed_config(config: &dyn ConfigPort) -> Result<FeedConfig, QuoteTrackError> {
    let kind = match config.get_string("feed", "kind") {
        Some(raw) => raw
            .parse::<FeedKind>()
            .map_err(|reason| invalid("feed", "kind", &reason))?,
        None => FeedKind::Csv,
    };
    let path = config
        .get_string("feed", "path")
        .map(|p| p.trim().to_string())
        .unwrap_or_else(|| DEFAULT_FEED_PATH.to_string());
    if path.is_empty() {
        return Err(invalid("feed", "path", "path must not be empty"));
    }
    Ok(FeedConfig {
        kind,
        path: PathBuf::from(path),
    })
}

fn build_instruments(
    config: &dyn ConfigPort,
    datasource: &str,
) -> Result<Vec<Instrument>, QuoteTrackError> {
    let defaults = default_instruments(datasource);
    let ids = match config.get_list("instruments", "ids") {
        Some(ids) => ids,
        None => defaults.iter().map(|i| i.id.clone()).collect(),
    };

    let mut seen = HashSet::new();
    let mut instruments = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.to_lowercase();
        if id.is_empty() {
            return Err(invalid("instruments", "ids", "empty instrument id"));
        }
        if !seen.insert(id.clone()) {
            return Err(invalid(
                "instruments",
                "ids",
                &format!("duplicate instrument id: {id}"),
            ));
        }
        instruments.push(build_instrument(config, &id, datasource, &defaults)?);
    }
    Ok(instruments)
}

fn build_instrument(
    config: &dyn ConfigPort,
    id: &str,
    datasource: &str,
    defaults: &[Instrument],
) -> Result<Instrument, QuoteTrackError> {
    let section = format!("instrument.{id}");
    let fallback = find(defaults, id);

    let name = config
        .get_string(&section, "name")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| id.to_uppercase());
    let min_value = config.get_double(&section, "min_value", fallback.map_or(0.0, |i| i.min_value));
    let max_value = config.get_double(
        &section,
        "max_value",
        fallback.map_or(DEFAULT_MAX_VALUE, |i| i.max_value),
    );
    if min_value >= max_value {
        return Err(invalid(&section, "max_value", "max_value must exceed min_value"));
    }

    let mut instrument = Instrument::stock(id, &name, datasource, min_value, max_value);
    if let Some(chart) = config
        .get_string(&section, "chart_type")
        .filter(|s| !s.trim().is_empty())
    {
        instrument.default_chart_type = chart.trim().to_string();
    }
    Ok(instrument)
}

fn invalid(section: &str, key: &str, reason: &str) -> QuoteTrackError {
    QuoteTrackError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn invalid_date(section: &str, key: &str) -> QuoteTrackError {
    invalid(section, key, "invalid date format (expected YYYY-MM-DD)")
}
