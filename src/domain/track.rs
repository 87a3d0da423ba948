//! Request dispatch for the quote track.
//!
//! The host framework asks a data source for one of four things: dense rows,
//! dense values, the list of measurements, or the valid sequence range.
//! Replies use the framework's column-oriented envelopes, serialized with
//! camelCase keys.

use crate::domain::date_index::DateIndexer;
use crate::domain::densify::{densify, DenseSeries};
use crate::domain::error::QuoteTrackError;
use crate::domain::instrument::{find, Instrument};
use crate::domain::quote::{is_latest_first, sort_latest_first};
use crate::domain::track_config::TrackConfig;
use crate::ports::quote_port::QuotePort;
use serde::Serialize;
use tracing::{debug, warn};

/// Offset range of one measurement on one sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub seq_name: String,
    pub start: i64,
    pub end: i64,
    /// Instrument id; the first configured instrument when `None`.
    pub measurement: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackRequest {
    Rows(RangeQuery),
    Values(RangeQuery),
    Measurements,
    SeqInfos,
}

impl TrackRequest {
    pub fn action(&self) -> &'static str {
        match self {
            TrackRequest::Rows(_) => "rows",
            TrackRequest::Values(_) => "values",
            TrackRequest::Measurements => "measurements",
            TrackRequest::SeqInfos => "seq_infos",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrackResponse {
    Rows(RowsData),
    Values(ValuesData),
    Measurements(MeasurementsData),
    SeqInfos(Vec<(String, i64, i64)>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsData {
    pub values: RowColumns,
    pub global_start_index: Option<i64>,
    pub use_offset: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowColumns {
    pub id: Option<Vec<i64>>,
    pub start: Vec<i64>,
    pub end: Vec<i64>,
    pub strand: Strand,
    pub metadata: RowMetadata,
}

/// `"*"` for every row of a filled reply, an empty list otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Strand {
    Uniform(String),
    PerRow(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowMetadata {
    pub date: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesData {
    pub values: Vec<f64>,
    pub global_start_index: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementsData {
    pub id: Vec<String>,
    pub name: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub datasource_id: Vec<String>,
    pub datasource_group: Vec<String>,
    pub default_chart_type: Vec<String>,
    pub annotation: Vec<Option<String>>,
    pub min_value: Vec<f64>,
    pub max_value: Vec<f64>,
    pub metadata: Vec<Vec<String>>,
}

impl RowsData {
    pub fn empty() -> Self {
        Self {
            values: RowColumns {
                id: None,
                start: Vec::new(),
                end: Vec::new(),
                strand: Strand::PerRow(Vec::new()),
                metadata: RowMetadata { date: Vec::new() },
            },
            global_start_index: None,
            use_offset: false,
        }
    }

    pub fn from_series(series: &DenseSeries) -> Self {
        if series.is_empty() {
            return Self::empty();
        }
        let rows = series.aligned_rows();
        Self {
            values: RowColumns {
                id: Some(rows.iter().map(|r| r.id).collect()),
                start: rows.iter().map(|r| r.offset).collect(),
                end: rows.iter().map(|r| r.offset).collect(),
                strand: Strand::Uniform("*".to_string()),
                metadata: RowMetadata {
                    date: rows
                        .iter()
                        .map(|r| r.date.format("%Y-%m-%d").to_string())
                        .collect(),
                },
            },
            global_start_index: series.global_start_index(),
            use_offset: false,
        }
    }
}

impl ValuesData {
    pub fn from_series(series: &DenseSeries) -> Self {
        Self {
            values: series.values(),
            global_start_index: series.global_start_index(),
        }
    }
}

impl MeasurementsData {
    pub fn from_instruments(instruments: &[Instrument]) -> Self {
        Self {
            id: instruments.iter().map(|i| i.id.clone()).collect(),
            name: instruments.iter().map(|i| i.name.clone()).collect(),
            kind: instruments.iter().map(|_| "feature".to_string()).collect(),
            datasource_id: instruments.iter().map(|i| i.datasource.clone()).collect(),
            datasource_group: instruments
                .iter()
                .map(|i| i.datasource_group.clone())
                .collect(),
            default_chart_type: instruments
                .iter()
                .map(|i| i.default_chart_type.clone())
                .collect(),
            annotation: instruments.iter().map(|_| None).collect(),
            min_value: instruments.iter().map(|i| i.min_value).collect(),
            max_value: instruments.iter().map(|i| i.max_value).collect(),
            metadata: instruments.iter().map(|i| i.metadata.clone()).collect(),
        }
    }
}

/// A configured track bound to a quote feed.
pub struct QuoteTrack<'a> {
    seq_name: String,
    indexer: DateIndexer,
    instruments: Vec<Instrument>,
    feed: &'a dyn QuotePort,
}

impl<'a> QuoteTrack<'a> {
    pub fn new(config: &TrackConfig, feed: &'a dyn QuotePort) -> Self {
        Self {
            seq_name: config.seq_name.clone(),
            indexer: config.indexer(),
            instruments: config.instruments.clone(),
            feed,
        }
    }

    pub fn handle(&self, request: &TrackRequest) -> Result<TrackResponse, QuoteTrackError> {
        debug!(action = request.action(), "handling track request");
        match request {
            TrackRequest::Rows(query) => {
                let series = self.dense_series(query)?;
                Ok(TrackResponse::Rows(RowsData::from_series(&series)))
            }
            TrackRequest::Values(query) => {
                let series = self.dense_series(query)?;
                Ok(TrackResponse::Values(ValuesData::from_series(&series)))
            }
            TrackRequest::Measurements => Ok(TrackResponse::Measurements(
                MeasurementsData::from_instruments(&self.instruments),
            )),
            TrackRequest::SeqInfos => {
                let info = self.indexer.seq_info(&self.seq_name);
                Ok(TrackResponse::SeqInfos(vec![(info.seq_name, info.min, info.max)]))
            }
        }
    }

    /// Fetch and densify one measurement over `query`.
    ///
    /// Sequences other than the configured one, unconfigured measurements,
    /// inverted ranges, and windows the feed has nothing for all produce an
    /// empty series.
    pub fn dense_series(&self, query: &RangeQuery) -> Result<DenseSeries, QuoteTrackError> {
        let empty = DenseSeries::empty(query.start, query.end);
        if query.seq_name != self.seq_name {
            debug!(seq_name = %query.seq_name, "sequence not served by this track");
            return Ok(empty);
        }
        if query.start > query.end {
            return Ok(empty);
        }

        let Some(instrument) = self.resolve_instrument(query.measurement.as_deref()) else {
            debug!(measurement = ?query.measurement, "measurement not served by this track");
            return Ok(empty);
        };
        let (Some(from), Some(to)) = (
            self.indexer.to_date(query.start),
            self.indexer.to_date(query.end),
        ) else {
            warn!(start = query.start, end = query.end, "range outside the calendar");
            return Ok(empty);
        };

        let symbol = instrument.symbol();
        let mut quotes = self.feed.fetch_quotes(&symbol, from, to)?;
        if quotes.is_empty() {
            debug!(%symbol, %from, %to, "feed returned no quotes");
            return Ok(empty);
        }
        if !is_latest_first(&quotes) {
            debug!(%symbol, "feed returned quotes out of order, sorting");
            sort_latest_first(&mut quotes);
        }

        let points = self.indexer.index_quotes(&quotes);
        let series = densify(query.start, query.end, &points);
        debug!(
            %symbol,
            quotes = quotes.len(),
            filled = series.len(),
            requested = series.requested_len(),
            complete = series.is_complete(),
            "densified quotes"
        );
        Ok(series)
    }

    /// Named instrument, or the first configured one when `measurement` is unset.
    fn resolve_instrument(&self, measurement: Option<&str>) -> Option<&Instrument> {
        match measurement {
            Some(id) => find(&self.instruments, id),
            None => self.instruments.first(),
        }
    }
}
