//! CLI definition and dispatch.
//!
//! Every command prints a JSON document on stdout; diagnostics go to stderr
//! through `tracing`.

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::quote_feed;
use crate::domain::date_index::{row_id, DateIndexer};
use crate::domain::error::QuoteTrackError;
use crate::domain::track::{QuoteTrack, RangeQuery, TrackRequest};
use crate::domain::track_config::{build_track_config, TrackConfig};

#[derive(Parser, Debug)]
#[command(name = "quotetrack", about = "Daily stock quotes as a dense day-indexed track")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Densify quotes into framework rows (ids, offsets, source dates)
    Rows {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Densify quotes into a plain value array
    Values {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List configured instruments
    Measurements {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show the valid offset range of the track
    SeqInfos {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Convert a calendar date to its offset
    Offset {
        #[arg(long)]
        date: NaiveDate,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Convert an offset to its calendar date
    Date {
        #[arg(long, allow_hyphen_values = true)]
        offset: i64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Requested range, as offsets or as calendar dates.
#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First offset (days since the epoch)
    #[arg(long, allow_hyphen_values = true, conflicts_with = "from")]
    pub start: Option<i64>,
    /// Last offset, inclusive
    #[arg(long, allow_hyphen_values = true, conflicts_with = "to")]
    pub end: Option<i64>,
    /// First date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Instrument id; defaults to the first configured instrument
    #[arg(short, long)]
    pub measurement: Option<String>,
    /// Sequence name; defaults to the configured track name
    #[arg(long)]
    pub seq_name: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayIndex {
    pub date: String,
    pub offset: i64,
    pub row_id: i64,
}

impl Command {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Command::Rows { config, .. }
            | Command::Values { config, .. }
            | Command::Measurements { config }
            | Command::SeqInfos { config }
            | Command::Offset { config, .. }
            | Command::Date { config, .. } => config.as_deref(),
        }
    }
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let today = Utc::now().date_naive();
    match execute(&cli.command, today) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Run one command and return its JSON output. `today` bounds the track.
pub fn execute(command: &Command, today: NaiveDate) -> Result<String, QuoteTrackError> {
    let config = load_track_config(command.config_path(), today)?;
    let indexer = config.indexer();

    match command {
        Command::Rows { range, .. } => {
            let query = build_range_query(range, &config, &indexer)?;
            respond(&config, &TrackRequest::Rows(query))
        }
        Command::Values { range, .. } => {
            let query = build_range_query(range, &config, &indexer)?;
            respond(&config, &TrackRequest::Values(query))
        }
        Command::Measurements { .. } => respond(&config, &TrackRequest::Measurements),
        Command::SeqInfos { .. } => respond(&config, &TrackRequest::SeqInfos),
        Command::Offset { date, .. } => {
            let offset = indexer.to_offset(*date);
            to_json(&DayIndex {
                date: date.format("%Y-%m-%d").to_string(),
                offset,
                row_id: row_id(offset),
            })
        }
        Command::Date { offset, .. } => {
            let date = indexer.to_date(*offset).ok_or_else(|| QuoteTrackError::InvalidRange {
                reason: format!("offset {offset} is outside the calendar"),
            })?;
            to_json(&DayIndex {
                date: date.format("%Y-%m-%d").to_string(),
                offset: *offset,
                row_id: row_id(*offset),
            })
        }
    }
}

pub fn load_track_config(path: Option<&Path>, today: NaiveDate) -> Result<TrackConfig, QuoteTrackError> {
    let adapter = match path {
        Some(p) => {
            info!(path = %p.display(), "loading config");
            FileConfigAdapter::from_file(p)?
        }
        None => FileConfigAdapter::empty(),
    };
    build_track_config(&adapter, today)
}

/// Turn range arguments into a query, converting dates with `indexer`.
pub fn build_range_query(
    range: &RangeArgs,
    config: &TrackConfig,
    indexer: &DateIndexer,
) -> Result<RangeQuery, QuoteTrackError> {
    let start = range
        .start
        .or_else(|| range.from.map(|d| indexer.to_offset(d)))
        .ok_or_else(|| QuoteTrackError::InvalidRange {
            reason: "one of --start or --from is required".into(),
        })?;
    let end = range
        .end
        .or_else(|| range.to.map(|d| indexer.to_offset(d)))
        .ok_or_else(|| QuoteTrackError::InvalidRange {
            reason: "one of --end or --to is required".into(),
        })?;

    if !indexer.contains(start) || !indexer.contains(end) {
        info!(
            start,
            end,
            latest = indexer.latest_offset(),
            "range extends beyond the track's valid offsets"
        );
    }

    Ok(RangeQuery {
        seq_name: range
            .seq_name
            .clone()
            .unwrap_or_else(|| config.seq_name.clone()),
        start,
        end,
        measurement: range.measurement.clone(),
    })
}

fn respond(config: &TrackConfig, request: &TrackRequest) -> Result<String, QuoteTrackError> {
    let feed = quote_feed(&config.feed);
    let track = QuoteTrack::new(config, feed.as_ref());
    let response = track.handle(request)?;
    to_json(&response)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, QuoteTrackError> {
    serde_json::to_string_pretty(value).map_err(|e| QuoteTrackError::Io(std::io::Error::other(e)))
}
