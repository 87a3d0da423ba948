//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_feed_adapter;

use crate::domain::track_config::{FeedConfig, FeedKind};
use crate::ports::quote_port::QuotePort;

/// Quote feed selected by `[feed] kind`.
pub fn quote_feed(feed: &FeedConfig) -> Box<dyn QuotePort> {
    match feed.kind {
        FeedKind::Csv => Box::new(csv_adapter::CsvAdapter::new(feed.path.clone())),
        FeedKind::Json => Box::new(json_feed_adapter::JsonFeedAdapter::new(feed.path.clone())),
    }
}
