//! Domain error types.

/// Top-level error type for quotetrack.
///
/// Densification itself never fails; these cover the layers around it
/// (configuration, feed adapters, command-line arguments).
#[derive(Debug, thiserror::Error)]
pub enum QuoteTrackError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("feed error for {symbol}: {reason}")]
    Feed { symbol: String, reason: String },

    #[error("malformed feed data for {symbol}: {reason}")]
    FeedFormat { symbol: String, reason: String },

    #[error("invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&QuoteTrackError> for std::process::ExitCode {
    fn from(err: &QuoteTrackError) -> Self {
        let code: u8 = match err {
            QuoteTrackError::Io(_) => 1,
            QuoteTrackError::ConfigParse { .. }
            | QuoteTrackError::ConfigInvalid { .. } => 2,
            QuoteTrackError::Feed { .. } | QuoteTrackError::FeedFormat { .. } => 3,
            QuoteTrackError::InvalidRange { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
