//! Domain error types.
//!
//! Only conditions that abort a run or the surrounding program live here.
//! Warm-up, rejected fills and degenerate indicator windows are absorbed by
//! the engine and never surface as errors.

use chrono::NaiveDateTime;

/// Top-level error type for ewotrader.
#[derive(Debug, thiserror::Error)]
pub enum TraderError {
    #[error("malformed bar at index {index} ({timestamp}): {reason}")]
    MalformedBar {
        index: usize,
        timestamp: NaiveDateTime,
        reason: String,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("report error: {reason}")]
    Report { reason: String },
}

impl TraderError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TraderError> for std::process::ExitCode {
    fn from(err: &TraderError) -> Self {
        let code: u8 = match err {
            TraderError::ConfigParse { .. } | TraderError::ConfigInvalid { .. } => 2,
            TraderError::Data { .. } | TraderError::NoData { .. } => 3,
            TraderError::MalformedBar { .. } => 4,
            TraderError::Report { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
