//! # Market Errors
//!
//! Every public market operation returns `Result<_, MarketError>`. The
//! variants split into three kinds so the caller can decide what an empty
//! result means: a transport failure is worth trying again next cycle, a
//! parse failure usually is not, and a storage failure concerns the local
//! catalog file.

use crate::markets::eastmoney::parse::RecordError;
use crate::retrieve::ky_http::FetchError;
use thiserror::Error;

/// Coarse classification of a `MarketError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a usable response.
    Transport,
    /// A response arrived but its content was malformed.
    Parse,
    /// Reading or writing the local catalog file failed.
    Storage,
}

/// Errors raised while fetching, parsing or persisting market data.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Connection, timeout or body decoding failure.
    #[error("transport failure: {0}")]
    Transport(#[from] FetchError),

    /// The server answered with a non-2xx status.
    #[error("HTTP status {status} from {url}")]
    Status {
        /// The numeric HTTP status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Parse(String),

    /// A listing record had the wrong number of fields.
    #[error("malformed listing record: {0}")]
    Record(#[from] RecordError),

    /// An embedded JSON payload could not be decoded.
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The catalog file could not be read or written.
    #[error("catalog storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl MarketError {
    /// Returns the failure kind of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            MarketError::Transport(_) | MarketError::Status { .. } => FailureKind::Transport,
            MarketError::Parse(_) | MarketError::Record(_) | MarketError::Json(_) => {
                FailureKind::Parse
            }
            MarketError::Io(_) => FailureKind::Storage,
        }
    }

    /// Whether polling again later could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind() == FailureKind::Transport
    }
}
