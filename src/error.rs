use thiserror::Error;
use crate::fee_sources::SourceId;

#[derive(Error, Debug)]
pub enum Error {
    // Upstream Errors
    #[error("Upstream {source_id} unavailable: {reason}")]
    UpstreamUnavailable {
        source_id: SourceId,
        reason: String,
    },

    #[error("Upstream {source_id} returned a malformed response: {reason}")]
    UpstreamMalformed {
        source_id: SourceId,
        reason: String,
    },

    // Store Errors
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Background task failed: {0}")]
    TaskFailed(String),

    // IO Errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn unavailable(source_id: SourceId, reason: impl ToString) -> Self {
        Error::UpstreamUnavailable {
            source_id,
            reason: reason.to_string(),
        }
    }

    pub fn malformed(source_id: SourceId, reason: impl ToString) -> Self {
        Error::UpstreamMalformed {
            source_id,
            reason: reason.to_string(),
        }
    }

    /// Label used for the `kind` dimension of upstream failure metrics.
    pub fn upstream_kind(&self) -> Option<&'static str> {
        match self {
            Error::UpstreamUnavailable { .. } => Some("unavailable"),
            Error::UpstreamMalformed { .. } => Some("malformed"),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::StoreUnavailable(e.to_string())
    }
}
