//! Error types for the search-log crate.

use thiserror::Error;

/// Errors raised while persisting the search log.
///
/// The logger never propagates these to callers; they are logged and
/// reported as [`crate::LogOutcome::Failed`].
#[derive(Error, Debug)]
pub enum SearchLogError {
    #[error("Failed to persist search log {path}: {source}")]
    LogPersistFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize search log: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchLogError>;
