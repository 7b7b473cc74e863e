//! Error types for the data-loader crate.
//!
//! Two families live here:
//! - `DataLoadError`: startup failures while reading the CSV sources
//! - `QueryError`: per-request failures raised by lookups against a loaded catalog

use crate::types::MovieId;
use thiserror::Error;

/// Errors that can occur during data loading and parsing
///
/// `DataUnavailable` and `DataMalformed` abort startup. `ParseError` describes
/// a single bad row; the parser logs and skips those rows instead of failing.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Source file is missing or could not be read
    #[error("Data source unavailable: {path}: {source}")]
    DataUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Source file is empty, has no usable header, or no parseable rows
    #[error("Data source malformed: {path}: {reason}")]
    DataMalformed { path: String, reason: String },

    /// Line in data file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },
}

/// Errors returned by catalog queries.
///
/// These are recoverable: the HTTP layer turns `ItemNotFound` into a 404 and
/// `InvalidPeriod` into a 400.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Movie {0} not found")]
    ItemNotFound(MovieId),

    #[error("Invalid period '{0}': period must be 'month' or 'year'")]
    InvalidPeriod(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
