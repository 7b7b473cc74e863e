//! Search-interest logger.

use crate::entry::{sanitize_term, SearchLogEntry};
use crate::profile::GenreProfile;
use crate::store::{InMemorySearchLog, JsonFileSearchLog, SearchLogStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

/// What happened to a search handed to the logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutcome {
    Logged,
    /// Term was empty after sanitizing
    Skipped,
    /// Store rejected the entry; already reported with `warn!`
    Failed,
}

/// Records hashed search terms with the genres they matched.
///
/// Logging is best effort: failures never reach the caller as errors.
pub struct SearchInterestLogger {
    store: Box<dyn SearchLogStore>,
}

impl SearchInterestLogger {
    pub fn new(store: impl SearchLogStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Logger persisting to a JSON array file
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileSearchLog::new(path))
    }

    /// Logger that forgets everything when the process exits
    pub fn in_memory() -> Self {
        Self::new(InMemorySearchLog::new())
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Log a search for `raw_term` that matched movies with `genres`.
    #[instrument(skip_all)]
    pub fn log_search<S: AsRef<str>>(&self, raw_term: &str, genres: &[S]) -> LogOutcome {
        self.log_search_at(raw_term, genres, Utc::now())
    }

    /// Same as [`Self::log_search`] with an explicit timestamp
    pub fn log_search_at<S: AsRef<str>>(
        &self,
        raw_term: &str,
        genres: &[S],
        at: DateTime<Utc>,
    ) -> LogOutcome {
        let Some(term) = sanitize_term(raw_term) else {
            debug!("Skipping empty search term");
            return LogOutcome::Skipped;
        };

        let entry = SearchLogEntry::new(&term, genres, at);
        match self.store.append(entry) {
            Ok(()) => LogOutcome::Logged,
            Err(e) => {
                warn!("Failed to log search to {}: {}", self.store.name(), e);
                LogOutcome::Failed
            }
        }
    }

    pub fn entries(&self) -> Vec<SearchLogEntry> {
        self.store.entries()
    }

    /// Genre profile of everything logged so far
    pub fn profile(&self) -> GenreProfile {
        GenreProfile::from_entries(&self.store.entries())
    }
}
