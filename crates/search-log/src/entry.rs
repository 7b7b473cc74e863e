//! Search log entries.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Longest search term (in characters) kept before hashing
pub const MAX_TERM_CHARS: usize = 100;

/// One logged search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLogEntry {
    /// Lowercase hex SHA-256 of the sanitized term
    pub term_hash: String,
    /// RFC 3339 UTC, e.g. "2024-05-01T12:00:00Z"
    pub timestamp: String,
    /// Distinct genres of the matched movies, first-seen order
    pub genres: Vec<String>,
}

impl SearchLogEntry {
    /// Build an entry for an already sanitized term
    pub fn new<S: AsRef<str>>(sanitized_term: &str, genres: &[S], at: DateTime<Utc>) -> Self {
        Self {
            term_hash: hash_term(sanitized_term),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            genres: distinct_genres(genres),
        }
    }
}

/// Strip control characters, trim and cap at [`MAX_TERM_CHARS`].
///
/// Returns `None` when nothing is left.
pub fn sanitize_term(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
    let capped: String = cleaned.trim().chars().take(MAX_TERM_CHARS).collect();
    let term = capped.trim_end();

    if term.is_empty() {
        None
    } else {
        Some(term.to_string())
    }
}

pub fn hash_term(term: &str) -> String {
    hex::encode(Sha256::digest(term.as_bytes()))
}

fn distinct_genres<S: AsRef<str>>(genres: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    genres
        .iter()
        .map(|g| g.as_ref().trim())
        .filter(|g| !g.is_empty() && seen.insert(*g))
        .map(|g| g.to_string())
        .collect()
}
