//! # Search Log Crate
//!
//! Privacy-preserving record of what users search for, and the genre profile
//! derived from it.
//!
//! ## Main Components
//!
//! - **entry**: Log entries, term sanitizing and hashing
//! - **store**: Where entries live (`JsonFileSearchLog`, `InMemorySearchLog`)
//! - **logger**: `SearchInterestLogger`, the entry point used by the service
//! - **profile**: Genre counts, percentages and the taste summary
//!
//! The raw search term is never stored: only its SHA-256 hash, the time of
//! the search and the genres of the movies it matched.
//!
//! ## Example Usage
//!
//! ```ignore
//! use search_log::SearchInterestLogger;
//!
//! let logger = SearchInterestLogger::json_file("search_logs.json");
//! logger.log_search("batman", &["Action".to_string(), "Crime".to_string()]);
//!
//! println!("{}", logger.profile().taste_summary());
//! ```

pub mod error;
pub mod entry;
pub mod store;
pub mod logger;
pub mod profile;

pub use error::{Result, SearchLogError};
pub use entry::{hash_term, sanitize_term, SearchLogEntry, MAX_TERM_CHARS};
pub use store::{InMemorySearchLog, JsonFileSearchLog, SearchLogStore};
pub use logger::{LogOutcome, SearchInterestLogger};
pub use profile::{GenreCount, GenreProfile};
