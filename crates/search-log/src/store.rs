//! Search log storage.
//!
//! `JsonFileSearchLog` keeps the whole log as one pretty-printed JSON array.
//! Appends are serialized by a mutex held across the read-modify-write cycle,
//! and each write goes to `<file>.tmp` first and is then renamed over the
//! log, so readers (which take no lock) always see a complete file. A log
//! that exists but cannot be read or parsed reads as empty, and appends to
//! it fail without touching the file.

use crate::entry::SearchLogEntry;
use crate::error::{Result, SearchLogError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Append-only storage for search log entries.
pub trait SearchLogStore: Send + Sync {
    /// Store name for logging
    fn name(&self) -> &str;

    fn append(&self, entry: SearchLogEntry) -> Result<()>;

    /// Snapshot of every entry, in insertion order
    fn entries(&self) -> Vec<SearchLogEntry>;
}

/// Search log persisted as a JSON array file.
pub struct JsonFileSearchLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSearchLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn persist_error(&self, source: io::Error) -> SearchLogError {
        SearchLogError::LogPersistFailure {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Read the log file. Only a missing file counts as an empty log; an
    /// unreadable or corrupt file is a `LogPersistFailure`.
    fn try_load(&self) -> Result<Vec<SearchLogEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.persist_error(e)),
        };

        serde_json::from_str(&content)
            .map_err(|e| self.persist_error(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

impl SearchLogStore for JsonFileSearchLog {
    fn name(&self) -> &str {
        "json_file"
    }

    fn append(&self, entry: SearchLogEntry) -> Result<()> {
        // A panic in another writer leaves no partial file behind, so the
        // poisoned guard is still usable.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Never rewrite a log we could not read
        let mut entries = self.try_load()?;
        entries.push(entry);
        let json = serde_json::to_string_pretty(&entries)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.persist_error(e))?;
            }
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| self.persist_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.persist_error(e))?;

        debug!(
            "Search log {} now holds {} entries",
            self.path.display(),
            entries.len()
        );
        Ok(())
    }

    fn entries(&self) -> Vec<SearchLogEntry> {
        self.try_load().unwrap_or_else(|e| {
            warn!("Reading search log as empty: {}", e);
            Vec::new()
        })
    }
}

/// Search log kept in memory for the life of the process.
#[derive(Default)]
pub struct InMemorySearchLog {
    entries: Mutex<Vec<SearchLogEntry>>,
}

impl InMemorySearchLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SearchLogStore for InMemorySearchLog {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn append(&self, entry: SearchLogEntry) -> Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
        Ok(())
    }

    fn entries(&self) -> Vec<SearchLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn entry(term: &str, genres: &[&str]) -> SearchLogEntry {
        SearchLogEntry::new(term, genres, Utc::now())
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let log = JsonFileSearchLog::new(dir.path().join("search_logs.json"));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = TempDir::new().unwrap();
        let log = JsonFileSearchLog::new(dir.path().join("search_logs.json"));

        log.append(entry("first", &["Drama"])).unwrap();
        log.append(entry("second", &["Comedy"])).unwrap();

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].genres, vec!["Drama"]);
        assert_eq!(entries[1].genres, vec!["Comedy"]);
        assert!(!log.tmp_path().exists());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("search_logs.json");
        fs::write(&path, "{ not json").unwrap();

        let log = JsonFileSearchLog::new(&path);
        assert!(log.entries().is_empty());

        let err = log.append(entry("batman", &["Action"])).unwrap_err();
        assert!(matches!(err, SearchLogError::LogPersistFailure { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_append_after_damage_keeps_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("search_logs.json");
        let log = JsonFileSearchLog::new(&path);
        for term in ["heat", "toy story", "batman"] {
            log.append(entry(term, &["Drama"])).unwrap();
        }
        let before = fs::read(&path).unwrap();

        // Trailing invalid UTF-8 byte makes the file unreadable as text
        let mut damaged = before.clone();
        damaged.push(0xff);
        fs::write(&path, &damaged).unwrap();

        assert!(log.append(entry("alien", &["Sci-Fi"])).is_err());
        assert_eq!(fs::read(&path).unwrap(), damaged);
        assert!(!log.tmp_path().exists());

        // Repairing the file restores all three entries
        fs::write(&path, &before).unwrap();
        assert_eq!(log.entries().len(), 3);
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let log = JsonFileSearchLog::new(dir.path().join("logs").join("search_logs.json"));

        log.append(entry("heat", &["Crime"])).unwrap();
        assert!(log.path().exists());
    }

    #[test]
    fn test_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        // Parent "directory" is a regular file
        let log = JsonFileSearchLog::new(blocker.join("search_logs.json"));
        let err = log.append(entry("heat", &["Crime"])).unwrap_err();
        assert!(matches!(err, SearchLogError::LogPersistFailure { .. }));
    }

    #[test]
    fn test_in_memory_store() {
        let log = InMemorySearchLog::new();
        log.append(entry("a", &["Drama"])).unwrap();
        log.append(entry("b", &[])).unwrap();

        assert_eq!(log.entries().len(), 2);
        assert_eq!(log.name(), "in_memory");
    }
}
