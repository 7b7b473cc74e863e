//! Parser for the MovieLens CSV files.
//!
//! - movies.csv: movieId,title,genres
//! - ratings.csv: userId,movieId,rating,timestamp
//!
//! Columns are located by header name. Fields may be wrapped in double quotes
//! (titles containing commas are), with `""` standing for a literal quote.
//!
//! Display normalization happens here as well: titles get their trailing
//! article moved to the front, genres become an ordered label list and every
//! rating gets a formatted copy of its timestamp.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use chrono::DateTime;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Display format for rating timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Articles that MovieLens moves to the end of a title, in match order
const TRAILING_ARTICLES: [(&str, &str); 3] = [(", The", "The"), (", A", "A"), (", An", "An")];

/// Read a whole file into lines.
///
/// Invalid UTF-8 is replaced rather than rejected; a leading byte-order mark
/// is dropped.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|source| DataLoadError::DataUnavailable {
        path: path.display().to_string(),
        source,
    })?;

    let content = String::from_utf8_lossy(&bytes);
    let content: &str = &content;
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Split one CSV record into fields.
fn split_csv_line(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => current.push(c),
            }
        } else {
            match c {
                '"' if current.is_empty() => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
    }

    if in_quotes {
        return Err("Unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}

/// A CSV file split into a header lookup and numbered data rows.
struct CsvTable {
    file: String,
    columns: HashMap<String, usize>,
    /// (1-based line number, raw line)
    rows: Vec<(usize, String)>,
}

impl CsvTable {
    fn read(path: &Path) -> Result<Self> {
        let file = path.display().to_string();
        let lines = read_lines(path)?;

        let mut numbered = lines
            .into_iter()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = numbered.next().ok_or_else(|| DataLoadError::DataMalformed {
            path: file.clone(),
            reason: "File is empty".to_string(),
        })?;

        let columns = split_csv_line(header.trim())
            .map_err(|reason| DataLoadError::DataMalformed {
                path: file.clone(),
                reason: format!("Unreadable header: {}", reason),
            })?
            .into_iter()
            .enumerate()
            .map(|(idx, name)| (name.trim().to_string(), idx))
            .collect();

        Ok(Self {
            file,
            columns,
            rows: numbered.collect(),
        })
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| DataLoadError::DataMalformed {
                path: self.file.clone(),
                reason: format!("Missing required column '{}'", name),
            })
    }

    fn parse_error(&self, line: usize, reason: impl Into<String>) -> DataLoadError {
        DataLoadError::ParseError {
            file: self.file.clone(),
            line,
            reason: reason.into(),
        }
    }

    /// Run `parse_row` over every data row, skipping rows that fail.
    ///
    /// Fails with `DataMalformed` when no row survives.
    fn parse_rows<T>(
        &self,
        parse_row: impl Fn(usize, &[String]) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut parsed = Vec::with_capacity(self.rows.len());
        let mut skipped = 0usize;

        for (line_no, line) in &self.rows {
            let row = split_csv_line(line.trim_end_matches('\r'))
                .map_err(|reason| self.parse_error(*line_no, reason))
                .and_then(|fields| parse_row(*line_no, &fields));

            match row {
                Ok(value) => parsed.push(value),
                Err(err) => {
                    skipped += 1;
                    warn!("Skipping row: {}", err);
                }
            }
        }

        if parsed.is_empty() {
            return Err(DataLoadError::DataMalformed {
                path: self.file.clone(),
                reason: "No parseable rows".to_string(),
            });
        }

        debug!(
            "Parsed {} rows from {} ({} skipped)",
            parsed.len(),
            self.file,
            skipped
        );
        Ok(parsed)
    }
}

/// Fetch a field by column index or report which one is missing.
fn field<'a>(table: &CsvTable, fields: &'a [String], idx: usize, name: &str, line: usize) -> Result<&'a str> {
    fields
        .get(idx)
        .map(|s| s.as_str())
        .ok_or_else(|| table.parse_error(line, format!("Missing {}", name)))
}

/// Parse the movies.csv file
///
/// Titles and genres are normalized for display; statistics start at zero.
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let table = CsvTable::read(path)?;
    let id_col = table.column("movieId")?;
    let title_col = table.column("title")?;
    let genres_col = table.column("genres")?;

    table.parse_rows(|line_no, fields| {
        let movie_id = field(&table, fields, id_col, "movieId", line_no)?;
        let title = field(&table, fields, title_col, "title", line_no)?;
        // A short row simply has no genre field
        let genres = fields.get(genres_col).map(|s| s.as_str()).unwrap_or("");

        Ok(Movie::new(
            movie_id
                .trim()
                .parse()
                .map_err(|e| table.parse_error(line_no, format!("Invalid movieId: {}", e)))?,
            format_title(title),
            parse_genres(genres),
        ))
    })
}

/// Parse the ratings.csv file
pub fn parse_ratings(path: &Path) -> Result<Vec<RatingEvent>> {
    let table = CsvTable::read(path)?;
    let user_col = table.column("userId")?;
    let movie_col = table.column("movieId")?;
    let rating_col = table.column("rating")?;
    let timestamp_col = table.column("timestamp")?;

    table.parse_rows(|line_no, fields| {
        let user_id = field(&table, fields, user_col, "userId", line_no)?;
        let movie_id = field(&table, fields, movie_col, "movieId", line_no)?;
        let rating_value = field(&table, fields, rating_col, "rating", line_no)?;
        let timestamp = field(&table, fields, timestamp_col, "timestamp", line_no)?;

        let timestamp: i64 = timestamp
            .trim()
            .parse()
            .map_err(|e| table.parse_error(line_no, format!("Invalid timestamp: {}", e)))?;
        let rated_at = format_timestamp(timestamp).ok_or_else(|| {
            table.parse_error(line_no, format!("Timestamp out of range: {}", timestamp))
        })?;

        Ok(RatingEvent {
            user_id: user_id
                .trim()
                .parse()
                .map_err(|e| table.parse_error(line_no, format!("Invalid userId: {}", e)))?,
            movie_id: movie_id
                .trim()
                .parse()
                .map_err(|e| table.parse_error(line_no, format!("Invalid movieId: {}", e)))?,
            rating: rating_value
                .trim()
                .parse()
                .map_err(|e| table.parse_error(line_no, format!("Invalid rating: {}", e)))?,
            timestamp,
            rated_at,
        })
    })
}

/// Split a trailing "(YYYY)" off a title.
///
/// Example: "Heat (1995)" -> ("Heat", Some("1995"))
///          "Heat" -> ("Heat", None)
fn split_year_suffix(title: &str) -> (&str, Option<&str>) {
    let trimmed = title.trim_end();
    if let Some(inner) = trimmed.strip_suffix(')') {
        if let Some(open) = inner.rfind('(') {
            let digits = &inner[open + 1..];
            if digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()) {
                return (inner[..open].trim(), Some(digits));
            }
        }
    }
    (title.trim(), None)
}

/// Move a trailing article to the front of a title.
///
/// Example: "Godfather, The (1972)" -> "The Godfather (1972)"
///          "Matrix, The" -> "The Matrix"
///          "Toy Story (1995)" -> "Toy Story (1995)"
pub fn format_title(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }

    let (base, year) = split_year_suffix(title);

    let mut formatted = TRAILING_ARTICLES
        .iter()
        .find_map(|(suffix, article)| {
            base.strip_suffix(suffix)
                .map(|stem| format!("{} {}", article, stem.trim()))
        })
        .unwrap_or_else(|| base.to_string());

    if let Some(year) = year {
        formatted.push_str(&format!(" ({})", year));
    }
    formatted
}

/// Parse a pipe-separated genre field into labels.
///
/// Example: "Action|Adventure|Sci-Fi" -> Some(["Action", "Adventure", "Sci-Fi"])
///          "" -> None
pub fn parse_genres(s: &str) -> Option<Vec<String>> {
    if s.trim().is_empty() {
        return None;
    }
    Some(s.split('|').map(|g| g.trim().to_string()).collect())
}

/// Format Unix seconds as "%Y-%m-%d %H:%M:%S" (UTC).
///
/// `None` when chrono cannot represent the instant.
pub fn format_timestamp(timestamp: i64) -> Option<String> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
}
