//! Title search.
//!
//! Matching is two-tier: the trimmed query is first compiled, as typed, into
//! a case-insensitive regular expression; when that fails (e.g. "(500" or
//! "star[") the lower-cased query is matched as a literal substring instead.
//! The tier used is reported back in `TitleSearch::match_mode`.
//!
//! The pattern keeps its case: lower-casing turns `\D` into `\d`.

use data_loader::{Catalog, Movie};
use regex::RegexBuilder;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Maximum number of movies returned by a search
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Upper bound on the compiled size of a user-supplied pattern
const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// How the query was matched against titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Regex,
    /// The query was not a valid pattern and fell back to substring matching
    Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleSearch {
    pub query: String,
    pub movies: Vec<Movie>,
    pub match_mode: MatchMode,
}

impl TitleSearch {
    /// Distinct genre labels of the matched movies, in first-seen order
    pub fn distinct_genres(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.movies
            .iter()
            .flat_map(|m| m.genre_list())
            .map(|g| g.trim())
            .filter(|g| !g.is_empty() && seen.insert(g.to_string()))
            .map(|g| g.to_string())
            .collect()
    }
}

/// Find movies whose title matches `query`, in catalog order, at most `limit`.
///
/// An empty (or all-whitespace) query matches nothing.
pub fn search_titles(catalog: &Catalog, query: &str, limit: usize) -> TitleSearch {
    let pattern = query.trim();
    let query = pattern.to_lowercase();
    if query.is_empty() {
        return TitleSearch {
            query,
            movies: Vec::new(),
            match_mode: MatchMode::Regex,
        };
    }

    let compiled = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(REGEX_SIZE_LIMIT)
        .build();

    let (movies, match_mode): (Vec<Movie>, MatchMode) = match compiled {
        Ok(re) => (
            catalog
                .movies()
                .iter()
                .filter(|m| re.is_match(&m.title))
                .take(limit)
                .cloned()
                .collect(),
            MatchMode::Regex,
        ),
        Err(err) => {
            warn!(
                "Search query is not a valid pattern, falling back to literal match: {}",
                err
            );
            (
                catalog
                    .movies()
                    .iter()
                    .filter(|m| m.title.to_lowercase().contains(&query))
                    .take(limit)
                    .cloned()
                    .collect(),
                MatchMode::Literal,
            )
        }
    };

    debug!("Search '{}' matched {} movies ({:?})", query, movies.len(), match_mode);
    TitleSearch {
        query,
        movies,
        match_mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_catalog() -> Catalog {
        let genres = |s: &str| Some(s.split('|').map(|g| g.to_string()).collect());
        Catalog::from_parts(
            vec![
                Movie::new(1, "Batman (1989)", genres("Action|Crime|Thriller")),
                Movie::new(2, "Batman Returns (1992)", genres("Action|Crime")),
                Movie::new(3, "(500) Days of Summer (2009)", genres("Comedy|Drama|Romance")),
                Movie::new(4, "Toy Story (1995)", genres("Animation|Comedy")),
                Movie::new(5, "Untitled", None),
            ],
            vec![],
        )
    }

    #[test]
    fn test_case_insensitive_substring() {
        let catalog = create_test_catalog();
        let result = search_titles(&catalog, "  BATMAN ", MAX_SEARCH_RESULTS);

        let ids: Vec<_> = result.movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(result.match_mode, MatchMode::Regex);
        assert_eq!(result.query, "batman");
    }

    #[test]
    fn test_regex_query() {
        let catalog = create_test_catalog();
        let result = search_titles(&catalog, "^toy", MAX_SEARCH_RESULTS);
        assert_eq!(result.movies.len(), 1);
        assert_eq!(result.movies[0].id, 4);
    }

    #[test]
    fn test_uppercase_escape_classes_keep_meaning() {
        let catalog = create_test_catalog();

        // `\D` is a non-digit; lower-casing it would ask for a digit
        let result = search_titles(&catalog, r"^\D{6} \(", MAX_SEARCH_RESULTS);
        let ids: Vec<_> = result.movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(result.match_mode, MatchMode::Regex);
        assert_eq!(result.query, r"^\d{6} \(");

        let result = search_titles(&catalog, r"Toy\SStory", MAX_SEARCH_RESULTS);
        assert!(result.movies.is_empty());
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_literal() {
        let catalog = create_test_catalog();
        let result = search_titles(&catalog, "(500", MAX_SEARCH_RESULTS);

        assert_eq!(result.match_mode, MatchMode::Literal);
        assert_eq!(result.movies.len(), 1);
        assert_eq!(result.movies[0].id, 3);
    }

    #[test]
    fn test_limit_and_empty_query() {
        let catalog = create_test_catalog();
        assert_eq!(search_titles(&catalog, "a", 2).movies.len(), 2);
        assert!(search_titles(&catalog, "   ", MAX_SEARCH_RESULTS).movies.is_empty());
    }

    #[test]
    fn test_distinct_genres_first_seen_order() {
        let catalog = create_test_catalog();
        let result = search_titles(&catalog, "batman", MAX_SEARCH_RESULTS);
        assert_eq!(result.distinct_genres(), vec!["Action", "Crime", "Thriller"]);

        let untitled = search_titles(&catalog, "untitled", MAX_SEARCH_RESULTS);
        assert!(untitled.distinct_genres().is_empty());
    }
}
