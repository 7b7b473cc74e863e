//! Request-scoped types for the recommendation pipeline.
//!
//! Match scores never touch the shared `Catalog`: they live on `ScoredMovie`
//! values that borrow the immutable movies for the duration of one request.

use data_loader::{Movie, MovieId};
use serde::Serialize;
use std::collections::HashSet;

/// Normalized genre tokens of a movie: trimmed, lower-cased, no empties.
///
/// Overlap is case-insensitive, so "Sci-Fi" and "sci-fi" count as the same
/// genre. MovieLens labels are consistently cased, so this only matters for
/// hand-edited datasets. A movie with a missing genre field yields an empty
/// set.
pub fn genre_tokens(movie: &Movie) -> HashSet<String> {
    movie
        .genre_list()
        .iter()
        .map(|g| g.trim().to_lowercase())
        .filter(|g| !g.is_empty())
        .collect()
}

/// What the filters need to know about the movie we recommend from.
#[derive(Debug, Clone)]
pub struct RecommendationContext {
    pub source_id: MovieId,
    pub source_genres: HashSet<String>,
}

impl RecommendationContext {
    pub fn for_movie(movie: &Movie) -> Self {
        Self {
            source_id: movie.id,
            source_genres: genre_tokens(movie),
        }
    }

    /// Number of genres `movie` shares with the source movie
    pub fn overlap(&self, movie: &Movie) -> u32 {
        if self.source_genres.is_empty() {
            return 0;
        }
        genre_tokens(movie)
            .intersection(&self.source_genres)
            .count() as u32
    }
}

/// A catalog movie paired with its genre-overlap score for one request.
#[derive(Debug, Clone, Copy)]
pub struct ScoredMovie<'a> {
    pub movie: &'a Movie,
    pub match_score: u32,
}

impl<'a> ScoredMovie<'a> {
    pub fn new(movie: &'a Movie, match_score: u32) -> Self {
        Self { movie, match_score }
    }
}

/// Final recommendation returned to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub movie: Movie,
    pub match_score: u32,
}

impl From<ScoredMovie<'_>> for Recommendation {
    fn from(scored: ScoredMovie<'_>) -> Self {
        Self {
            movie: scored.movie.clone(),
            match_score: scored.match_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, genres: Option<&[&str]>) -> Movie {
        Movie::new(
            id,
            format!("Movie {}", id),
            genres.map(|g| g.iter().map(|s| s.to_string()).collect()),
        )
    }

    #[test]
    fn test_overlap_is_trimmed_and_case_insensitive() {
        let source = movie(1, Some(&["Action", "Sci-Fi"]));
        let context = RecommendationContext::for_movie(&source);

        assert_eq!(context.overlap(&movie(2, Some(&[" action ", "SCI-FI", "Drama"]))), 2);
        assert_eq!(context.overlap(&movie(3, Some(&["Drama"]))), 0);
    }

    #[test]
    fn test_missing_genres_never_match() {
        let source = movie(1, Some(&["Action"]));
        let context = RecommendationContext::for_movie(&source);
        assert_eq!(context.overlap(&movie(2, None)), 0);
        assert_eq!(context.overlap(&movie(3, Some(&[""]))), 0);

        let empty_source = RecommendationContext::for_movie(&movie(4, None));
        assert_eq!(empty_source.overlap(&movie(5, Some(&["Action"]))), 0);
    }

    #[test]
    fn test_recommendation_serializes_flat() {
        let mut source = movie(7, Some(&["Action", "Drama"]));
        source.avg_rating = 4.25;
        source.rating_count = 12;
        let rec = Recommendation::from(ScoredMovie::new(&source, 2));

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["movieId"], 7);
        assert_eq!(json["genres"], "Action, Drama");
        assert_eq!(json["match_score"], 2);
        assert_eq!(json["rating_count"], 12);
    }
}
