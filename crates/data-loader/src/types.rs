//! Core domain types for the MovieLens catalog.
//!
//! - Type aliases for domain clarity (UserId, MovieId)
//! - `Movie` and `RatingEvent` rows as they look after display normalization
//! - `MovieStats` aggregates
//! - `Catalog`, the immutable in-memory database shared by every request

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Movie
// =============================================================================

/// A catalog entry with display-formatted fields and its rating statistics.
///
/// `avg_rating` and `rating_count` are filled in by [`crate::stats::merge`];
/// a movie nobody rated carries `0.0` and `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "movieId")]
    pub id: MovieId,
    pub title: String,
    /// Ordered genre labels. `None` when the source row had no genre field.
    ///
    /// Serialized in display form: labels joined with ", ".
    #[serde(
        serialize_with = "serialize_genres",
        deserialize_with = "deserialize_genres"
    )]
    pub genres: Option<Vec<String>>,
    pub avg_rating: f64,
    pub rating_count: u32,
}

impl Movie {
    /// Create a movie with zeroed statistics
    pub fn new(id: MovieId, title: impl Into<String>, genres: Option<Vec<String>>) -> Self {
        Self {
            id,
            title: title.into(),
            genres,
            avg_rating: 0.0,
            rating_count: 0,
        }
    }

    /// Genre labels, empty when the field was missing
    pub fn genre_list(&self) -> &[String] {
        self.genres.as_deref().unwrap_or(&[])
    }

    /// Comma-joined display form, e.g. "Action, Adventure"
    pub fn genres_display(&self) -> Option<String> {
        self.genres.as_ref().map(|g| g.join(", "))
    }
}

fn serialize_genres<S: Serializer>(
    genres: &Option<Vec<String>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match genres {
        Some(list) => serializer.serialize_some(&list.join(", ")),
        None => serializer.serialize_none(),
    }
}

fn deserialize_genres<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Vec<String>>, D::Error> {
    let display: Option<String> = Option::deserialize(deserializer)?;
    Ok(display.map(|s| {
        s.split(',')
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect()
    }))
}

// =============================================================================
// Rating Type
// =============================================================================

/// One user's rating of one movie at one point in time.
///
/// The raw Unix timestamp is kept for time bucketing; `rated_at` is the
/// display copy produced at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEvent {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub rating: f64,
    /// Unix seconds
    pub timestamp: i64,
    /// "%Y-%m-%d %H:%M:%S" in UTC
    pub rated_at: String,
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Precomputed statistics for a movie
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieStats {
    pub avg_rating: f64,
    pub rating_count: u32,
}

// =============================================================================
// Catalog - The Core In-Memory Database
// =============================================================================

/// Movies merged with their statistics plus the raw rating events.
///
/// Built once at startup and never mutated afterwards, so it can be shared
/// between concurrent requests behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Movies in source-file order
    pub(crate) movies: Vec<Movie>,
    /// Position of each movie inside `movies`
    pub(crate) movie_positions: HashMap<MovieId, usize>,
    /// Rating events in source-file order
    pub(crate) ratings: Vec<RatingEvent>,
    /// Positions inside `ratings` for every movie id that has ratings
    pub(crate) movie_ratings: HashMap<MovieId, Vec<usize>>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from parsed rows: aggregates the ratings, merges the
    /// statistics onto the movies and indexes both tables.
    pub fn from_parts(movies: Vec<Movie>, ratings: Vec<RatingEvent>) -> Self {
        let stats = crate::stats::aggregate(&ratings);
        let movies = crate::stats::merge(movies, &stats);

        let mut movie_positions = HashMap::with_capacity(movies.len());
        for (pos, movie) in movies.iter().enumerate() {
            movie_positions.entry(movie.id).or_insert(pos);
        }

        let mut movie_ratings: HashMap<MovieId, Vec<usize>> = HashMap::new();
        for (pos, rating) in ratings.iter().enumerate() {
            movie_ratings.entry(rating.movie_id).or_default().push(pos);
        }

        Self {
            movies,
            movie_positions,
            ratings,
            movie_ratings,
        }
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movie_positions.get(&id).map(|&pos| &self.movies[pos])
    }

    /// All movies in source order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// All rating events in source order
    pub fn ratings(&self) -> &[RatingEvent] {
        &self.ratings
    }

    /// Rating events for one movie, in source order. Empty for unknown ids.
    pub fn get_movie_ratings(&self, movie_id: MovieId) -> impl Iterator<Item = &RatingEvent> + '_ {
        self.movie_ratings
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&pos| &self.ratings[pos])
    }

    /// Get counts for debugging/validation: (movies, ratings)
    pub fn counts(&self) -> (usize, usize) {
        (self.movies.len(), self.ratings.len())
    }
}
