//! Per-movie rating aggregation.
//!
//! `aggregate` groups the rating table by movie and computes the mean and the
//! event count; `merge` left-joins those numbers onto the movie table.

use crate::types::{Movie, MovieId, MovieStats, RatingEvent};
use rayon::prelude::*;
use std::collections::HashMap;

/// Compute average rating and rating count for every rated movie.
///
/// Movies without ratings are absent from the result; `merge` zero-fills them.
pub fn aggregate(ratings: &[RatingEvent]) -> HashMap<MovieId, MovieStats> {
    let mut grouped: HashMap<MovieId, Vec<f64>> = HashMap::new();
    for rating in ratings {
        grouped.entry(rating.movie_id).or_default().push(rating.rating);
    }

    grouped
        .into_par_iter()
        .map(|(movie_id, values)| {
            let rating_count = values.len() as u32;
            let avg_rating = if rating_count > 0 {
                values.iter().sum::<f64>() / rating_count as f64
            } else {
                0.0
            };
            (
                movie_id,
                MovieStats {
                    avg_rating,
                    rating_count,
                },
            )
        })
        .collect()
}

/// Attach statistics to every movie. Movies with no entry get `0.0` / `0`.
pub fn merge(movies: Vec<Movie>, stats: &HashMap<MovieId, MovieStats>) -> Vec<Movie> {
    movies
        .into_iter()
        .map(|mut movie| {
            let s = stats.get(&movie.id).copied().unwrap_or_default();
            movie.avg_rating = s.avg_rating;
            movie.rating_count = s.rating_count;
            movie
        })
        .collect()
}
