//! Catalog listings: best rated and most rated movies.

use crate::scorer::DEFAULT_MIN_RATING_COUNT;
use data_loader::{Catalog, Movie};
use std::cmp::Ordering;

/// Default page size for listings
pub const DEFAULT_LISTING_LIMIT: usize = 50;

/// Movies with at least `min_rating_count` ratings, best average first.
///
/// Ties keep catalog order.
pub fn top_rated(catalog: &Catalog, min_rating_count: u32, limit: usize) -> Vec<Movie> {
    let mut movies: Vec<&Movie> = catalog
        .movies()
        .iter()
        .filter(|m| m.rating_count >= min_rating_count)
        .collect();

    movies.sort_by(|a, b| {
        b.avg_rating
            .partial_cmp(&a.avg_rating)
            .unwrap_or(Ordering::Equal)
    });
    movies.into_iter().take(limit).cloned().collect()
}

/// Best rated movies with the default popularity threshold
pub fn popular_movies(catalog: &Catalog, limit: usize) -> Vec<Movie> {
    top_rated(catalog, DEFAULT_MIN_RATING_COUNT, limit)
}

/// Movies with the most ratings first.
pub fn most_rated(catalog: &Catalog, limit: usize) -> Vec<Movie> {
    let mut movies: Vec<&Movie> = catalog.movies().iter().collect();
    movies.sort_by(|a, b| b.rating_count.cmp(&a.rating_count));
    movies.into_iter().take(limit).cloned().collect()
}
