//! Query pipeline over a loaded catalog.
//!
//! This crate provides:
//! - Filter trait and implementations for recommendation candidates
//! - FilterPipeline for composing filters
//! - Genre-overlap recommendation scoring
//! - Ratings-over-time bucketing
//! - Title search and listings
//!
//! ## Architecture
//! Recommendations are processed in stages:
//! 1. Every movie is scored by genre overlap with the source movie
//! 2. Filters remove the source itself, unpopular movies and zero overlaps
//! 3. Survivors are ranked by (overlap, average rating) and truncated
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{GenreRecommender, ratings_over_time};
//!
//! let recommender = GenreRecommender::new(catalog.clone());
//! let recs = recommender.recommend(1)?;
//!
//! let series = ratings_over_time(&catalog, 1, "month")?;
//! ```

pub mod traits;
pub mod types;
pub mod filters;
pub mod filter_pipeline;
pub mod scorer;
pub mod timeseries;
pub mod search;
pub mod listing;

// Re-export main types
pub use traits::Filter;
pub use types::{Recommendation, RecommendationContext, ScoredMovie};
pub use filter_pipeline::FilterPipeline;
pub use scorer::{
    recommend, GenreRecommender, DEFAULT_MIN_RATING_COUNT, DEFAULT_RECOMMENDATION_LIMIT,
};
pub use timeseries::{bucket_ratings, ratings_over_time, Period, PeriodBucket, RatingsOverTime};
pub use search::{search_titles, MatchMode, TitleSearch, MAX_SEARCH_RESULTS};
pub use listing::{most_rated, popular_movies, top_rated, DEFAULT_LISTING_LIMIT};
