//! Filter implementations for the recommendation pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod exclude_source;
pub mod genre_overlap;
pub mod minimum_rating_count;

// Re-export for convenience
pub use exclude_source::ExcludeSourceFilter;
pub use genre_overlap::GenreOverlapFilter;
pub use minimum_rating_count::MinimumRatingCountFilter;
