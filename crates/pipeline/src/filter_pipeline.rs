//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::filters::{ExcludeSourceFilter, GenreOverlapFilter, MinimumRatingCountFilter};
use crate::traits::Filter;
use crate::types::{RecommendationContext, ScoredMovie};
use anyhow::Result;
use tracing;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(ExcludeSourceFilter)
///     .add_filter(MinimumRatingCountFilter::new(10))
///     .add_filter(GenreOverlapFilter);
///
/// let filtered = pipeline.apply(candidates, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The filters every genre recommendation goes through: drop the source
    /// movie, drop movies with fewer than `min_rating_count` ratings, drop
    /// movies sharing no genre with the source.
    pub fn standard(min_rating_count: u32) -> Self {
        Self::new()
            .add_filter(ExcludeSourceFilter)
            .add_filter(MinimumRatingCountFilter::new(min_rating_count))
            .add_filter(GenreOverlapFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// # Returns
    /// * `Ok(Vec<ScoredMovie>)` - The candidates left after all filters
    /// * `Err` - If any filter fails
    pub fn apply<'a>(
        &self,
        candidates: Vec<ScoredMovie<'a>>,
        context: &RecommendationContext,
    ) -> Result<Vec<ScoredMovie<'a>>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, context)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Movie;
    use std::collections::HashSet;

    fn context(source_id: u32) -> RecommendationContext {
        RecommendationContext {
            source_id,
            source_genres: HashSet::from(["drama".to_string()]),
        }
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let movies = vec![Movie::new(1, "A", None), Movie::new(2, "B", None)];

        let candidates = movies.iter().map(|m| ScoredMovie::new(m, 0)).collect();

        let filtered = pipeline.apply(candidates, &context(1)).unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_single_filter() {
        let pipeline = FilterPipeline::new().add_filter(ExcludeSourceFilter);
        let movies = vec![Movie::new(1, "A", None), Movie::new(2, "B", None)];

        let candidates = movies.iter().map(|m| ScoredMovie::new(m, 1)).collect();

        let filtered = pipeline.apply(candidates, &context(1)).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].movie.id, 2);
    }

    #[test]
    fn test_standard_pipeline() {
        let mut popular = Movie::new(2, "Popular", None);
        popular.rating_count = 50;
        let mut unpopular = Movie::new(3, "Unpopular", None);
        unpopular.rating_count = 3;
        let mut unrelated = Movie::new(4, "Unrelated", None);
        unrelated.rating_count = 50;
        let mut source = Movie::new(1, "Source", None);
        source.rating_count = 50;

        let candidates = vec![
            ScoredMovie::new(&source, 1),
            ScoredMovie::new(&popular, 1),
            ScoredMovie::new(&unpopular, 1),
            ScoredMovie::new(&unrelated, 0),
        ];

        let filtered = FilterPipeline::standard(10).apply(candidates, &context(1)).unwrap();
        let ids: Vec<_> = filtered.iter().map(|c| c.movie.id).collect();
        assert_eq!(ids, vec![2]);
    }
}
