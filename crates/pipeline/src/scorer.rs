//! Genre-overlap recommendation scoring.
//!
//! ## Algorithm
//! 1. Look up the source movie and turn its genres into a token set
//! 2. Score every catalog movie by how many genres it shares (in parallel)
//! 3. Run the scored candidates through the filter pipeline
//! 4. Stable sort by (overlap desc, avg_rating desc) and keep the top `limit`
//!
//! The detail view and the recommendation view both go through here, so the
//! same source id always yields the same list.

use crate::filter_pipeline::FilterPipeline;
use crate::types::{Recommendation, RecommendationContext, ScoredMovie};
use anyhow::Result;
use data_loader::{Catalog, MovieId, QueryError};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Movies need at least this many ratings to be recommended
pub const DEFAULT_MIN_RATING_COUNT: u32 = 10;

/// Number of recommendations returned per source movie
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 6;

/// Recommend movies sharing genres with `source_id`.
///
/// Fails with [`QueryError::ItemNotFound`] when the source movie does not
/// exist.
pub fn recommend(
    catalog: &Catalog,
    source_id: MovieId,
    min_rating_count: u32,
    limit: usize,
) -> Result<Vec<Recommendation>> {
    rank(catalog, &FilterPipeline::standard(min_rating_count), source_id, limit)
}

/// Score every movie in the catalog against the context, in catalog order.
pub fn score_candidates<'a>(
    catalog: &'a Catalog,
    context: &RecommendationContext,
) -> Vec<ScoredMovie<'a>> {
    catalog
        .movies()
        .par_iter()
        .map(|movie| ScoredMovie::new(movie, context.overlap(movie)))
        .collect()
}

fn rank(
    catalog: &Catalog,
    pipeline: &FilterPipeline,
    source_id: MovieId,
    limit: usize,
) -> Result<Vec<Recommendation>> {
    let source = catalog
        .get_movie(source_id)
        .ok_or(QueryError::ItemNotFound(source_id))?;
    let context = RecommendationContext::for_movie(source);

    let candidates = score_candidates(catalog, &context);
    let mut filtered = pipeline.apply(candidates, &context)?;

    // sort_by is stable: equal keys keep catalog order
    filtered.sort_by(|a, b| {
        b.match_score.cmp(&a.match_score).then_with(|| {
            b.movie
                .avg_rating
                .partial_cmp(&a.movie.avg_rating)
                .unwrap_or(Ordering::Equal)
        })
    });
    filtered.truncate(limit);

    debug!(
        "Selected {} recommendations for movie {}",
        filtered.len(),
        source_id
    );
    Ok(filtered.into_iter().map(Recommendation::from).collect())
}

/// Recommender bound to one catalog, with its filter pipeline built once.
#[derive(Clone)]
pub struct GenreRecommender {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    catalog: Arc<Catalog>,
    filter_pipeline: Arc<FilterPipeline>,
    limit: usize,
}

impl GenreRecommender {
    /// Create a recommender with the default threshold (10 ratings) and
    /// limit (6 movies)
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_settings(catalog, DEFAULT_MIN_RATING_COUNT, DEFAULT_RECOMMENDATION_LIMIT)
    }

    pub fn with_settings(catalog: Arc<Catalog>, min_rating_count: u32, limit: usize) -> Self {
        Self {
            catalog,
            filter_pipeline: Arc::new(FilterPipeline::standard(min_rating_count)),
            limit,
        }
    }

    /// Recommendations for one source movie
    #[instrument(skip(self))]
    pub fn recommend(&self, source_id: MovieId) -> Result<Vec<Recommendation>> {
        rank(&self.catalog, &self.filter_pipeline, source_id, self.limit)
    }
}
