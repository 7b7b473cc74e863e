//! Filter to ensure a minimum popularity threshold.
//!
//! Removes movies with too few ratings, so a single enthusiastic rating
//! can't push an obscure title to the top of a list.

use crate::traits::Filter;
use crate::types::{RecommendationContext, ScoredMovie};
use anyhow::Result;

/// Removes candidates rated fewer than `min_count` times.
pub struct MinimumRatingCountFilter {
    min_count: u32,
}

impl MinimumRatingCountFilter {
    /// Create a new MinimumRatingCountFilter.
    ///
    /// # Arguments
    /// * `min_count` - Minimum number of ratings (typically 10)
    pub fn new(min_count: u32) -> Self {
        Self { min_count }
    }
}

impl Filter for MinimumRatingCountFilter {
    fn name(&self) -> &str {
        "MinimumRatingCountFilter"
    }

    fn apply<'a>(
        &self,
        candidates: Vec<ScoredMovie<'a>>,
        _context: &RecommendationContext,
    ) -> Result<Vec<ScoredMovie<'a>>> {
        let filtered: Vec<ScoredMovie<'a>> = candidates
            .into_iter()
            .filter(|candidate| candidate.movie.rating_count >= self.min_count)
            .collect();

        Ok(filtered)
    }
}
