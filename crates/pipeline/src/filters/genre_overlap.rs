//! Filter to remove movies sharing no genre with the source movie.

use crate::traits::Filter;
use crate::types::{RecommendationContext, ScoredMovie};
use anyhow::Result;

/// Keeps only candidates with a positive overlap score.
///
/// Movies with a missing or empty genre field always score 0, so they never
/// pass this filter.
pub struct GenreOverlapFilter;

impl Filter for GenreOverlapFilter {
    fn name(&self) -> &str {
        "GenreOverlapFilter"
    }

    fn apply<'a>(
        &self,
        candidates: Vec<ScoredMovie<'a>>,
        _context: &RecommendationContext,
    ) -> Result<Vec<ScoredMovie<'a>>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| candidate.match_score > 0)
            .collect())
    }
}
