//! Filter to remove the movie the recommendation is computed for.
//!
//! A movie always shares every genre with itself, so without this filter it
//! would top its own recommendation list.

use crate::traits::Filter;
use crate::types::{RecommendationContext, ScoredMovie};
use anyhow::Result;

/// Removes the source movie from the candidates.
pub struct ExcludeSourceFilter;

impl Filter for ExcludeSourceFilter {
    fn name(&self) -> &str {
        "ExcludeSourceFilter"
    }

    fn apply<'a>(
        &self,
        candidates: Vec<ScoredMovie<'a>>,
        context: &RecommendationContext,
    ) -> Result<Vec<ScoredMovie<'a>>> {
        let filtered: Vec<ScoredMovie<'a>> = candidates
            .into_iter()
            .filter(|candidate| candidate.movie.id != context.source_id)
            .collect();
        Ok(filtered)
    }
}
