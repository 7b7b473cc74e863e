//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to scored candidate sets.

use crate::types::{RecommendationContext, ScoredMovie};
use anyhow::Result;

/// Core trait for filtering scored candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows one pipeline to serve concurrent requests
/// - Filters take ownership of the Vec and return a filtered Vec
/// - Candidates borrow the catalog, so filtering never clones movies
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `context` - The source movie the recommendation is computed for
    fn apply<'a>(
        &self,
        candidates: Vec<ScoredMovie<'a>>,
        context: &RecommendationContext,
    ) -> Result<Vec<ScoredMovie<'a>>>;
}
