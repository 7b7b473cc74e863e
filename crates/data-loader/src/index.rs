//! Catalog building.
//!
//! Loads both CSV sources, runs the aggregator and indexes the result into a
//! `Catalog`. Parsing of the two files runs in parallel with `rayon::join`.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// File name of the movie table inside a dataset folder
pub const MOVIES_FILE: &str = "movies.csv";

/// File name of the rating table inside a dataset folder
pub const RATINGS_FILE: &str = "ratings.csv";

/// Parse the movie and rating tables of a dataset folder.
///
/// Returns the display-normalized movies (statistics still zero) and the
/// rating events with both raw and formatted timestamps.
pub fn load_dataset(data_dir: &Path) -> Result<(Vec<Movie>, Vec<RatingEvent>)> {
    let movies_path = data_dir.join(MOVIES_FILE);
    let ratings_path = data_dir.join(RATINGS_FILE);

    info!("Loading movies from {}", movies_path.display());
    info!("Loading ratings from {}", ratings_path.display());

    let (movies, ratings) = rayon::join(
        || parser::parse_movies(&movies_path),
        || parser::parse_ratings(&ratings_path),
    );

    Ok((movies?, ratings?))
}

impl Catalog {
    /// Load a MovieLens-style dataset folder into an immutable catalog
    ///
    /// This is the main entry point for loading data.
    ///
    /// Steps:
    /// 1. Parse movies.csv and ratings.csv in parallel
    /// 2. Aggregate ratings per movie
    /// 3. Merge the statistics onto the movies (zero-fill)
    /// 4. Build lookup indices
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let start = Instant::now();
        let (movies, ratings) = load_dataset(data_dir)?;

        let catalog = Catalog::from_parts(movies, ratings);

        let orphaned = catalog
            .ratings
            .iter()
            .filter(|r| !catalog.movie_positions.contains_key(&r.movie_id))
            .count();
        if orphaned > 0 {
            debug!("{} ratings reference movies missing from the movie table", orphaned);
        }

        let (movies, ratings) = catalog.counts();
        info!(
            "Data loaded successfully: {} movies, {} ratings in {:.2?}",
            movies,
            ratings,
            start.elapsed()
        );
        Ok(catalog)
    }
}
