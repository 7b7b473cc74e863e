//! # Data Loader Crate
//!
//! This crate loads a MovieLens-style dataset (movies.csv + ratings.csv) into
//! an immutable in-memory `Catalog`.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, RatingEvent, MovieStats, Catalog)
//! - **parser**: Parse the CSV files and normalize display fields
//! - **stats**: Per-movie average rating and rating count
//! - **index**: Build the catalog from a dataset folder
//! - **error**: Load errors and query errors
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_files(Path::new("assets/ml-latest-small"))?;
//!
//! let movie = catalog.get_movie(1).unwrap();
//! println!("{} has {} ratings", movie.title, movie.rating_count);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod stats;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, QueryError, Result};
pub use index::load_dataset;
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    RatingEvent,
    MovieStats,
    Catalog,
};
