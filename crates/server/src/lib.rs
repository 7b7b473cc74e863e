//! Server crate for the movie catalog.
//!
//! This crate contains the `CatalogService` context object that every view
//! goes through, the JSON routes serving it and the shared configuration.

pub mod catalog_service;
pub mod config;
pub mod error;
pub mod routes;

pub use catalog_service::{
    CatalogService, CatalogSummary, GenreProfileView, MovieDetail, MovieList, MovieRatings,
    MovieRecommendations, SearchResults,
};
pub use config::{AppConfig, ConfigArgs, FileConfig};
pub use error::ApiError;
pub use routes::{make_app, run_server};
