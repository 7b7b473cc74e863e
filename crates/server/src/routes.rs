//! JSON HTTP routes.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use data_loader::MovieId;
use pipeline::{Period, RatingsOverTime, DEFAULT_LISTING_LIMIT};

use crate::catalog_service::{
    CatalogService, CatalogSummary, GenreProfileView, MovieDetail, MovieList, MovieRatings,
    MovieRecommendations, SearchResults,
};
use crate::error::ApiError;

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Deserialize)]
struct LimitParams {
    limit: Option<String>,
}

impl LimitParams {
    /// Requested page size; missing or non-numeric values use the default
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_LISTING_LIMIT)
    }
}

#[derive(Deserialize)]
struct PeriodParams {
    period: Option<String>,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn home(State(service): State<CatalogService>) -> Json<CatalogSummary> {
    Json(service.summary())
}

async fn movies_page(
    State(service): State<CatalogService>,
    Query(params): Query<LimitParams>,
) -> ApiResult<MovieList> {
    let limit = params.limit();
    Ok(Json(service.top_movies(limit).await?))
}

async fn movie_page(
    State(service): State<CatalogService>,
    Path(id): Path<MovieId>,
) -> ApiResult<MovieDetail> {
    Ok(Json(service.movie_detail(id).await?))
}

async fn recommend_page(
    State(service): State<CatalogService>,
    Path(id): Path<MovieId>,
) -> ApiResult<MovieRecommendations> {
    Ok(Json(service.recommendations(id).await?))
}

async fn ratings_over_time_page(
    State(service): State<CatalogService>,
    Path(id): Path<MovieId>,
) -> ApiResult<MovieRatings> {
    Ok(Json(service.movie_ratings(id).await?))
}

async fn api_movies(
    State(service): State<CatalogService>,
    Query(params): Query<LimitParams>,
) -> ApiResult<MovieList> {
    let limit = params.limit();
    Ok(Json(service.most_rated(limit).await?))
}

async fn api_movie(
    State(service): State<CatalogService>,
    Path(id): Path<MovieId>,
) -> ApiResult<serde_json::Value> {
    let movie = service.movie(id)?;
    Ok(Json(serde_json::json!({ "movie": movie })))
}

async fn api_ratings_over_time(
    State(service): State<CatalogService>,
    Path(id): Path<MovieId>,
    Query(params): Query<PeriodParams>,
) -> ApiResult<RatingsOverTime> {
    let period = params
        .period
        .unwrap_or_else(|| Period::Month.as_str().to_string());
    Ok(Json(service.ratings_over_time(id, &period).await?))
}

async fn api_search(
    State(service): State<CatalogService>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchResults> {
    Ok(Json(service.search(&params.q).await?))
}

async fn genre_profile(State(service): State<CatalogService>) -> ApiResult<GenreProfileView> {
    Ok(Json(service.genre_profile().await?))
}

pub fn make_app(service: CatalogService) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/movies", get(movies_page))
        .route("/movie/{id}", get(movie_page))
        .route("/recommend/{id}", get(recommend_page))
        .route("/movie/{id}/ratings-over-time", get(ratings_over_time_page))
        .route("/genre-profile", get(genre_profile))
        .route("/api/movies", get(api_movies))
        .route("/api/movie/{id}", get(api_movie))
        .route("/api/movie/{id}/ratings-over-time", get(api_ratings_over_time))
        .route("/api/search", get(api_search))
        .with_state(service)
}

pub async fn run_server(service: CatalogService, addr: SocketAddr) -> Result<()> {
    let app = make_app(service);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    Ok(axum::serve(listener, app).await?)
}
