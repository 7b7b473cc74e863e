//! # Catalog Service
//!
//! The context object every route and CLI command goes through. It owns the
//! loaded catalog, the recommender built over it and the search-interest
//! logger, and exposes one method per view:
//!
//! - listings (`top_movies`, `most_rated`)
//! - detail (`movie_detail`): yearly ratings and recommendations, in parallel
//! - `recommendations`, `ratings_over_time`, `search`, `genre_profile`
//!
//! CPU-bound scans run on `spawn_blocking` so async callers never stall the
//! runtime. The catalog is shared read-only, so no locks are involved.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use data_loader::{Catalog, Movie, MovieId, QueryError};
use pipeline::{
    most_rated, popular_movies, ratings_over_time, search_titles, GenreRecommender, MatchMode,
    Period, RatingsOverTime, Recommendation, MAX_SEARCH_RESULTS,
};
use search_log::{GenreProfile, SearchInterestLogger};

use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub total_movies: usize,
    pub total_ratings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieList {
    pub count: usize,
    pub movies: Vec<Movie>,
}

impl From<Vec<Movie>> for MovieList {
    fn from(movies: Vec<Movie>) -> Self {
        Self {
            count: movies.len(),
            movies,
        }
    }
}

/// Detail view: the movie, its yearly rating series and recommendations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetail {
    pub movie: Movie,
    pub ratings_data: RatingsOverTime,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecommendations {
    pub source_movie: Movie,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRatings {
    pub movie: Movie,
    pub ratings_data: RatingsOverTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub movies: Vec<Movie>,
    /// Absent for an empty query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_mode: Option<MatchMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreProfileView {
    pub profile: GenreProfile,
    pub taste_summary: String,
}

#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<Catalog>,
    recommender: GenreRecommender,
    search_logger: Arc<SearchInterestLogger>,
}

impl CatalogService {
    pub fn new(catalog: Arc<Catalog>, search_logger: SearchInterestLogger) -> Self {
        Self {
            recommender: GenreRecommender::new(catalog.clone()),
            catalog,
            search_logger: Arc::new(search_logger),
        }
    }

    /// Load the dataset and open the search log named by `config`
    pub fn load(config: &AppConfig) -> Result<Self> {
        let start_time = Instant::now();
        let dataset_dir = config.dataset_dir();

        let catalog = Catalog::load_from_files(&dataset_dir)
            .with_context(|| format!("Failed to load dataset from {:?}", dataset_dir))?;
        let search_logger = SearchInterestLogger::json_file(&config.search_log);

        info!(
            "Catalog service ready in {:.2?} (search log: {:?})",
            start_time.elapsed(),
            config.search_log
        );
        Ok(Self::new(Arc::new(catalog), search_logger))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn summary(&self) -> CatalogSummary {
        let (total_movies, total_ratings) = self.catalog.counts();
        CatalogSummary {
            total_movies,
            total_ratings,
        }
    }

    /// Look up one movie
    pub fn movie(&self, id: MovieId) -> Result<Movie, QueryError> {
        self.catalog
            .get_movie(id)
            .cloned()
            .ok_or(QueryError::ItemNotFound(id))
    }

    /// Best rated movies among those with enough ratings
    pub async fn top_movies(&self, limit: usize) -> Result<MovieList> {
        self.run_blocking("top_movies", move |service| {
            Ok(popular_movies(&service.catalog, limit).into())
        })
        .await
    }

    pub async fn most_rated(&self, limit: usize) -> Result<MovieList> {
        self.run_blocking("most_rated", move |service| {
            Ok(most_rated(&service.catalog, limit).into())
        })
        .await
    }

    /// Movie, yearly ratings and recommendations. The two scans run in
    /// parallel.
    pub async fn movie_detail(&self, id: MovieId) -> Result<MovieDetail> {
        let movie = self.movie(id)?;

        let (ratings_data, recommendations) = tokio::join!(
            self.run_blocking("ratings_over_time", move |service| {
                Ok(ratings_over_time(&service.catalog, id, Period::Year.as_str())?)
            }),
            self.run_blocking("recommend", move |service| {
                service.recommender.recommend(id)
            })
        );

        Ok(MovieDetail {
            movie,
            ratings_data: ratings_data?,
            recommendations: recommendations?,
        })
    }

    pub async fn recommendations(&self, id: MovieId) -> Result<MovieRecommendations> {
        let source_movie = self.movie(id)?;
        let recommendations = self
            .run_blocking("recommend", move |service| service.recommender.recommend(id))
            .await?;

        Ok(MovieRecommendations {
            source_movie,
            recommendations,
        })
    }

    /// Ratings over time for one movie.
    ///
    /// The period is validated before the movie is looked up, so a bad
    /// period is reported even for unknown movies.
    pub async fn ratings_over_time(&self, id: MovieId, period: &str) -> Result<RatingsOverTime> {
        let period: Period = period.parse()?;
        self.movie(id)?;

        self.run_blocking("ratings_over_time", move |service| {
            Ok(ratings_over_time(&service.catalog, id, period.as_str())?)
        })
        .await
    }

    /// Monthly ratings page: the movie and its monthly series
    pub async fn movie_ratings(&self, id: MovieId) -> Result<MovieRatings> {
        let movie = self.movie(id)?;
        let ratings_data = self.ratings_over_time(id, Period::Month.as_str()).await?;
        Ok(MovieRatings {
            movie,
            ratings_data,
        })
    }

    /// Title search. Searches that match movies with genres are recorded in
    /// the search log; logging problems never fail the search.
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let query = query.to_string();

        self.run_blocking("search", move |service| {
            let result = search_titles(&service.catalog, &query, MAX_SEARCH_RESULTS);
            if result.query.is_empty() {
                return Ok(SearchResults {
                    count: 0,
                    movies: Vec::new(),
                    match_mode: None,
                });
            }

            let genres = result.distinct_genres();
            if !genres.is_empty() {
                let outcome = service.search_logger.log_search(&result.query, &genres);
                debug!("Search matched {} genres, log outcome: {:?}", genres.len(), outcome);
            }

            Ok(SearchResults {
                count: result.movies.len(),
                movies: result.movies,
                match_mode: Some(result.match_mode),
            })
        })
        .await
    }

    pub async fn genre_profile(&self) -> Result<GenreProfileView> {
        self.run_blocking("genre_profile", |service| {
            let profile = service.search_logger.profile();
            let taste_summary = profile.taste_summary();
            Ok(GenreProfileView {
                profile,
                taste_summary,
            })
        })
        .await
    }

    /// Run `task` on the blocking thread pool with a clone of the service
    async fn run_blocking<T, F>(&self, name: &'static str, task: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(CatalogService) -> Result<T> + Send + 'static,
    {
        let service = self.clone();
        tokio::task::spawn_blocking(move || task(service))
            .await
            .with_context(|| format!("{} task panicked", name))?
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use data_loader::RatingEvent;

    /// 2019-03-01 00:00:00 UTC
    const MARCH_2019: i64 = 1_551_398_400;
    /// 2020-01-10 00:00:00 UTC
    const JANUARY_2020: i64 = 1_578_614_400;

    fn rated(
        id: MovieId,
        title: &str,
        genres: &str,
        count: u32,
        value: f64,
    ) -> (Movie, Vec<RatingEvent>) {
        let genres = if genres.is_empty() {
            None
        } else {
            Some(genres.split('|').map(|g| g.to_string()).collect())
        };
        let ratings = (0..count)
            .map(|user_id| RatingEvent {
                user_id,
                movie_id: id,
                rating: value,
                timestamp: if user_id % 2 == 0 { MARCH_2019 } else { JANUARY_2020 },
                rated_at: String::new(),
            })
            .collect();
        (Movie::new(id, title, genres), ratings)
    }

    pub(crate) fn sample_catalog() -> Catalog {
        let rows = vec![
            rated(1, "Batman (1989)", "Action|Crime|Thriller", 12, 4.0),
            rated(2, "Batman Returns (1992)", "Action|Crime", 15, 3.5),
            rated(3, "Toy Story (1995)", "Adventure|Animation|Children|Comedy|Fantasy", 20, 4.5),
            rated(4, "The Dark Knight (2008)", "Action|Crime|Drama|IMAX", 30, 4.8),
            rated(5, "Heat (1995)", "Action|Crime|Thriller", 8, 4.9),
            rated(6, "Untitled", "", 0, 0.0),
        ];
        let (movies, ratings): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
        Catalog::from_parts(movies, ratings.into_iter().flatten().collect())
    }

    pub(crate) fn sample_service() -> CatalogService {
        CatalogService::new(Arc::new(sample_catalog()), SearchInterestLogger::in_memory())
    }

    fn ids(movies: &[Movie]) -> Vec<MovieId> {
        movies.iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_summary() {
        let service = sample_service();
        assert_eq!(
            service.summary(),
            CatalogSummary {
                total_movies: 6,
                total_ratings: 85
            }
        );
    }

    #[tokio::test]
    async fn test_listings() {
        let service = sample_service();

        let top = service.top_movies(50).await.unwrap();
        assert_eq!(ids(&top.movies), vec![4, 3, 1, 2]);
        assert_eq!(top.count, 4);

        let busiest = service.most_rated(3).await.unwrap();
        assert_eq!(ids(&busiest.movies), vec![4, 3, 2]);
    }

    #[tokio::test]
    async fn test_movie_detail_matches_recommendation_view() {
        let service = sample_service();

        let detail = service.movie_detail(1).await.unwrap();
        let view = service.recommendations(1).await.unwrap();

        assert_eq!(detail.movie.title, "Batman (1989)");
        assert_eq!(detail.ratings_data.periods, vec!["2019", "2020"]);
        assert_eq!(detail.recommendations, view.recommendations);

        let rec_ids: Vec<_> = view.recommendations.iter().map(|r| r.movie.id).collect();
        // Heat shares three genres but has too few ratings
        assert_eq!(rec_ids, vec![4, 2]);
    }

    #[tokio::test]
    async fn test_unknown_movie() {
        let service = sample_service();

        for err in [
            service.movie_detail(99).await.unwrap_err(),
            service.recommendations(99).await.unwrap_err(),
            service.ratings_over_time(99, "month").await.unwrap_err(),
        ] {
            assert_eq!(
                err.downcast_ref::<QueryError>(),
                Some(&QueryError::ItemNotFound(99))
            );
        }
    }

    #[tokio::test]
    async fn test_period_checked_before_movie() {
        let service = sample_service();
        let err = service.ratings_over_time(99, "week").await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<QueryError>(),
            Some(&QueryError::InvalidPeriod("week".to_string()))
        );
    }

    #[tokio::test]
    async fn test_monthly_ratings_page() {
        let service = sample_service();
        let page = service.movie_ratings(1).await.unwrap();

        assert_eq!(page.ratings_data.periods, vec!["2019-03", "2020-01"]);
        assert_eq!(page.ratings_data.rating_counts, vec![6, 6]);
        assert_eq!(page.ratings_data.total_ratings, 12);

        let empty = service.movie_ratings(6).await.unwrap();
        assert!(empty.ratings_data.is_empty());
    }

    #[tokio::test]
    async fn test_search_logs_genres() {
        let service = sample_service();

        let results = service.search("Batman").await.unwrap();
        assert_eq!(results.count, 2);
        assert_eq!(results.match_mode, Some(MatchMode::Regex));

        let profile = service.genre_profile().await.unwrap();
        assert_eq!(profile.profile.total_searches, 1);
        assert_eq!(profile.profile.percentage("Thriller"), Some(100.0));
        assert!(profile.taste_summary.starts_with("You're a true Action enthusiast!"));
    }

    #[tokio::test]
    async fn test_search_without_genres_is_not_logged() {
        let service = sample_service();

        let untitled = service.search("untitled").await.unwrap();
        assert_eq!(untitled.count, 1);
        let nothing = service.search("no such movie").await.unwrap();
        assert_eq!(nothing.count, 0);
        let empty = service.search("   ").await.unwrap();
        assert_eq!(empty.match_mode, None);

        assert_eq!(service.genre_profile().await.unwrap().profile.total_searches, 0);
    }
}
