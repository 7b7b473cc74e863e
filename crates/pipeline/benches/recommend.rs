//! Benchmarks for the query pipeline
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic catalog so the benchmark runs without the dataset.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Catalog, Movie, RatingEvent};
use pipeline::{popular_movies, ratings_over_time, search_titles, GenreRecommender};
use std::sync::Arc;

const GENRES: [&str; 8] = [
    "Action", "Adventure", "Comedy", "Drama", "Romance", "Sci-Fi", "Thriller", "Horror",
];

fn synthetic_catalog(movie_count: u32, ratings_per_movie: u32) -> Arc<Catalog> {
    let movies = (1..=movie_count)
        .map(|id| {
            let genres = (0..3)
                .map(|k| GENRES[((id + k * 3) % GENRES.len() as u32) as usize].to_string())
                .collect();
            Movie::new(id, format!("Movie {} ({})", id, 1990 + id % 30), Some(genres))
        })
        .collect();

    let ratings = (1..=movie_count)
        .flat_map(|movie_id| {
            (0..ratings_per_movie).map(move |user_id| RatingEvent {
                user_id,
                movie_id,
                rating: ((movie_id + user_id) % 10) as f64 / 2.0 + 0.5,
                timestamp: 900_000_000 + (movie_id as i64 * 86_400) + user_id as i64 * 3_600,
                rated_at: String::new(),
            })
        })
        .collect();

    Arc::new(Catalog::from_parts(movies, ratings))
}

fn bench_recommend(c: &mut Criterion) {
    let catalog = synthetic_catalog(10_000, 10);
    let recommender = GenreRecommender::new(catalog);

    c.bench_function("recommend", |b| {
        b.iter(|| {
            let recs = recommender.recommend(black_box(1)).unwrap();
            black_box(recs)
        })
    });
}

fn bench_ratings_over_time(c: &mut Criterion) {
    let catalog = synthetic_catalog(1_000, 300);

    c.bench_function("ratings_over_time_month", |b| {
        b.iter(|| {
            let series = ratings_over_time(&catalog, black_box(42), "month").unwrap();
            black_box(series)
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let catalog = synthetic_catalog(10_000, 1);

    c.bench_function("search_titles", |b| {
        b.iter(|| {
            let result = search_titles(&catalog, black_box("movie 12"), 20);
            black_box(result)
        })
    });
}

fn bench_popular_movies(c: &mut Criterion) {
    let catalog = synthetic_catalog(10_000, 10);

    c.bench_function("popular_movies", |b| {
        b.iter(|| {
            let movies = popular_movies(&catalog, black_box(50));
            black_box(movies)
        })
    });
}

criterion_group!(
    benches,
    bench_recommend,
    bench_ratings_over_time,
    bench_search,
    bench_popular_movies
);
criterion_main!(benches);
