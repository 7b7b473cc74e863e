use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{Movie, MovieId};
use pipeline::{Recommendation, RatingsOverTime, DEFAULT_LISTING_LIMIT};
use rand::Rng;
use server::{CatalogService, ConfigArgs};
use std::time::{Duration, Instant};
use tracing::debug;

/// Reel Catalog - browse a MovieLens dataset from the terminal
#[derive(Parser)]
#[command(name = "reel-catalog")]
#[command(about = "Browse, search and get genre-based recommendations from a MovieLens dataset", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the best rated movies (at least 10 ratings)
    Movies {
        /// Number of movies to list
        #[arg(long, default_value_t = DEFAULT_LISTING_LIMIT)]
        limit: usize,

        /// List by number of ratings instead
        #[arg(long)]
        most_rated: bool,
    },

    /// Show one movie with its yearly ratings and recommendations
    Show {
        /// Movie ID to display
        #[arg(long)]
        movie_id: MovieId,
    },

    /// Recommend movies sharing genres with a movie
    Recommend {
        /// Source movie ID
        #[arg(long)]
        movie_id: MovieId,

        /// Show the number of shared genres for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Show how a movie's ratings evolved over time
    Ratings {
        /// Movie ID
        #[arg(long)]
        movie_id: MovieId,

        /// Bucket size: "month" or "year"
        #[arg(long, default_value = "month")]
        period: String,
    },

    /// Search movie titles (case-insensitive, regular expressions allowed)
    Search {
        /// Text or pattern to look for
        query: String,
    },

    /// Show the genre profile built from past searches
    GenreProfile,

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.resolve()?;

    // Load the catalog (this may take a moment)
    println!("Loading MovieLens dataset from {}...", config.dataset_dir().display());
    let start = Instant::now();
    let service = CatalogService::load(&config).context("Failed to load MovieLens dataset")?;
    let summary = service.summary();
    println!(
        "{} Loaded {} movies and {} ratings in {:?}",
        "✓".green(),
        summary.total_movies,
        summary.total_ratings,
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Movies { limit, most_rated } => handle_movies(&service, limit, most_rated).await?,
        Commands::Show { movie_id } => handle_show(&service, movie_id).await?,
        Commands::Recommend { movie_id, explain } => {
            handle_recommend(&service, movie_id, explain).await?
        }
        Commands::Ratings { movie_id, period } => handle_ratings(&service, movie_id, &period).await?,
        Commands::Search { query } => handle_search(&service, &query).await?,
        Commands::GenreProfile => handle_genre_profile(&service).await?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(&service, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'movies' command
async fn handle_movies(service: &CatalogService, limit: usize, most_rated: bool) -> Result<()> {
    let list = if most_rated {
        service.most_rated(limit).await?
    } else {
        service.top_movies(limit).await?
    };

    let header = if most_rated { "Most rated movies:" } else { "Top rated movies:" };
    println!("{}", header.bold().blue());
    for (rank, movie) in list.movies.iter().enumerate() {
        println!("{}. {}", (rank + 1).to_string().green(), format_movie(movie));
    }
    Ok(())
}

/// Handle the 'show' command
async fn handle_show(service: &CatalogService, movie_id: MovieId) -> Result<()> {
    let detail = service.movie_detail(movie_id).await?;

    println!("{}", format!("Movie {}", movie_id).bold().blue());
    println!("{}{}", "• ".green(), format_movie(&detail.movie));
    println!("{}", "Ratings by year:".bold());
    print_ratings(&detail.ratings_data);
    print_recommendations(&detail.recommendations, false);
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(service: &CatalogService, movie_id: MovieId, explain: bool) -> Result<()> {
    let view = service.recommendations(movie_id).await?;

    println!(
        "{} {}",
        "Because you looked at".bold().blue(),
        view.source_movie.title.bold()
    );
    print_recommendations(&view.recommendations, explain);
    Ok(())
}

/// Handle the 'ratings' command
async fn handle_ratings(service: &CatalogService, movie_id: MovieId, period: &str) -> Result<()> {
    let ratings = service.ratings_over_time(movie_id, period).await?;
    let movie = service.movie(movie_id)?;

    println!(
        "{}",
        format!("Ratings of {} by {}:", movie.title, period).bold().blue()
    );
    print_ratings(&ratings);
    Ok(())
}

/// Handle the 'search' command
async fn handle_search(service: &CatalogService, query: &str) -> Result<()> {
    let results = service.search(query).await?;

    println!("{}", format!("Search results for '{}':", query).bold().blue());
    if let Some(mode) = results.match_mode {
        debug!("Search matched in {:?} mode", mode);
    }
    if results.movies.is_empty() {
        println!("  No movies found");
    }
    for movie in &results.movies {
        println!("{}: {}", movie.id.to_string().green(), format_movie(movie));
    }
    Ok(())
}

/// Handle the 'genre-profile' command
async fn handle_genre_profile(service: &CatalogService) -> Result<()> {
    let view = service.genre_profile().await?;
    let profile = &view.profile;

    println!("{}", "Genre profile:".bold().blue());
    println!("{}Searches logged: {}", "• ".cyan(), profile.total_searches);
    for genre in &profile.top_genres {
        println!(
            "  - {}: {} searches ({:.1}%)",
            genre.genre.bold(),
            genre.count,
            genre.percentage
        );
    }
    println!("{}", view.taste_summary);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(service: &CatalogService, requests: usize, concurrent: usize) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("requests and concurrent must be greater than zero");
    }
    let movies = service.catalog().movies();
    if movies.is_empty() {
        bail!("The catalog has no movies to benchmark with");
    }

    // Pick random source movies from the catalog
    let movie_ids: Vec<MovieId> = {
        let mut rng = rand::rng();
        (0..requests)
            .map(|_| movies[rng.random_range(0..movies.len())].id)
            .collect()
    };

    // Send requests in waves of `concurrent`
    let wall_clock = Instant::now();
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for wave in movie_ids.chunks(concurrent) {
        let mut handles = Vec::with_capacity(wave.len());
        for &movie_id in wave {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                let start = Instant::now();
                service.movie_detail(movie_id).await?;
                Ok::<_, anyhow::Error>(start.elapsed())
            }));
        }
        for handle in handles {
            timings.push(handle.await??);
        }
    }
    let total_time = wall_clock.elapsed();

    let latency_sum: Duration = timings.iter().sum();
    let avg_latency = latency_sum / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// One-line movie description: title, genres and rating stats
fn format_movie(movie: &Movie) -> String {
    format!(
        "{} [{}] avg {:.2} ({} ratings)",
        movie.title,
        movie.genres_display().unwrap_or_else(|| "no genres".to_string()),
        movie.avg_rating,
        movie.rating_count
    )
}

fn print_ratings(ratings: &RatingsOverTime) {
    if ratings.is_empty() {
        println!("  No ratings yet");
        return;
    }
    for bucket in ratings.buckets() {
        println!(
            "  {}  {:.2}  ({} ratings)",
            bucket.label.cyan(),
            bucket.avg_rating,
            bucket.count
        );
    }
    println!("  Total: {} ratings", ratings.total_ratings);
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[Recommendation], explain: bool) {
    println!("{}", "Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  No movies share a genre with this one");
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {}",
            (rank + 1).to_string().green(),
            format_movie(&rec.movie)
        );
        if explain {
            println!("   Shares {} genres", rec.match_score);
        }
    }
}
