use data_loader::Catalog;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets/ml-latest-small"));

    println!("Loading dataset from {}...\n", data_dir.display());

    let start = Instant::now();
    let catalog = Catalog::load_from_files(&data_dir)?;
    let elapsed = start.elapsed();

    let (movies, ratings) = catalog.counts();
    let rated = catalog.movies().iter().filter(|m| m.rating_count > 0).count();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {} ({} rated)", movies, rated);
    println!("Ratings: {}", ratings);
    println!("\nPerformance: {:.0} ratings/second",
             ratings as f64 / elapsed.as_secs_f64());
    Ok(())
}
