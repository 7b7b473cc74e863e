//! Ratings over time.
//!
//! Groups one movie's rating events into calendar buckets (month or year) and
//! reports, per bucket, the mean rating and the number of events. Bucket keys
//! are zero-padded "YYYY-MM" / "YYYY" strings held in a `BTreeMap`, so
//! iteration order is chronological.

use chrono::DateTime;
use data_loader::{Catalog, MovieId, QueryError, RatingEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Bucket granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Month,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    fn label_format(&self) -> &'static str {
        match self {
            Period::Month => "%Y-%m",
            Period::Year => "%Y",
        }
    }

    /// Calendar label for a Unix timestamp, `None` when out of range
    pub fn label(&self, timestamp: i64) -> Option<String> {
        DateTime::from_timestamp(timestamp, 0).map(|dt| dt.format(self.label_format()).to_string())
    }
}

impl FromStr for Period {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(QueryError::InvalidPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One calendar bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBucket {
    pub label: String,
    pub avg_rating: f64,
    pub count: u32,
}

/// Positionally aligned series: index `i` of every vector describes bucket `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingsOverTime {
    pub periods: Vec<String>,
    pub avg_ratings: Vec<f64>,
    pub rating_counts: Vec<u32>,
    pub total_ratings: u32,
}

impl RatingsOverTime {
    /// Result for a movie without ratings
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Iterate the series bucket by bucket
    pub fn buckets(&self) -> impl Iterator<Item = PeriodBucket> + '_ {
        self.periods
            .iter()
            .zip(&self.avg_ratings)
            .zip(&self.rating_counts)
            .map(|((label, &avg_rating), &count)| PeriodBucket {
                label: label.clone(),
                avg_rating,
                count,
            })
    }
}

/// Round half to even at two decimals
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Bucket rating events by calendar period.
///
/// The loader rejects ratings whose timestamp has no calendar date, so every
/// catalog event lands in a bucket. Hand-built events outside chrono's range
/// are skipped with a warning.
pub fn bucket_ratings<'a>(
    ratings: impl IntoIterator<Item = &'a RatingEvent>,
    period: Period,
) -> RatingsOverTime {
    let mut buckets: BTreeMap<String, (f64, u32)> = BTreeMap::new();

    for rating in ratings {
        let Some(label) = period.label(rating.timestamp) else {
            warn!(
                "Skipping rating with out-of-range timestamp {}",
                rating.timestamp
            );
            continue;
        };
        let entry = buckets.entry(label).or_insert((0.0, 0));
        entry.0 += rating.rating;
        entry.1 += 1;
    }

    let mut series = RatingsOverTime::empty();
    for (label, (sum, count)) in buckets {
        series.periods.push(label);
        series.avg_ratings.push(round2(sum / count as f64));
        series.rating_counts.push(count);
        series.total_ratings += count;
    }
    series
}

/// Ratings over time for one movie.
///
/// `period` must be "month" or "year", otherwise [`QueryError::InvalidPeriod`].
/// A movie without ratings (or an unknown id) yields an empty result.
pub fn ratings_over_time(
    catalog: &Catalog,
    movie_id: MovieId,
    period: &str,
) -> Result<RatingsOverTime, QueryError> {
    let period: Period = period.parse()?;
    let series = bucket_ratings(catalog.get_movie_ratings(movie_id), period);

    if series.is_empty() {
        debug!("No ratings found for movie {}", movie_id);
    } else {
        debug!(
            "Ratings over time for movie {}: {} periods",
            movie_id,
            series.periods.len()
        );
    }
    Ok(series)
}
