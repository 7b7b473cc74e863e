//! Genre profile built from the search log.
//!
//! Every entry counts once per distinct genre it carries. Percentages are
//! relative to the number of entries (not the number of genre mentions), so
//! they do not sum to 100.

use crate::entry::SearchLogEntry;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Number of genres reported in `top_genres`
const TOP_GENRES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: u32,
    /// Share of searches mentioning the genre, rounded to one decimal
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenreProfile {
    pub total_searches: usize,
    /// In first-encountered order
    pub genre_counts: Vec<GenreCount>,
    /// Top genres by count, ties in first-encountered order
    pub top_genres: Vec<GenreCount>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

impl GenreProfile {
    pub fn from_entries(entries: &[SearchLogEntry]) -> Self {
        let mut counts: Vec<(String, u32)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            let mut seen = HashSet::new();
            for genre in &entry.genres {
                if !seen.insert(genre.as_str()) {
                    continue;
                }
                match positions.get(genre) {
                    Some(&pos) => counts[pos].1 += 1,
                    None => {
                        positions.insert(genre.clone(), counts.len());
                        counts.push((genre.clone(), 1));
                    }
                }
            }
        }

        let total_searches = entries.len();
        let genre_counts: Vec<GenreCount> = counts
            .into_iter()
            .map(|(genre, count)| GenreCount {
                genre,
                count,
                percentage: round1(100.0 * count as f64 / total_searches as f64),
            })
            .collect();

        // sort_by is stable
        let mut top_genres = genre_counts.clone();
        top_genres.sort_by(|a, b| b.count.cmp(&a.count));
        top_genres.truncate(TOP_GENRES);

        Self {
            total_searches,
            genre_counts,
            top_genres,
        }
    }

    pub fn percentage(&self, genre: &str) -> Option<f64> {
        self.genre_counts
            .iter()
            .find(|g| g.genre == genre)
            .map(|g| g.percentage)
    }

    /// One-paragraph description of the profile's leading genre.
    pub fn taste_summary(&self) -> String {
        if self.total_searches == 0 {
            return "Start searching for movies to discover your genre profile!".to_string();
        }
        let Some(top) = self.top_genres.first() else {
            return "Your search history shows a diverse taste in movies!".to_string();
        };

        let intensity = if top.percentage >= 40.0 {
            "You're a true"
        } else if top.percentage >= 25.0 {
            "You're a big"
        } else {
            "You're a"
        };
        let blurb = genre_blurb(&top.genre)
            .map(str::to_string)
            .unwrap_or_else(|| format!("You have a strong preference for {} films!", top.genre));

        format!(
            "{} {} enthusiast! {} Your searches show {} appears in {:.1}% of your movie interests.",
            intensity, top.genre, blurb, top.genre, top.percentage
        )
    }
}

fn genre_blurb(genre: &str) -> Option<&'static str> {
    let blurb = match genre {
        "Action" => "You love high-energy films with thrilling sequences and explosive moments!",
        "Comedy" => "You have a great sense of humor and enjoy films that make you laugh!",
        "Drama" => "You appreciate deep storytelling and emotional narratives!",
        "Horror" => "You enjoy the thrill of suspense and spine-chilling experiences!",
        "Sci-Fi" => "You're fascinated by futuristic worlds and scientific possibilities!",
        "Romance" => "You enjoy heartwarming stories of love and connection!",
        "Thriller" => "You love edge-of-your-seat suspense and gripping plots!",
        "Adventure" => "You crave exciting journeys and epic quests!",
        "Animation" => "You appreciate the artistry and creativity of animated storytelling!",
        "Crime" => "You enjoy complex mysteries and criminal investigations!",
        _ => return None,
    };
    Some(blurb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entries(genre_lists: &[&[&str]]) -> Vec<SearchLogEntry> {
        genre_lists
            .iter()
            .map(|genres| SearchLogEntry {
                term_hash: String::new(),
                timestamp: Utc::now().to_rfc3339(),
                genres: genres.iter().map(|g| g.to_string()).collect(),
            })
            .collect()
    }

    #[test]
    fn test_counts_and_percentages() {
        let profile = GenreProfile::from_entries(&entries(&[
            &["Action", "Crime"],
            &["Action"],
            &["Comedy", "Action", "Action"],
        ]));

        assert_eq!(profile.total_searches, 3);
        let counts: Vec<_> = profile
            .genre_counts
            .iter()
            .map(|g| (g.genre.as_str(), g.count, g.percentage))
            .collect();
        assert_eq!(
            counts,
            vec![("Action", 3, 100.0), ("Crime", 1, 33.3), ("Comedy", 1, 33.3)]
        );
    }

    #[test]
    fn test_percentage_rounding() {
        let profile = GenreProfile::from_entries(&entries(&[&["Drama"], &["Drama"], &[]]));
        assert_eq!(profile.percentage("Drama"), Some(66.7));
        assert_eq!(profile.percentage("Horror"), None);
    }

    #[test]
    fn test_top_genres_ties_keep_first_seen_order() {
        let profile = GenreProfile::from_entries(&entries(&[
            &["Western"],
            &["Horror", "Drama"],
            &["Drama", "Horror", "Musical"],
        ]));

        let top: Vec<_> = profile.top_genres.iter().map(|g| g.genre.as_str()).collect();
        assert_eq!(top, vec!["Horror", "Drama", "Western"]);
    }

    #[test]
    fn test_empty_profile() {
        let profile = GenreProfile::from_entries(&[]);
        assert_eq!(profile, GenreProfile::default());
        assert_eq!(
            profile.taste_summary(),
            "Start searching for movies to discover your genre profile!"
        );
    }

    #[test]
    fn test_searches_without_genres() {
        let profile = GenreProfile::from_entries(&entries(&[&[], &[]]));
        assert_eq!(profile.total_searches, 2);
        assert_eq!(
            profile.taste_summary(),
            "Your search history shows a diverse taste in movies!"
        );
    }

    #[test]
    fn test_taste_summary_intensity() {
        let true_fan = GenreProfile::from_entries(&entries(&[&["Action"], &["Action"], &["Drama"]]));
        assert_eq!(
            true_fan.taste_summary(),
            "You're a true Action enthusiast! You love high-energy films with thrilling \
             sequences and explosive moments! Your searches show Action appears in 66.7% \
             of your movie interests."
        );

        let big_fan = GenreProfile::from_entries(&entries(&[
            &["Drama"],
            &["Drama"],
            &["Drama"],
            &["Comedy"],
            &["Horror"],
            &["Action"],
            &["Crime"],
            &["Romance"],
            &["Thriller"],
            &["War"],
        ]));
        assert!(big_fan.taste_summary().starts_with("You're a big Drama enthusiast!"));
        assert!(big_fan.taste_summary().contains("in 30.0% of"));

        let casual = GenreProfile::from_entries(&entries(&[
            &["Western"],
            &["Western"],
            &["Comedy"],
            &["Horror"],
            &["Action"],
            &["Crime"],
            &["Romance"],
            &["Thriller"],
            &["War"],
            &["Drama"],
        ]));
        assert_eq!(
            casual.taste_summary(),
            "You're a Western enthusiast! You have a strong preference for Western films! \
             Your searches show Western appears in 20.0% of your movie interests."
        );
    }
}
