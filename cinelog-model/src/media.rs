use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Provider-assigned catalog identifier (TMDB id).
pub type MediaId = i64;

/// Simple enum for catalog media types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    /// Standalone movie, tracked as a single synthetic episode
    Movie,
    /// Multi-season show with per-episode tracking
    Show,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "MOVIE",
            MediaType::Show => "SHOW",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "MOVIE" => Ok(MediaType::Movie),
            "SHOW" => Ok(MediaType::Show),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// A catalog row as stored locally.
///
/// Rows are created and refreshed by catalog sync or search-fallback upserts;
/// the watch-tracking core never deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    /// Provider-assigned identifier
    pub id: MediaId,
    pub media_type: MediaType,
    pub title: String,
    pub description: String,
    pub release_date: Option<NaiveDate>,
    pub poster_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload for a catalog row, keyed by the provider id.
///
/// Concurrent upserts of the same id merge instead of duplicating or failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaUpsert {
    pub id: MediaId,
    pub media_type: MediaType,
    pub title: String,
    pub description: String,
    pub release_date: Option<NaiveDate>,
    pub poster_url: Option<String>,
}

/// Episode count for one season of a show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCount {
    pub season_number: u16,
    pub episode_count: u16,
}

/// Season/episode layout of a series, supplied by the catalog collaborator.
///
/// The progress reconciler treats this as read-only input; it never fetches
/// metadata itself. A movie is modeled as one season with one episode so the
/// same percentage math applies everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesLayout {
    pub media_id: MediaId,
    pub media_type: MediaType,
    pub seasons: Vec<SeasonCount>,
    /// Total episode count across all seasons. Zero when metadata has not
    /// arrived yet; percentage views degrade to 0 in that case.
    pub total_episodes: u32,
}

impl SeriesLayout {
    /// Build a layout, falling back to the per-season sum when the provider
    /// did not report an overall episode total.
    pub fn new(
        media_id: MediaId,
        media_type: MediaType,
        seasons: Vec<SeasonCount>,
        total_episodes: Option<u32>,
    ) -> Self {
        let summed: u32 =
            seasons.iter().map(|s| u32::from(s.episode_count)).sum();
        Self {
            media_id,
            media_type,
            seasons,
            total_episodes: total_episodes.filter(|t| *t > 0).unwrap_or(summed),
        }
    }

    /// The synthetic single-episode layout for a movie.
    pub fn movie(media_id: MediaId) -> Self {
        Self {
            media_id,
            media_type: MediaType::Movie,
            seasons: vec![SeasonCount {
                season_number: 1,
                episode_count: 1,
            }],
            total_episodes: 1,
        }
    }

    /// All episode keys in season/episode order. Episode numbers start at 1.
    pub fn episode_keys(&self) -> Vec<crate::watch::EpisodeKey> {
        let mut keys = Vec::with_capacity(self.total_episodes as usize);
        for season in &self.seasons {
            for episode in 1..=season.episode_count {
                keys.push(crate::watch::EpisodeKey {
                    season_number: season.season_number,
                    episode_number: episode,
                });
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_round_trips_through_str() {
        assert_eq!("MOVIE".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("SHOW".parse::<MediaType>().unwrap(), MediaType::Show);
        assert!("SERIES".parse::<MediaType>().is_err());
        assert_eq!(MediaType::Show.as_str(), "SHOW");
    }

    #[test]
    fn layout_total_falls_back_to_season_sum() {
        let layout = SeriesLayout::new(
            42,
            MediaType::Show,
            vec![
                SeasonCount { season_number: 1, episode_count: 10 },
                SeasonCount { season_number: 2, episode_count: 8 },
            ],
            None,
        );
        assert_eq!(layout.total_episodes, 18);

        let reported = SeriesLayout::new(42, MediaType::Show, vec![], Some(20));
        assert_eq!(reported.total_episodes, 20);
    }

    #[test]
    fn movie_layout_is_one_synthetic_episode() {
        let layout = SeriesLayout::movie(7);
        assert_eq!(layout.total_episodes, 1);
        let keys = layout.episode_keys();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].season_number, 1);
        assert_eq!(keys[0].episode_number, 1);
    }

    #[test]
    fn episode_keys_enumerate_every_season() {
        let layout = SeriesLayout::new(
            1,
            MediaType::Show,
            vec![
                SeasonCount { season_number: 1, episode_count: 2 },
                SeasonCount { season_number: 2, episode_count: 3 },
            ],
            None,
        );
        assert_eq!(layout.episode_keys().len(), 5);
    }
}
