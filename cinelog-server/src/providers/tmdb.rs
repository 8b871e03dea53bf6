//! TMDB-backed implementation of the core metadata-provider port.
//!
//! Only the three lookups the core consumes are implemented; everything
//! else TMDB offers stays outside the boundary.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use cinelog_core::error::{CoreError, Result};
use cinelog_core::providers::MetadataProvider;
use cinelog_model::{MediaId, MediaType, MediaUpsert, SeasonCount, SeriesLayout};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Discovery listings pulled by catalog sync, mirroring the dashboard rows
/// of the web client.
const DISCOVER_ENDPOINTS: &[(&str, MediaType)] = &[
    ("/movie/popular", MediaType::Movie),
    ("/movie/top_rated", MediaType::Movie),
    ("/movie/now_playing", MediaType::Movie),
    ("/movie/upcoming", MediaType::Movie),
    ("/tv/popular", MediaType::Show),
    ("/tv/top_rated", MediaType::Show),
    ("/tv/on_the_air", MediaType::Show),
    ("/tv/airing_today", MediaType::Show),
];

#[derive(Debug, Clone)]
pub struct TmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    results: Vec<ListingEntry>,
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    id: i64,
    title: Option<String>,
    name: Option<String>,
    #[serde(default)]
    overview: String,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TvDetails {
    #[serde(default)]
    seasons: Vec<TvSeason>,
    number_of_episodes: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TvSeason {
    season_number: i32,
    episode_count: Option<i32>,
}

impl TmdbProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .query(query)
            .send()
            .await
            .map_err(|e| CoreError::Provider(format!("request to {path} failed: {e}")))?
            .error_for_status()
            .map_err(|e| CoreError::Provider(format!("{path} returned an error: {e}")))?;

        response
            .json::<T>()
            .await
            .map_err(|e| CoreError::Provider(format!("invalid response from {path}: {e}")))
    }
}

fn map_entry(entry: ListingEntry, media_type: MediaType) -> Option<MediaUpsert> {
    // Movie rows carry `title`/`release_date`, show rows `name`/`first_air_date`.
    let title = entry.title.or(entry.name)?;
    let release_date = entry
        .release_date
        .or(entry.first_air_date)
        .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok());

    Some(MediaUpsert {
        id: entry.id,
        media_type,
        title,
        description: entry.overview,
        release_date,
        poster_url: entry
            .poster_path
            .map(|path| format!("{POSTER_BASE_URL}{path}")),
    })
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> Result<Vec<MediaUpsert>> {
        let listing: ListingResponse =
            self.fetch("/search/movie", &[("query", query)]).await?;

        Ok(listing
            .results
            .into_iter()
            .filter_map(|entry| map_entry(entry, MediaType::Movie))
            .collect())
    }

    async fn discover(&self) -> Result<Vec<MediaUpsert>> {
        let mut media = Vec::new();
        for (path, media_type) in DISCOVER_ENDPOINTS {
            // One unavailable listing should not sink the whole sync run.
            match self.fetch::<ListingResponse>(path, &[]).await {
                Ok(listing) => {
                    media.extend(
                        listing
                            .results
                            .into_iter()
                            .filter_map(|entry| map_entry(entry, *media_type)),
                    );
                }
                Err(err) => warn!("Skipped {} during sync: {}", path, err),
            }
        }
        Ok(media)
    }

    async fn series_layout(&self, series_id: MediaId) -> Result<SeriesLayout> {
        let details: TvDetails =
            self.fetch(&format!("/tv/{series_id}"), &[]).await?;

        // Season 0 holds specials; they are not part of completion math.
        let seasons = details
            .seasons
            .into_iter()
            .filter(|s| s.season_number >= 1)
            .filter_map(|s| {
                let episode_count = s.episode_count.unwrap_or(0);
                (episode_count > 0).then_some(SeasonCount {
                    season_number: s.season_number as u16,
                    episode_count: episode_count as u16,
                })
            })
            .collect();

        Ok(SeriesLayout::new(
            series_id,
            MediaType::Show,
            seasons,
            details.number_of_episodes,
        ))
    }
}
