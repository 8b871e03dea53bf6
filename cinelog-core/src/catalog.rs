//! Catalog reads, provider-backed search fallback and discovery sync.

use std::sync::Arc;

use tracing::{info, warn};

use crate::database::ports::media::MediaRepository;
use crate::error::{CoreError, Result};
use crate::providers::MetadataProvider;
use cinelog_model::{Media, MediaId, MediaType, SeriesLayout};

/// Default number of rows returned by listings and searches.
pub const DEFAULT_CATALOG_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct CatalogService {
    media: Arc<dyn MediaRepository>,
    provider: Arc<dyn MetadataProvider>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(media: Arc<dyn MediaRepository>, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { media, provider }
    }

    pub async fn list_recent(&self) -> Result<Vec<Media>> {
        self.media.list_recent(DEFAULT_CATALOG_LIMIT).await
    }

    pub async fn get(&self, media_id: MediaId) -> Result<Media> {
        self.media
            .get(media_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("media {media_id}")))
    }

    /// Local title search, falling back to the provider when nothing is
    /// stored yet. Fallback hits are upserted so the next search is local.
    pub async fn search(&self, query: &str) -> Result<Vec<Media>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_recent().await;
        }

        let local = self
            .media
            .search_title(query, DEFAULT_CATALOG_LIMIT)
            .await?;
        if !local.is_empty() {
            return Ok(local);
        }

        let fetched = self.provider.search_movies(query).await?;
        if fetched.is_empty() {
            return Ok(Vec::new());
        }
        for item in &fetched {
            self.media.upsert(item).await?;
        }
        info!(
            "Search fallback stored {} catalog rows for \"{}\"",
            fetched.len(),
            query
        );

        self.media.search_title(query, DEFAULT_CATALOG_LIMIT).await
    }

    /// Pull the provider's discovery listings into the catalog. Upserts are
    /// keyed by provider id, so overlapping listings collapse to one row
    /// each without any in-memory deduplication.
    pub async fn sync(&self) -> Result<u32> {
        let items = self.provider.discover().await?;
        let mut stored = 0u32;
        for item in &items {
            self.media.upsert(item).await?;
            stored += 1;
        }
        info!("Synced {} media items from the metadata provider", stored);
        Ok(stored)
    }

    /// Season/episode layout for the reconciler.
    ///
    /// Movies collapse to the synthetic one-episode layout without a
    /// provider call. Unknown ids and provider outages degrade to an empty
    /// layout (zero total) instead of failing: toggles must stay accepted
    /// while metadata is missing, with percentages reported as 0.
    pub async fn series_layout(&self, media_id: MediaId) -> Result<SeriesLayout> {
        let media = self.media.get(media_id).await?;

        if let Some(media) = &media {
            if media.media_type == MediaType::Movie {
                return Ok(SeriesLayout::movie(media_id));
            }
        }

        match self.provider.series_layout(media_id).await {
            Ok(layout) => Ok(layout),
            Err(err) => {
                warn!(
                    "No season metadata for series {} yet ({}); progress degrades to 0%",
                    media_id, err
                );
                Ok(SeriesLayout::new(media_id, MediaType::Show, vec![], None))
            }
        }
    }
}
