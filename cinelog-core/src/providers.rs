use async_trait::async_trait;

use crate::error::Result;
use cinelog_model::{MediaId, MediaUpsert, SeriesLayout};

/// Narrow boundary to the external metadata service.
///
/// The core only ever consumes these three lookups; transport, rate limiting
/// and response shapes are the adapter's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Title search used as the catalog fallback when a local search comes
    /// up empty.
    async fn search_movies(&self, query: &str) -> Result<Vec<MediaUpsert>>;

    /// Discovery listings (popular/top-rated movie and show feeds) consumed
    /// by catalog sync.
    async fn discover(&self) -> Result<Vec<MediaUpsert>>;

    /// Season/episode layout for a show, including the provider's reported
    /// overall episode total when it has one.
    async fn series_layout(&self, series_id: MediaId) -> Result<SeriesLayout>;
}
