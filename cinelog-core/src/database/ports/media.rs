use async_trait::async_trait;

use crate::error::Result;
use cinelog_model::{Media, MediaId, MediaUpsert};

/// Shared read-mostly catalog store, refreshed by sync and by on-demand
/// search-fallback lookups.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Merge-on-conflict upsert keyed by the provider-assigned id. Duplicate
    /// concurrent upserts of one id must neither fail nor create extra rows.
    async fn upsert(&self, media: &MediaUpsert) -> Result<()>;

    async fn get(&self, id: MediaId) -> Result<Option<Media>>;

    /// Catalog listing, newest release first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<Media>>;

    /// Case-insensitive substring title search, newest release first.
    async fn search_title(&self, query: &str, limit: u32) -> Result<Vec<Media>>;
}
