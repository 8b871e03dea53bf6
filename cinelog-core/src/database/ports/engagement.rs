use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use cinelog_model::{Comment, CommentPage, Media, MediaId, Rating};

/// Per-user engagement facts: watchlist and favorite markers, ratings and
/// comments. Structurally parallel to the watch-state store, but with no
/// cascading logic and no dependency on watch progress.
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Atomic presence flip; returns the new state.
    async fn toggle_watchlist(&self, user_id: Uuid, media_id: MediaId) -> Result<bool>;

    /// Atomic presence flip; returns the new state.
    async fn toggle_favorite(&self, user_id: Uuid, media_id: MediaId) -> Result<bool>;

    async fn list_watchlist(&self, user_id: Uuid) -> Result<Vec<Media>>;

    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<Media>>;

    /// One rating per (user, media); the latest write overwrites.
    async fn upsert_rating(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        score: i32,
        review: Option<&str>,
    ) -> Result<()>;

    async fn get_rating(&self, user_id: Uuid, media_id: MediaId) -> Result<Option<Rating>>;

    /// Append a comment and return the stored record with its assigned id
    /// and timestamp.
    async fn add_comment(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        body: &str,
    ) -> Result<Comment>;

    /// Newest-first page of comments for a media item.
    async fn list_comments(&self, media_id: MediaId, page: CommentPage)
    -> Result<Vec<Comment>>;
}
