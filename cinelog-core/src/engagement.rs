//! Watchlist, favorite, rating and comment operations.
//!
//! Structurally a thin validation layer in front of the engagement store;
//! none of these touch watch progress, and watch progress never touches
//! them.

use std::sync::Arc;

use uuid::Uuid;

use crate::database::ports::engagement::EngagementRepository;
use crate::error::Result;
use cinelog_model::{
    Comment, CommentPage, Media, MediaId, NewComment, Rating, RatingUpsert,
};

#[derive(Clone)]
pub struct EngagementService {
    repo: Arc<dyn EngagementRepository>,
}

impl std::fmt::Debug for EngagementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngagementService").finish_non_exhaustive()
    }
}

impl EngagementService {
    pub fn new(repo: Arc<dyn EngagementRepository>) -> Self {
        Self { repo }
    }

    pub async fn toggle_watchlist(&self, user_id: Uuid, media_id: MediaId) -> Result<bool> {
        self.repo.toggle_watchlist(user_id, media_id).await
    }

    pub async fn toggle_favorite(&self, user_id: Uuid, media_id: MediaId) -> Result<bool> {
        self.repo.toggle_favorite(user_id, media_id).await
    }

    pub async fn list_watchlist(&self, user_id: Uuid) -> Result<Vec<Media>> {
        self.repo.list_watchlist(user_id).await
    }

    pub async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<Media>> {
        self.repo.list_favorites(user_id).await
    }

    /// Upsert the caller's rating. Scores outside 1..=10 are rejected before
    /// the store is touched.
    pub async fn upsert_rating(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        rating: &RatingUpsert,
    ) -> Result<()> {
        rating.validate()?;
        self.repo
            .upsert_rating(user_id, media_id, rating.score, rating.review.as_deref())
            .await
    }

    pub async fn get_rating(&self, user_id: Uuid, media_id: MediaId) -> Result<Option<Rating>> {
        self.repo.get_rating(user_id, media_id).await
    }

    /// Append a comment. Empty or whitespace-only text is rejected; the
    /// stored body is trimmed.
    pub async fn add_comment(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        comment: &NewComment,
    ) -> Result<Comment> {
        comment.validate()?;
        self.repo
            .add_comment(user_id, media_id, comment.body.trim())
            .await
    }

    /// Newest-first comment page; the limit is clamped to the configured
    /// maximum before it reaches the store.
    pub async fn list_comments(
        &self,
        media_id: MediaId,
        page: CommentPage,
    ) -> Result<Vec<Comment>> {
        self.repo.list_comments(media_id, page.normalized()).await
    }
}
