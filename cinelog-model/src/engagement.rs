use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::media::MediaId;

/// Inclusive rating bounds. The catalog uses a single canonical 1-10 scale.
pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 10;

/// Maximum (and default) page size for comment listings.
pub const COMMENT_PAGE_MAX: u32 = 50;

/// A stored rating, one per (user, media), latest write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: Uuid,
    pub media_id: MediaId,
    pub score: i32,
    pub review: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload for a rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingUpsert {
    pub score: i32,
    #[serde(default)]
    pub review: Option<String>,
}

impl RatingUpsert {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.score < RATING_MIN || self.score > RATING_MAX {
            return Err(ValidationError::RatingOutOfRange(self.score));
        }
        Ok(())
    }
}

/// A stored comment. Append-only; listed newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user_id: Uuid,
    pub media_id: MediaId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub body: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.body.trim().is_empty() {
            return Err(ValidationError::EmptyComment);
        }
        Ok(())
    }
}

/// Keyset pagination cursor for comment listings: everything strictly older
/// than `before_id`, newest first, at most `limit` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub before_id: Option<i64>,
    #[serde(default = "CommentPage::default_limit")]
    pub limit: u32,
}

impl CommentPage {
    fn default_limit() -> u32 {
        COMMENT_PAGE_MAX
    }

    /// Clamp the limit into 1..=COMMENT_PAGE_MAX.
    pub fn normalized(self) -> Self {
        Self {
            before_id: self.before_id,
            limit: self.limit.clamp(1, COMMENT_PAGE_MAX),
        }
    }
}

impl Default for CommentPage {
    fn default() -> Self {
        Self {
            before_id: None,
            limit: COMMENT_PAGE_MAX,
        }
    }
}
