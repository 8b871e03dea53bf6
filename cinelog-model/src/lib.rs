//! Core data model definitions shared across Cinelog crates.
#![allow(missing_docs)]

pub mod engagement;
pub mod error;
pub mod media;
pub mod user;
pub mod watch;

// Intentionally curated re-exports for downstream consumers.
pub use engagement::{
    Comment, CommentPage, NewComment, Rating, RatingUpsert, COMMENT_PAGE_MAX,
    RATING_MAX, RATING_MIN,
};
pub use error::ValidationError;
pub use media::{Media, MediaId, MediaType, MediaUpsert, SeasonCount, SeriesLayout};
pub use user::{
    AuthToken, ChangePasswordRequest, Claims, LoginRequest, RegisterRequest,
    UpdateProfileRequest, User, UserRole,
};
pub use watch::{EpisodeKey, EpisodeToggle, ProgressView, SeriesToggle};
