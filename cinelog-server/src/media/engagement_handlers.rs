use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use cinelog_core::api_types::ApiResponse;
use cinelog_model::{
    Comment, CommentPage, Media, MediaId, NewComment, RatingUpsert, User,
};
use serde::Serialize;

use crate::errors::AppResult;
use crate::infra::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct WatchlistToggleResponse {
    pub in_watchlist: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoriteToggleResponse {
    pub in_favorites: bool,
}

pub async fn toggle_watchlist(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(media_id): Path<MediaId>,
) -> AppResult<Json<ApiResponse<WatchlistToggleResponse>>> {
    let in_watchlist = state.engagement.toggle_watchlist(user.id, media_id).await?;
    Ok(Json(ApiResponse::success(WatchlistToggleResponse {
        in_watchlist,
    })))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(media_id): Path<MediaId>,
) -> AppResult<Json<ApiResponse<FavoriteToggleResponse>>> {
    let in_favorites = state.engagement.toggle_favorite(user.id, media_id).await?;
    Ok(Json(ApiResponse::success(FavoriteToggleResponse {
        in_favorites,
    })))
}

pub async fn my_watchlist(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<ApiResponse<Vec<Media>>>> {
    let media = state.engagement.list_watchlist(user.id).await?;
    Ok(Json(ApiResponse::success(media)))
}

pub async fn my_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<ApiResponse<Vec<Media>>>> {
    let media = state.engagement.list_favorites(user.id).await?;
    Ok(Json(ApiResponse::success(media)))
}

/// Upsert the caller's rating for a title; one rating per user per media,
/// the latest write wins.
pub async fn upsert_rating(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(media_id): Path<MediaId>,
    Json(request): Json<RatingUpsert>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .engagement
        .upsert_rating(user.id, media_id, &request)
        .await?;
    Ok(Json(
        ApiResponse::success(()).with_message("Rating saved".to_string()),
    ))
}

/// Append a comment and return the stored record.
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(media_id): Path<MediaId>,
    Json(request): Json<NewComment>,
) -> AppResult<Json<ApiResponse<Comment>>> {
    let comment = state
        .engagement
        .add_comment(user.id, media_id, &request)
        .await?;
    Ok(Json(ApiResponse::success(comment)))
}

/// Newest-first comment page for a title.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(media_id): Path<MediaId>,
    Query(page): Query<CommentPage>,
) -> AppResult<Json<ApiResponse<Vec<Comment>>>> {
    let comments = state.engagement.list_comments(media_id, page).await?;
    Ok(Json(ApiResponse::success(comments)))
}
