use axum::{
    Json,
    extract::{Path, Query, State},
};
use cinelog_core::api_types::ApiResponse;
use cinelog_model::{Media, MediaId};
use serde::Deserialize;

use crate::errors::AppResult;
use crate::infra::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Full catalog listing, newest release first.
pub async fn list_media(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Media>>>> {
    let media = state.catalog.list_recent().await?;
    Ok(Json(ApiResponse::success(media)))
}

/// Title search. An empty local result falls back to the metadata provider
/// and stores whatever it returns, so the next search is served locally.
pub async fn search_media(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<Media>>>> {
    let media = state.catalog.search(&params.q).await?;
    Ok(Json(ApiResponse::success(media)))
}

/// Pull the provider's discovery listings into the catalog.
pub async fn sync_media(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<u32>>> {
    let stored = state.catalog.sync().await?;
    Ok(Json(
        ApiResponse::success(stored).with_message(format!("Synced {stored} media items")),
    ))
}

pub async fn get_media(
    State(state): State<AppState>,
    Path(media_id): Path<MediaId>,
) -> AppResult<Json<ApiResponse<Media>>> {
    let media = state.catalog.get(media_id).await?;
    Ok(Json(ApiResponse::success(media)))
}
