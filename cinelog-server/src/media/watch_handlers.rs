use axum::{
    Extension, Json,
    extract::{Path, State},
};
use cinelog_core::api_types::ApiResponse;
use cinelog_model::{EpisodeKey, EpisodeToggle, MediaId, ProgressView, SeriesToggle, User};

use crate::errors::AppResult;
use crate::infra::app_state::AppState;

/// Flip one episode's watched fact.
///
/// Returns the new per-episode state and the recomputed series percentage.
/// The explicit series-level fact only moves at the completion boundary;
/// with no season metadata yet the toggle still persists and the
/// percentage reports 0.
pub async fn toggle_episode(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((series_id, season, episode)): Path<(MediaId, u16, u16)>,
) -> AppResult<Json<ApiResponse<EpisodeToggle>>> {
    let layout = state.catalog.series_layout(series_id).await?;
    let toggle = state
        .reconciler
        .toggle_episode(
            user.id,
            &layout,
            EpisodeKey {
                season_number: season,
                episode_number: episode,
            },
        )
        .await?;

    Ok(Json(ApiResponse::success(toggle)))
}

/// Flip the series-level watched fact, cascading to every episode the
/// layout knows about. A movie cascades to its single synthetic episode.
pub async fn toggle_series(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(media_id): Path<MediaId>,
) -> AppResult<Json<ApiResponse<SeriesToggle>>> {
    let layout = state.catalog.series_layout(media_id).await?;
    let toggle = state.reconciler.toggle_series(user.id, &layout).await?;

    Ok(Json(ApiResponse::success(toggle)))
}

/// Read-only progress projection for one series.
pub async fn get_progress(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(media_id): Path<MediaId>,
) -> AppResult<Json<ApiResponse<ProgressView>>> {
    let layout = state.catalog.series_layout(media_id).await?;
    let view = state.reconciler.progress_view(user.id, &layout).await?;

    Ok(Json(ApiResponse::success(view)))
}
