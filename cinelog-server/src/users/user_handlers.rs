use axum::{Extension, Json, extract::State};
use cinelog_core::api_types::ApiResponse;
use cinelog_model::{UpdateProfileRequest, User};

use crate::errors::AppResult;
use crate::infra::app_state::AppState;

/// Current user's profile.
pub async fn get_profile(
    Extension(user): Extension<User>,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(ApiResponse::success(user)))
}

/// Apply profile changes; omitted fields are left untouched.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    request.validate()?;

    let updated = state
        .unit_of_work
        .users
        .update_profile(user.id, &request)
        .await?;

    Ok(Json(ApiResponse::success(updated)))
}
