use axum::{Json, extract::State};
use cinelog_core::api_types::ApiResponse;
use cinelog_model::UserRole;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppResult;
use crate::infra::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct PromoteRequest {
    pub email: String,
}

/// Grant the admin role to an existing account. Reachable only through the
/// admin middleware stack.
pub async fn promote_user(
    State(state): State<AppState>,
    Json(request): Json<PromoteRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .unit_of_work
        .users
        .set_role(&request.email, UserRole::Admin)
        .await?;

    info!("Promoted {} to admin", request.email);
    Ok(Json(
        ApiResponse::success(()).with_message(format!("{} is now an admin", request.email)),
    ))
}
