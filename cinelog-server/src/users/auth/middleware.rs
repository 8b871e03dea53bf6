use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use cinelog_core::api_types::ApiResponse;
use cinelog_model::User;

use super::jwt::validate_token;
use crate::infra::app_state::AppState;

/// Resolve the bearer token to a [`User`] extension. Core operations never
/// execute without an authenticated identity; requests without a valid
/// token are rejected here.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer_token(&request)?;
    let user = validate_and_get_user(&state, &token).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Require an admin role. Must run after `auth_middleware` in the layer
/// stack so the user extension is present.
pub async fn admin_middleware(request: Request, next: Next) -> Response {
    let user = match request.extensions().get::<User>() {
        Some(user) => user,
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                axum::Json(ApiResponse::<()>::error(
                    "Authentication required".to_string(),
                )),
            )
                .into_response();
        }
    };

    if !user.role.is_admin() {
        return (
            StatusCode::FORBIDDEN,
            axum::Json(ApiResponse::<()>::error("Admin access required".to_string())),
        )
            .into_response();
    }

    next.run(request).await
}

fn extract_bearer_token(request: &Request) -> Result<String, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !auth_header.starts_with("Bearer ") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(auth_header[7..].to_string())
}

async fn validate_and_get_user(state: &AppState, token: &str) -> Result<User, StatusCode> {
    let claims = validate_token(token, &state.config.jwt_secret)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    state
        .unit_of_work
        .users
        .get_user_by_id(claims.sub)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)
}
