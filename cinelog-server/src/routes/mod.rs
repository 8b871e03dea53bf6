use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::infra::app_state::AppState;
use crate::media::{engagement_handlers, media_handlers, watch_handlers};
use crate::users::{admin_handlers, auth, user_handlers};

/// Build the full API router.
pub fn create_router(state: AppState) -> Router {
    // Public authentication endpoints
    let public = Router::new()
        .route("/api/auth/signup", post(auth::handlers::signup))
        .route("/api/auth/login", post(auth::handlers::login));

    // Everything else requires a resolved identity.
    let protected = Router::new()
        .route(
            "/api/auth/change-password",
            post(auth::handlers::change_password),
        )
        .route("/api/auth/account", delete(auth::handlers::delete_account))
        .route(
            "/api/users/me",
            get(user_handlers::get_profile).put(user_handlers::update_profile),
        )
        .route(
            "/api/users/me/watchlist",
            get(engagement_handlers::my_watchlist),
        )
        .route(
            "/api/users/me/favorites",
            get(engagement_handlers::my_favorites),
        )
        .route("/api/media", get(media_handlers::list_media))
        .route("/api/media/search", get(media_handlers::search_media))
        .route("/api/media/sync", post(media_handlers::sync_media))
        .route("/api/media/{id}", get(media_handlers::get_media))
        .route(
            "/api/media/{id}/episode/{season}/{episode}/toggle",
            post(watch_handlers::toggle_episode),
        )
        .route(
            "/api/media/{id}/watched/toggle",
            post(watch_handlers::toggle_series),
        )
        .route("/api/media/{id}/progress", get(watch_handlers::get_progress))
        .route(
            "/api/media/{id}/watchlist/toggle",
            post(engagement_handlers::toggle_watchlist),
        )
        .route(
            "/api/media/{id}/favorite/toggle",
            post(engagement_handlers::toggle_favorite),
        )
        .route(
            "/api/media/{id}/rating",
            put(engagement_handlers::upsert_rating),
        )
        .route(
            "/api/media/{id}/comments",
            post(engagement_handlers::add_comment).get(engagement_handlers::list_comments),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::auth_middleware,
        ));

    let admin = Router::new()
        .route("/api/admin/promote", post(admin_handlers::promote_user))
        .layer(middleware::from_fn(auth::middleware::admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::auth_middleware,
        ));

    let cors = cors_layer(&state);

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
