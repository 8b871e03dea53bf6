//! # Cinelog Server
//!
//! HTTP server for the Cinelog media catalog.
//!
//! ## Overview
//!
//! - **Catalog**: browse and search movies and shows, backed by the local
//!   database with fallback to the external metadata provider
//! - **Watch Progress**: per-episode and per-series watched tracking with a
//!   derived completion percentage
//! - **Engagement**: watchlist, favorites, ratings and comments
//! - **Accounts**: signup, login, profile and password management, with an
//!   admin role for promoting users
//!
//! ## Architecture
//!
//! The server is built on Axum and uses:
//! - PostgreSQL for persistent storage
//! - TMDB for metadata

use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cinelog_core::database::PostgresDatabase;

mod config;
mod errors;
mod infra;
mod media;
mod providers;
mod routes;
mod users;

#[cfg(test)]
mod tests;

use config::Config;
use infra::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cinelog_server=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let db = PostgresDatabase::connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;
    db.migrate().await.context("failed to run migrations")?;

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port)
        .parse()
        .context("invalid server address")?;

    let state = AppState::new(config, &db);
    let router = routes::create_router(state);

    info!("Cinelog server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind server address")?;
    axum::serve(listener, router)
        .await
        .context("server error")?;

    Ok(())
}
