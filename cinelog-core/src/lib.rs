//! # Cinelog Core
//!
//! Core library for the Cinelog media catalog, providing the watch-state
//! store, the progress reconciler, engagement services and the database
//! abstraction behind them.
//!
//! ## Overview
//!
//! - **Watch-State Store**: durable per-user episode and series facts with
//!   race-free conditional toggles
//! - **Progress Reconciler**: keeps episode facts, the explicit series-level
//!   watched fact and the derived completion percentage consistent
//! - **Engagement Stores**: watchlist, favorites, ratings and comments,
//!   independent of watch progress
//! - **Catalog**: shared media rows with merge-on-conflict upserts, provider
//!   search fallback and discovery sync
//! - **Database Abstraction**: `async_trait` ports with Postgres adapters
//!
//! ## Architecture
//!
//! - [`database::ports`]: repository traits consumed by services
//! - [`database::infrastructure`]: SQLx/Postgres adapters
//! - [`progress`]: the reconciliation policy
//! - [`engagement`] / [`catalog`]: validation and composition services
//! - [`providers`]: the narrow metadata-provider boundary

pub mod api_types;
pub mod application;
pub mod catalog;
pub mod database;
pub mod engagement;
pub mod error;
pub mod progress;
pub mod providers;

pub use api_types::ApiResponse;
pub use application::AppUnitOfWork;
pub use catalog::CatalogService;
pub use database::PostgresDatabase;
pub use engagement::EngagementService;
pub use error::{CoreError, Result};
pub use progress::{ProgressReconciler, completion_percentage};
pub use providers::MetadataProvider;
