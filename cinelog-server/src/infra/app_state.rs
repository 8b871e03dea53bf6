use std::fmt;
use std::sync::Arc;

use cinelog_core::database::PostgresDatabase;
use cinelog_core::providers::MetadataProvider;
use cinelog_core::{AppUnitOfWork, CatalogService, EngagementService, ProgressReconciler};

use crate::config::Config;
use crate::providers::tmdb::TmdbProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub reconciler: ProgressReconciler,
    pub engagement: EngagementService,
    pub catalog: CatalogService,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Production composition: Postgres repositories plus the TMDB metadata
    /// adapter.
    pub fn new(config: Config, db: &PostgresDatabase) -> Self {
        let provider: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::new(
            &config.tmdb_base_url,
            &config.tmdb_api_key,
        ));
        Self::from_parts(config, AppUnitOfWork::from_postgres(db), provider)
    }

    /// Composition over explicit ports; also the seam the request-level
    /// tests use to swap in in-memory repositories.
    pub fn from_parts(
        config: Config,
        unit_of_work: AppUnitOfWork,
        provider: Arc<dyn MetadataProvider>,
    ) -> Self {
        let reconciler = ProgressReconciler::new(unit_of_work.watch_state.clone());
        let engagement = EngagementService::new(unit_of_work.engagement.clone());
        let catalog = CatalogService::new(unit_of_work.media.clone(), provider);
        Self {
            config: Arc::new(config),
            unit_of_work: Arc::new(unit_of_work),
            reconciler,
            engagement,
            catalog,
        }
    }
}
