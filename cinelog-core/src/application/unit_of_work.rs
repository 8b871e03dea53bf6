use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

use crate::database::infrastructure::postgres::{
    PostgresEngagementRepository, PostgresMediaRepository, PostgresUsersRepository,
    PostgresWatchStateRepository,
};
use crate::database::ports::{
    EngagementRepository, MediaRepository, UsersRepository, WatchStateRepository,
};
use crate::database::postgres::PostgresDatabase;

/// Aggregates the repository ports used by application services.
///
/// A composition-based facade so handlers and services depend on ports, not
/// on a concrete database, while construction stays a one-liner.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub users: Arc<dyn UsersRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub watch_state: Arc<dyn WatchStateRepository>,
    pub engagement: Arc<dyn EngagementRepository>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("users", &type_name_of_val(self.users.as_ref()))
            .field("media", &type_name_of_val(self.media.as_ref()))
            .field("watch_state", &type_name_of_val(self.watch_state.as_ref()))
            .field("engagement", &type_name_of_val(self.engagement.as_ref()))
            .finish()
    }
}

impl AppUnitOfWork {
    /// Compose all Postgres-backed repositories into a unit of work.
    pub fn from_postgres(db: &PostgresDatabase) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(PostgresUsersRepository::new(pool.clone())),
            media: Arc::new(PostgresMediaRepository::new(pool.clone())),
            watch_state: Arc::new(PostgresWatchStateRepository::new(pool.clone())),
            engagement: Arc::new(PostgresEngagementRepository::new(pool)),
        }
    }
}
