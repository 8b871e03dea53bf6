pub mod repositories;

pub use repositories::{
    PostgresEngagementRepository, PostgresMediaRepository, PostgresUsersRepository,
    PostgresWatchStateRepository,
};
