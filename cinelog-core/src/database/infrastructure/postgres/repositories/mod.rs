pub mod engagement;
pub mod media;
pub mod users;
pub mod watch_state;

pub use engagement::PostgresEngagementRepository;
pub use media::PostgresMediaRepository;
pub use users::PostgresUsersRepository;
pub use watch_state::PostgresWatchStateRepository;
