pub mod engagement;
pub mod media;
pub mod users;
pub mod watch_state;

pub use engagement::EngagementRepository;
pub use media::MediaRepository;
pub use users::UsersRepository;
pub use watch_state::{EpisodeToggleOutcome, WatchStateRepository};
