pub mod engagement_handlers;
pub mod media_handlers;
pub mod watch_handlers;
