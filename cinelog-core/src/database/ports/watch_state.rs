use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use cinelog_model::{EpisodeKey, MediaId};

/// Result of an atomic episode flip, observed inside the store transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeToggleOutcome {
    /// New state of the flipped episode fact
    pub watched: bool,
    /// Watched-episode count for the series after the flip
    pub watched_count: u32,
}

/// Durable per-user watch facts: episode rows and the explicit series-level
/// "fully watched" marker.
///
/// Every toggle is a conditional write: the flip happens in a single
/// statement (or single transaction for multi-row cascades), never as a
/// read followed by a separate write.
#[async_trait]
pub trait WatchStateRepository: Send + Sync {
    async fn is_episode_watched(
        &self,
        user_id: Uuid,
        series_id: MediaId,
        key: EpisodeKey,
    ) -> Result<bool>;

    /// Idempotent set: insert-if-absent or delete-if-present. Calling with
    /// the already-current state is not an error.
    async fn set_episode_watched(
        &self,
        user_id: Uuid,
        series_id: MediaId,
        key: EpisodeKey,
        watched: bool,
    ) -> Result<()>;

    /// Atomically flip one episode fact and maintain the explicit series
    /// fact at the completion boundary: set when the watched count reaches
    /// `total_episodes`, cleared when it drops below. Boundary maintenance
    /// is skipped while `total_episodes` is 0 (metadata not yet known).
    async fn toggle_episode(
        &self,
        user_id: Uuid,
        series_id: MediaId,
        key: EpisodeKey,
        total_episodes: u32,
    ) -> Result<EpisodeToggleOutcome>;

    /// Atomically flip the explicit series fact and cascade: marking inserts
    /// a fact for every supplied episode, clearing deletes all episode facts
    /// for the series. The cascade shares one transaction with the flip.
    /// Returns the new series-fact state.
    async fn toggle_series(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        episodes: &[EpisodeKey],
    ) -> Result<bool>;

    /// Whether the explicit series fact is present. Callers wanting the
    /// unified "watched" view must also consider the completion percentage.
    async fn is_series_marked(&self, user_id: Uuid, media_id: MediaId) -> Result<bool>;

    async fn set_series_marked(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        marked: bool,
    ) -> Result<()>;

    async fn list_watched_episodes(
        &self,
        user_id: Uuid,
        series_id: MediaId,
    ) -> Result<Vec<EpisodeKey>>;

    async fn count_watched_episodes(
        &self,
        user_id: Uuid,
        series_id: MediaId,
    ) -> Result<u32>;
}
