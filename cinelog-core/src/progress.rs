//! Watch-state reconciliation and progress computation.
//!
//! This module keeps three views of a user's progress on a series mutually
//! consistent:
//!
//! - per-episode watched facts (row presence in the watch-state store),
//! - the explicit series-level "fully watched" fact,
//! - the derived completion percentage.
//!
//! The percentage is a *view*, recomputed from episode facts on every read;
//! it is never stored for shows. A series counts as watched when the explicit
//! fact is present **or** the percentage reaches 100, so neither
//! representation can silently overwrite the other.
//!
//! Series metadata (the season/episode layout) is supplied by the caller;
//! the reconciler never fetches it. While the layout is unknown (zero total
//! episodes) percentages degrade to 0 but toggles are still persisted for
//! later reconciliation.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::database::ports::watch_state::WatchStateRepository;
use crate::error::Result;
use cinelog_model::{EpisodeKey, EpisodeToggle, ProgressView, SeriesLayout, SeriesToggle};

/// Completion percentage, rounded to the nearest whole percent.
///
/// A zero total (metadata not yet available) always reports 0. Stale facts
/// beyond the known layout cannot push the value past 100.
pub fn completion_percentage(watched: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let watched = watched.min(total);
    ((f64::from(watched) / f64::from(total)) * 100.0).round() as u8
}

/// The consistency policy between episode facts, the explicit series fact
/// and the derived percentage.
#[derive(Clone)]
pub struct ProgressReconciler {
    watch_state: Arc<dyn WatchStateRepository>,
}

impl std::fmt::Debug for ProgressReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReconciler").finish_non_exhaustive()
    }
}

impl ProgressReconciler {
    pub fn new(watch_state: Arc<dyn WatchStateRepository>) -> Self {
        Self { watch_state }
    }

    /// Flip one episode fact and recompute the series percentage.
    ///
    /// Toggling an episode never flips the explicit series fact except at
    /// the boundary: the store sets it when the watched count reaches the
    /// layout total and clears it when the count drops below, inside the
    /// same transaction as the flip.
    pub async fn toggle_episode(
        &self,
        user_id: Uuid,
        layout: &SeriesLayout,
        key: EpisodeKey,
    ) -> Result<EpisodeToggle> {
        let outcome = self
            .watch_state
            .toggle_episode(user_id, layout.media_id, key, layout.total_episodes)
            .await?;

        let percentage =
            completion_percentage(outcome.watched_count, layout.total_episodes);

        debug!(
            "User {} toggled s{:02}e{:02} of series {} to {}: {}/{} episodes ({}%)",
            user_id,
            key.season_number,
            key.episode_number,
            layout.media_id,
            outcome.watched,
            outcome.watched_count,
            layout.total_episodes,
            percentage
        );

        Ok(EpisodeToggle {
            watched: outcome.watched,
            percentage,
        })
    }

    /// Flip the explicit series fact with a full cascade.
    ///
    /// Marking inserts a fact for every episode the layout knows about;
    /// clearing removes all episode facts. The store runs flip and cascade
    /// in one transaction, so a partial cascade is never visible.
    pub async fn toggle_series(
        &self,
        user_id: Uuid,
        layout: &SeriesLayout,
    ) -> Result<SeriesToggle> {
        let episodes = layout.episode_keys();
        let watched = self
            .watch_state
            .toggle_series(user_id, layout.media_id, &episodes)
            .await?;

        let percentage = if watched {
            completion_percentage(episodes.len() as u32, layout.total_episodes)
        } else {
            0
        };

        Ok(SeriesToggle { watched, percentage })
    }

    /// Read-only projection; never mutates.
    pub async fn progress_view(
        &self,
        user_id: Uuid,
        layout: &SeriesLayout,
    ) -> Result<ProgressView> {
        let mut watched_episodes = self
            .watch_state
            .list_watched_episodes(user_id, layout.media_id)
            .await?;
        watched_episodes.sort_unstable();

        let percentage = completion_percentage(
            watched_episodes.len() as u32,
            layout.total_episodes,
        );
        let marked = self
            .watch_state
            .is_series_marked(user_id, layout.media_id)
            .await?;

        Ok(ProgressView {
            watched_episodes,
            percentage,
            series_watched: marked || percentage == 100,
        })
    }
}
