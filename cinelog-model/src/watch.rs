use serde::{Deserialize, Serialize};

/// Episode identity within a series
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EpisodeKey {
    pub season_number: u16,
    pub episode_number: u16,
}

/// Result of flipping a single episode fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeToggle {
    /// New state of the toggled episode
    pub watched: bool,
    /// Recomputed completion percentage for the whole series
    pub percentage: u8,
}

/// Result of flipping the series-level watched fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesToggle {
    /// New state of the explicit series fact
    pub watched: bool,
    /// Percentage after the cascade: 100 after marking (0 if no episodes are
    /// known yet), 0 after clearing
    pub percentage: u8,
}

/// Read-only projection of a user's progress on one series.
///
/// `series_watched` is the unified view: true iff the explicit series fact is
/// present or the completion percentage is 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    pub watched_episodes: Vec<EpisodeKey>,
    pub percentage: u8,
    pub series_watched: bool,
}
