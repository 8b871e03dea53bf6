//! Request-level tests for the progress endpoints, driven through the
//! handler functions with in-memory stores.

use axum::extract::{Path, State};
use axum::Extension;

use cinelog_model::{MediaType, SeasonCount, SeriesLayout, UserRole};

use crate::media::watch_handlers::{get_progress, toggle_episode, toggle_series};
use crate::tests::fixtures::{
    StubProvider, harness_with_provider, seeded_media, seeded_user,
};

fn ten_episode_show(series_id: i64) -> SeriesLayout {
    SeriesLayout::new(
        series_id,
        MediaType::Show,
        vec![SeasonCount {
            season_number: 1,
            episode_count: 10,
        }],
        None,
    )
}

#[tokio::test]
async fn scenario_episode_toggle_then_series_toggle() {
    let harness =
        harness_with_provider(StubProvider::default().with_layout(ten_episode_show(42)));
    seeded_media(&harness, 42, MediaType::Show, "Severance").await;
    let user = seeded_user(&harness, "a@example.com", UserRole::User).await;

    let response = toggle_episode(
        State(harness.state.clone()),
        Extension(user.clone()),
        Path((42, 1u16, 1u16)),
    )
    .await
    .unwrap();
    let toggle = response.0.data.unwrap();
    assert!(toggle.watched);
    assert_eq!(toggle.percentage, 10);

    let response = toggle_series(
        State(harness.state.clone()),
        Extension(user.clone()),
        Path(42),
    )
    .await
    .unwrap();
    let toggle = response.0.data.unwrap();
    assert!(toggle.watched);
    assert_eq!(toggle.percentage, 100);

    let response = get_progress(State(harness.state.clone()), Extension(user), Path(42))
        .await
        .unwrap();
    let view = response.0.data.unwrap();
    assert_eq!(view.watched_episodes.len(), 10);
    assert_eq!(view.percentage, 100);
    assert!(view.series_watched);
}

#[tokio::test]
async fn boundary_recompute_through_handlers() {
    let harness =
        harness_with_provider(StubProvider::default().with_layout(ten_episode_show(7)));
    seeded_media(&harness, 7, MediaType::Show, "The Wire").await;
    let user = seeded_user(&harness, "b@example.com", UserRole::User).await;

    for episode in 1..=9u16 {
        toggle_episode(
            State(harness.state.clone()),
            Extension(user.clone()),
            Path((7, 1u16, episode)),
        )
        .await
        .unwrap();
    }

    let view = get_progress(State(harness.state.clone()), Extension(user.clone()), Path(7))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert_eq!(view.percentage, 90);
    assert!(!view.series_watched);

    let toggle = toggle_episode(
        State(harness.state.clone()),
        Extension(user.clone()),
        Path((7, 1u16, 10u16)),
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();
    assert_eq!(toggle.percentage, 100);

    let view = get_progress(State(harness.state.clone()), Extension(user.clone()), Path(7))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert!(view.series_watched);

    // Unmarking one flips the series view back.
    toggle_episode(
        State(harness.state.clone()),
        Extension(user.clone()),
        Path((7, 1u16, 3u16)),
    )
    .await
    .unwrap();
    let view = get_progress(State(harness.state.clone()), Extension(user), Path(7))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert_eq!(view.percentage, 90);
    assert!(!view.series_watched);
}

#[tokio::test]
async fn movie_collapses_to_single_synthetic_episode() {
    let harness = harness_with_provider(StubProvider::default());
    seeded_media(&harness, 550, MediaType::Movie, "Fight Club").await;
    let user = seeded_user(&harness, "c@example.com", UserRole::User).await;

    let toggle = toggle_series(State(harness.state.clone()), Extension(user.clone()), Path(550))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert!(toggle.watched);
    assert_eq!(toggle.percentage, 100);

    let view = get_progress(State(harness.state.clone()), Extension(user.clone()), Path(550))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert_eq!(view.watched_episodes.len(), 1);
    assert!(view.series_watched);

    let toggle = toggle_series(State(harness.state.clone()), Extension(user), Path(550))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert!(!toggle.watched);
    assert_eq!(toggle.percentage, 0);
}

#[tokio::test]
async fn toggles_persist_while_metadata_is_missing() {
    // No layout registered and no catalog row: the provider fails, the
    // layout degrades to zero episodes, and the toggle still lands.
    let harness = harness_with_provider(StubProvider::default());
    let user = seeded_user(&harness, "d@example.com", UserRole::User).await;

    let toggle = toggle_episode(
        State(harness.state.clone()),
        Extension(user.clone()),
        Path((99, 2u16, 5u16)),
    )
    .await
    .unwrap()
    .0
    .data
    .unwrap();
    assert!(toggle.watched);
    assert_eq!(toggle.percentage, 0);

    let view = get_progress(State(harness.state.clone()), Extension(user), Path(99))
        .await
        .unwrap()
        .0
        .data
        .unwrap();
    assert_eq!(view.watched_episodes.len(), 1);
    assert_eq!(view.percentage, 0);
    assert!(!view.series_watched);
}
