//! In-memory repository fakes and state assembly for request-level tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use cinelog_core::database::ports::watch_state::EpisodeToggleOutcome;
use cinelog_core::database::ports::{
    EngagementRepository, MediaRepository, UsersRepository, WatchStateRepository,
};
use cinelog_core::error::{CoreError, Result};
use cinelog_core::providers::MetadataProvider;
use cinelog_core::AppUnitOfWork;
use cinelog_model::{
    Comment, CommentPage, EpisodeKey, Media, MediaId, MediaUpsert, Rating,
    SeriesLayout, UpdateProfileRequest, User, UserRole,
};

use crate::config::Config;
use crate::infra::app_state::AppState;

pub const TEST_JWT_SECRET: &str = "fixture-secret";

// ===== Users =====

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<HashMap<Uuid, (User, String)>>,
}

impl InMemoryUsers {
    pub fn rows_snapshot(&self) -> Vec<User> {
        self.rows
            .lock()
            .unwrap()
            .values()
            .map(|(user, _)| user.clone())
            .collect()
    }
}

#[async_trait]
impl UsersRepository for InMemoryUsers {
    async fn create_user_with_password(&self, user: &User, password_hash: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .values()
            .any(|(existing, _)| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(CoreError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }
        rows.insert(user.id, (user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.rows.lock().unwrap().get(&id).map(|(user, _)| user.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|(user, _)| user.email.eq_ignore_ascii_case(email))
            .map(|(user, _)| user.clone()))
    }

    async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|(_, hash)| hash.clone()))
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&user_id) {
            Some((_, hash)) => {
                *hash = password_hash.to_string();
                Ok(())
            }
            None => Err(CoreError::NotFound(format!("user {user_id}"))),
        }
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<User> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&user_id) {
            Some((user, _)) => {
                if let Some(first_name) = &update.first_name {
                    user.first_name = first_name.clone();
                }
                if let Some(last_name) = &update.last_name {
                    user.last_name = last_name.clone();
                }
                if let Some(theme) = &update.theme {
                    user.theme = theme.clone();
                }
                user.updated_at = Utc::now();
                Ok(user.clone())
            }
            None => Err(CoreError::NotFound(format!("user {user_id}"))),
        }
    }

    async fn set_role(&self, email: &str, role: UserRole) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        for (user, _) in rows.values_mut() {
            if user.email.eq_ignore_ascii_case(email) {
                user.role = role;
                return Ok(());
            }
        }
        Err(CoreError::NotFound(format!("no user with email {email}")))
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        match self.rows.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(CoreError::NotFound(format!("user {id}"))),
        }
    }
}

// ===== Media =====

#[derive(Default)]
pub struct InMemoryMedia {
    rows: Mutex<HashMap<MediaId, Media>>,
}

#[async_trait]
impl MediaRepository for InMemoryMedia {
    async fn upsert(&self, media: &MediaUpsert) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let now = Utc::now();
        rows.entry(media.id)
            .and_modify(|existing| {
                existing.description = media.description.clone();
                existing.release_date = media.release_date;
                existing.poster_url = media.poster_url.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| Media {
                id: media.id,
                media_type: media.media_type,
                title: media.title.clone(),
                description: media.description.clone(),
                release_date: media.release_date,
                poster_url: media.poster_url.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(())
    }

    async fn get(&self, id: MediaId) -> Result<Option<Media>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Media>> {
        let mut rows: Vec<Media> = self.rows.lock().unwrap().values().cloned().collect();
        rows.sort_by(|a, b| b.release_date.cmp(&a.release_date));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn search_title(&self, query: &str, limit: u32) -> Result<Vec<Media>> {
        let query = query.to_lowercase();
        let mut rows: Vec<Media> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.title.to_lowercase().contains(&query))
            .cloned()
            .collect();
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

// ===== Watch state =====

#[derive(Default)]
pub struct InMemoryWatchState {
    episodes: Mutex<HashSet<(Uuid, MediaId, EpisodeKey)>>,
    series: Mutex<HashSet<(Uuid, MediaId)>>,
}

impl InMemoryWatchState {
    fn count(&self, user_id: Uuid, series_id: MediaId) -> u32 {
        self.episodes
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, s, _)| *u == user_id && *s == series_id)
            .count() as u32
    }
}

#[async_trait]
impl WatchStateRepository for InMemoryWatchState {
    async fn is_episode_watched(
        &self,
        user_id: Uuid,
        series_id: MediaId,
        key: EpisodeKey,
    ) -> Result<bool> {
        Ok(self
            .episodes
            .lock()
            .unwrap()
            .contains(&(user_id, series_id, key)))
    }

    async fn set_episode_watched(
        &self,
        user_id: Uuid,
        series_id: MediaId,
        key: EpisodeKey,
        watched: bool,
    ) -> Result<()> {
        let mut episodes = self.episodes.lock().unwrap();
        if watched {
            episodes.insert((user_id, series_id, key));
        } else {
            episodes.remove(&(user_id, series_id, key));
        }
        Ok(())
    }

    async fn toggle_episode(
        &self,
        user_id: Uuid,
        series_id: MediaId,
        key: EpisodeKey,
        total_episodes: u32,
    ) -> Result<EpisodeToggleOutcome> {
        let watched = {
            let mut episodes = self.episodes.lock().unwrap();
            if episodes.remove(&(user_id, series_id, key)) {
                false
            } else {
                episodes.insert((user_id, series_id, key));
                true
            }
        };
        let watched_count = self.count(user_id, series_id);
        if total_episodes > 0 {
            let mut series = self.series.lock().unwrap();
            if watched_count >= total_episodes {
                series.insert((user_id, series_id));
            } else {
                series.remove(&(user_id, series_id));
            }
        }
        Ok(EpisodeToggleOutcome {
            watched,
            watched_count,
        })
    }

    async fn toggle_series(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        episodes: &[EpisodeKey],
    ) -> Result<bool> {
        let watched = {
            let mut series = self.series.lock().unwrap();
            if series.remove(&(user_id, media_id)) {
                false
            } else {
                series.insert((user_id, media_id));
                true
            }
        };
        let mut stored = self.episodes.lock().unwrap();
        if watched {
            for key in episodes {
                stored.insert((user_id, media_id, *key));
            }
        } else {
            stored.retain(|(u, s, _)| !(*u == user_id && *s == media_id));
        }
        Ok(watched)
    }

    async fn is_series_marked(&self, user_id: Uuid, media_id: MediaId) -> Result<bool> {
        Ok(self.series.lock().unwrap().contains(&(user_id, media_id)))
    }

    async fn set_series_marked(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        marked: bool,
    ) -> Result<()> {
        let mut series = self.series.lock().unwrap();
        if marked {
            series.insert((user_id, media_id));
        } else {
            series.remove(&(user_id, media_id));
        }
        Ok(())
    }

    async fn list_watched_episodes(
        &self,
        user_id: Uuid,
        series_id: MediaId,
    ) -> Result<Vec<EpisodeKey>> {
        Ok(self
            .episodes
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, s, _)| *u == user_id && *s == series_id)
            .map(|(_, _, key)| *key)
            .collect())
    }

    async fn count_watched_episodes(&self, user_id: Uuid, series_id: MediaId) -> Result<u32> {
        Ok(self.count(user_id, series_id))
    }
}

// ===== Engagement =====

#[derive(Default)]
pub struct InMemoryEngagement {
    watchlist: Mutex<Vec<(Uuid, MediaId)>>,
    favorites: Mutex<Vec<(Uuid, MediaId)>>,
    ratings: Mutex<HashMap<(Uuid, MediaId), Rating>>,
    comments: Mutex<Vec<Comment>>,
    next_comment_id: AtomicI64,
    media: Arc<InMemoryMedia>,
}

impl InMemoryEngagement {
    pub fn new(media: Arc<InMemoryMedia>) -> Self {
        Self {
            media,
            next_comment_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    fn toggle(list: &Mutex<Vec<(Uuid, MediaId)>>, user_id: Uuid, media_id: MediaId) -> bool {
        let mut list = list.lock().unwrap();
        if let Some(pos) = list.iter().position(|e| *e == (user_id, media_id)) {
            list.remove(pos);
            false
        } else {
            list.push((user_id, media_id));
            true
        }
    }

    async fn resolve(
        &self,
        list: &Mutex<Vec<(Uuid, MediaId)>>,
        user_id: Uuid,
    ) -> Result<Vec<Media>> {
        let ids: Vec<MediaId> = list
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, m)| *m)
            .collect();
        let mut media = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(row) = self.media.get(id).await? {
                media.push(row);
            }
        }
        Ok(media)
    }
}

#[async_trait]
impl EngagementRepository for InMemoryEngagement {
    async fn toggle_watchlist(&self, user_id: Uuid, media_id: MediaId) -> Result<bool> {
        Ok(Self::toggle(&self.watchlist, user_id, media_id))
    }

    async fn toggle_favorite(&self, user_id: Uuid, media_id: MediaId) -> Result<bool> {
        Ok(Self::toggle(&self.favorites, user_id, media_id))
    }

    async fn list_watchlist(&self, user_id: Uuid) -> Result<Vec<Media>> {
        self.resolve(&self.watchlist, user_id).await
    }

    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<Media>> {
        self.resolve(&self.favorites, user_id).await
    }

    async fn upsert_rating(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        score: i32,
        review: Option<&str>,
    ) -> Result<()> {
        self.ratings.lock().unwrap().insert(
            (user_id, media_id),
            Rating {
                user_id,
                media_id,
                score,
                review: review.map(str::to_string),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_rating(&self, user_id: Uuid, media_id: MediaId) -> Result<Option<Rating>> {
        Ok(self
            .ratings
            .lock()
            .unwrap()
            .get(&(user_id, media_id))
            .cloned())
    }

    async fn add_comment(&self, user_id: Uuid, media_id: MediaId, body: &str) -> Result<Comment> {
        let comment = Comment {
            id: self.next_comment_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            media_id,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, media_id: MediaId, page: CommentPage) -> Result<Vec<Comment>> {
        let comments = self.comments.lock().unwrap();
        let mut rows: Vec<Comment> = comments
            .iter()
            .filter(|c| c.media_id == media_id)
            .filter(|c| page.before_id.is_none_or(|before| c.id < before))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(page.limit as usize);
        Ok(rows)
    }
}

// ===== Metadata provider =====

/// Provider stub with pre-registered layouts; everything else errors the
/// way an unreachable provider would.
#[derive(Default)]
pub struct StubProvider {
    pub layouts: Mutex<HashMap<MediaId, SeriesLayout>>,
    pub search_results: Mutex<Vec<MediaUpsert>>,
}

impl StubProvider {
    pub fn with_layout(self, layout: SeriesLayout) -> Self {
        self.layouts.lock().unwrap().insert(layout.media_id, layout);
        self
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    async fn search_movies(&self, _query: &str) -> Result<Vec<MediaUpsert>> {
        Ok(self.search_results.lock().unwrap().clone())
    }

    async fn discover(&self) -> Result<Vec<MediaUpsert>> {
        Ok(self.search_results.lock().unwrap().clone())
    }

    async fn series_layout(&self, series_id: MediaId) -> Result<SeriesLayout> {
        self.layouts
            .lock()
            .unwrap()
            .get(&series_id)
            .cloned()
            .ok_or_else(|| CoreError::Provider(format!("no metadata for series {series_id}")))
    }
}

// ===== Harness =====

pub struct TestHarness {
    pub state: AppState,
    pub users: Arc<InMemoryUsers>,
    pub media: Arc<InMemoryMedia>,
    pub watch_state: Arc<InMemoryWatchState>,
    pub engagement: Arc<InMemoryEngagement>,
}

pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: String::new(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        tmdb_base_url: "http://tmdb.invalid".to_string(),
        tmdb_api_key: String::new(),
        cors_allowed_origins: Vec::new(),
    }
}

pub fn harness_with_provider(provider: StubProvider) -> TestHarness {
    let users = Arc::new(InMemoryUsers::default());
    let media = Arc::new(InMemoryMedia::default());
    let watch_state = Arc::new(InMemoryWatchState::default());
    let engagement = Arc::new(InMemoryEngagement::new(media.clone()));

    let unit_of_work = AppUnitOfWork {
        users: users.clone(),
        media: media.clone(),
        watch_state: watch_state.clone(),
        engagement: engagement.clone(),
    };

    let state = AppState::from_parts(test_config(), unit_of_work, Arc::new(provider));

    TestHarness {
        state,
        users,
        media,
        watch_state,
        engagement,
    }
}

pub fn harness() -> TestHarness {
    harness_with_provider(StubProvider::default())
}

/// A signed-up user injected straight into the fake store.
pub async fn seeded_user(harness: &TestHarness, email: &str, role: UserRole) -> User {
    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        role,
        theme: "light".to_string(),
        avatar_url: None,
        created_at: now,
        updated_at: now,
    };
    harness
        .users
        .create_user_with_password(&user, "unused-hash")
        .await
        .unwrap();
    user
}

/// A catalog row injected straight into the fake store.
pub async fn seeded_media(
    harness: &TestHarness,
    id: MediaId,
    media_type: cinelog_model::MediaType,
    title: &str,
) {
    harness
        .media
        .upsert(&MediaUpsert {
            id,
            media_type,
            title: title.to_string(),
            description: String::new(),
            release_date: None,
            poster_url: None,
        })
        .await
        .unwrap();
}
