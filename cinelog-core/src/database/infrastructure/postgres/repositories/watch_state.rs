use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::database::ports::watch_state::{EpisodeToggleOutcome, WatchStateRepository};
use crate::error::Result;
use cinelog_model::{EpisodeKey, MediaId};

/// Writable-CTE flip of one episode fact: delete-if-present, otherwise
/// insert. A single statement, so two concurrent toggles of the same key
/// cannot both observe the same prior state.
const FLIP_EPISODE_SQL: &str = r#"
    WITH deleted AS (
        DELETE FROM watched_episodes
        WHERE user_id = $1 AND series_id = $2
          AND season_number = $3 AND episode_number = $4
        RETURNING 1
    ), inserted AS (
        INSERT INTO watched_episodes (user_id, series_id, season_number, episode_number)
        SELECT $1, $2, $3, $4
        WHERE NOT EXISTS (SELECT 1 FROM deleted)
        ON CONFLICT (user_id, series_id, season_number, episode_number) DO NOTHING
        RETURNING 1
    )
    SELECT EXISTS (SELECT 1 FROM inserted) AS watched
"#;

const FLIP_SERIES_SQL: &str = r#"
    WITH deleted AS (
        DELETE FROM watched_series
        WHERE user_id = $1 AND media_id = $2
        RETURNING 1
    ), inserted AS (
        INSERT INTO watched_series (user_id, media_id)
        SELECT $1, $2
        WHERE NOT EXISTS (SELECT 1 FROM deleted)
        ON CONFLICT (user_id, media_id) DO NOTHING
        RETURNING 1
    )
    SELECT EXISTS (SELECT 1 FROM inserted) AS watched
"#;

#[derive(Clone, Debug)]
pub struct PostgresWatchStateRepository {
    pool: PgPool,
}

impl PostgresWatchStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WatchStateRepository for PostgresWatchStateRepository {
    async fn is_episode_watched(
        &self,
        user_id: Uuid,
        series_id: MediaId,
        key: EpisodeKey,
    ) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM watched_episodes
                WHERE user_id = $1 AND series_id = $2
                  AND season_number = $3 AND episode_number = $4
            ) AS watched
            "#,
        )
        .bind(user_id)
        .bind(series_id)
        .bind(i32::from(key.season_number))
        .bind(i32::from(key.episode_number))
        .fetch_one(self.pool())
        .await?;

        Ok(row.try_get("watched")?)
    }

    async fn set_episode_watched(
        &self,
        user_id: Uuid,
        series_id: MediaId,
        key: EpisodeKey,
        watched: bool,
    ) -> Result<()> {
        if watched {
            sqlx::query(
                r#"
                INSERT INTO watched_episodes (user_id, series_id, season_number, episode_number)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, series_id, season_number, episode_number) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(series_id)
            .bind(i32::from(key.season_number))
            .bind(i32::from(key.episode_number))
            .execute(self.pool())
            .await?;
        } else {
            sqlx::query(
                r#"
                DELETE FROM watched_episodes
                WHERE user_id = $1 AND series_id = $2
                  AND season_number = $3 AND episode_number = $4
                "#,
            )
            .bind(user_id)
            .bind(series_id)
            .bind(i32::from(key.season_number))
            .bind(i32::from(key.episode_number))
            .execute(self.pool())
            .await?;
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
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(FLIP_EPISODE_SQL)
            .bind(user_id)
            .bind(series_id)
            .bind(i32::from(key.season_number))
            .bind(i32::from(key.episode_number))
            .fetch_one(&mut *tx)
            .await?;
        let watched: bool = row.try_get("watched")?;

        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS watched_count
            FROM watched_episodes
            WHERE user_id = $1 AND series_id = $2
            "#,
        )
        .bind(user_id)
        .bind(series_id)
        .fetch_one(&mut *tx)
        .await?;
        let watched_count: i64 = row.try_get("watched_count")?;
        let watched_count = watched_count as u32;

        // Keep the explicit series fact in step with the completion boundary.
        // Skipped while the episode total is unknown; the flip above is still
        // persisted for later reconciliation.
        if total_episodes > 0 {
            if watched_count >= total_episodes {
                sqlx::query(
                    r#"
                    INSERT INTO watched_series (user_id, media_id)
                    VALUES ($1, $2)
                    ON CONFLICT (user_id, media_id) DO NOTHING
                    "#,
                )
                .bind(user_id)
                .bind(series_id)
                .execute(&mut *tx)
                .await?;
            } else {
                sqlx::query(
                    r#"
                    DELETE FROM watched_series
                    WHERE user_id = $1 AND media_id = $2
                    "#,
                )
                .bind(user_id)
                .bind(series_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

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
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(FLIP_SERIES_SQL)
            .bind(user_id)
            .bind(media_id)
            .fetch_one(&mut *tx)
            .await?;
        let watched: bool = row.try_get("watched")?;

        if watched {
            if !episodes.is_empty() {
                let seasons: Vec<i32> =
                    episodes.iter().map(|k| i32::from(k.season_number)).collect();
                let numbers: Vec<i32> =
                    episodes.iter().map(|k| i32::from(k.episode_number)).collect();
                sqlx::query(
                    r#"
                    INSERT INTO watched_episodes (user_id, series_id, season_number, episode_number)
                    SELECT $1, $2, season_number, episode_number
                    FROM UNNEST($3::int[], $4::int[]) AS episode (season_number, episode_number)
                    ON CONFLICT (user_id, series_id, season_number, episode_number) DO NOTHING
                    "#,
                )
                .bind(user_id)
                .bind(media_id)
                .bind(&seasons)
                .bind(&numbers)
                .execute(&mut *tx)
                .await?;
            }
        } else {
            sqlx::query(
                r#"
                DELETE FROM watched_episodes
                WHERE user_id = $1 AND series_id = $2
                "#,
            )
            .bind(user_id)
            .bind(media_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            "Series {} toggled to {} for user {} ({} episodes cascaded)",
            media_id,
            if watched { "watched" } else { "unwatched" },
            user_id,
            episodes.len()
        );

        Ok(watched)
    }

    async fn is_series_marked(&self, user_id: Uuid, media_id: MediaId) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM watched_series
                WHERE user_id = $1 AND media_id = $2
            ) AS marked
            "#,
        )
        .bind(user_id)
        .bind(media_id)
        .fetch_one(self.pool())
        .await?;

        Ok(row.try_get("marked")?)
    }

    async fn set_series_marked(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        marked: bool,
    ) -> Result<()> {
        if marked {
            sqlx::query(
                r#"
                INSERT INTO watched_series (user_id, media_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, media_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(media_id)
            .execute(self.pool())
            .await?;
        } else {
            sqlx::query(
                r#"
                DELETE FROM watched_series
                WHERE user_id = $1 AND media_id = $2
                "#,
            )
            .bind(user_id)
            .bind(media_id)
            .execute(self.pool())
            .await?;
        }
        Ok(())
    }

    async fn list_watched_episodes(
        &self,
        user_id: Uuid,
        series_id: MediaId,
    ) -> Result<Vec<EpisodeKey>> {
        let rows = sqlx::query(
            r#"
            SELECT season_number, episode_number
            FROM watched_episodes
            WHERE user_id = $1 AND series_id = $2
            ORDER BY season_number, episode_number
            "#,
        )
        .bind(user_id)
        .bind(series_id)
        .fetch_all(self.pool())
        .await?;

        let mut episodes = Vec::with_capacity(rows.len());
        for row in rows {
            let season: i32 = row.try_get("season_number")?;
            let episode: i32 = row.try_get("episode_number")?;
            episodes.push(EpisodeKey {
                season_number: season as u16,
                episode_number: episode as u16,
            });
        }
        Ok(episodes)
    }

    async fn count_watched_episodes(
        &self,
        user_id: Uuid,
        series_id: MediaId,
    ) -> Result<u32> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS watched_count
            FROM watched_episodes
            WHERE user_id = $1 AND series_id = $2
            "#,
        )
        .bind(user_id)
        .bind(series_id)
        .fetch_one(self.pool())
        .await?;

        let count: i64 = row.try_get("watched_count")?;
        Ok(count as u32)
    }
}
