use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::database::infrastructure::postgres::repositories::media::map_media_row;
use crate::database::ports::engagement::EngagementRepository;
use crate::error::{CoreError, Result};
use cinelog_model::{Comment, CommentPage, Media, MediaId, Rating};

/// Writable-CTE presence flip: delete-if-present, otherwise insert, in one
/// statement. Same hardening as the episode toggle.
const FLIP_WATCHLIST_SQL: &str = r#"
    WITH deleted AS (
        DELETE FROM watchlist
        WHERE user_id = $1 AND media_id = $2
        RETURNING 1
    ), inserted AS (
        INSERT INTO watchlist (user_id, media_id)
        SELECT $1, $2
        WHERE NOT EXISTS (SELECT 1 FROM deleted)
        ON CONFLICT (user_id, media_id) DO NOTHING
        RETURNING 1
    )
    SELECT EXISTS (SELECT 1 FROM inserted) AS present
"#;

const FLIP_FAVORITE_SQL: &str = r#"
    WITH deleted AS (
        DELETE FROM favorites
        WHERE user_id = $1 AND media_id = $2
        RETURNING 1
    ), inserted AS (
        INSERT INTO favorites (user_id, media_id)
        SELECT $1, $2
        WHERE NOT EXISTS (SELECT 1 FROM deleted)
        ON CONFLICT (user_id, media_id) DO NOTHING
        RETURNING 1
    )
    SELECT EXISTS (SELECT 1 FROM inserted) AS present
"#;

#[derive(Clone, Debug)]
pub struct PostgresEngagementRepository {
    pool: PgPool,
}

impl PostgresEngagementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn toggle_presence(
        &self,
        sql: &str,
        user_id: Uuid,
        media_id: MediaId,
    ) -> Result<bool> {
        let row = sqlx::query(sql)
            .bind(user_id)
            .bind(media_id)
            .fetch_one(self.pool())
            .await
            .map_err(|e| unknown_media(e, media_id))?;
        Ok(row.try_get("present")?)
    }

    async fn list_marked(&self, sql: &str, user_id: Uuid) -> Result<Vec<Media>> {
        let rows = sqlx::query(sql).bind(user_id).fetch_all(self.pool()).await?;
        rows.iter().map(map_media_row).collect()
    }
}

/// Engagement rows reference the catalog table; a foreign-key failure means
/// the media id was never synced or searched into the catalog.
fn unknown_media(err: sqlx::Error, media_id: MediaId) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return CoreError::NotFound(format!("media {media_id} is not in the catalog"));
        }
    }
    err.into()
}

#[async_trait]
impl EngagementRepository for PostgresEngagementRepository {
    async fn toggle_watchlist(&self, user_id: Uuid, media_id: MediaId) -> Result<bool> {
        self.toggle_presence(FLIP_WATCHLIST_SQL, user_id, media_id)
            .await
    }

    async fn toggle_favorite(&self, user_id: Uuid, media_id: MediaId) -> Result<bool> {
        self.toggle_presence(FLIP_FAVORITE_SQL, user_id, media_id)
            .await
    }

    async fn list_watchlist(&self, user_id: Uuid) -> Result<Vec<Media>> {
        self.list_marked(
            r#"
            SELECT m.id, m.media_type, m.title, m.description,
                   m.release_date, m.poster_url, m.created_at, m.updated_at
            FROM media m
            JOIN watchlist w ON m.id = w.media_id
            WHERE w.user_id = $1
            ORDER BY w.added_at DESC
            "#,
            user_id,
        )
        .await
    }

    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<Media>> {
        self.list_marked(
            r#"
            SELECT m.id, m.media_type, m.title, m.description,
                   m.release_date, m.poster_url, m.created_at, m.updated_at
            FROM media m
            JOIN favorites f ON m.id = f.media_id
            WHERE f.user_id = $1
            ORDER BY f.added_at DESC
            "#,
            user_id,
        )
        .await
    }

    async fn upsert_rating(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        score: i32,
        review: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ratings (user_id, media_id, score, review, updated_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (user_id, media_id) DO UPDATE SET
                score = EXCLUDED.score,
                review = EXCLUDED.review,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id)
        .bind(media_id)
        .bind(score)
        .bind(review)
        .execute(self.pool())
        .await
        .map_err(|e| unknown_media(e, media_id))?;
        Ok(())
    }

    async fn get_rating(&self, user_id: Uuid, media_id: MediaId) -> Result<Option<Rating>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, media_id, score, review, updated_at
            FROM ratings
            WHERE user_id = $1 AND media_id = $2
            "#,
        )
        .bind(user_id)
        .bind(media_id)
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| {
            Ok(Rating {
                user_id: row.try_get("user_id")?,
                media_id: row.try_get("media_id")?,
                score: row.try_get("score")?,
                review: row.try_get("review")?,
                updated_at: row.try_get("updated_at")?,
            })
        })
        .transpose()
    }

    async fn add_comment(
        &self,
        user_id: Uuid,
        media_id: MediaId,
        body: &str,
    ) -> Result<Comment> {
        let row = sqlx::query(
            r#"
            INSERT INTO comments (user_id, media_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, media_id, body, created_at
            "#,
        )
        .bind(user_id)
        .bind(media_id)
        .bind(body)
        .fetch_one(self.pool())
        .await
        .map_err(|e| unknown_media(e, media_id))?;

        Ok(Comment {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            media_id: row.try_get("media_id")?,
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
        })
    }

    async fn list_comments(
        &self,
        media_id: MediaId,
        page: CommentPage,
    ) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, media_id, body, created_at
            FROM comments
            WHERE media_id = $1 AND ($2::bigint IS NULL OR id < $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(media_id)
        .bind(page.before_id)
        .bind(i64::from(page.limit))
        .fetch_all(self.pool())
        .await?;

        let mut comments = Vec::with_capacity(rows.len());
        for row in rows {
            comments.push(Comment {
                id: row.try_get("id")?,
                user_id: row.try_get("user_id")?,
                media_id: row.try_get("media_id")?,
                body: row.try_get("body")?,
                created_at: row.try_get("created_at")?,
            });
        }
        Ok(comments)
    }
}
