use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::database::ports::media::MediaRepository;
use crate::error::{CoreError, Result};
use cinelog_model::{Media, MediaId, MediaType, MediaUpsert};

#[derive(Clone, Debug)]
pub struct PostgresMediaRepository {
    pool: PgPool,
}

impl PostgresMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn map_media_row(row: &PgRow) -> Result<Media> {
    let media_type: String = row.try_get("media_type")?;
    let media_type = media_type
        .parse::<MediaType>()
        .map_err(CoreError::Internal)?;
    Ok(Media {
        id: row.try_get("id")?,
        media_type,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        release_date: row.try_get("release_date")?,
        poster_url: row.try_get("poster_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl MediaRepository for PostgresMediaRepository {
    async fn upsert(&self, media: &MediaUpsert) -> Result<()> {
        // The merge keeps the row's original title and type; sync listings
        // occasionally carry truncated titles for rows search already stored.
        sqlx::query(
            r#"
            INSERT INTO media (id, media_type, title, description, release_date, poster_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                description = EXCLUDED.description,
                release_date = EXCLUDED.release_date,
                poster_url = EXCLUDED.poster_url,
                updated_at = now()
            "#,
        )
        .bind(media.id)
        .bind(media.media_type.as_str())
        .bind(&media.title)
        .bind(&media.description)
        .bind(media.release_date)
        .bind(&media.poster_url)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    async fn get(&self, id: MediaId) -> Result<Option<Media>> {
        let row = sqlx::query(
            r#"
            SELECT id, media_type, title, description,
                   release_date, poster_url, created_at, updated_at
            FROM media
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_media_row).transpose()
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<Media>> {
        let rows = sqlx::query(
            r#"
            SELECT id, media_type, title, description,
                   release_date, poster_url, created_at, updated_at
            FROM media
            ORDER BY release_date DESC NULLS LAST, id
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(map_media_row).collect()
    }

    async fn search_title(&self, query: &str, limit: u32) -> Result<Vec<Media>> {
        let rows = sqlx::query(
            r#"
            SELECT id, media_type, title, description,
                   release_date, poster_url, created_at, updated_at
            FROM media
            WHERE title ILIKE '%' || $1 || '%'
            ORDER BY release_date DESC NULLS LAST, id
            LIMIT $2
            "#,
        )
        .bind(query)
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(map_media_row).collect()
    }
}
