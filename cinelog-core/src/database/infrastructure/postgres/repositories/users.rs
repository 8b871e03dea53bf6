use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::database::ports::users::UsersRepository;
use crate::error::{CoreError, Result};
use cinelog_model::{UpdateProfileRequest, User, UserRole};

#[derive(Clone, Debug)]
pub struct PostgresUsersRepository {
    pool: PgPool,
}

impl PostgresUsersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_user_row(row: &PgRow) -> Result<User> {
    let role: String = row.try_get("role")?;
    let role = role.parse::<UserRole>().map_err(CoreError::Internal)?;
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        role,
        theme: row.try_get("theme")?,
        avatar_url: row.try_get("avatar_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, role, theme, avatar_url, created_at, updated_at";

#[async_trait]
impl UsersRepository for PostgresUsersRepository {
    async fn create_user_with_password(
        &self,
        user: &User,
        password_hash: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, role, theme, avatar_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(&user.theme)
        .bind(&user.avatar_url)
        .execute(self.pool())
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return CoreError::Conflict(format!(
                        "email {} is already registered",
                        user.email
                    ));
                }
            }
            e.into()
        })?;

        info!("User {} registered as {}", user.id, user.email);
        Ok(())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>> {
        let row = sqlx::query("SELECT password_hash FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| Ok(row.try_get("password_hash")?)).transpose()
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<User> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                theme = COALESCE($4, theme),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.theme)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => map_user_row(&row),
            None => Err(CoreError::NotFound(format!("user {user_id}"))),
        }
    }

    async fn set_role(&self, email: &str, role: UserRole) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET role = $2, updated_at = now()
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .bind(role.as_str())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("no user with email {email}")));
        }

        info!("User {} role set to {}", email, role);
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!("user {id}")));
        }

        info!("User {} deleted with all owned facts", id);
        Ok(())
    }
}
