use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use cinelog_model::{UpdateProfileRequest, User, UserRole};

// User management and credentials (authentication-adjacent) repository
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Create an account. A duplicate email fails with `CoreError::Conflict`.
    async fn create_user_with_password(&self, user: &User, password_hash: &str)
    -> Result<()>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_password_hash(&self, user_id: Uuid) -> Result<Option<String>>;

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<()>;

    /// Apply the provided profile fields and return the updated user.
    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<User>;

    /// Change an account's role by email. Unknown email fails with
    /// `CoreError::NotFound`.
    async fn set_role(&self, email: &str, role: UserRole) -> Result<()>;

    /// Delete an account. Owned facts (watch state, engagement) cascade at
    /// the storage layer.
    async fn delete_user(&self, id: Uuid) -> Result<()>;
}
