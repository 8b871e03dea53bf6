//! User accounts and authentication payloads.
//!
//! Passwords are hashed with Argon2id before they reach storage; the hash is
//! kept out of [`User`] entirely so it can never be serialized into a
//! response. Access tokens are HS256 JWTs carrying [`Claims`].

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Account role. Admins may promote other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "USER" => Ok(UserRole::User),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered account. The credential hash lives in its own storage column
/// and never appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub theme: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Signup payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub theme: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_name(&self.first_name)?;
        validate_name(&self.last_name)?;
        Ok(())
    }
}

/// Login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password change payload. The new password must differ from the current one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.current_password == self.new_password {
            return Err(ValidationError::PasswordUnchanged);
        }
        validate_password(&self.new_password)
    }
}

/// Profile update payload; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.first_name {
            validate_name(name)?;
        }
        if let Some(name) = &self.last_name {
            validate_name(name)?;
        }
        Ok(())
    }
}

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// Token id
    pub jti: String,
}

/// Token response returned after signup and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    /// Seconds until the access token expires
    pub expires_in: u32,
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() || name.len() > 100 {
        return Err(ValidationError::InvalidName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            theme: None,
        }
    }

    #[test]
    fn register_validation() {
        assert!(register("ada@example.com", "correcthorse").validate().is_ok());
        assert_eq!(
            register("not-an-email", "correcthorse").validate(),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            register("ada@example.com", "short").validate(),
            Err(ValidationError::PasswordTooShort)
        );
    }

    #[test]
    fn change_password_must_differ() {
        let request = ChangePasswordRequest {
            current_password: "hunter2hunter2".to_string(),
            new_password: "hunter2hunter2".to_string(),
        };
        assert_eq!(request.validate(), Err(ValidationError::PasswordUnchanged));
    }

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
        assert!("ROOT".parse::<UserRole>().is_err());
    }
}
