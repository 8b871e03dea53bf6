use thiserror::Error;

/// Validation errors for user-supplied input.
///
/// These are produced by the `validate()` methods on request types before any
/// storage operation runs; callers map them onto their own error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password too short: minimum 8 characters required")]
    PasswordTooShort,

    #[error("new password must differ from the current password")]
    PasswordUnchanged,

    #[error("invalid name: must be 1-100 characters")]
    InvalidName,

    #[error("rating score {0} out of range: must be between 1 and 10")]
    RatingOutOfRange(i32),

    #[error("comment text must not be empty")]
    EmptyComment,
}
