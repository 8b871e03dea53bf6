use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(#[from] cinelog_model::ValidationError),

    #[error("conflict: {0}")]
    Conflict(String),

    /// Transient storage failure. Propagated untouched; retry policy belongs
    /// to the caller.
    #[error("storage error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("metadata provider error: {0}")]
    Provider(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
