use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, NavError>;

/// Navigator error types.
#[derive(Debug, Error)]
pub enum NavError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A location the file service does not know about.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A location outside the file service's namespace.
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Target of a create/rename already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Metadata (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
