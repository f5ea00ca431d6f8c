use thiserror::Error;

/// Errors that can occur during archive operations.
#[derive(Error, Debug)]
pub enum KioskError {
    #[error("invalid date '{value}': {message}")]
    InvalidDate { value: String, message: String },

    #[error("{collection} already contains a record with id {id}")]
    DuplicateId { collection: String, id: String },

    #[error("{collection} has no record with id {id}")]
    NotFound { collection: String, id: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("store error: {message} (path: {path})")]
    Store { message: String, path: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("prompt error: {message}")]
    Prompt { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for KioskError {
    fn from(err: dialoguer::Error) -> Self {
        KioskError::Prompt {
            message: err.to_string(),
        }
    }
}

/// Convenience alias for results using `KioskError`.
pub type Result<T> = std::result::Result<T, KioskError>;
