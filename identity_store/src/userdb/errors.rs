use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by [`UserStore`](crate::UserStore) operations
#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("No user with email: {email}")]
    UserEmailNotFound { email: String },

    #[error("User ID already taken: {user_id}")]
    UserIdTaken { user_id: String },

    #[error("Email already taken: {email}")]
    UserEmailTaken { email: String },

    #[error("Validation token not found")]
    ValidationTokenNotFound,

    #[error("API key not found: {name}")]
    ApiKeyNotFound { name: String },

    #[error("API key name already in use: {name}")]
    ApiKeyNameConflict { name: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Unclassified error from the query executor
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<serde_json::Error> for UserError {
    fn from(err: serde_json::Error) -> Self {
        UserError::InvalidData(err.to_string())
    }
}

impl From<StorageError> for UserError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(e) => UserError::Database(e),
            StorageError::Serde(msg) => UserError::InvalidData(msg),
            StorageError::Storage(msg) | StorageError::Config(msg) => UserError::Storage(msg),
        }
    }
}
