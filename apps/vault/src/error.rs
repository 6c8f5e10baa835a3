//! # Application Error Type
//!
//! Failures that stop the vault from starting.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Amiibo Vault                           │
//! │                                                                         │
//! │  Start-up (lib.rs::run)                                                │
//! │       │                                                                 │
//! │       ├── vault.toml unreadable / invalid ──► AppError::Config         │
//! │       ├── cache can't open / migrate ──────► AppError::Database        │
//! │       └── initial snapshot read fails ─────► AppError::Repository      │
//! │                                                                         │
//! │  Runtime (after start-up)                                              │
//! │       │                                                                 │
//! │       └── fetch failures never surface here: the holder turns them     │
//! │           into DisplayState::Error or a pagination error               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use amiibo_core::AmiiboError;
use amiibo_db::DbError;
use thiserror::Error;

/// Start-up and I/O errors of the vault binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The local cache could not be opened.
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    /// The repository could not be built.
    #[error("Repository error: {0}")]
    Repository(#[from] AmiiboError),

    /// Terminal or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type for vault start-up.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_error_becomes_config() {
        let err: AppError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_db_error_wraps() {
        let err: AppError = DbError::PoolExhausted.into();
        assert_eq!(err.to_string(), "Database error: Connection pool exhausted");
    }
}
