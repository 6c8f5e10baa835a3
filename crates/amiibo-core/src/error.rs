//! # Error Types
//!
//! Domain-specific error types for amiibo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  amiibo-core errors (this file)                                        │
//! │  ├── AmiiboError      - Typed repository failure (4 kinds)             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  amiibo-db errors (separate crate)                                     │
//! │  └── DbError          - SQLite failures, folded into                   │
//! │                         AmiiboError::Database at the repository edge   │
//! │                                                                         │
//! │  Flow: DbError / io / serde_json → AmiiboError → DisplayState::Error   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every repository failure is an `AmiiboError`, so the display layer
//!    always has a kind and a retryability flag to show
//! 3. Messages are user-facing; context goes into the tracing span instead

use thiserror::Error;

use crate::types::ErrorKind;

// =============================================================================
// Amiibo Error
// =============================================================================

/// Failure of a repository operation (refresh, page fetch, search).
///
/// ## When Each Variant Occurs
/// - `Network`: catalog source unreachable or unreadable
/// - `Parse`: catalog payload is malformed
/// - `Database`: local cache query or write failed
/// - `Unknown`: anything else (e.g., the fetch task panicked)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmiiboError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid catalog data: {0}")]
    Parse(String),

    #[error("Local cache error: {0}")]
    Database(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl AmiiboError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        AmiiboError::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        AmiiboError::Parse(message.into())
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        AmiiboError::Database(message.into())
    }

    /// Creates an error of unknown origin.
    pub fn unknown(message: impl Into<String>) -> Self {
        AmiiboError::Unknown(message.into())
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AmiiboError::Network(_) => ErrorKind::Network,
            AmiiboError::Parse(_) => ErrorKind::Parse,
            AmiiboError::Database(_) => ErrorKind::Database,
            AmiiboError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Shortcut for `self.kind().is_retryable()`.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Page size is not one of the enumerated options.
    #[error("Page size {requested} is not allowed (expected one of {allowed:?})")]
    PageSizeNotAllowed { requested: u32, allowed: Vec<u32> },

    /// Search query is longer than the accepted maximum.
    #[error("Search query must be at most {max} characters")]
    QueryTooLong { max: usize },

    /// Value could not be parsed.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for repository results.
pub type AmiiboResult<T> = Result<T, AmiiboError>;

// =============================================================================
// Unit Tests
// =============================================================================
