//! # Domain Types
//!
//! Core domain types used throughout Amiibo Vault.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Amiibo      │   │    PageSize     │   │   ErrorKind     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (head+tail) │   │  Twenty (dflt)  │   │  Network   ↻    │       │
//! │  │  name           │   │  Fifty          │   │  Parse     ✗    │       │
//! │  │  game_series    │   │  Hundred        │   │  Database  ↻    │       │
//! │  │  image_url      │   │                 │   │  Unknown   ↻    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                 ↻ = retryable           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// =============================================================================
// Amiibo
// =============================================================================

/// A collectible figure as stored in the local cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amiibo {
    /// Catalog identifier: the figure's `head` and `tail` hex codes joined.
    pub id: String,

    /// Display name shown on the grid card.
    pub name: String,

    /// Game series the character comes from (e.g., "Super Mario").
    pub game_series: String,

    /// Product line the figure was released in.
    pub amiibo_series: String,

    /// Character depicted by the figure.
    pub character: String,

    /// Remote image location. Decoding is the image loader's job.
    pub image_url: String,

    /// Product type ("Figure", "Card", "Yarn", ...).
    pub amiibo_type: String,
}

// =============================================================================
// Page Size
// =============================================================================

/// The enumerated set of page sizes the user can pick from.
///
/// Serialized as the plain number so config files can say `page_size = 50`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    #[default]
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    /// Every allowed size, in the order the selector lists them.
    pub const ALL: [PageSize; 3] = [PageSize::Twenty, PageSize::Fifty, PageSize::Hundred];

    /// Returns the number of items per page.
    #[inline]
    pub const fn get(self) -> u32 {
        match self {
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    /// Looks up the size matching `value`, if it is in the allowed set.
    pub fn from_value(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.get() == value)
    }

    /// Allowed values as plain numbers (for error messages and selectors).
    pub fn allowed_values() -> Vec<u32> {
        Self::ALL.iter().map(|size| size.get()).collect()
    }

    /// Row offset of the first item on `page`.
    #[inline]
    pub const fn offset(self, page: u32) -> u64 {
        page as u64 * self.get() as u64
    }
}

impl TryFrom<u32> for PageSize {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        PageSize::from_value(value).ok_or_else(|| ValidationError::PageSizeNotAllowed {
            requested: value,
            allowed: PageSize::allowed_values(),
        })
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

// =============================================================================
// Error Kind
// =============================================================================

/// Category of a full-refresh failure.
///
/// ## Retryability
/// ```text
/// Network  → retryable      (connection may come back)
/// Parse    → NOT retryable  (payload needs a fix upstream)
/// Database → retryable      (space may be freed, lock released)
/// Unknown  → retryable      (worth another try)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Parse,
    Database,
    Unknown,
}

impl ErrorKind {
    /// Whether re-attempting the same operation may succeed on its own.
    pub const fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::Parse)
    }

    /// Icon the rendering layer shows next to the error message.
    pub const fn icon(self) -> ErrorIcon {
        match self {
            ErrorKind::Network => ErrorIcon::CloudOff,
            ErrorKind::Parse => ErrorIcon::Warning,
            ErrorKind::Database => ErrorIcon::Storage,
            ErrorKind::Unknown => ErrorIcon::Error,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::Database => write!(f, "database"),
            ErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Symbolic icon for an error kind. The rendering layer maps it to artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorIcon {
    CloudOff,
    Warning,
    Storage,
    Error,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_values() {
        assert_eq!(PageSize::default(), PageSize::Twenty);
        assert_eq!(PageSize::allowed_values(), vec![20, 50, 100]);
        assert_eq!(PageSize::Fifty.offset(3), 150);
    }

    #[test]
    fn test_page_size_try_from() {
        assert_eq!(PageSize::try_from(100).unwrap(), PageSize::Hundred);

        let err = PageSize::try_from(30).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::PageSizeNotAllowed { requested: 30, .. }
        ));
    }

    #[test]
    fn test_page_size_serializes_as_number() {
        assert_eq!(serde_json::to_string(&PageSize::Fifty).unwrap(), "50");
        let size: PageSize = serde_json::from_str("100").unwrap();
        assert_eq!(size, PageSize::Hundred);
        assert!(serde_json::from_str::<PageSize>("25").is_err());
    }

    #[test]
    fn test_error_kind_retryability() {
        assert!(ErrorKind::Network.is_retryable());
        assert!(!ErrorKind::Parse.is_retryable());
        assert!(ErrorKind::Database.is_retryable());
        assert!(ErrorKind::Unknown.is_retryable());
    }

    #[test]
    fn test_error_kind_icons() {
        assert_eq!(ErrorKind::Network.icon(), ErrorIcon::CloudOff);
        assert_eq!(ErrorKind::Parse.icon(), ErrorIcon::Warning);
        assert_eq!(ErrorKind::Database.icon(), ErrorIcon::Storage);
        assert_eq!(ErrorKind::Unknown.icon(), ErrorIcon::Error);
    }
}
