//! # Input Validation
//!
//! Normalization and validation of user input before it reaches the
//! pagination state.
//!
//! ## Validation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Search field "  mario "  ──► normalize_query ──► Some("mario")        │
//! │  Search field "   "       ──► normalize_query ──► None (browse all)    │
//! │  Page selector 50         ──► validate_page_size ──► PageSize::Fifty   │
//! │  Page selector 30         ──► validate_page_size ──► PageSizeNotAllowed│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::PageSize;
use crate::MAX_QUERY_LENGTH;

/// Trims a search query; a blank query means "no search".
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Validates and normalizes a search query.
///
/// ## Returns
/// * `Ok(None)` - blank query
/// * `Ok(Some(q))` - trimmed query
/// * `Err(QueryTooLong)` - more than [`MAX_QUERY_LENGTH`] characters
pub fn validate_query(query: &str) -> Result<Option<String>, ValidationError> {
    let normalized = normalize_query(query);
    if let Some(q) = &normalized {
        if q.chars().count() > MAX_QUERY_LENGTH {
            return Err(ValidationError::QueryTooLong {
                max: MAX_QUERY_LENGTH,
            });
        }
    }
    Ok(normalized)
}

/// Validates a raw page size against the allowed set.
pub fn validate_page_size(value: u32) -> Result<PageSize, ValidationError> {
    PageSize::try_from(value)
}

/// Parses a page size typed by the user (e.g. `"50"`).
pub fn parse_page_size(input: &str) -> Result<PageSize, ValidationError> {
    let value: u32 = input
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| ValidationError::InvalidFormat {
            field: "page_size".to_string(),
            reason: e.to_string(),
        })?;
    validate_page_size(value)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  mario "), Some("mario".to_string()));
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query(" \t "), None);
    }

    #[test]
    fn test_validate_query_length() {
        assert!(validate_query(&"a".repeat(MAX_QUERY_LENGTH)).is_ok());
        assert_eq!(
            validate_query(&"a".repeat(MAX_QUERY_LENGTH + 1)),
            Err(ValidationError::QueryTooLong {
                max: MAX_QUERY_LENGTH
            })
        );
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("50").unwrap(), PageSize::Fifty);
        assert_eq!(parse_page_size(" 100 ").unwrap(), PageSize::Hundred);
        assert!(matches!(
            parse_page_size("lots"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_page_size("30"),
            Err(ValidationError::PageSizeNotAllowed { .. })
        ));
    }
}
