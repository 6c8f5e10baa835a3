//! # Display State
//!
//! The one value the rendering layer reads to decide what to draw.
//!
//! ## Screen States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Screen State Machine                             │
//! │                                                                         │
//! │   ┌──────────┐  first page / cache   ┌────────────────────────────┐    │
//! │   │ Loading  │ ────────────────────► │ Success { items,           │    │
//! │   └────┬─────┘                       │           is_refreshing }  │    │
//! │        │                             └─────────┬──────────▲───────┘    │
//! │        │ refresh failed                        │          │            │
//! │        │                       refresh failed  │          │ retry ok   │
//! │        ▼                                       ▼          │            │
//! │   ┌─────────────────────────────────────────────────────────────┐      │
//! │   │ Error { message, kind, is_retryable, cached_items }         │      │
//! │   │   cached_items empty     → full-screen error                │      │
//! │   │   cached_items non-empty → banner above the cached grid     │      │
//! │   └─────────────────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::error::AmiiboError;
use crate::types::{Amiibo, ErrorIcon, ErrorKind};

/// What the screen shows. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState {
    /// Nothing cached yet and a load is in progress.
    #[default]
    Loading,

    /// Items are available. `is_refreshing` drives the pull-to-refresh
    /// indicator while a full refresh runs behind the grid.
    Success {
        items: Vec<Amiibo>,
        is_refreshing: bool,
    },

    /// A full refresh (or first-page load) failed.
    Error {
        message: String,
        kind: ErrorKind,
        is_retryable: bool,
        cached_items: Vec<Amiibo>,
    },
}

/// How an [`DisplayState::Error`] should be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPresentation {
    /// No cached items: the error takes the whole screen.
    FullScreen,
    /// Cached items exist: a banner sits above the cached grid.
    Banner,
}

impl DisplayState {
    /// Settled success state.
    pub fn success(items: Vec<Amiibo>) -> Self {
        DisplayState::Success {
            items,
            is_refreshing: false,
        }
    }

    /// Success state with the refresh indicator on.
    pub fn refreshing(items: Vec<Amiibo>) -> Self {
        DisplayState::Success {
            items,
            is_refreshing: true,
        }
    }

    /// Error state derived from a typed failure.
    ///
    /// Kind and retryability always come from the error itself, so the two
    /// can never disagree.
    pub fn from_error(err: &AmiiboError, cached_items: Vec<Amiibo>) -> Self {
        let kind = err.kind();
        DisplayState::Error {
            message: err.to_string(),
            kind,
            is_retryable: kind.is_retryable(),
            cached_items,
        }
    }

    /// Items currently visible: the grid for `Success`, the cached grid for
    /// `Error`, nothing for `Loading`.
    pub fn items(&self) -> &[Amiibo] {
        match self {
            DisplayState::Loading => &[],
            DisplayState::Success { items, .. } => items,
            DisplayState::Error { cached_items, .. } => cached_items,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, DisplayState::Loading)
    }

    /// True only for a `Success` with the refresh indicator on.
    pub fn is_refreshing(&self) -> bool {
        matches!(
            self,
            DisplayState::Success {
                is_refreshing: true,
                ..
            }
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DisplayState::Error { .. })
    }

    /// Layout for an error state; `None` for the other variants.
    pub fn presentation(&self) -> Option<ErrorPresentation> {
        match self {
            DisplayState::Error { cached_items, .. } if cached_items.is_empty() => {
                Some(ErrorPresentation::FullScreen)
            }
            DisplayState::Error { .. } => Some(ErrorPresentation::Banner),
            _ => None,
        }
    }

    /// Icon for an error state; `None` for the other variants.
    pub fn error_icon(&self) -> Option<ErrorIcon> {
        match self {
            DisplayState::Error { kind, .. } => Some(kind.icon()),
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn figure(id: &str) -> Amiibo {
        Amiibo {
            id: id.to_string(),
            name: format!("Figure {}", id),
            game_series: "Super Mario".to_string(),
            amiibo_series: "Super Mario Bros.".to_string(),
            character: "Mario".to_string(),
            image_url: format!("https://example.test/{}.png", id),
            amiibo_type: "Figure".to_string(),
        }
    }

    #[test]
    fn test_default_is_loading() {
        let state = DisplayState::default();
        assert!(state.is_loading());
        assert!(state.items().is_empty());
        assert_eq!(state.presentation(), None);
    }

    #[test]
    fn test_from_error_carries_kind_and_retryability() {
        let state = DisplayState::from_error(&AmiiboError::parse("bad payload"), vec![]);

        match state {
            DisplayState::Error {
                ref message,
                kind,
                is_retryable,
                ref cached_items,
            } => {
                assert_eq!(message, "Invalid catalog data: bad payload");
                assert_eq!(kind, ErrorKind::Parse);
                assert!(!is_retryable);
                assert!(cached_items.is_empty());
            }
            other => panic!("expected error state, got {:?}", other),
        }
        assert_eq!(state.error_icon(), Some(ErrorIcon::Warning));
    }

    #[test]
    fn test_error_presentation_depends_on_cache() {
        let err = AmiiboError::network("offline");

        let empty = DisplayState::from_error(&err, vec![]);
        assert_eq!(empty.presentation(), Some(ErrorPresentation::FullScreen));

        let cached = DisplayState::from_error(&err, vec![figure("1")]);
        assert_eq!(cached.presentation(), Some(ErrorPresentation::Banner));
        assert_eq!(cached.items().len(), 1);
    }

    #[test]
    fn test_refreshing_flag() {
        assert!(DisplayState::refreshing(vec![figure("1")]).is_refreshing());
        assert!(!DisplayState::success(vec![figure("1")]).is_refreshing());
        assert!(!DisplayState::Loading.is_refreshing());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(DisplayState::success(vec![])).unwrap();
        assert_eq!(json["state"], "success");
        assert_eq!(json["is_refreshing"], false);
    }
}
