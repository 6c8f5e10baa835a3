//! # amiibo-core: Pure Domain Logic for Amiibo Vault
//!
//! This crate holds everything the vault screen needs to reason about its
//! state without touching I/O: the catalog item type, the display state the
//! rendering layer reads, and the pagination state machine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Amiibo Vault Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Rendering layer (grid, banners)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ watch::Receiver<ViewState>             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              AmiiboViewModel (apps/vault)                       │   │
//! │  │    refresh, load_next_page, set_page_size, search, retry        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ amiibo-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  display  │  │ pagination │  │ validation│  │   │
//! │  │   │  Amiibo   │  │ Loading   │  │ page/size  │  │  query    │  │   │
//! │  │   │ PageSize  │  │ Success   │  │ generation │  │ page size │  │   │
//! │  │   │ ErrorKind │  │ Error     │  │ footer     │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        amiibo-sync / amiibo-db (repository + SQLite cache)      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Amiibo, PageSize, ErrorKind)
//! - [`display`] - The single display state consumed by rendering
//! - [`pagination`] - Pagination state and its transitions
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation (search query, page size)
//!
//! ## Example Usage
//!
//! ```rust
//! use amiibo_core::{PageSize, PaginationState};
//!
//! let mut state = PaginationState::default();
//! assert_eq!(state.page_size, PageSize::Twenty);
//!
//! // Nothing loaded yet, so the first load asks for page 0.
//! let request = state.begin_next_page().expect("idle state can load");
//! assert_eq!(request.page, 0);
//! assert!(state.is_loading_more);
//!
//! // A second call while the first is in flight is ignored.
//! assert!(state.begin_next_page().is_none());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod display;
pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use display::{DisplayState, ErrorPresentation};
pub use error::{AmiiboError, AmiiboResult, ValidationError};
pub use pagination::{should_load_more, ListFooter, PageFetch, PageRequest, PaginationState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// How close (in items) the viewport must get to the end of the grid before
/// the next page is requested.
pub const LOAD_MORE_THRESHOLD: usize = 6;

/// Maximum accepted length of a search query, in characters.
pub const MAX_QUERY_LENGTH: usize = 100;
