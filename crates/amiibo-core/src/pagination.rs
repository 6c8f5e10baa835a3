//! # Pagination State
//!
//! Client-side pagination over the local cache.
//!
//! ## Load-More Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Pagination State Machine                             │
//! │                                                                         │
//! │            begin_next_page()                                            │
//! │   ┌──────┐ ───────────────────► ┌─────────────┐                         │
//! │   │ Idle │                      │ LoadingMore │                         │
//! │   └──────┘ ◄─────────────────── └──────┬──────┘                         │
//! │      ▲        finish(items)            │ fail(message)                  │
//! │      │                                 ▼                                │
//! │      │      retry()          ┌─────────────────┐                        │
//! │      └────────────────────── │ PaginationError │                        │
//! │                              └─────────────────┘                        │
//! │                                                                         │
//! │  Guards on begin_next_page():                                          │
//! │  • already loading        → ignored                                    │
//! │  • no more pages          → ignored                                    │
//! │  • unresolved error       → ignored (user must retry)                  │
//! │                                                                         │
//! │  reset() starts a new generation: results of requests issued before    │
//! │  the reset are dropped by finish()/fail().                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous and pure. The view-state holder performs
//! the actual fetch between `begin_*` and `finish`/`fail`.

use crate::types::{Amiibo, PageSize};
use crate::LOAD_MORE_THRESHOLD;

// =============================================================================
// Requests and Results
// =============================================================================

/// A page fetch the holder must perform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,

    /// Page size at the time of the request.
    pub page_size: PageSize,

    /// Active search query; `None` means "browse the whole cache".
    pub query: Option<String>,

    /// Pagination generation the request belongs to.
    pub generation: u64,
}

impl PageRequest {
    pub fn is_first_page(&self) -> bool {
        self.page == 0
    }
}

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFetch {
    pub items: Vec<Amiibo>,

    /// Whether pages exist beyond the fetched one.
    pub has_more: bool,
}

// =============================================================================
// Pagination State
// =============================================================================

/// Mutable pagination bookkeeping owned by the view-state holder.
///
/// ## Invariants
/// - `current_page` only advances after a non-empty fetch succeeds
/// - `loaded_items` is emptied whenever page size or query changes
/// - `is_loading_more` and `pagination_error` are never both set once a
///   fetch cycle has finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub page_size: PageSize,
    pub current_page: u32,
    pub loaded_items: Vec<Amiibo>,
    pub has_more_pages: bool,
    pub is_loading_more: bool,
    pub pagination_error: Option<String>,

    /// Normalized search query (`None` when blank).
    pub query: Option<String>,

    /// Bumped by every reset.
    pub generation: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        PaginationState::new(PageSize::default())
    }
}

impl PaginationState {
    /// Creates an idle state with no items.
    pub fn new(page_size: PageSize) -> Self {
        PaginationState {
            page_size,
            current_page: 0,
            loaded_items: Vec::new(),
            has_more_pages: true,
            is_loading_more: false,
            pagination_error: None,
            query: None,
            generation: 0,
        }
    }

    /// Clears loaded items and any pending error, and starts a new
    /// generation. Page size and query are kept.
    pub fn reset(&mut self) {
        self.current_page = 0;
        self.loaded_items.clear();
        self.has_more_pages = true;
        self.is_loading_more = false;
        self.pagination_error = None;
        self.generation += 1;
    }

    /// Switches page size and resets.
    ///
    /// ## Returns
    /// `false` (and no change) when `size` equals the current size.
    pub fn set_page_size(&mut self, size: PageSize) -> bool {
        if size == self.page_size {
            return false;
        }
        self.page_size = size;
        self.reset();
        true
    }

    /// Replaces the search query and resets.
    pub fn set_query(&mut self, query: Option<String>) {
        self.query = query;
        self.reset();
    }

    /// Whether `begin_next_page` would start a fetch.
    pub fn can_load_more(&self) -> bool {
        !self.is_loading_more && self.has_more_pages && self.pagination_error.is_none()
    }

    /// Marks a next-page fetch as in flight.
    ///
    /// Asks for page 0 while nothing is loaded, so a failed first page is
    /// never skipped.
    ///
    /// ## Returns
    /// The request to perform, or `None` when a guard blocks the load
    /// (state is then left untouched).
    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        if !self.can_load_more() {
            return None;
        }
        self.is_loading_more = true;
        self.pagination_error = None;
        let page = if self.loaded_items.is_empty() {
            0
        } else {
            self.current_page + 1
        };
        Some(self.request(page))
    }

    /// Marks a page-0 fetch as in flight. Callers reset first.
    pub fn begin_first_page(&mut self) -> PageRequest {
        self.is_loading_more = true;
        self.pagination_error = None;
        self.request(0)
    }

    /// Resets and marks page 0 as in flight in one step.
    pub fn restart(&mut self) -> PageRequest {
        self.reset();
        self.begin_first_page()
    }

    fn request(&self, page: u32) -> PageRequest {
        PageRequest {
            page,
            page_size: self.page_size,
            query: self.query.clone(),
            generation: self.generation,
        }
    }

    /// True when `request` was issued in the current generation.
    pub fn is_current(&self, request: &PageRequest) -> bool {
        request.generation == self.generation
    }

    /// Applies a successful fetch.
    ///
    /// ## Behavior
    /// - page 0: replaces `loaded_items`
    /// - page n, non-empty: appends and advances `current_page`
    /// - page n, empty: marks the end of the list
    ///
    /// ## Returns
    /// `false` when the request is stale; nothing is applied.
    pub fn finish(&mut self, request: &PageRequest, fetch: PageFetch) -> bool {
        if !self.is_current(request) {
            return false;
        }
        self.is_loading_more = false;

        if request.is_first_page() {
            self.current_page = 0;
            self.loaded_items = fetch.items;
            self.has_more_pages = fetch.has_more;
        } else if fetch.items.is_empty() {
            self.has_more_pages = false;
        } else {
            self.loaded_items.extend(fetch.items);
            self.current_page = request.page;
            self.has_more_pages = fetch.has_more;
        }
        true
    }

    /// Records a failed fetch without touching items or page.
    ///
    /// Page-0 failures are reported through the display state instead, so
    /// only next-page failures set `pagination_error`.
    ///
    /// ## Returns
    /// `false` when the request is stale.
    pub fn fail(&mut self, request: &PageRequest, message: impl Into<String>) -> bool {
        if !self.is_current(request) {
            return false;
        }
        self.is_loading_more = false;
        if !request.is_first_page() {
            self.pagination_error = Some(message.into());
        }
        true
    }

    /// Clears a pending pagination error so the next load can run.
    pub fn clear_error(&mut self) {
        self.pagination_error = None;
    }

    /// What to draw after the last grid cell.
    pub fn footer(&self) -> ListFooter {
        if self.is_loading_more {
            ListFooter::Loading
        } else if let Some(message) = &self.pagination_error {
            ListFooter::Error(message.clone())
        } else if !self.has_more_pages && !self.loaded_items.is_empty() {
            ListFooter::EndOfList(self.loaded_items.len())
        } else {
            ListFooter::None
        }
    }
}

// =============================================================================
// Rendering Helpers
// =============================================================================

/// Trailing element of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFooter {
    None,
    /// Spinner spanning the full row.
    Loading,
    /// Inline error with a retry button.
    Error(String),
    /// "End of list (N items)".
    EndOfList(usize),
}

/// Decides whether scrolling has come close enough to the end of the grid
/// to request the next page.
///
/// ## Arguments
/// * `last_visible_index` - index of the last visible cell (0 when none)
/// * `total_items` - number of cells currently in the grid
/// * `state` - pagination state the guards are read from
pub fn should_load_more(
    last_visible_index: usize,
    total_items: usize,
    state: &PaginationState,
) -> bool {
    total_items > 0
        && last_visible_index + LOAD_MORE_THRESHOLD >= total_items
        && state.can_load_more()
}

// =============================================================================
// Unit Tests
// =============================================================================
