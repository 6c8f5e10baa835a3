//! # Amiibo View Model
//!
//! The view-state holder behind the amiibo grid: pagination, search, full
//! refresh, and the single [`DisplayState`] the rendering layer draws.
//!
//! ## State Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Holder Operations                                    │
//! │                                                                         │
//! │  User Action          Holder Method               State Change         │
//! │  ───────────          ─────────────               ────────────         │
//! │                                                                         │
//! │  Scroll near end ───► load_next_page() ─────────► append page n+1      │
//! │                                                                         │
//! │  Tap "Retry" ───────► retry_load_more() ────────► clear error, load    │
//! │                                                                         │
//! │  Pick page size ────► set_page_size(n) ─────────► reset, load page 0   │
//! │                                                                         │
//! │  Type in search ────► on_search_query_changed ──► reset, load page 0   │
//! │                                                                         │
//! │  Pull to refresh ───► refresh_amiibos() ────────► refresh, page 0      │
//! │                                                                         │
//! │  Cache changes ─────► (observer task) ──────────► Success(snapshot)    │
//! │                                                                         │
//! │  NOTE: Every write is one send_modify/send_if_modified closure on the  │
//! │        watch channel, so readers never see a half-applied update.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Methods are synchronous: they update the state, then launch the fetch on
//! the holder's [`ViewScope`]. A fetch result is applied only if its
//! generation still matches, so a page that lands after a reset is dropped.

use std::sync::Arc;

use amiibo_core::validation::{validate_page_size, validate_query};
use amiibo_core::{
    should_load_more, AmiiboError, AmiiboResult, DisplayState, ListFooter, PageFetch, PageRequest,
    PageSize, PaginationState, ValidationError,
};
use amiibo_sync::AmiiboRepository;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use super::config::ViewConfig;
use super::scope::{isolate, ViewScope};

// =============================================================================
// View State
// =============================================================================

/// Everything the rendering layer reads, published as one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub display: DisplayState,
    pub pagination: PaginationState,
}

impl ViewState {
    fn new(page_size: PageSize) -> Self {
        ViewState {
            display: DisplayState::Loading,
            pagination: PaginationState::new(page_size),
        }
    }

    /// What to draw after the last grid cell.
    pub fn footer(&self) -> ListFooter {
        self.pagination.footer()
    }
}

// =============================================================================
// Holder
// =============================================================================

/// State shared between the holder and its tasks.
struct Shared {
    repo: Arc<dyn AmiiboRepository>,
    state: watch::Sender<ViewState>,
}

/// View-state holder for the amiibo grid.
///
/// ## Usage
/// ```rust,ignore
/// let vm = AmiiboViewModel::new(repo, &ViewConfig::default());
/// let mut rx = vm.subscribe();
///
/// vm.load_next_page();
/// rx.changed().await?;
/// render(&rx.borrow().display);
/// ```
///
/// Dropping the holder aborts its observer and any fetch in flight.
pub struct AmiiboViewModel {
    shared: Arc<Shared>,
    scope: ViewScope,
}

impl AmiiboViewModel {
    /// Creates the holder, subscribes to cache changes and starts the first
    /// load: a full refresh when `refresh_on_start` is set, otherwise page
    /// 0 from the cache.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(repo: Arc<dyn AmiiboRepository>, config: &ViewConfig) -> Self {
        let (state, _) = watch::channel(ViewState::new(config.page_size));
        let vm = AmiiboViewModel {
            shared: Arc::new(Shared { repo, state }),
            scope: ViewScope::new(),
        };

        vm.scope.launch(vm.shared.clone().observe_cache());

        if config.refresh_on_start {
            vm.refresh_amiibos();
        } else {
            vm.load_first_page();
        }
        vm
    }

    /// Receiver of every state change, starting at the current one.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ViewState {
        self.shared.state.borrow().clone()
    }

    /// Fetches the page after `current_page`, through search while a query
    /// is active. While nothing is loaded it fetches page 0 instead.
    ///
    /// No-op while a load is in flight, when no pages remain, or while a
    /// pagination error is pending.
    pub fn load_next_page(&self) {
        let mut request = None;
        self.shared.state.send_if_modified(|s| {
            request = s.pagination.begin_next_page();
            request.is_some()
        });

        let Some(request) = request else {
            debug!("load_next_page skipped");
            return;
        };

        if request.is_first_page() {
            debug!("Nothing loaded yet, loading page 0");
            self.launch_first_page(request);
            return;
        }

        debug!(page = request.page, "Loading next page");
        let shared = self.shared.clone();
        self.scope.launch(async move { shared.load_next(request).await });
    }

    /// Clears a pending pagination error and tries the next page again.
    pub fn retry_load_more(&self) {
        self.shared.state.send_if_modified(|s| {
            let had_error = s.pagination.pagination_error.is_some();
            s.pagination.clear_error();
            had_error
        });
        self.load_next_page();
    }

    /// Switches page size, then reloads from page 0.
    ///
    /// ## Returns
    /// * `Ok(true)` - accepted; pagination was reset
    /// * `Ok(false)` - `size` is already the current size
    /// * `Err(PageSizeNotAllowed)` - `size` is not 20, 50 or 100
    pub fn set_page_size(&self, size: u32) -> Result<bool, ValidationError> {
        let size = validate_page_size(size)?;

        let mut request = None;
        self.shared.state.send_if_modified(|s| {
            if !s.pagination.set_page_size(size) {
                return false;
            }
            request = Some(s.pagination.begin_first_page());
            true
        });

        match request {
            Some(request) => {
                info!(page_size = size.get(), "Page size changed");
                self.launch_first_page(request);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stores the trimmed query, then reloads from page 0 through the
    /// matching path. A blank query returns to browsing the whole cache.
    ///
    /// ## Returns
    /// * `Ok(true)` - query changed; pagination was reset
    /// * `Ok(false)` - same query as before
    /// * `Err(QueryTooLong)` - query exceeds the length limit
    pub fn on_search_query_changed(&self, query: &str) -> Result<bool, ValidationError> {
        let query = validate_query(query)?;

        let mut request = None;
        self.shared.state.send_if_modified(|s| {
            if s.pagination.query == query {
                return false;
            }
            s.pagination.set_query(query);
            request = Some(s.pagination.begin_first_page());
            true
        });

        match request {
            Some(request) => {
                debug!(query = ?request.query, "Search query changed");
                self.launch_first_page(request);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Re-fetches the whole catalog, then reloads page 0.
    ///
    /// ## Display While Running
    /// - nothing loaded yet → `Loading`
    /// - items loaded → `Success { loaded_items, is_refreshing: true }`
    ///
    /// On failure the display becomes `Error` carrying the loaded items.
    pub fn refresh_amiibos(&self) {
        let mut generation = 0;
        self.shared.state.send_modify(|s| {
            generation = s.pagination.generation;
            let loaded = &s.pagination.loaded_items;
            s.display = if loaded.is_empty() {
                DisplayState::Loading
            } else {
                DisplayState::refreshing(loaded.clone())
            };
        });

        info!("Full refresh requested");
        let shared = self.shared.clone();
        self.scope
            .launch(async move { shared.refresh(generation).await });
    }

    /// Grid scroll hook: loads the next page when the last visible cell is
    /// within the load-more threshold of the end.
    ///
    /// ## Returns
    /// Whether a load was triggered.
    pub fn on_scrolled(&self, last_visible_index: usize) -> bool {
        let trigger = {
            let state = self.shared.state.borrow();
            should_load_more(
                last_visible_index,
                state.pagination.loaded_items.len(),
                &state.pagination,
            )
        };
        if trigger {
            self.load_next_page();
        }
        trigger
    }

    /// Stops the observer and aborts any fetch in flight. Later operations
    /// still update state synchronously but launch nothing.
    pub fn close(&self) {
        self.scope.close();
    }

    fn load_first_page(&self) {
        let mut request = PageRequest::default();
        self.shared.state.send_modify(|s| {
            request = s.pagination.restart();
        });
        self.launch_first_page(request);
    }

    fn launch_first_page(&self, request: PageRequest) {
        let shared = self.shared.clone();
        self.scope
            .launch(async move { shared.load_first(request).await });
    }
}

impl Drop for AmiiboViewModel {
    fn drop(&mut self) {
        self.scope.close();
    }
}

// =============================================================================
// Tasks
// =============================================================================

impl Shared {
    /// Projects every non-empty cache snapshot into `Success`.
    async fn observe_cache(self: Arc<Self>) {
        let mut snapshots = WatchStream::new(self.repo.observe());

        while let Some(snapshot) = snapshots.next().await {
            if snapshot.is_empty() {
                continue;
            }
            debug!(count = snapshot.len(), "Cache snapshot received");
            self.state.send_modify(|s| {
                s.display = DisplayState::Success {
                    is_refreshing: s.display.is_refreshing(),
                    items: snapshot,
                };
            });
        }

        debug!("Cache stream ended");
    }

    /// Fetches the page described by `request` plus its has-more flag.
    async fn fetch(&self, request: &PageRequest) -> AmiiboResult<PageFetch> {
        isolate(fetch_page(self.repo.clone(), request.clone()))
            .await
            .unwrap_or_else(|e| Err(AmiiboError::unknown(e.to_string())))
    }

    async fn load_next(&self, request: PageRequest) {
        match self.fetch(&request).await {
            Ok(fetch) => {
                let appended = !fetch.items.is_empty();
                let applied = self.state.send_if_modified(|s| {
                    if !s.pagination.finish(&request, fetch) {
                        return false;
                    }
                    if appended {
                        s.display = DisplayState::success(s.pagination.loaded_items.clone());
                    }
                    true
                });

                if !applied {
                    debug!(page = request.page, "Discarding stale page");
                } else if !appended {
                    debug!(page = request.page, "Reached end of list");
                }
            }
            Err(e) => {
                warn!(page = request.page, error = %e, "Next page failed");
                self.state
                    .send_if_modified(|s| s.pagination.fail(&request, e.to_string()));
            }
        }
    }

    async fn load_first(&self, request: PageRequest) {
        match self.fetch(&request).await {
            Ok(fetch) => {
                let applied = self.state.send_if_modified(|s| {
                    if !s.pagination.finish(&request, fetch) {
                        return false;
                    }
                    s.display = DisplayState::success(s.pagination.loaded_items.clone());
                    true
                });
                if !applied {
                    debug!("Discarding stale first page");
                }
            }
            Err(e) => {
                warn!(error = %e, kind = %e.kind(), "First page failed");
                self.state.send_if_modified(|s| {
                    if !s.pagination.fail(&request, e.to_string()) {
                        return false;
                    }
                    s.display = DisplayState::from_error(&e, s.pagination.loaded_items.clone());
                    true
                });
            }
        }
    }

    /// Runs a full refresh started while pagination was at `generation`.
    /// A failure is dropped once a reset has happened since.
    async fn refresh(&self, generation: u64) {
        let repo = self.repo.clone();
        let outcome = isolate(async move { repo.refresh().await })
            .await
            .unwrap_or_else(|e| Err(AmiiboError::unknown(e.to_string())));

        match outcome {
            Ok(()) => {
                let mut request = PageRequest::default();
                self.state.send_modify(|s| {
                    request = s.pagination.restart();
                });
                self.load_first(request).await;
                info!("Full refresh complete");
            }
            Err(e) => {
                warn!(error = %e, kind = %e.kind(), "Full refresh failed");
                let applied = self.state.send_if_modified(|s| {
                    if s.pagination.generation != generation {
                        return false;
                    }
                    s.display = DisplayState::from_error(&e, s.pagination.loaded_items.clone());
                    true
                });
                if !applied {
                    debug!("Discarding stale refresh failure");
                }
            }
        }
    }
}

/// One page and whether anything follows it. An empty page ends the list
/// without asking the repository.
async fn fetch_page(
    repo: Arc<dyn AmiiboRepository>,
    request: PageRequest,
) -> AmiiboResult<PageFetch> {
    let PageRequest {
        page,
        page_size,
        query,
        ..
    } = request;

    let items = match &query {
        Some(q) => repo.search(q, page, page_size).await?,
        None => repo.get_page(page, page_size).await?,
    };
    if items.is_empty() {
        return Ok(PageFetch {
            items,
            has_more: false,
        });
    }

    let has_more = match &query {
        Some(q) => repo.has_more_search_pages(q, page, page_size).await?,
        None => repo.has_more_pages(page, page_size).await?,
    };
    Ok(PageFetch { items, has_more })
}

// =============================================================================
// Unit Tests
// =============================================================================
