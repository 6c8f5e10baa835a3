//! # View Scope
//!
//! The set of background tasks owned by one view-state holder.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Task Lifecycle                                       │
//! │                                                                         │
//! │  AmiiboViewModel::new ──► launch(observer)                             │
//! │  load_next_page       ──► launch(fetch page n)                         │
//! │  refresh_amiibos      ──► launch(refresh → fetch page 0)               │
//! │                                                                         │
//! │  close() / drop       ──► abort every task still running               │
//! │                           later launch() calls are ignored             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Must be used from inside a Tokio runtime.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::debug;

/// Tasks tied to the lifetime of a view-state holder.
#[derive(Debug, Default)]
pub struct ViewScope {
    inner: Mutex<ScopeInner>,
}

#[derive(Debug, Default)]
struct ScopeInner {
    tasks: JoinSet<()>,
    closed: bool,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ScopeInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawns `task` on the scope. Ignored once the scope is closed.
    pub fn launch<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut inner = self.lock();
        if inner.closed {
            debug!("Scope closed, task dropped");
            return;
        }

        // Reap finished tasks so the set does not grow without bound
        while inner.tasks.try_join_next().is_some() {}

        inner.tasks.spawn(task);
    }

    /// Aborts every running task and refuses new ones.
    pub fn close(&self) {
        let mut inner = self.lock();
        if !inner.closed {
            debug!(running = inner.tasks.len(), "Closing view scope");
        }
        inner.closed = true;
        inner.tasks.abort_all();
    }
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs `future` on its own task so a panic inside it comes back as a
/// `JoinError` instead of tearing down the caller.
///
/// Cancelling the returned future aborts the inner task too.
pub async fn isolate<F, T>(future: F) -> Result<T, JoinError>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let mut guard = AbortOnDrop(tokio::spawn(future));
    (&mut guard.0).await
}
