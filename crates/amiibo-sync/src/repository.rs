//! # Amiibo Repository
//!
//! The contract between the view-state holder and the data layer, and the
//! offline-first implementation that backs it with the SQLite cache.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Offline-First Reads                                  │
//! │                                                                         │
//! │  get_page / search / has_more_*                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite cache (always; never the network)                              │
//! │                                                                         │
//! │  refresh()                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogSource::fetch_all ──► replace_all (1 transaction)              │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                         snapshots.send_replace(all)                    │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                         every observe() receiver wakes                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use amiibo_core::{Amiibo, AmiiboResult, PageSize};
use amiibo_db::AmiibosRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::source::CatalogSource;

/// Everything the view-state holder needs from the data layer.
///
/// Object-safe, so the holder can keep an `Arc<dyn AmiiboRepository>` and
/// tests can swap in a fake.
#[async_trait]
pub trait AmiiboRepository: Send + Sync {
    /// Stream of full cache snapshots. The receiver starts at the current
    /// snapshot.
    fn observe(&self) -> watch::Receiver<Vec<Amiibo>>;

    /// Page `page` (0-based) of the whole catalog.
    async fn get_page(&self, page: u32, size: PageSize) -> AmiiboResult<Vec<Amiibo>>;

    /// Page `page` of the items matching `query`.
    async fn search(&self, query: &str, page: u32, size: PageSize) -> AmiiboResult<Vec<Amiibo>>;

    /// Whether anything exists after page `page`.
    async fn has_more_pages(&self, page: u32, size: PageSize) -> AmiiboResult<bool>;

    /// Search variant of [`has_more_pages`](Self::has_more_pages).
    async fn has_more_search_pages(
        &self,
        query: &str,
        page: u32,
        size: PageSize,
    ) -> AmiiboResult<bool>;

    /// Re-fetches the catalog and repopulates the cache.
    async fn refresh(&self) -> AmiiboResult<()>;
}

/// `count` items fill more than pages `0..=page`.
fn more_after(count: u64, page: u32, size: PageSize) -> bool {
    count > size.offset(page + 1)
}

/// Repository that serves reads from the local cache and only touches the
/// catalog source on refresh.
pub struct OfflineFirstRepository {
    cache: AmiibosRepository,
    source: Arc<dyn CatalogSource>,
    snapshots: watch::Sender<Vec<Amiibo>>,
}

impl OfflineFirstRepository {
    /// Creates the repository and seeds the snapshot stream from whatever
    /// the cache already holds.
    pub async fn new(cache: AmiibosRepository, source: Arc<dyn CatalogSource>) -> AmiiboResult<Self> {
        let initial = cache.all().await?;
        info!(cached = initial.len(), "Repository ready");

        let (snapshots, _) = watch::channel(initial);
        Ok(OfflineFirstRepository {
            cache,
            source,
            snapshots,
        })
    }

    /// When the cache was last replaced by a refresh.
    pub async fn last_refreshed_at(&self) -> AmiiboResult<Option<DateTime<Utc>>> {
        Ok(self.cache.last_refreshed_at().await?)
    }

    /// Number of items currently cached.
    pub async fn cached_count(&self) -> AmiiboResult<u64> {
        Ok(self.cache.count().await?)
    }
}

#[async_trait]
impl AmiiboRepository for OfflineFirstRepository {
    fn observe(&self) -> watch::Receiver<Vec<Amiibo>> {
        self.snapshots.subscribe()
    }

    async fn get_page(&self, page: u32, size: PageSize) -> AmiiboResult<Vec<Amiibo>> {
        Ok(self.cache.page(page, size).await?)
    }

    async fn search(&self, query: &str, page: u32, size: PageSize) -> AmiiboResult<Vec<Amiibo>> {
        Ok(self.cache.search(query, page, size).await?)
    }

    async fn has_more_pages(&self, page: u32, size: PageSize) -> AmiiboResult<bool> {
        let count = self.cache.count().await?;
        Ok(more_after(count, page, size))
    }

    async fn has_more_search_pages(
        &self,
        query: &str,
        page: u32,
        size: PageSize,
    ) -> AmiiboResult<bool> {
        let count = self.cache.count_matching(query).await?;
        Ok(more_after(count, page, size))
    }

    async fn refresh(&self) -> AmiiboResult<()> {
        info!("Refreshing catalog");

        let fresh = match self.source.fetch_all().await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, kind = %e.kind(), "Catalog fetch failed");
                return Err(e);
            }
        };

        let stored = self.cache.replace_all(&fresh).await?;
        let snapshot = self.cache.all().await?;
        debug!(stored, "Publishing cache snapshot");
        self.snapshots.send_replace(snapshot);

        info!(stored, "Catalog refresh complete");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use amiibo_core::{AmiiboError, ErrorKind};
    use amiibo_db::{Database, DbConfig};
    use std::sync::Mutex;

    /// Catalog source returning a scripted result per call.
    struct ScriptedSource {
        results: Mutex<Vec<AmiiboResult<Vec<Amiibo>>>>,
    }

    impl ScriptedSource {
        fn new(results: Vec<AmiiboResult<Vec<Amiibo>>>) -> Arc<Self> {
            Arc::new(ScriptedSource {
                results: Mutex::new(results),
            })
        }
    }

    #[async_trait]
    impl CatalogSource for ScriptedSource {
        async fn fetch_all(&self) -> AmiiboResult<Vec<Amiibo>> {
            self.results.lock().unwrap().remove(0)
        }
    }

    fn catalog(count: usize) -> Vec<Amiibo> {
        (0..count)
            .map(|i| Amiibo {
                id: format!("{i:016x}"),
                name: format!("Amiibo {i:03}"),
                game_series: if i % 2 == 0 { "Kirby" } else { "Metroid" }.to_string(),
                amiibo_series: "Super Smash Bros.".to_string(),
                character: format!("Character {i}"),
                image_url: String::new(),
                amiibo_type: "Figure".to_string(),
            })
            .collect()
    }

    async fn repository(source: Arc<ScriptedSource>) -> OfflineFirstRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        OfflineFirstRepository::new(db.amiibos(), source).await.unwrap()
    }

    #[test]
    fn test_more_after() {
        assert!(more_after(21, 0, PageSize::Twenty));
        assert!(!more_after(20, 0, PageSize::Twenty));
        assert!(more_after(41, 1, PageSize::Twenty));
        assert!(!more_after(0, 0, PageSize::Fifty));
    }

    #[tokio::test]
    async fn test_refresh_fills_cache_and_publishes() {
        let repo = repository(ScriptedSource::new(vec![Ok(catalog(45))])).await;
        let mut rx = repo.observe();
        assert!(rx.borrow().is_empty());

        repo.refresh().await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 45);
        assert_eq!(repo.cached_count().await.unwrap(), 45);
        assert!(repo.last_refreshed_at().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_paging_and_has_more() {
        let repo = repository(ScriptedSource::new(vec![Ok(catalog(45))])).await;
        repo.refresh().await.unwrap();

        assert_eq!(repo.get_page(0, PageSize::Twenty).await.unwrap().len(), 20);
        assert_eq!(repo.get_page(2, PageSize::Twenty).await.unwrap().len(), 5);
        assert!(repo.has_more_pages(0, PageSize::Twenty).await.unwrap());
        assert!(repo.has_more_pages(1, PageSize::Twenty).await.unwrap());
        assert!(!repo.has_more_pages(2, PageSize::Twenty).await.unwrap());
        assert!(!repo.has_more_pages(0, PageSize::Fifty).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_and_has_more_search_pages() {
        let repo = repository(ScriptedSource::new(vec![Ok(catalog(45))])).await;
        repo.refresh().await.unwrap();

        // 23 even indices are Kirby
        let kirby = repo.search("kirby", 0, PageSize::Twenty).await.unwrap();
        assert_eq!(kirby.len(), 20);
        assert!(kirby.iter().all(|a| a.game_series == "Kirby"));
        assert!(repo
            .has_more_search_pages("kirby", 0, PageSize::Twenty)
            .await
            .unwrap());
        assert!(!repo
            .has_more_search_pages("kirby", 1, PageSize::Twenty)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cache() {
        let repo = repository(ScriptedSource::new(vec![
            Ok(catalog(5)),
            Err(AmiiboError::network("offline")),
        ]))
        .await;
        repo.refresh().await.unwrap();

        let mut rx = repo.observe();
        let err = repo.refresh().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 5);
        assert_eq!(repo.cached_count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_snapshot_seeded_from_existing_cache() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.amiibos().replace_all(&catalog(3)).await.unwrap();

        let repo = OfflineFirstRepository::new(db.amiibos(), ScriptedSource::new(vec![]))
            .await
            .unwrap();
        assert_eq!(repo.observe().borrow().len(), 3);
    }
}
