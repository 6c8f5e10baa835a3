//! # Amiibo Repository
//!
//! Database operations for the cached amiibo catalog.
//!
//! ## Key Operations
//! - Page reads with `LIMIT/OFFSET`
//! - Case-insensitive search across name, game series and character
//! - Atomic replacement of the whole catalog on refresh
//!
//! ## Paging
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a Page Is Read                                   │
//! │                                                                         │
//! │  page(2, PageSize::Twenty)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OFFSET = 2 * 20 = 40, LIMIT = 20                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ amiibos ORDER BY name, id               │                           │
//! │  │                                         │                           │
//! │  │ rows 0..40   (pages 0 and 1)            │                           │
//! │  │ rows 40..60  ← returned                 │                           │
//! │  │ rows 60..    (later pages)              │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  The (name, id) ordering is total, so pages never overlap.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use amiibo_core::{Amiibo, PageSize};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, game_series, amiibo_series, character_name, image_url, amiibo_type
    FROM amiibos
"#;

const SEARCH_FILTER: &str = r#"
    WHERE name LIKE ?1 ESCAPE '\'
       OR game_series LIKE ?1 ESCAPE '\'
       OR character_name LIKE ?1 ESCAPE '\'
"#;

/// Row shape of the `amiibos` table.
#[derive(Debug, sqlx::FromRow)]
struct AmiiboRow {
    id: String,
    name: String,
    game_series: String,
    amiibo_series: String,
    character_name: String,
    image_url: String,
    amiibo_type: String,
}

impl From<AmiiboRow> for Amiibo {
    fn from(row: AmiiboRow) -> Self {
        Amiibo {
            id: row.id,
            name: row.name,
            game_series: row.game_series,
            amiibo_series: row.amiibo_series,
            character: row.character_name,
            image_url: row.image_url,
            amiibo_type: row.amiibo_type,
        }
    }
}

/// Escapes LIKE wildcards and wraps the term for a substring match.
///
/// `"50%_off"` becomes `"%50\%\_off%"`.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Repository for the cached catalog.
///
/// ## Usage
/// ```rust,ignore
/// let repo = AmiibosRepository::new(pool);
///
/// // Third page of 20
/// let items = repo.page(2, PageSize::Twenty).await?;
///
/// // Search
/// let marios = repo.search("mario", 0, PageSize::Fifty).await?;
/// ```
#[derive(Debug, Clone)]
pub struct AmiibosRepository {
    pool: SqlitePool,
}

impl AmiibosRepository {
    /// Creates a new AmiibosRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AmiibosRepository { pool }
    }

    /// Returns page `page` (0-based) of the catalog ordered by name.
    ///
    /// A page past the end returns an empty list, not an error.
    pub async fn page(&self, page: u32, size: PageSize) -> DbResult<Vec<Amiibo>> {
        debug!(page, size = size.get(), "Reading cache page");

        let sql = format!("{SELECT_COLUMNS} ORDER BY name, id LIMIT ?1 OFFSET ?2");
        let rows: Vec<AmiiboRow> = sqlx::query_as(&sql)
            .bind(i64::from(size.get()))
            .bind(size.offset(page) as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Amiibo::from).collect())
    }

    /// Returns page `page` of the items whose name, game series or
    /// character contains `query` (case-insensitive for ASCII).
    ///
    /// ## Arguments
    /// * `query` - Literal search term; `%` and `_` match themselves
    /// * `page` - 0-based page index
    /// * `size` - Page size
    pub async fn search(&self, query: &str, page: u32, size: PageSize) -> DbResult<Vec<Amiibo>> {
        debug!(query = %query, page, size = size.get(), "Searching cache");

        let sql = format!("{SELECT_COLUMNS} {SEARCH_FILTER} ORDER BY name, id LIMIT ?2 OFFSET ?3");
        let rows: Vec<AmiiboRow> = sqlx::query_as(&sql)
            .bind(like_pattern(query))
            .bind(i64::from(size.get()))
            .bind(size.offset(page) as i64)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Search returned amiibos");
        Ok(rows.into_iter().map(Amiibo::from).collect())
    }

    /// Number of cached items.
    pub async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM amiibos")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    /// Number of cached items matching `query`, using the same filter as
    /// [`search`](Self::search).
    pub async fn count_matching(&self, query: &str) -> DbResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM amiibos {SEARCH_FILTER}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(like_pattern(query))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    /// Every cached item, in page order.
    pub async fn all(&self) -> DbResult<Vec<Amiibo>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY name, id");
        let rows: Vec<AmiiboRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Amiibo::from).collect())
    }

    /// Replaces the whole cache with `amiibos` in one transaction.
    ///
    /// ## Atomicity
    /// Readers see either the old catalog or the new one, never a mix.
    /// Duplicate IDs in the input keep the last occurrence.
    ///
    /// ## Returns
    /// Number of rows stored.
    pub async fn replace_all(&self, amiibos: &[Amiibo]) -> DbResult<u64> {
        let cached_at = Utc::now().to_rfc3339();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query("DELETE FROM amiibos").execute(&mut *tx).await?;

        for amiibo in amiibos {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO amiibos (
                    id, name, game_series, amiibo_series, character_name,
                    image_url, amiibo_type, cached_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&amiibo.id)
            .bind(&amiibo.name)
            .bind(&amiibo.game_series)
            .bind(&amiibo.amiibo_series)
            .bind(&amiibo.character)
            .bind(&amiibo.image_url)
            .bind(&amiibo.amiibo_type)
            .bind(&cached_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let stored = self.count().await?;
        info!(received = amiibos.len(), stored, "Cache replaced");
        Ok(stored)
    }

    /// When the cache was last replaced, or `None` if it was never filled.
    pub async fn last_refreshed_at(&self) -> DbResult<Option<DateTime<Utc>>> {
        let raw: Option<String> = sqlx::query_scalar("SELECT MAX(cached_at) FROM amiibos")
            .fetch_one(&self.pool)
            .await?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match DateTime::parse_from_rfc3339(&raw) {
            Ok(ts) => Ok(Some(ts.with_timezone(&Utc))),
            Err(e) => {
                warn!(value = %raw, error = %e, "Unreadable cache timestamp");
                Ok(None)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn figure(id: &str, name: &str, series: &str, character: &str) -> Amiibo {
        Amiibo {
            id: id.to_string(),
            name: name.to_string(),
            game_series: series.to_string(),
            amiibo_series: "Super Smash Bros.".to_string(),
            character: character.to_string(),
            image_url: format!("https://img.example/{id}.png"),
            amiibo_type: "Figure".to_string(),
        }
    }

    fn numbered(count: usize) -> Vec<Amiibo> {
        (0..count)
            .map(|i| figure(&format!("{i:016}"), &format!("Figure {i:03}"), "Series", "Someone"))
            .collect()
    }

    async fn repo() -> AmiibosRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().amiibos()
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("mario"), "%mario%");
        assert_eq!(like_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    #[tokio::test]
    async fn test_empty_cache() {
        let repo = repo().await;
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.page(0, PageSize::Twenty).await.unwrap().is_empty());
        assert!(repo.last_refreshed_at().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pages_do_not_overlap() {
        let repo = repo().await;
        repo.replace_all(&numbered(45)).await.unwrap();

        let first = repo.page(0, PageSize::Twenty).await.unwrap();
        let second = repo.page(1, PageSize::Twenty).await.unwrap();
        let third = repo.page(2, PageSize::Twenty).await.unwrap();
        let past_end = repo.page(3, PageSize::Twenty).await.unwrap();

        assert_eq!(first.len(), 20);
        assert_eq!(second.len(), 20);
        assert_eq!(third.len(), 5);
        assert!(past_end.is_empty());

        assert_eq!(first[0].name, "Figure 000");
        assert_eq!(second[0].name, "Figure 020");
        assert_eq!(third[4].name, "Figure 044");
    }

    #[tokio::test]
    async fn test_search_matches_name_series_and_character() {
        let repo = repo().await;
        repo.replace_all(&[
            figure("1", "Mario", "Super Mario", "Mario"),
            figure("2", "Link", "The Legend of Zelda", "Link"),
            figure("3", "Dr. Mario", "Dr. Mario", "Mario"),
            figure("4", "Toon Link", "The Legend of Zelda", "Link"),
        ])
        .await
        .unwrap();

        let marios = repo.search("MARIO", 0, PageSize::Twenty).await.unwrap();
        let names: Vec<_> = marios.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Dr. Mario", "Mario"]);

        let zelda = repo.search("zelda", 0, PageSize::Twenty).await.unwrap();
        assert_eq!(zelda.len(), 2);
        assert_eq!(repo.count_matching("zelda").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let repo = repo().await;
        repo.replace_all(&[
            figure("1", "100% Mario", "Promo", "Mario"),
            figure("2", "Mario", "Super Mario", "Mario"),
            figure("3", "Big_Boo", "Promo", "Boo"),
            figure("4", "BigXBoo", "Promo", "Boo"),
        ])
        .await
        .unwrap();

        let percent = repo.search("%", 0, PageSize::Twenty).await.unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].name, "100% Mario");

        let underscore = repo.search("g_B", 0, PageSize::Twenty).await.unwrap();
        assert_eq!(underscore.len(), 1);
        assert_eq!(underscore[0].name, "Big_Boo");
    }

    #[tokio::test]
    async fn test_search_pages() {
        let repo = repo().await;
        repo.replace_all(&numbered(30)).await.unwrap();

        let first = repo.search("figure", 0, PageSize::Twenty).await.unwrap();
        let second = repo.search("figure", 1, PageSize::Twenty).await.unwrap();
        assert_eq!(first.len(), 20);
        assert_eq!(second.len(), 10);
        assert_eq!(repo.count_matching("figure").await.unwrap(), 30);
        assert_eq!(repo.count_matching("nothing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replace_all_discards_previous_catalog() {
        let repo = repo().await;
        repo.replace_all(&numbered(10)).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 10);

        let stored = repo
            .replace_all(&[figure("x", "Kirby", "Kirby", "Kirby")])
            .await
            .unwrap();
        assert_eq!(stored, 1);

        let all = repo.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].character, "Kirby");
        assert!(repo.last_refreshed_at().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_replace_all_keeps_last_duplicate() {
        let repo = repo().await;
        let stored = repo
            .replace_all(&[
                figure("dup", "Old Name", "Series", "Someone"),
                figure("dup", "New Name", "Series", "Someone"),
            ])
            .await
            .unwrap();
        assert_eq!(stored, 1);

        let all = repo.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "dup");
        assert_eq!(all[0].name, "New Name");
    }
}
