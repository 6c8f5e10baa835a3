//! # Catalog Source
//!
//! Where a full refresh gets the catalog from.
//!
//! ## Payload Format
//! ```json
//! {
//!   "amiibo": [
//!     {
//!       "head": "00000000",
//!       "tail": "00000002",
//!       "name": "Mario",
//!       "gameSeries": "Super Mario",
//!       "amiiboSeries": "Super Smash Bros.",
//!       "character": "Mario",
//!       "image": "https://.../icon_00000000-00000002.png",
//!       "type": "Figure"
//!     }
//!   ]
//! }
//! ```
//!
//! ## Error Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  read fails (missing file, permissions, I/O)  →  AmiiboError::Network  │
//! │  payload is not valid catalog JSON            →  AmiiboError::Parse    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use amiibo_core::{Amiibo, AmiiboError, AmiiboResult};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

/// Produces the complete remote catalog.
///
/// Implementations must be cheap to share behind an `Arc`.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches every amiibo the catalog knows about.
    async fn fetch_all(&self) -> AmiiboResult<Vec<Amiibo>>;
}

// =============================================================================
// Payload
// =============================================================================

#[derive(Debug, Deserialize)]
struct CatalogPayload {
    amiibo: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    head: String,
    tail: String,
    name: String,
    #[serde(default)]
    game_series: String,
    #[serde(default)]
    amiibo_series: String,
    #[serde(default)]
    character: String,
    #[serde(default)]
    image: String,
    #[serde(default, rename = "type")]
    kind: String,
}

impl From<CatalogEntry> for Amiibo {
    fn from(entry: CatalogEntry) -> Self {
        Amiibo {
            id: format!("{}{}", entry.head, entry.tail),
            name: entry.name,
            game_series: entry.game_series,
            amiibo_series: entry.amiibo_series,
            character: entry.character,
            image_url: entry.image,
            amiibo_type: entry.kind,
        }
    }
}

/// Parses a catalog payload into domain items.
///
/// ## Errors
/// `AmiiboError::Parse` when the JSON is malformed or an entry lacks
/// `head`, `tail` or `name`.
pub fn parse_catalog(json: &str) -> AmiiboResult<Vec<Amiibo>> {
    let payload: CatalogPayload =
        serde_json::from_str(json).map_err(|e| AmiiboError::parse(e.to_string()))?;
    Ok(payload.amiibo.into_iter().map(Amiibo::from).collect())
}

// =============================================================================
// File Source
// =============================================================================

/// Reads the catalog from a JSON file on disk.
///
/// Stands in for the HTTP client: the file is re-read on every refresh,
/// so replacing it and refreshing picks up the new catalog.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCatalogSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch_all(&self) -> AmiiboResult<Vec<Amiibo>> {
        debug!(path = %self.path.display(), "Reading catalog");

        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AmiiboError::network(format!(
                "cannot reach catalog at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let amiibos = parse_catalog(&contents)?;
        info!(count = amiibos.len(), "Catalog fetched");
        Ok(amiibos)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
