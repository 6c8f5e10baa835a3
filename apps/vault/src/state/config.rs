//! # Vault Configuration
//!
//! Configuration loaded once at start-up.
//!
//! ## Configuration Sources (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     AMIIBO_DB_PATH=/tmp/vault.db                                       │
//! │     AMIIBO_CATALOG_PATH=./amiibo.json                                  │
//! │     AMIIBO_PAGE_SIZE=50                                                │
//! │     AMIIBO_REFRESH_ON_START=false                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $AMIIBO_CONFIG, or                                                 │
//! │     ~/.config/amiibo-vault/vault.toml (Linux)                          │
//! │     ~/Library/Application Support/com.curso.amiibo-vault/vault.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     page_size = 20, refresh_on_start = true                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # vault.toml
//! [database]
//! path = "/home/me/.local/share/amiibo-vault/vault.db"
//! max_connections = 4
//!
//! [catalog]
//! path = "/home/me/amiibo.json"
//!
//! [view]
//! page_size = 50          # 20 | 50 | 100
//! refresh_on_start = true
//! ```

use std::path::PathBuf;

use amiibo_core::{validation::parse_page_size, PageSize};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

const CONFIG_FILE: &str = "vault.toml";
const DATABASE_FILE: &str = "vault.db";
const CATALOG_FILE: &str = "amiibo.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "curso", "amiibo-vault")
}

fn data_file(name: &str) -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

// =============================================================================
// Sections
// =============================================================================

/// `[database]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// SQLite file holding the cache.
    pub path: PathBuf,

    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        DatabaseSection {
            path: data_file(DATABASE_FILE),
            max_connections: 4,
        }
    }
}

/// `[catalog]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// JSON catalog read on every refresh.
    pub path: PathBuf,
}

impl Default for CatalogSection {
    fn default() -> Self {
        CatalogSection {
            path: data_file(CATALOG_FILE),
        }
    }
}

/// `[view]` section: what the view-state holder starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub page_size: PageSize,

    /// Run a full refresh as soon as the holder is created. When off, the
    /// holder loads the first page from the cache instead.
    pub refresh_on_start: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            page_size: PageSize::default(),
            refresh_on_start: true,
        }
    }
}

// =============================================================================
// VaultConfig
// =============================================================================

/// Complete vault configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub database: DatabaseSection,
    pub catalog: CatalogSection,
    pub view: ViewConfig,
}

impl VaultConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$AMIIBO_CONFIG`, or the platform
    ///    config directory)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let path = config_path
            .or_else(|| std::env::var_os("AMIIBO_CONFIG").map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading vault config from file");
                let contents = std::fs::read_to_string(&path)?;
                Self::from_toml(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parses a `vault.toml` document. Missing keys keep their defaults.
    pub fn from_toml(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(AppError::config("database.path must not be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(AppError::config(
                "database.max_connections must be greater than 0",
            ));
        }

        if self.catalog.path.as_os_str().is_empty() {
            return Err(AppError::config("catalog.path must not be empty"));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `AMIIBO_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("AMIIBO_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(path) = lookup("AMIIBO_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog.path = PathBuf::from(path);
        }

        if let Some(size) = lookup("AMIIBO_PAGE_SIZE") {
            match parse_page_size(&size) {
                Ok(page_size) => self.view.page_size = page_size,
                Err(e) => warn!(value = %size, error = %e, "Ignoring AMIIBO_PAGE_SIZE"),
            }
        }

        if let Some(flag) = lookup("AMIIBO_REFRESH_ON_START") {
            match parse_flag(&flag) {
                Some(on) => self.view.refresh_on_start = on,
                None => warn!(value = %flag, "Ignoring AMIIBO_REFRESH_ON_START"),
            }
        }
    }

    /// Platform config path, e.g. `~/.config/amiibo-vault/vault.toml`.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
