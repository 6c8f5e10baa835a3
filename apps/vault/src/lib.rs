//! # Amiibo Vault Library
//!
//! Core library for the Amiibo Vault terminal app: configuration, the
//! view-state holder, and the command loop that drives it.
//!
//! ## Module Organization
//! ```text
//! amiibo_vault/
//! ├── lib.rs              ◄─── You are here (start-up & prompt loop)
//! ├── state/
//! │   ├── mod.rs          ◄─── State type exports
//! │   ├── view_model.rs   ◄─── AmiiboViewModel (pagination + refresh)
//! │   ├── scope.rs        ◄─── ViewScope (task ownership)
//! │   └── config.rs       ◄─── VaultConfig (toml + env)
//! ├── commands.rs         ◄─── Prompt commands → holder operations
//! └── error.rs            ◄─── Start-up error type
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::sync::Arc;

use amiibo_db::{Database, DbConfig};
use amiibo_sync::{FileCatalogSource, OfflineFirstRepository};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::{dispatch, parse_command, summarize, Outcome, USAGE};
use error::AppResult;
use state::{AmiiboViewModel, VaultConfig, ViewState};

/// Runs the vault until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,amiibo=debug,sqlx=warn; RUST_LOG overrides          │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → vault.toml → AMIIBO_* environment                      │
/// │                                                                         │
/// │  3. Open Cache ───────────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │                                                                         │
/// │  4. Build Holder ─────────────────────────────────────────────────────► │
/// │     • OfflineFirstRepository over cache + catalog file                  │
/// │     • AmiiboViewModel starts its observer and first load               │
/// │                                                                         │
/// │  5. Prompt Loop ──────────────────────────────────────────────────────► │
/// │     • one command per line; every state change printed to stdout        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> AppResult<()> {
    init_tracing();

    info!("Starting Amiibo Vault");

    let config = VaultConfig::load(None)?;
    let (db, repo) = open_repository(&config).await?;

    if let Some(at) = repo.last_refreshed_at().await? {
        info!(%at, "Cache last refreshed");
    }

    let vm = AmiiboViewModel::new(repo, &config.view);
    let printer = tokio::spawn(print_changes(vm.subscribe()));

    println!("{USAGE}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(command)) => match dispatch(&vm, command) {
                Outcome::Quit => break,
                Outcome::Continue(Some(message)) => println!("{message}"),
                Outcome::Continue(None) => {}
            },
            Err(e) => println!("{e}\n{USAGE}"),
        }
    }

    info!("Shutting down");
    vm.close();
    printer.abort();
    db.close().await;
    Ok(())
}

/// Opens the cache named by `config` and builds the repository over it.
///
/// Creates the database's parent directory when it is missing.
pub async fn open_repository(
    config: &VaultConfig,
) -> AppResult<(Database, Arc<OfflineFirstRepository>)> {
    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(
        DbConfig::new(&config.database.path).max_connections(config.database.max_connections),
    )
    .await?;

    let (total, applied) = db.migration_status().await?;
    debug!(total, applied, "Migration status");

    let source = Arc::new(FileCatalogSource::new(&config.catalog.path));
    let repo = OfflineFirstRepository::new(db.amiibos(), source).await?;
    info!(catalog = %config.catalog.path.display(), "Repository opened");

    Ok((db, Arc::new(repo)))
}

/// Prints a summary line whenever the visible state changes.
async fn print_changes(rx: watch::Receiver<ViewState>) {
    let mut states = WatchStream::new(rx);
    let mut last = String::new();

    while let Some(state) = states.next().await {
        let line = summarize(&state);
        if line != last {
            println!("{line}");
            last = line;
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=amiibo_vault=trace` - Trace the holder only
/// - Default: `info,amiibo=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,amiibo=debug,sqlx=warn"));

    // Logs go to stderr so stdout stays the command transcript
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const CATALOG: &str = r#"{"amiibo":[
        {"head":"00000000","tail":"00000002","name":"Mario","gameSeries":"Super Mario",
         "amiiboSeries":"Super Smash Bros.","character":"Mario","image":"","type":"Figure"},
        {"head":"01000000","tail":"00040002","name":"Link","gameSeries":"The Legend of Zelda",
         "amiiboSeries":"Super Smash Bros.","character":"Link","image":"","type":"Figure"}
    ]}"#;

    #[tokio::test]
    async fn test_end_to_end_refresh_from_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = VaultConfig::default();
        config.database.path = dir.path().join("data").join("vault.db");
        config.catalog.path = dir.path().join("amiibo.json");
        std::fs::write(&config.catalog.path, CATALOG).unwrap();

        let (db, repo) = open_repository(&config).await.unwrap();
        let vm = AmiiboViewModel::new(repo.clone(), &config.view);
        let mut rx = vm.subscribe();

        let state = tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.pagination.loaded_items.len() == 2 && !s.display.is_refreshing()),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();

        let names: Vec<_> = state.display.items().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Link", "Mario"]);
        assert!(!state.pagination.has_more_pages);
        assert_eq!(repo.cached_count().await.unwrap(), 2);

        vm.close();
        db.close().await;
    }

    #[tokio::test]
    async fn test_missing_catalog_surfaces_network_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = VaultConfig::default();
        config.database.path = dir.path().join("vault.db");
        config.catalog.path = dir.path().join("absent.json");

        let (_db, repo) = open_repository(&config).await.unwrap();
        let vm = AmiiboViewModel::new(repo, &config.view);
        let mut rx = vm.subscribe();

        let state = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.display.is_error()))
            .await
            .unwrap()
            .unwrap()
            .clone();

        assert_eq!(
            state.display.error_icon(),
            Some(amiibo_core::ErrorIcon::CloudOff)
        );
        assert!(summarize(&state).starts_with("error [network]"));
    }
}
