//! # State Module
//!
//! Runtime state of the vault app.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────┐  ┌──────────────────┐          │
//! │  │ AmiiboViewModel  │  │  ViewScope   │  │   VaultConfig    │          │
//! │  │                  │  │              │  │                  │          │
//! │  │  watch<ViewState>│  │  JoinSet of  │  │  database path   │          │
//! │  │  repository      │  │  fetch and   │  │  catalog path    │          │
//! │  │                  │  │  observer    │  │  page size       │          │
//! │  └──────────────────┘  └──────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • AmiiboViewModel: all writes go through the watch channel            │
//! │  • ViewScope: JoinSet behind a Mutex, never held across .await         │
//! │  • VaultConfig: read-only after start-up                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod scope;
mod view_model;

pub use config::{CatalogSection, DatabaseSection, VaultConfig, ViewConfig};
pub use scope::{isolate, ViewScope};
pub use view_model::{AmiiboViewModel, ViewState};
