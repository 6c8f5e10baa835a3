//! # amiibo-sync: Catalog Refresh for Amiibo Vault
//!
//! This crate connects the view-state holder to its data: it defines the
//! [`AmiiboRepository`] contract and implements it offline-first over the
//! SQLite cache from `amiibo-db`.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Repository Architecture                          │
//! │                                                                         │
//! │  AmiiboViewModel (apps/vault)                                          │
//! │       │  Arc<dyn AmiiboRepository>                                     │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  OfflineFirstRepository                          │  │
//! │  │                                                                  │  │
//! │  │  reads ───────────────► AmiibosRepository (SQLite)              │  │
//! │  │  refresh ─► CatalogSource ─► replace_all ─► publish snapshot    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`repository`] - `AmiiboRepository` trait and `OfflineFirstRepository`
//! - [`source`] - `CatalogSource` trait and the JSON file source

pub mod repository;
pub mod source;

pub use repository::{AmiiboRepository, OfflineFirstRepository};
pub use source::{parse_catalog, CatalogSource, FileCatalogSource};
