//! # Repository Module
//!
//! Database repository implementations for the vault cache.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cache Access                                         │
//! │                                                                         │
//! │  OfflineFirstRepository (amiibo-sync)                                  │
//! │       │                                                                 │
//! │       │  db.amiibos().page(2, PageSize::Twenty)                        │
//! │       ▼                                                                 │
//! │  AmiibosRepository                                                     │
//! │  ├── page(&self, page, size)                                           │
//! │  ├── search(&self, query, page, size)                                  │
//! │  ├── count / count_matching                                            │
//! │  └── replace_all(&self, amiibos)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`AmiibosRepository`](amiibo::AmiibosRepository) - Paged reads and
//!   atomic replacement of the cached catalog

pub mod amiibo;
