//! Local host adapters backed by SQLite.
//!
//! # Responsibility
//! - Implement `CurationStore` and `PlatformCatalog` for headless use.
//! - Keep SQL details behind the host service traits.
//!
//! # Invariants
//! - Connections passed in must come from `db::open_db*` (migrated).
//! - Curation folders live under one root directory per store.

pub mod curation_repo;
pub mod platform_repo;
