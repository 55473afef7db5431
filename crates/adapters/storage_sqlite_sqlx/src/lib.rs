//! # meteobridge-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement `ConfigEntryRepository` from `meteobridge-app::ports::config_store`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between config entries and database rows
//!
//! ## Dependency rule
//! Depends on `meteobridge-app` (for port traits) and `meteobridge-domain` (for
//! domain types). The `app` and `domain` crates must never reference this
//! adapter.

pub mod entry_repo;
pub mod error;
pub mod pool;

pub use entry_repo::SqliteConfigEntryRepository;
pub use pool::{Config, Database};
