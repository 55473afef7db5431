//! # meteobridge-adapter-mysql-sqlx
//!
//! MySQL data source using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement `DataSource` / `DataSourceFactory` from `meteobridge-app::ports`
//! - Open and replace the connection pool on `initialize`
//! - Read the `realtime_data`, `daily_forecast` and `hourly_forecast` tables
//! - Derive descriptive metrics (Beaufort, cardinal, UV band, trends, …)
//! - Sort sqlx failures into connection, missing-data and query errors
//!
//! ## Dependency rule
//! Depends on `meteobridge-app` (for port traits) and `meteobridge-domain`
//! (for domain types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod derive;
pub mod error;
pub mod rows;
pub mod source;

pub use source::{MySqlDataSource, MySqlDataSourceFactory};
