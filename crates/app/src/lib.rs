//! # meteobridge-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DataSource` / `DataSourceFactory`: station, realtime and forecast queries
//!   - `ConfigEntryRepository`: CRUD for config entries
//! - Wrap a data source in the `DataAdapter`, which classifies fetch failures
//! - Poll the adapter on a fixed interval in the `Coordinator` and publish
//!   snapshots to subscribers
//! - Project snapshots into sensor and weather entity states (`platforms`)
//! - Validate user input and persist entries (`config_flow`)
//! - Run the entry lifecycle: setup, retry, reload, unload (`entry_manager`)
//!
//! ## Dependency rule
//! Depends on `meteobridge-domain` only (plus `tokio` for tasks, timers and
//! channels). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod config_flow;
pub mod coordinator;
pub mod data_adapter;
pub mod entry;
pub mod entry_manager;
pub mod error;
pub mod platforms;
pub mod ports;

#[cfg(test)]
mod testing;
