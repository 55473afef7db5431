//! # meteobridge-domain
//!
//! Pure domain model for the Meteobridge SQL bridge.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **connection settings** and persisted **config entries**
//! - Define **readings** (realtime station metrics) and **forecasts**
//! - Define the **fetch snapshot** held by a polling coordinator
//! - Define the **sensor and weather catalogs** that project a snapshot into
//!   entity states
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod config_entry;
pub mod connection;
pub mod device;
pub mod forecast;
pub mod reading;
pub mod sensor;
pub mod snapshot;
pub mod station;
pub mod value;
pub mod variant;
pub mod weather;
