//! # meteobridge-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** over the config entries of one integration variant
//!   (`/api/entries`, their coordinators, sensors, weather and forecasts)
//! - Run the config and options flows from `POST` / `PUT` bodies
//! - Stream coordinator updates as Server-Sent Events
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `meteobridge-app` (for the entry manager and port traits) and
//! `meteobridge-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
pub mod views;

#[cfg(test)]
mod test_support;
