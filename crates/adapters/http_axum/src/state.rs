//! Shared application state for axum handlers.

use meteobridge_app::entry_manager::EntryManager;
use meteobridge_app::ports::{ConfigEntryRepository, DataSourceFactory};

/// Application state shared across all axum handlers.
///
/// Generic over the config entry store and the data source factory to avoid
/// dynamic dispatch. `Clone` is implemented manually so neither type needs
/// to be `Clone`; the manager is a shared handle.
pub struct AppState<R, F: DataSourceFactory> {
    /// Runs the config entries served by the API.
    pub manager: EntryManager<R, F>,
}

impl<R, F: DataSourceFactory> Clone for AppState<R, F> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
        }
    }
}

impl<R, F> AppState<R, F>
where
    R: ConfigEntryRepository,
    F: DataSourceFactory,
{
    pub fn new(manager: EntryManager<R, F>) -> Self {
        Self { manager }
    }
}
