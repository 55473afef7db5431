//! Config entry store port: persistence for configured stations.

use std::future::Future;

use meteobridge_domain::config_entry::ConfigEntry;
use meteobridge_domain::error::MeteobridgeError;
use meteobridge_domain::id::EntryId;

/// Repository for persisting and querying [`ConfigEntry`]s.
pub trait ConfigEntryRepository: Send + Sync + 'static {
    /// Create a new config entry in storage.
    fn create(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, MeteobridgeError>> + Send;

    /// Get a config entry by its identifier.
    fn get_by_id(
        &self,
        id: EntryId,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, MeteobridgeError>> + Send;

    /// Find the entry of a domain with the given unique id (station MAC).
    fn find_by_unique_id(
        &self,
        domain: &str,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, MeteobridgeError>> + Send;

    /// Get all config entries, oldest first.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, MeteobridgeError>> + Send;

    /// Update an existing config entry.
    fn update(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, MeteobridgeError>> + Send;

    /// Delete a config entry by its identifier.
    fn delete(&self, id: EntryId) -> impl Future<Output = Result<(), MeteobridgeError>> + Send;
}
