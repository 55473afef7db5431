//! Response bodies. Connection passwords never leave the server.

use serde::Serialize;

use meteobridge_app::coordinator::{CoordinatorState, CoordinatorStatus};
use meteobridge_app::entry_manager::EntryStatus;
use meteobridge_app::error::{FetchErrorKind, SetupError};
use meteobridge_domain::config_entry::{ConfigEntry, EntryState};
use meteobridge_domain::id::EntryId;
use meteobridge_domain::time::Timestamp;

/// Why the last setup or refresh failed.
#[derive(Debug, Serialize)]
pub struct ErrorView {
    pub kind: FetchErrorKind,
    pub message: String,
}

/// A config entry and its runtime state.
#[derive(Debug, Serialize)]
pub struct EntryView {
    pub id: EntryId,
    pub domain: String,
    pub title: String,
    pub unique_id: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub database: String,
    pub station_mac: String,
    pub state: EntryState,
    pub error: Option<ErrorView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EntryView {
    pub fn new(entry: ConfigEntry, state: EntryState, error: Option<&SetupError>) -> Self {
        let ConfigEntry {
            id,
            domain,
            title,
            unique_id,
            data,
            created_at,
            updated_at,
        } = entry;
        Self {
            id,
            domain,
            title,
            unique_id,
            host: data.host,
            port: data.port,
            username: data.username,
            database: data.database,
            station_mac: data.station_mac,
            state,
            error: error.map(|err| ErrorView {
                kind: err.cause().kind(),
                message: err.to_string(),
            }),
            created_at,
            updated_at,
        }
    }
}

impl From<EntryStatus> for EntryView {
    fn from(status: EntryStatus) -> Self {
        Self::new(status.entry, status.state, status.error.as_ref())
    }
}

/// Coordinator bookkeeping, without the cached data.
#[derive(Debug, Serialize)]
pub struct CoordinatorView {
    pub status: CoordinatorStatus,
    pub last_update_success: bool,
    pub last_update: Option<Timestamp>,
    pub fetched_at: Option<Timestamp>,
    pub last_error: Option<ErrorView>,
}

impl From<&CoordinatorState> for CoordinatorView {
    fn from(state: &CoordinatorState) -> Self {
        Self {
            status: state.status,
            last_update_success: state.last_update_success,
            last_update: state.last_update,
            fetched_at: state.data.as_ref().map(|data| data.fetched_at),
            last_error: state.last_error.as_ref().map(|err| ErrorView {
                kind: err.cause().kind(),
                message: err.cause().to_string(),
            }),
        }
    }
}
