//! Stub ports for handler tests.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use meteobridge_app::entry_manager::EntryManager;
use meteobridge_app::ports::{
    ConfigEntryRepository, DataSource, DataSourceFactory, SourceError,
};
use meteobridge_domain::config_entry::ConfigEntry;
use meteobridge_domain::connection::ConnectionConfig;
use meteobridge_domain::error::MeteobridgeError;
use meteobridge_domain::forecast::{ForecastDaily, ForecastHourly};
use meteobridge_domain::id::EntryId;
use meteobridge_domain::reading::RealtimeReading;
use meteobridge_domain::station::StationInfo;
use meteobridge_domain::time::now;
use meteobridge_domain::variant::IntegrationVariant;

use crate::state::AppState;

pub type TestState = AppState<StubRepo, StubFactory>;

pub fn test_state() -> (TestState, StubFactory) {
    let factory = StubFactory::default();
    let manager = EntryManager::new(
        StubRepo::default(),
        factory.clone(),
        IntegrationVariant::Meteobridge,
    );
    (AppState::new(manager), factory)
}

pub fn connection_json(mac: &str) -> String {
    serde_json::json!({
        "host": "db.local",
        "username": "weather",
        "password": "secret",
        "database": "meteobridge",
        "station_mac": mac,
    })
    .to_string()
}

#[derive(Clone, Default)]
pub struct StubFactory {
    refuse: Arc<AtomicBool>,
}

impl StubFactory {
    /// Make every later connection attempt fail.
    pub fn refuse_connections(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }
}

impl DataSourceFactory for StubFactory {
    type Source = StubSource;

    fn build(&self, _config: &ConnectionConfig) -> StubSource {
        StubSource {
            refuse: Arc::clone(&self.refuse),
        }
    }
}

pub struct StubSource {
    refuse: Arc<AtomicBool>,
}

impl DataSource for StubSource {
    async fn initialize(&self) -> Result<(), SourceError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(SourceError::Connection(
                std::io::Error::other("refused").into(),
            ));
        }
        Ok(())
    }

    async fn station_data(&self, _station_mac: &str) -> Result<StationInfo, SourceError> {
        Ok(StationInfo {
            station_name: Some("Backyard".to_string()),
            ..StationInfo::default()
        })
    }

    async fn realtime_data(&self, _station_mac: &str) -> Result<RealtimeReading, SourceError> {
        Ok(RealtimeReading {
            station_name: Some("Backyard".to_string()),
            temperature: Some(21.5),
            humidity: Some(60.0),
            ..RealtimeReading::default()
        })
    }

    async fn daily_forecast(&self) -> Result<Vec<ForecastDaily>, SourceError> {
        Ok(vec![ForecastDaily::empty(now())])
    }

    async fn hourly_forecast(&self) -> Result<Vec<ForecastHourly>, SourceError> {
        Ok(Vec::new())
    }
}

#[derive(Clone, Default)]
pub struct StubRepo {
    entries: Arc<Mutex<Vec<ConfigEntry>>>,
}

impl ConfigEntryRepository for StubRepo {
    fn create(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, MeteobridgeError>> + Send {
        self.entries.lock().unwrap().push(entry.clone());
        async { Ok(entry) }
    }

    fn get_by_id(
        &self,
        id: EntryId,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, MeteobridgeError>> + Send {
        let found = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned();
        async { Ok(found) }
    }

    fn find_by_unique_id(
        &self,
        domain: &str,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, MeteobridgeError>> + Send {
        let found = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.domain == domain && e.unique_id == unique_id)
            .cloned();
        async { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, MeteobridgeError>> + Send {
        let all = self.entries.lock().unwrap().clone();
        async { Ok(all) }
    }

    fn update(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, MeteobridgeError>> + Send {
        let mut entries = self.entries.lock().unwrap();
        if let Some(slot) = entries.iter_mut().find(|e| e.id == entry.id) {
            *slot = entry.clone();
        }
        async { Ok(entry) }
    }

    fn delete(&self, id: EntryId) -> impl Future<Output = Result<(), MeteobridgeError>> + Send {
        self.entries.lock().unwrap().retain(|e| e.id != id);
        async { Ok(()) }
    }
}
