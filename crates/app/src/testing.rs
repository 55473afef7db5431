//! In-memory fakes for the ports, shared by the unit tests of this crate.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use meteobridge_domain::config_entry::ConfigEntry;
use meteobridge_domain::connection::ConnectionConfig;
use meteobridge_domain::error::MeteobridgeError;
use meteobridge_domain::forecast::{ForecastDaily, ForecastHourly};
use meteobridge_domain::id::EntryId;
use meteobridge_domain::reading::RealtimeReading;
use meteobridge_domain::station::StationInfo;

use crate::ports::{ConfigEntryRepository, DataSource, DataSourceFactory, SourceError};

pub fn connection(mac: &str) -> ConnectionConfig {
    ConnectionConfig {
        host: "db.local".to_string(),
        port: 3306,
        username: "weather".to_string(),
        password: "secret".to_string(),
        database: "meteobridge".to_string(),
        station_mac: mac.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Connection,
    NoData,
    Query,
}

impl Failure {
    fn error(self, station: &str) -> SourceError {
        match self {
            Self::Connection => SourceError::Connection(std::io::Error::other("refused").into()),
            Self::NoData => SourceError::NoData {
                station: station.to_string(),
            },
            Self::Query => SourceError::Query(std::io::Error::other("bad query").into()),
        }
    }
}

/// What the fake database answers.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub connect: Option<Failure>,
    pub realtime: Option<Failure>,
    pub station: Option<Failure>,
    pub reading: RealtimeReading,
    pub station_info: StationInfo,
    pub daily: Vec<ForecastDaily>,
    pub hourly: Vec<ForecastHourly>,
    /// Realtime queries for these stations take this long.
    pub slow: HashMap<String, Duration>,
}

#[derive(Debug, Default)]
struct Calls {
    built: Vec<ConnectionConfig>,
    connects: usize,
    stations: Vec<String>,
    forecasts: usize,
    closes: usize,
    in_flight: usize,
    max_in_flight: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FakeFactory {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Calls>>,
}

impl FakeFactory {
    pub fn with_reading(reading: RealtimeReading) -> Self {
        let factory = Self::default();
        factory.script(|s| s.reading = reading);
        factory
    }

    pub fn script(&self, f: impl FnOnce(&mut Script)) {
        f(&mut self.script.lock().unwrap());
    }

    pub fn built(&self) -> Vec<ConnectionConfig> {
        self.calls.lock().unwrap().built.clone()
    }

    pub fn connects(&self) -> usize {
        self.calls.lock().unwrap().connects
    }

    pub fn requested_stations(&self) -> Vec<String> {
        self.calls.lock().unwrap().stations.clone()
    }

    pub fn forecast_calls(&self) -> usize {
        self.calls.lock().unwrap().forecasts
    }

    pub fn closes(&self) -> usize {
        self.calls.lock().unwrap().closes
    }

    pub fn fetches_in_flight(&self) -> usize {
        self.calls.lock().unwrap().in_flight
    }

    /// Highest number of realtime queries seen running at the same time.
    pub fn max_concurrent_fetches(&self) -> usize {
        self.calls.lock().unwrap().max_in_flight
    }
}

impl DataSourceFactory for FakeFactory {
    type Source = FakeSource;

    fn build(&self, config: &ConnectionConfig) -> FakeSource {
        self.calls.lock().unwrap().built.push(config.clone());
        FakeSource {
            script: Arc::clone(&self.script),
            calls: Arc::clone(&self.calls),
        }
    }
}

pub struct FakeSource {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Calls>>,
}

impl DataSource for FakeSource {
    fn initialize(&self) -> impl Future<Output = Result<(), SourceError>> + Send {
        self.calls.lock().unwrap().connects += 1;
        let result = match self.script.lock().unwrap().connect {
            Some(failure) => Err(failure.error("")),
            None => Ok(()),
        };
        async { result }
    }

    fn station_data(
        &self,
        station_mac: &str,
    ) -> impl Future<Output = Result<StationInfo, SourceError>> + Send {
        let script = self.script.lock().unwrap();
        let result = match script.station {
            Some(failure) => Err(failure.error(station_mac)),
            None => Ok(script.station_info.clone()),
        };
        async { result }
    }

    fn realtime_data(
        &self,
        station_mac: &str,
    ) -> impl Future<Output = Result<RealtimeReading, SourceError>> + Send {
        self.calls
            .lock()
            .unwrap()
            .stations
            .push(station_mac.to_string());
        let script = self.script.lock().unwrap();
        let result = match script.realtime {
            Some(failure) => Err(failure.error(station_mac)),
            None => Ok(script.reading.clone()),
        };
        let delay = script.slow.get(station_mac).copied();
        drop(script);
        let calls = Arc::clone(&self.calls);
        async move {
            {
                let mut calls = calls.lock().unwrap();
                calls.in_flight += 1;
                calls.max_in_flight = calls.max_in_flight.max(calls.in_flight);
            }
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            calls.lock().unwrap().in_flight -= 1;
            result
        }
    }

    fn daily_forecast(&self) -> impl Future<Output = Result<Vec<ForecastDaily>, SourceError>> + Send {
        self.calls.lock().unwrap().forecasts += 1;
        let result = Ok(self.script.lock().unwrap().daily.clone());
        async { result }
    }

    fn hourly_forecast(
        &self,
    ) -> impl Future<Output = Result<Vec<ForecastHourly>, SourceError>> + Send {
        self.calls.lock().unwrap().forecasts += 1;
        let result = Ok(self.script.lock().unwrap().hourly.clone());
        async { result }
    }

    fn close(&self) -> impl Future<Output = ()> + Send {
        self.calls.lock().unwrap().closes += 1;
        async {}
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRepo {
    store: Arc<Mutex<HashMap<EntryId, ConfigEntry>>>,
}

impl InMemoryRepo {
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    pub fn insert(&self, entry: ConfigEntry) {
        self.store.lock().unwrap().insert(entry.id, entry);
    }
}

impl ConfigEntryRepository for InMemoryRepo {
    fn create(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, MeteobridgeError>> + Send {
        self.insert(entry.clone());
        async { Ok(entry) }
    }

    fn get_by_id(
        &self,
        id: EntryId,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, MeteobridgeError>> + Send {
        let result = self.store.lock().unwrap().get(&id).cloned();
        async { Ok(result) }
    }

    fn find_by_unique_id(
        &self,
        domain: &str,
        unique_id: &str,
    ) -> impl Future<Output = Result<Option<ConfigEntry>, MeteobridgeError>> + Send {
        let result = self
            .store
            .lock()
            .unwrap()
            .values()
            .find(|e| e.domain == domain && e.unique_id == unique_id)
            .cloned();
        async { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<ConfigEntry>, MeteobridgeError>> + Send {
        let mut result: Vec<ConfigEntry> = self.store.lock().unwrap().values().cloned().collect();
        result.sort_by_key(|e| e.created_at);
        async { Ok(result) }
    }

    fn update(
        &self,
        entry: ConfigEntry,
    ) -> impl Future<Output = Result<ConfigEntry, MeteobridgeError>> + Send {
        self.insert(entry.clone());
        async { Ok(entry) }
    }

    fn delete(&self, id: EntryId) -> impl Future<Output = Result<(), MeteobridgeError>> + Send {
        self.store.lock().unwrap().remove(&id);
        async { Ok(()) }
    }
}
