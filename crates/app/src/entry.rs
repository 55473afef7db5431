//! Entry context: everything a loaded config entry owns at runtime.

use std::sync::Arc;

use tokio::task::AbortHandle;

use meteobridge_domain::config_entry::ConfigEntry;
use meteobridge_domain::variant::IntegrationVariant;

use crate::coordinator::Coordinator;
use crate::data_adapter::DataAdapter;
use crate::error::SetupError;
use crate::platforms::{SensorEntity, WeatherEntity, setup_sensors, setup_weather};
use crate::ports::{DataSource, DataSourceFactory};

/// Runtime objects of one loaded config entry.
///
/// Dropping the context stops its refresh loop.
pub struct EntryContext<S> {
    entry: Arc<ConfigEntry>,
    coordinator: Arc<Coordinator<S>>,
    sensors: Arc<[SensorEntity]>,
    weather: Option<Arc<WeatherEntity>>,
    refresh_task: AbortHandle,
}

impl<S: DataSource> EntryContext<S> {
    /// Set up an entry: build its adapter and coordinator, refresh once, start
    /// polling and create the entities of every platform of the variant.
    ///
    /// # Errors
    ///
    /// Returns the [`SetupError`] of the first refresh. Nothing keeps running
    /// in that case.
    #[tracing::instrument(skip_all, fields(entry_id = %entry.id, station = %entry.unique_id))]
    pub async fn setup<F>(
        factory: &F,
        entry: ConfigEntry,
        variant: IntegrationVariant,
    ) -> Result<Self, SetupError>
    where
        F: DataSourceFactory<Source = S>,
    {
        let adapter = DataAdapter::initialize(factory, entry.data.clone(), variant);
        let coordinator = Arc::new(Coordinator::new(entry.title.clone(), adapter));
        if let Err(err) = coordinator.first_refresh().await {
            coordinator.close().await;
            return Err(err);
        }
        let refresh_task = coordinator.start();

        let data = coordinator.data();
        let station_mac = entry.unique_id.as_str();
        let sensors: Arc<[SensorEntity]> =
            setup_sensors(variant.domain(), station_mac, data.as_deref()).into();
        let weather = setup_weather(variant, station_mac, data.as_deref()).map(Arc::new);
        tracing::info!(
            sensors = sensors.len(),
            weather = weather.is_some(),
            "entry set up"
        );

        Ok(Self {
            entry: Arc::new(entry),
            coordinator,
            sensors,
            weather,
            refresh_task,
        })
    }

    #[must_use]
    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    #[must_use]
    pub fn coordinator(&self) -> &Arc<Coordinator<S>> {
        &self.coordinator
    }

    #[must_use]
    pub fn sensors(&self) -> &[SensorEntity] {
        &self.sensors
    }

    #[must_use]
    pub fn weather(&self) -> Option<&WeatherEntity> {
        self.weather.as_deref()
    }

    /// Stop polling and release the connection.
    pub async fn unload(&self) {
        self.refresh_task.abort();
        self.coordinator.close().await;
        tracing::info!(entry_id = %self.entry.id, "entry unloaded");
    }
}

impl<S> Drop for EntryContext<S> {
    fn drop(&mut self) {
        self.refresh_task.abort();
    }
}
