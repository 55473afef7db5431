//! Sensor platform: one entity per metric the station reports.

use std::collections::BTreeMap;

use serde::Serialize;

use meteobridge_domain::device::DeviceInfo;
use meteobridge_domain::sensor::{
    ATTRIBUTION, SENSOR_TYPES, SensorDescription, SensorDeviceClass, SensorStateClass,
};
use meteobridge_domain::snapshot::FetchResult;
use meteobridge_domain::value::StateValue;

use crate::coordinator::CoordinatorState;

/// A sensor bound to one catalog description of one station.
#[derive(Debug, Clone)]
pub struct SensorEntity {
    description: &'static SensorDescription,
    unique_id: String,
    device: DeviceInfo,
}

/// Build the sensors of a station from its first snapshot.
///
/// Nothing is created when there is no snapshot or when the reading is empty.
/// Otherwise one sensor is created per description whose metric is present.
#[must_use]
pub fn setup_sensors(domain: &str, station_mac: &str, data: Option<&FetchResult>) -> Vec<SensorEntity> {
    let Some(data) = data else {
        return Vec::new();
    };
    let reading = &data.sensor_data;
    if reading.is_empty() {
        tracing::debug!(station = station_mac, "no sensor data, skipping sensor platform");
        return Vec::new();
    }

    let device = DeviceInfo::station(domain, station_mac, &reading.station());
    SENSOR_TYPES
        .iter()
        .filter(|description| (description.value)(reading).is_some())
        .map(|description| SensorEntity::new(description, station_mac, device.clone()))
        .collect()
}

impl SensorEntity {
    #[must_use]
    pub fn new(description: &'static SensorDescription, station_mac: &str, device: DeviceInfo) -> Self {
        Self {
            description,
            unique_id: format!("{station_mac} {}", description.key),
            device,
        }
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        self.description.key
    }

    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    #[must_use]
    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// Current state of the sensor, read from the coordinator.
    #[must_use]
    pub fn state(&self, coordinator: &CoordinatorState) -> SensorState {
        let reading = coordinator.data.as_deref().map(|data| &data.sensor_data);
        let description = self.description;
        let native_value = reading.and_then(description.value);
        let attributes = description
            .attributes
            .iter()
            .map(|(name, read)| (*name, reading.and_then(*read)))
            .collect();

        SensorState {
            unique_id: self.unique_id.clone(),
            key: description.key,
            name: description.name,
            native_value,
            unit: description.unit,
            device_class: description.device_class,
            state_class: description.state_class,
            suggested_display_precision: description.suggested_display_precision,
            icon: description.icon,
            translation_key: description.translation_key,
            attribution: ATTRIBUTION,
            available: coordinator.last_update_success,
            attributes,
        }
    }
}

/// Point-in-time state of a sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub key: &'static str,
    pub name: &'static str,
    pub native_value: Option<StateValue>,
    pub unit: Option<&'static str>,
    pub device_class: Option<SensorDeviceClass>,
    pub state_class: Option<SensorStateClass>,
    pub suggested_display_precision: Option<u8>,
    pub icon: Option<&'static str>,
    pub translation_key: Option<&'static str>,
    pub attribution: &'static str,
    pub available: bool,
    pub attributes: BTreeMap<&'static str, Option<StateValue>>,
}
