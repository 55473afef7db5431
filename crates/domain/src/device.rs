//! Device: the registry record entities of one station are grouped under.

use serde::{Deserialize, Serialize};

use crate::station::StationInfo;

/// Manufacturer reported for station devices.
pub const MANUFACTURER: &str = "Meteobridge";
/// Manufacturer reported for the forecast device.
pub const WEATHER_MANUFACTURER: &str = "Visual Crossing";
/// Model reported for the forecast device.
pub const WEATHER_MODEL: &str = "Forecast";
/// Where the forecast provider documents its API.
pub const WEATHER_CONFIGURATION_URL: &str = "https://www.visualcrossing.com/weather-api";

/// How the device is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceEntryType {
    Service,
}

/// Device metadata attached to every entity of a config entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// `(domain, unique key)` pairs identifying the device.
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub entry_type: DeviceEntryType,
    pub manufacturer: String,
    pub model: Option<String>,
    pub hw_version: Option<String>,
    pub sw_version: Option<String>,
    pub configuration_url: Option<String>,
}

impl DeviceInfo {
    /// Device for the sensors of a station.
    #[must_use]
    pub fn station(domain: &str, station_mac: &str, station: &StationInfo) -> Self {
        Self {
            identifiers: vec![(domain.to_string(), station_mac.to_string())],
            name: format!("{} Sensor", station.name_or(station_mac)),
            entry_type: DeviceEntryType::Service,
            manufacturer: MANUFACTURER.to_string(),
            model: station.hardware_model(),
            hw_version: station.platform.clone(),
            sw_version: station.firmware(),
            configuration_url: station.ip.as_ref().map(|ip| format!("http://{ip}")),
        }
    }

    /// Device for the forecast-backed weather entity.
    #[must_use]
    pub fn forecast(domain: &str, station_mac: &str) -> Self {
        Self {
            identifiers: vec![(domain.to_string(), format!("{station_mac}_forecast"))],
            name: "Weather Entity".to_string(),
            entry_type: DeviceEntryType::Service,
            manufacturer: WEATHER_MANUFACTURER.to_string(),
            model: Some(WEATHER_MODEL.to_string()),
            hw_version: None,
            sw_version: None,
            configuration_url: Some(WEATHER_CONFIGURATION_URL.to_string()),
        }
    }
}
