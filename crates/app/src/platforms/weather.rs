//! Weather platform: current conditions plus daily and hourly forecasts.

use serde::Serialize;

use meteobridge_domain::device::DeviceInfo;
use meteobridge_domain::snapshot::FetchResult;
use meteobridge_domain::variant::{IntegrationVariant, Platform};
use meteobridge_domain::weather::{
    ForecastItem, WEATHER_ATTRIBUTION, WEATHER_UNITS, WeatherConditions, WeatherUnits,
    weather_name, weather_unique_id,
};

use crate::coordinator::CoordinatorState;

/// The weather entity of one station.
#[derive(Debug, Clone)]
pub struct WeatherEntity {
    unique_id: String,
    name: String,
    device: DeviceInfo,
}

/// Build the weather entity of a station, when the variant has one.
#[must_use]
pub fn setup_weather(
    variant: IntegrationVariant,
    station_mac: &str,
    data: Option<&FetchResult>,
) -> Option<WeatherEntity> {
    if !variant.has_platform(Platform::Weather) {
        return None;
    }
    let data = data?;
    let station = data.sensor_data.station();
    Some(WeatherEntity {
        unique_id: weather_unique_id(station_mac),
        name: weather_name(station.name_or(station_mac)),
        device: DeviceInfo::forecast(variant.domain(), station_mac),
    })
}

impl WeatherEntity {
    #[must_use]
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    #[must_use]
    pub fn state(&self, coordinator: &CoordinatorState) -> WeatherState {
        let conditions = coordinator
            .data
            .as_deref()
            .map(|data| WeatherConditions::from(&data.sensor_data))
            .unwrap_or_default();
        WeatherState {
            unique_id: self.unique_id.clone(),
            name: self.name.clone(),
            attribution: WEATHER_ATTRIBUTION,
            units: WEATHER_UNITS,
            available: coordinator.last_update_success,
            conditions,
        }
    }

    /// Daily forecast items, in source order.
    #[must_use]
    pub fn daily_forecast(&self, coordinator: &CoordinatorState) -> Vec<ForecastItem> {
        coordinator
            .data
            .as_deref()
            .map(|data| data.daily_forecast.iter().map(ForecastItem::from).collect())
            .unwrap_or_default()
    }

    /// Hourly forecast items, in source order.
    #[must_use]
    pub fn hourly_forecast(&self, coordinator: &CoordinatorState) -> Vec<ForecastItem> {
        coordinator
            .data
            .as_deref()
            .map(|data| data.hourly_forecast.iter().map(ForecastItem::from).collect())
            .unwrap_or_default()
    }
}

/// Point-in-time state of the weather entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherState {
    pub unique_id: String,
    pub name: String,
    pub attribution: &'static str,
    pub units: WeatherUnits,
    pub available: bool,
    #[serde(flatten)]
    pub conditions: WeatherConditions,
}
