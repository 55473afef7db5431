//! Weather entity projection: current conditions and forecast items.

use serde::{Deserialize, Serialize};

use crate::forecast::{ForecastDaily, ForecastHourly};
use crate::reading::RealtimeReading;
use crate::sensor::units;
use crate::time::to_iso;

/// Attribution shown on the weather entity.
pub const WEATHER_ATTRIBUTION: &str = "Data provided by Visual Crossing";

/// Native units of every weather value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherUnits {
    pub temperature: &'static str,
    pub precipitation: &'static str,
    pub pressure: &'static str,
    pub wind_speed: &'static str,
}

/// Metric units, as stored by the bridge.
pub const WEATHER_UNITS: WeatherUnits = WeatherUnits {
    temperature: units::CELSIUS,
    precipitation: units::MILLIMETERS,
    pressure: units::HPA,
    wind_speed: units::METERS_PER_SECOND,
};

/// Unique id of the weather entity of a station.
#[must_use]
pub fn weather_unique_id(station_mac: &str) -> String {
    station_mac.to_string()
}

/// Display name of the weather entity of a station.
#[must_use]
pub fn weather_name(station_name: &str) -> String {
    format!("{station_name} Weather")
}

/// Current conditions, read from the latest reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub condition: Option<String>,
    pub native_temperature: Option<f64>,
    pub native_pressure: Option<f64>,
    pub humidity: Option<f64>,
    pub native_wind_speed: Option<f64>,
    /// Cardinal direction text (`"NNE"`), not degrees.
    pub wind_bearing: Option<String>,
    pub native_wind_gust_speed: Option<f64>,
    pub native_dew_point: Option<f64>,
}

impl From<&RealtimeReading> for WeatherConditions {
    fn from(reading: &RealtimeReading) -> Self {
        Self {
            condition: reading.icon.clone(),
            native_temperature: reading.temperature,
            native_pressure: reading.sealevelpressure,
            humidity: reading.humidity,
            native_wind_speed: reading.windspeedavg,
            wind_bearing: reading.wind_direction.clone(),
            native_wind_gust_speed: reading.windgust,
            native_dew_point: reading.dewpoint,
        }
    }
}

/// One forecast item as exposed by the weather entity.
///
/// Daily and hourly items share the shape; fields a bucket does not carry are
/// left out of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastItem {
    pub condition: Option<String>,
    /// RFC 3339 timestamp in UTC.
    pub datetime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub native_precipitation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_pressure: Option<f64>,
    pub native_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_templow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_apparent_temperature: Option<f64>,
    pub wind_bearing: Option<f64>,
    pub native_wind_speed: Option<f64>,
    pub native_wind_gust_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,
}

impl From<&ForecastDaily> for ForecastItem {
    fn from(item: &ForecastDaily) -> Self {
        Self {
            condition: item.icon.clone(),
            datetime: to_iso(item.datetime),
            precipitation_probability: item.precipitation_probability,
            native_precipitation: item.precipitation,
            native_temperature: item.temperature,
            native_templow: item.temp_low,
            // Daily bearings are whole degrees.
            wind_bearing: item.wind_bearing.map(f64::trunc),
            native_wind_speed: item.wind_speed,
            native_wind_gust_speed: item.wind_gust,
            ..Self::default()
        }
    }
}

impl From<&ForecastHourly> for ForecastItem {
    fn from(item: &ForecastHourly) -> Self {
        Self {
            condition: item.icon.clone(),
            datetime: to_iso(item.datetime),
            humidity: item.humidity,
            precipitation_probability: item.precipitation_probability,
            native_precipitation: item.precipitation,
            native_pressure: item.pressure,
            native_temperature: item.temperature,
            native_apparent_temperature: item.apparent_temperature,
            wind_bearing: item.wind_bearing,
            native_wind_speed: item.wind_speed,
            native_wind_gust_speed: item.wind_gust,
            uv_index: item.uv_index,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn should_read_current_conditions_from_reading() {
        let reading = RealtimeReading {
            icon: Some("partly-cloudy-day".to_string()),
            temperature: Some(18.2),
            sealevelpressure: Some(1013.4),
            wind_direction: Some("SW".to_string()),
            ..RealtimeReading::default()
        };
        let conditions = WeatherConditions::from(&reading);

        assert_eq!(conditions.condition.as_deref(), Some("partly-cloudy-day"));
        assert_eq!(conditions.native_temperature, Some(18.2));
        assert_eq!(conditions.native_pressure, Some(1013.4));
        assert_eq!(conditions.wind_bearing.as_deref(), Some("SW"));
        assert_eq!(conditions.humidity, None);
    }

    #[test]
    fn should_truncate_daily_wind_bearing() {
        let mut daily = ForecastDaily::empty(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        daily.wind_bearing = Some(247.8);
        daily.temp_low = Some(9.0);

        let item = ForecastItem::from(&daily);
        assert_eq!(item.wind_bearing, Some(247.0));
        assert_eq!(item.native_templow, Some(9.0));
        assert_eq!(item.datetime, "2024-06-01T00:00:00+00:00");
    }

    #[test]
    fn should_omit_hourly_only_fields_from_daily_item() {
        let daily = ForecastDaily::empty(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let json = serde_json::to_value(ForecastItem::from(&daily)).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("humidity"));
        assert!(!object.contains_key("uv_index"));
        assert!(object.contains_key("native_temperature"));
    }

    #[test]
    fn should_carry_hourly_fields() {
        let mut hourly =
            ForecastHourly::empty(Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap());
        hourly.uv_index = Some(6.0);
        hourly.apparent_temperature = Some(22.5);

        let item = ForecastItem::from(&hourly);
        assert_eq!(item.uv_index, Some(6.0));
        assert_eq!(item.native_apparent_temperature, Some(22.5));
        assert_eq!(item.datetime, "2024-06-01T13:00:00+00:00");
    }

    #[test]
    fn should_name_weather_entity_after_station() {
        assert_eq!(weather_name("Backyard"), "Backyard Weather");
        assert_eq!(weather_unique_id("AA:BB:CC"), "AA:BB:CC");
    }
}
