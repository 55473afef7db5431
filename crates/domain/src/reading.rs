//! Realtime reading: one point-in-time set of weather metrics for a station.
//!
//! Every metric is optional: a station without a rain gauge or an air-quality
//! sensor simply leaves those fields absent, and entity adapters decline to
//! create entities for them.

use serde::{Deserialize, Serialize};

use crate::station::StationInfo;

/// Latest metrics of one station, as delivered by the data source.
///
/// Field names double as sensor keys, so they follow the database naming
/// (`windspeedavg`, `sealevelpressure`, …) rather than Rust word splitting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeReading {
    // Station metadata carried alongside each reading.
    pub station_name: Option<String>,
    pub platform: Option<String>,
    pub ip: Option<String>,
    pub sw_version: Option<String>,
    pub build_number: Option<String>,

    // Temperature
    pub temperature: Option<f64>,
    pub tempmax: Option<f64>,
    pub tempmin: Option<f64>,
    pub temp15min: Option<f64>,
    pub windchill: Option<f64>,
    pub heatindex: Option<f64>,
    pub dewpoint: Option<f64>,
    pub feels_like_temperature: Option<f64>,

    // Humidity
    pub humidity: Option<f64>,
    pub absolute_humidity: Option<f64>,

    // Air quality
    pub pm1: Option<f64>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub aqi: Option<f64>,

    // Wind
    pub windspeedavg: Option<f64>,
    pub windgust: Option<f64>,
    pub windbearing: Option<f64>,
    pub windbearingavg10: Option<f64>,
    pub windbearingdavg: Option<f64>,
    pub wind_direction: Option<String>,
    pub beaufort: Option<i64>,
    pub beaufort_description: Option<String>,

    // Rain
    pub rainrate: Option<f64>,
    pub raintoday: Option<f64>,
    pub rainyesterday: Option<f64>,

    // Pressure
    pub sealevelpressure: Option<f64>,
    pub pressuretrend: Option<f64>,
    pub pressuretrend_text: Option<String>,

    // Sun
    pub uv: Option<f64>,
    pub uvdaymax: Option<f64>,
    pub uv_description: Option<String>,
    pub solarrad: Option<f64>,
    pub solarraddaymax: Option<f64>,

    // Atmosphere
    pub cloud_base: Option<f64>,
    pub freezing_altitude: Option<f64>,
    pub visibility: Option<f64>,
    pub elevation: Option<f64>,

    // Conditions
    pub conditions: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl RealtimeReading {
    /// Every metric key a reading can carry (station metadata excluded).
    pub const FIELD_NAMES: &'static [&'static str] = &[
        "temperature",
        "tempmax",
        "tempmin",
        "temp15min",
        "windchill",
        "heatindex",
        "dewpoint",
        "feels_like_temperature",
        "humidity",
        "absolute_humidity",
        "pm1",
        "pm25",
        "pm10",
        "aqi",
        "windspeedavg",
        "windgust",
        "windbearing",
        "windbearingavg10",
        "windbearingdavg",
        "wind_direction",
        "beaufort",
        "beaufort_description",
        "rainrate",
        "raintoday",
        "rainyesterday",
        "sealevelpressure",
        "pressuretrend",
        "pressuretrend_text",
        "uv",
        "uvdaymax",
        "uv_description",
        "solarrad",
        "solarraddaymax",
        "cloud_base",
        "freezing_altitude",
        "visibility",
        "elevation",
        "conditions",
        "icon",
        "description",
    ];

    /// Whether the reading carries no metric at all.
    ///
    /// Station metadata alone does not make a reading non-empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let Ok(serde_json::Value::Object(map)) = serde_json::to_value(self) else {
            return true;
        };
        Self::FIELD_NAMES
            .iter()
            .all(|key| map.get(*key).is_none_or(serde_json::Value::is_null))
    }

    /// Station metadata carried by this reading.
    #[must_use]
    pub fn station(&self) -> StationInfo {
        StationInfo {
            station_name: self.station_name.clone(),
            platform: self.platform.clone(),
            ip: self.ip.clone(),
            sw_version: self.sw_version.clone(),
            build_number: self.build_number.clone(),
        }
    }
}
