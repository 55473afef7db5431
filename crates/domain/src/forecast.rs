//! Forecast entries: predicted metrics for one future time bucket.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// One day of forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDaily {
    pub datetime: Timestamp,
    pub temperature: Option<f64>,
    pub temp_low: Option<f64>,
    pub precipitation: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub wind_bearing: Option<f64>,
    pub icon: Option<String>,
    pub conditions: Option<String>,
}

/// One hour of forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastHourly {
    pub datetime: Timestamp,
    pub temperature: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub precipitation: Option<f64>,
    pub precipitation_probability: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    pub wind_bearing: Option<f64>,
    pub uv_index: Option<f64>,
    pub icon: Option<String>,
    pub conditions: Option<String>,
}

impl ForecastDaily {
    /// An entry for `datetime` with every metric absent.
    #[must_use]
    pub fn empty(datetime: Timestamp) -> Self {
        Self {
            datetime,
            temperature: None,
            temp_low: None,
            precipitation: None,
            precipitation_probability: None,
            wind_speed: None,
            wind_gust: None,
            wind_bearing: None,
            icon: None,
            conditions: None,
        }
    }
}

impl ForecastHourly {
    /// An entry for `datetime` with every metric absent.
    #[must_use]
    pub fn empty(datetime: Timestamp) -> Self {
        Self {
            datetime,
            temperature: None,
            apparent_temperature: None,
            humidity: None,
            precipitation: None,
            precipitation_probability: None,
            pressure: None,
            wind_speed: None,
            wind_gust: None,
            wind_bearing: None,
            uv_index: None,
            icon: None,
            conditions: None,
        }
    }
}
