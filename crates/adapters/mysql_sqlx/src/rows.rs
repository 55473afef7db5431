//! Row types of the Meteobridge MySQL tables and their conversion into
//! domain values.
//!
//! Column names follow the tables written by the Meteobridge SQL export.
//! Columns a given bridge does not export decode as absent.

use chrono::NaiveDateTime;
use sqlx::FromRow;

use meteobridge_domain::forecast::{ForecastDaily, ForecastHourly};
use meteobridge_domain::reading::RealtimeReading;
use meteobridge_domain::station::StationInfo;
use meteobridge_domain::time::from_naive_utc;

use crate::derive;

/// One row of `realtime_data`, keyed by the station MAC.
#[derive(Debug, Clone, Default, FromRow)]
#[sqlx(default)]
pub struct RealtimeRow {
    #[sqlx(rename = "ID")]
    pub station_mac: String,

    #[sqlx(rename = "mb_stationname")]
    pub station_name: Option<String>,
    #[sqlx(rename = "mb_platform")]
    pub platform: Option<String>,
    #[sqlx(rename = "mb_ip")]
    pub ip: Option<String>,
    #[sqlx(rename = "mb_swversion")]
    pub sw_version: Option<String>,
    #[sqlx(rename = "mb_buildnum")]
    pub build_number: Option<String>,

    pub temperature: Option<f64>,
    pub tempmax: Option<f64>,
    pub tempmin: Option<f64>,
    pub temp15min: Option<f64>,
    pub windchill: Option<f64>,
    pub heatindex: Option<f64>,
    pub dewpoint: Option<f64>,
    pub humidity: Option<f64>,

    pub pm1: Option<f64>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub aqi: Option<f64>,

    pub windspeedavg: Option<f64>,
    pub windgust: Option<f64>,
    pub windbearing: Option<f64>,
    pub windbearingavg10: Option<f64>,
    pub windbearingdavg: Option<f64>,

    pub rainrate: Option<f64>,
    pub raintoday: Option<f64>,
    pub rainyesterday: Option<f64>,

    pub sealevelpressure: Option<f64>,
    pub pressuretrend: Option<f64>,

    pub uv: Option<f64>,
    pub uvdaymax: Option<f64>,
    pub solarrad: Option<f64>,
    pub solarraddaymax: Option<f64>,

    pub visibility: Option<f64>,
    pub elevation: Option<f64>,

    pub conditions: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

/// Station metadata columns of `realtime_data`.
#[derive(Debug, Clone, Default, FromRow)]
#[sqlx(default)]
pub struct StationRow {
    #[sqlx(rename = "mb_stationname")]
    pub station_name: Option<String>,
    #[sqlx(rename = "mb_platform")]
    pub platform: Option<String>,
    #[sqlx(rename = "mb_ip")]
    pub ip: Option<String>,
    #[sqlx(rename = "mb_swversion")]
    pub sw_version: Option<String>,
    #[sqlx(rename = "mb_buildnum")]
    pub build_number: Option<String>,
}

/// One row of `daily_forecast`.
#[derive(Debug, Clone, FromRow)]
pub struct DailyRow {
    #[sqlx(rename = "forecast_time")]
    pub datetime: NaiveDateTime,
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

/// One row of `hourly_forecast`.
#[derive(Debug, Clone, FromRow)]
pub struct HourlyRow {
    #[sqlx(rename = "forecast_time")]
    pub datetime: NaiveDateTime,
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

impl From<StationRow> for StationInfo {
    fn from(row: StationRow) -> Self {
        Self {
            station_name: row.station_name,
            platform: row.platform,
            ip: row.ip,
            sw_version: row.sw_version,
            build_number: row.build_number,
        }
    }
}

impl From<RealtimeRow> for RealtimeReading {
    fn from(row: RealtimeRow) -> Self {
        let beaufort = row.windspeedavg.map(derive::beaufort);
        let absolute_humidity = row
            .temperature
            .zip(row.humidity)
            .map(|(temperature, humidity)| derive::absolute_humidity(temperature, humidity));
        let cloud_base = row
            .temperature
            .zip(row.dewpoint)
            .map(|(temperature, dewpoint)| derive::cloud_base(temperature, dewpoint));
        let freezing_altitude = row.temperature.map(|temperature| {
            derive::freezing_altitude(temperature, row.elevation.unwrap_or_default())
        });
        let feels_like_temperature = row.temperature.map(|temperature| {
            derive::feels_like(temperature, row.windspeedavg, row.windchill, row.heatindex)
        });

        Self {
            station_name: row.station_name,
            platform: row.platform,
            ip: row.ip,
            sw_version: row.sw_version,
            build_number: row.build_number,

            temperature: row.temperature,
            tempmax: row.tempmax,
            tempmin: row.tempmin,
            temp15min: row.temp15min,
            windchill: row.windchill,
            heatindex: row.heatindex,
            dewpoint: row.dewpoint,
            feels_like_temperature,

            humidity: row.humidity,
            absolute_humidity,

            pm1: row.pm1,
            pm25: row.pm25,
            pm10: row.pm10,
            aqi: row.aqi,

            windspeedavg: row.windspeedavg,
            windgust: row.windgust,
            windbearing: row.windbearing,
            windbearingavg10: row.windbearingavg10,
            windbearingdavg: row.windbearingdavg,
            wind_direction: row.windbearing.map(|b| derive::cardinal(b).to_string()),
            beaufort,
            beaufort_description: beaufort.map(|f| derive::beaufort_description(f).to_string()),

            rainrate: row.rainrate,
            raintoday: row.raintoday,
            rainyesterday: row.rainyesterday,

            sealevelpressure: row.sealevelpressure,
            pressuretrend: row.pressuretrend,
            pressuretrend_text: row
                .pressuretrend
                .map(|t| derive::pressure_trend(t).to_string()),

            uv: row.uv,
            uvdaymax: row.uvdaymax,
            uv_description: row.uv.map(|uv| derive::uv_description(uv).to_string()),
            solarrad: row.solarrad,
            solarraddaymax: row.solarraddaymax,

            cloud_base,
            freezing_altitude,
            visibility: row.visibility,
            elevation: row.elevation,

            conditions: row.conditions,
            icon: row.icon,
            description: row.description,
        }
    }
}

impl From<DailyRow> for ForecastDaily {
    fn from(row: DailyRow) -> Self {
        Self {
            datetime: from_naive_utc(row.datetime),
            temperature: row.temperature,
            temp_low: row.temp_low,
            precipitation: row.precipitation,
            precipitation_probability: row.precipitation_probability,
            wind_speed: row.wind_speed,
            wind_gust: row.wind_gust,
            wind_bearing: row.wind_bearing,
            icon: row.icon,
            conditions: row.conditions,
        }
    }
}

impl From<HourlyRow> for ForecastHourly {
    fn from(row: HourlyRow) -> Self {
        Self {
            datetime: from_naive_utc(row.datetime),
            temperature: row.temperature,
            apparent_temperature: row.apparent_temperature,
            humidity: row.humidity,
            precipitation: row.precipitation,
            precipitation_probability: row.precipitation_probability,
            pressure: row.pressure,
            wind_speed: row.wind_speed,
            wind_gust: row.wind_gust,
            wind_bearing: row.wind_bearing,
            uv_index: row.uv_index,
            icon: row.icon,
            conditions: row.conditions,
        }
    }
}
