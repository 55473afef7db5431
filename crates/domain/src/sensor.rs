//! Sensor catalog: which metrics become sensor entities, and how.
//!
//! Each [`SensorDescription`] pairs a metric key with an accessor into
//! [`RealtimeReading`]. The table is checked once at startup by
//! [`validate_catalog`], so a description can never silently read the wrong
//! field or name a metric that readings do not carry.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::reading::RealtimeReading;
use crate::value::StateValue;

/// Attribution shown on every sensor.
pub const ATTRIBUTION: &str = "Data provided by Meteobridge";

/// Units of measurement used by the catalog.
pub mod units {
    pub const CELSIUS: &str = "°C";
    pub const PERCENTAGE: &str = "%";
    pub const HPA: &str = "hPa";
    pub const METERS: &str = "m";
    pub const KILOMETERS: &str = "km";
    pub const METERS_PER_SECOND: &str = "m/s";
    pub const MILLIMETERS: &str = "mm";
    pub const MILLIMETERS_PER_HOUR: &str = "mm/h";
    pub const WATTS_PER_SQUARE_METER: &str = "W/m²";
    pub const DEGREE: &str = "°";
    pub const UV_INDEX: &str = "UV index";
    pub const MICROGRAMS_PER_CUBIC_METER: &str = "µg/m³";
    pub const GRAMS_PER_CUBIC_METER: &str = "g/m³";
}

/// What a sensor measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorDeviceClass {
    Aqi,
    AtmosphericPressure,
    Distance,
    Humidity,
    Irradiance,
    Pm1,
    Pm10,
    Pm25,
    Precipitation,
    PrecipitationIntensity,
    Temperature,
    WindDirection,
    WindSpeed,
}

/// How a sensor's values relate over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStateClass {
    Measurement,
}

/// Reads one value out of a reading.
pub type Accessor = fn(&RealtimeReading) -> Option<StateValue>;

/// Static description of one sensor.
#[derive(Debug, Clone, Copy)]
pub struct SensorDescription {
    /// Metric key, also the name of the [`RealtimeReading`] field.
    pub key: &'static str,
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub device_class: Option<SensorDeviceClass>,
    pub state_class: Option<SensorStateClass>,
    pub suggested_display_precision: Option<u8>,
    pub icon: Option<&'static str>,
    pub translation_key: Option<&'static str>,
    pub value: Accessor,
    /// Extra state attributes, by attribute name.
    pub attributes: &'static [(&'static str, Accessor)],
}

impl SensorDescription {
    /// Look a description up by key.
    #[must_use]
    pub fn find(key: &str) -> Option<&'static SensorDescription> {
        SENSOR_TYPES.iter().find(|d| d.key == key)
    }
}

fn state<T: Clone + Into<StateValue>>(value: Option<&T>) -> Option<StateValue> {
    value.map(|v| v.clone().into())
}

macro_rules! read {
    ($field:ident) => {
        (|r: &RealtimeReading| state(r.$field.as_ref())) as Accessor
    };
}

const BASE: SensorDescription = SensorDescription {
    key: "",
    name: "",
    unit: None,
    device_class: None,
    state_class: None,
    suggested_display_precision: None,
    icon: None,
    translation_key: None,
    value: |_| None,
    attributes: &[],
};

const MEASUREMENT: Option<SensorStateClass> = Some(SensorStateClass::Measurement);

/// Every sensor the integration can expose.
pub static SENSOR_TYPES: &[SensorDescription] = &[
    SensorDescription {
        key: "absolute_humidity",
        name: "Absolute Humidity",
        unit: Some(units::GRAMS_PER_CUBIC_METER),
        state_class: MEASUREMENT,
        suggested_display_precision: Some(0),
        icon: Some("mdi:water"),
        value: read!(absolute_humidity),
        ..BASE
    },
    SensorDescription {
        key: "aqi",
        name: "Air Quality Index",
        icon: Some("mdi:air-filter"),
        device_class: Some(SensorDeviceClass::Aqi),
        state_class: MEASUREMENT,
        suggested_display_precision: Some(1),
        value: read!(aqi),
        ..BASE
    },
    SensorDescription {
        key: "beaufort",
        name: "Beaufort",
        icon: Some("mdi:windsock"),
        state_class: MEASUREMENT,
        value: read!(beaufort),
        ..BASE
    },
    SensorDescription {
        key: "beaufort_description",
        name: "Beaufort Description",
        icon: Some("mdi:windsock"),
        translation_key: Some("beaufort"),
        value: read!(beaufort_description),
        ..BASE
    },
    SensorDescription {
        key: "cloud_base",
        name: "Cloud Base",
        unit: Some(units::METERS),
        device_class: Some(SensorDeviceClass::Distance),
        state_class: MEASUREMENT,
        icon: Some("mdi:arrow-expand-vertical"),
        suggested_display_precision: Some(0),
        value: read!(cloud_base),
        ..BASE
    },
    SensorDescription {
        key: "icon",
        name: "Condition",
        icon: Some("mdi:simple-icons"),
        value: read!(icon),
        ..BASE
    },
    SensorDescription {
        key: "conditions",
        name: "Condition Text",
        icon: Some("mdi:simple-icons"),
        value: read!(conditions),
        ..BASE
    },
    SensorDescription {
        key: "description",
        name: "Description",
        icon: Some("mdi:image-text"),
        value: read!(description),
        ..BASE
    },
    SensorDescription {
        key: "dewpoint",
        name: "Dewpoint",
        unit: Some(units::CELSIUS),
        device_class: Some(SensorDeviceClass::Temperature),
        state_class: MEASUREMENT,
        value: read!(dewpoint),
        ..BASE
    },
    SensorDescription {
        key: "feels_like_temperature",
        name: "Apparent Temperature",
        unit: Some(units::CELSIUS),
        device_class: Some(SensorDeviceClass::Temperature),
        state_class: MEASUREMENT,
        value: read!(feels_like_temperature),
        ..BASE
    },
    SensorDescription {
        key: "freezing_altitude",
        name: "Freezing Altitude",
        unit: Some(units::METERS),
        device_class: Some(SensorDeviceClass::Distance),
        state_class: MEASUREMENT,
        suggested_display_precision: Some(0),
        value: read!(freezing_altitude),
        ..BASE
    },
    SensorDescription {
        key: "heatindex",
        name: "Heat Index",
        unit: Some(units::CELSIUS),
        device_class: Some(SensorDeviceClass::Temperature),
        state_class: MEASUREMENT,
        value: read!(heatindex),
        ..BASE
    },
    SensorDescription {
        key: "humidity",
        name: "Humidity",
        unit: Some(units::PERCENTAGE),
        device_class: Some(SensorDeviceClass::Humidity),
        state_class: MEASUREMENT,
        value: read!(humidity),
        ..BASE
    },
    SensorDescription {
        key: "pm1",
        name: "Particulate Matter PM1",
        unit: Some(units::MICROGRAMS_PER_CUBIC_METER),
        device_class: Some(SensorDeviceClass::Pm1),
        state_class: MEASUREMENT,
        value: read!(pm1),
        ..BASE
    },
    SensorDescription {
        key: "pm10",
        name: "Particulate Matter PM10",
        unit: Some(units::MICROGRAMS_PER_CUBIC_METER),
        device_class: Some(SensorDeviceClass::Pm10),
        state_class: MEASUREMENT,
        value: read!(pm10),
        ..BASE
    },
    SensorDescription {
        key: "pm25",
        name: "Particulate Matter PM2.5",
        unit: Some(units::MICROGRAMS_PER_CUBIC_METER),
        device_class: Some(SensorDeviceClass::Pm25),
        state_class: MEASUREMENT,
        value: read!(pm25),
        ..BASE
    },
    SensorDescription {
        key: "pressuretrend_text",
        name: "Pressure Trend",
        translation_key: Some("pressure_trend"),
        icon: Some("mdi:trending-up"),
        value: read!(pressuretrend_text),
        attributes: &[("pressure_trend", read!(pressuretrend))],
        ..BASE
    },
    SensorDescription {
        key: "pressuretrend",
        name: "Pressure Trend Value",
        unit: Some(units::HPA),
        device_class: Some(SensorDeviceClass::AtmosphericPressure),
        state_class: MEASUREMENT,
        suggested_display_precision: Some(1),
        value: read!(pressuretrend),
        ..BASE
    },
    SensorDescription {
        key: "rainrate",
        name: "Rain rate",
        unit: Some(units::MILLIMETERS_PER_HOUR),
        device_class: Some(SensorDeviceClass::PrecipitationIntensity),
        state_class: MEASUREMENT,
        suggested_display_precision: Some(1),
        value: read!(rainrate),
        ..BASE
    },
    SensorDescription {
        key: "raintoday",
        name: "Rain today",
        unit: Some(units::MILLIMETERS),
        device_class: Some(SensorDeviceClass::Precipitation),
        state_class: MEASUREMENT,
        suggested_display_precision: Some(1),
        value: read!(raintoday),
        ..BASE
    },
    SensorDescription {
        key: "rainyesterday",
        name: "Rain yesterday",
        unit: Some(units::MILLIMETERS),
        device_class: Some(SensorDeviceClass::Precipitation),
        state_class: MEASUREMENT,
        suggested_display_precision: Some(1),
        value: read!(rainyesterday),
        ..BASE
    },
    SensorDescription {
        key: "sealevelpressure",
        name: "Sealevel Pressure",
        unit: Some(units::HPA),
        device_class: Some(SensorDeviceClass::AtmosphericPressure),
        state_class: MEASUREMENT,
        suggested_display_precision: Some(1),
        value: read!(sealevelpressure),
        ..BASE
    },
    SensorDescription {
        key: "solarrad",
        name: "Solar Radiation",
        unit: Some(units::WATTS_PER_SQUARE_METER),
        device_class: Some(SensorDeviceClass::Irradiance),
        state_class: MEASUREMENT,
        value: read!(solarrad),
        attributes: &[("max_solar_radiation_today", read!(solarraddaymax))],
        ..BASE
    },
    SensorDescription {
        key: "temperature",
        name: "Temperature",
        unit: Some(units::CELSIUS),
        device_class: Some(SensorDeviceClass::Temperature),
        state_class: MEASUREMENT,
        value: read!(temperature),
        attributes: &[
            ("max_temperature_today", read!(tempmax)),
            ("min_temperature_today", read!(tempmin)),
            ("temperature_15_min_ago", read!(temp15min)),
        ],
        ..BASE
    },
    SensorDescription {
        key: "uv",
        name: "UV Index",
        unit: Some(units::UV_INDEX),
        state_class: MEASUREMENT,
        icon: Some("mdi:sun-wireless"),
        suggested_display_precision: Some(1),
        value: read!(uv),
        attributes: &[("max_uv_today", read!(uvdaymax))],
        ..BASE
    },
    SensorDescription {
        key: "uv_description",
        name: "UV Description",
        icon: Some("mdi:sun-wireless"),
        translation_key: Some("uv_description"),
        value: read!(uv_description),
        ..BASE
    },
    SensorDescription {
        key: "visibility",
        name: "Visibility",
        unit: Some(units::KILOMETERS),
        device_class: Some(SensorDeviceClass::Distance),
        state_class: MEASUREMENT,
        suggested_display_precision: Some(0),
        value: read!(visibility),
        ..BASE
    },
    SensorDescription {
        key: "windchill",
        name: "Wind Chill",
        unit: Some(units::CELSIUS),
        device_class: Some(SensorDeviceClass::Temperature),
        state_class: MEASUREMENT,
        value: read!(windchill),
        ..BASE
    },
    SensorDescription {
        key: "windbearing",
        name: "Wind bearing",
        device_class: Some(SensorDeviceClass::WindDirection),
        unit: Some(units::DEGREE),
        icon: Some("mdi:compass"),
        value: read!(windbearing),
        ..BASE
    },
    SensorDescription {
        key: "windbearingavg10",
        name: "Wind bearing avg. 10 min",
        device_class: Some(SensorDeviceClass::WindDirection),
        unit: Some(units::DEGREE),
        icon: Some("mdi:compass"),
        value: read!(windbearingavg10),
        ..BASE
    },
    SensorDescription {
        key: "windbearingdavg",
        name: "Wind bearing Day Average",
        device_class: Some(SensorDeviceClass::WindDirection),
        unit: Some(units::DEGREE),
        icon: Some("mdi:compass"),
        value: read!(windbearingdavg),
        ..BASE
    },
    SensorDescription {
        key: "wind_direction",
        name: "Wind Cardinal",
        icon: Some("mdi:compass"),
        translation_key: Some("wind_cardinal"),
        value: read!(wind_direction),
        ..BASE
    },
    SensorDescription {
        key: "windspeedavg",
        name: "Wind Speed",
        unit: Some(units::METERS_PER_SECOND),
        device_class: Some(SensorDeviceClass::WindSpeed),
        state_class: MEASUREMENT,
        value: read!(windspeedavg),
        ..BASE
    },
    SensorDescription {
        key: "windgust",
        name: "Wind Gust",
        unit: Some(units::METERS_PER_SECOND),
        device_class: Some(SensorDeviceClass::WindSpeed),
        state_class: MEASUREMENT,
        value: read!(windgust),
        ..BASE
    },
];

/// Check the catalog against [`RealtimeReading::FIELD_NAMES`].
///
/// Every key must name a reading field, no key may appear twice, and every
/// accessor must return a value for a reading carrying only its own field and
/// nothing for an empty reading.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_catalog() -> Result<(), ValidationError> {
    validate(SENSOR_TYPES)
}

fn validate(catalog: &'static [SensorDescription]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(catalog.len());
    let empty = RealtimeReading::default();
    for description in catalog {
        let key = description.key;
        if !RealtimeReading::FIELD_NAMES.contains(&key) {
            return Err(ValidationError::UnknownSensorKey(key));
        }
        if !seen.insert(key) {
            return Err(ValidationError::DuplicateSensorKey(key));
        }
        let probe = probe_reading(key).ok_or(ValidationError::AccessorMismatch(key))?;
        if (description.value)(&probe).is_none() || (description.value)(&empty).is_some() {
            return Err(ValidationError::AccessorMismatch(key));
        }
    }
    Ok(())
}

/// A reading with only `key` set, to a number or a text depending on the
/// field type.
fn probe_reading(key: &str) -> Option<RealtimeReading> {
    [serde_json::json!(1), serde_json::json!("probe")]
        .into_iter()
        .find_map(|value| {
            let mut object = serde_json::Map::new();
            object.insert(key.to_string(), value);
            serde_json::from_value(serde_json::Value::Object(object)).ok()
        })
}
