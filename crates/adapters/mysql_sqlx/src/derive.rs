//! Metrics computed from raw realtime columns.
//!
//! The Meteobridge tables store measurements only; descriptive values
//! (Beaufort scale, cardinal direction, UV band, pressure trend) and a few
//! physical estimates are derived here.

const BEAUFORT_LIMITS: [f64; 12] = [
    0.5, 1.6, 3.4, 5.5, 8.0, 10.8, 13.9, 17.2, 20.8, 24.5, 28.5, 32.7,
];

const BEAUFORT_DESCRIPTIONS: [&str; 13] = [
    "calm",
    "light_air",
    "light_breeze",
    "gentle_breeze",
    "moderate_breeze",
    "fresh_breeze",
    "strong_breeze",
    "near_gale",
    "gale",
    "strong_gale",
    "storm",
    "violent_storm",
    "hurricane",
];

const CARDINALS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Meters of cloud base per degree of dew point spread.
const CLOUD_BASE_PER_DEGREE: f64 = 125.0;

/// Standard atmosphere lapse rate, in °C per meter.
const LAPSE_RATE: f64 = 0.0065;

/// Beaufort number for a wind speed in m/s.
#[must_use]
pub fn beaufort(wind_speed: f64) -> i64 {
    let force = BEAUFORT_LIMITS
        .iter()
        .position(|limit| wind_speed < *limit)
        .unwrap_or(BEAUFORT_LIMITS.len());
    i64::try_from(force).unwrap_or(12)
}

/// Translation key of a Beaufort number.
#[must_use]
pub fn beaufort_description(force: i64) -> &'static str {
    usize::try_from(force)
        .ok()
        .and_then(|index| BEAUFORT_DESCRIPTIONS.get(index))
        .copied()
        .unwrap_or("hurricane")
}

/// 16-point compass direction of a bearing in degrees.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cardinal(bearing: f64) -> &'static str {
    let normalized = bearing.rem_euclid(360.0);
    let index = ((normalized / 22.5) + 0.5).floor() as usize % CARDINALS.len();
    CARDINALS[index]
}

/// Exposure band of a UV index.
#[must_use]
pub fn uv_description(uv: f64) -> &'static str {
    match uv {
        x if x < 3.0 => "low",
        x if x < 6.0 => "moderate",
        x if x < 8.0 => "high",
        x if x < 11.0 => "very_high",
        _ => "extreme",
    }
}

/// Direction of the pressure trend.
#[must_use]
pub fn pressure_trend(trend: f64) -> &'static str {
    if trend > 0.0 {
        "rising"
    } else if trend < 0.0 {
        "falling"
    } else {
        "steady"
    }
}

/// Absolute humidity in g/m³ from temperature (°C) and relative humidity (%).
#[must_use]
pub fn absolute_humidity(temperature: f64, humidity: f64) -> f64 {
    let saturation = 6.112 * ((17.67 * temperature) / (temperature + 243.5)).exp();
    (saturation * humidity * 2.1674) / (273.15 + temperature)
}

/// Estimated cloud base above ground in meters.
#[must_use]
pub fn cloud_base(temperature: f64, dewpoint: f64) -> f64 {
    ((temperature - dewpoint) * CLOUD_BASE_PER_DEGREE).max(0.0)
}

/// Estimated altitude of the 0 °C isotherm in meters above sea level.
#[must_use]
pub fn freezing_altitude(temperature: f64, elevation: f64) -> f64 {
    (elevation + temperature / LAPSE_RATE).max(0.0)
}

/// Wind chill in °C for a wind speed in m/s.
#[must_use]
pub fn wind_chill(temperature: f64, wind_speed: f64) -> f64 {
    let v = (wind_speed * 3.6).powf(0.16);
    13.12 + 0.6215 * temperature - 11.37 * v + 0.3965 * temperature * v
}

/// Apparent temperature: heat index when hot, wind chill when cold and
/// windy, the air temperature otherwise.
#[must_use]
pub fn feels_like(
    temperature: f64,
    wind_speed: Option<f64>,
    windchill: Option<f64>,
    heatindex: Option<f64>,
) -> f64 {
    if temperature >= 26.7 {
        return heatindex.unwrap_or(temperature);
    }
    match wind_speed {
        Some(wind) if temperature <= 10.0 && wind > 1.34 => {
            windchill.unwrap_or_else(|| wind_chill(temperature, wind))
        }
        _ => temperature,
    }
}
