//! Entity platforms: project a coordinator's snapshot into entity states.

pub mod sensor;
pub mod weather;

pub use sensor::{SensorEntity, SensorState, setup_sensors};
pub use weather::{WeatherEntity, WeatherState, setup_weather};
