//! Fetch snapshot: the aggregate a coordinator caches between refreshes.

use serde::{Deserialize, Serialize};

use crate::forecast::{ForecastDaily, ForecastHourly};
use crate::reading::RealtimeReading;
use crate::time::Timestamp;

/// Result of one successful fetch.
///
/// A coordinator replaces its snapshot wholesale on every successful refresh,
/// so fields are never a mix of two fetches. Forecast lists keep source order
/// and are empty (not absent) when the source had no rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub sensor_data: RealtimeReading,
    pub daily_forecast: Vec<ForecastDaily>,
    pub hourly_forecast: Vec<ForecastHourly>,
    pub fetched_at: Timestamp,
}

impl FetchResult {
    /// A snapshot with realtime data only.
    #[must_use]
    pub fn realtime(sensor_data: RealtimeReading, fetched_at: Timestamp) -> Self {
        Self {
            sensor_data,
            daily_forecast: Vec::new(),
            hourly_forecast: Vec::new(),
            fetched_at,
        }
    }
}
