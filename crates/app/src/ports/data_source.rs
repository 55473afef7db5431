//! Data source port: read access to a Meteobridge station database.

use std::future::Future;

use meteobridge_domain::connection::ConnectionConfig;
use meteobridge_domain::forecast::{ForecastDaily, ForecastHourly};
use meteobridge_domain::reading::RealtimeReading;
use meteobridge_domain::station::StationInfo;

/// Boxed cause carried by [`SourceError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures reported by a [`DataSource`].
///
/// Connection failures and missing station data are kept apart because the
/// setup path reacts differently to each.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The database could not be reached or refused the credentials.
    #[error("cannot connect to the station database")]
    Connection(#[source] BoxError),

    /// The database holds no rows for the requested station.
    #[error("no data for station {station}")]
    NoData { station: String },

    /// Any other query failure.
    #[error("station database query failed")]
    Query(#[source] BoxError),
}

/// Client for one station database.
///
/// Built by a [`DataSourceFactory`] from fixed connection settings. Calls
/// other than [`initialize`](DataSource::initialize) expect a prior
/// successful `initialize`.
pub trait DataSource: Send + Sync + 'static {
    /// Open (or re-open) the connection.
    fn initialize(&self) -> impl Future<Output = Result<(), SourceError>> + Send;

    /// Metadata of the station identified by its MAC address.
    fn station_data(
        &self,
        station_mac: &str,
    ) -> impl Future<Output = Result<StationInfo, SourceError>> + Send;

    /// Latest realtime reading of the station.
    fn realtime_data(
        &self,
        station_mac: &str,
    ) -> impl Future<Output = Result<RealtimeReading, SourceError>> + Send;

    /// Daily forecast, in source order.
    fn daily_forecast(&self) -> impl Future<Output = Result<Vec<ForecastDaily>, SourceError>> + Send;

    /// Hourly forecast, in source order.
    fn hourly_forecast(
        &self,
    ) -> impl Future<Output = Result<Vec<ForecastHourly>, SourceError>> + Send;

    /// Release the connection. Further calls need a new `initialize`.
    fn close(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// Builds [`DataSource`] clients from connection settings.
///
/// Building performs no IO.
pub trait DataSourceFactory: Send + Sync + 'static {
    type Source: DataSource;

    fn build(&self, config: &ConnectionConfig) -> Self::Source;
}
