//! Data adapter: one station's view of the database.
//!
//! Owns the connection settings and the data source client built from them.
//! [`DataAdapter::fetch`] gathers the realtime reading (and, for the
//! forecast-capable variant, both forecasts) into a [`FetchResult`] and sorts
//! failures into [`FetchError`] categories.

use std::sync::atomic::{AtomicBool, Ordering};

use meteobridge_domain::connection::ConnectionConfig;
use meteobridge_domain::snapshot::FetchResult;
use meteobridge_domain::time::now;
use meteobridge_domain::variant::IntegrationVariant;

use crate::error::{FetchError, FetchErrorKind};
use crate::ports::{DataSource, DataSourceFactory};

/// Wraps a [`DataSource`] for one configured station.
pub struct DataAdapter<S> {
    source: S,
    config: ConnectionConfig,
    variant: IntegrationVariant,
    connected: AtomicBool,
}

impl<S: DataSource> DataAdapter<S> {
    /// Build the underlying client. Performs no IO.
    pub fn initialize<F>(factory: &F, config: ConnectionConfig, variant: IntegrationVariant) -> Self
    where
        F: DataSourceFactory<Source = S>,
    {
        let source = factory.build(&config);
        Self {
            source,
            config,
            variant,
            connected: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    #[must_use]
    pub fn variant(&self) -> IntegrationVariant {
        self.variant
    }

    /// Fetch a complete snapshot.
    ///
    /// Connects first when no connection is open. A connectivity failure
    /// drops the connection so the next fetch reconnects.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Connectivity`] when the database is unreachable,
    /// [`FetchError::DataNotFound`] when the station has no rows, and
    /// [`FetchError::Other`] for any other query failure.
    #[tracing::instrument(skip(self), fields(station = %self.config.station_mac))]
    pub async fn fetch(&self) -> Result<FetchResult, FetchError> {
        let result = self.fetch_inner().await;
        if let Err(err) = &result
            && err.kind() == FetchErrorKind::Connectivity
        {
            self.connected.store(false, Ordering::Release);
        }
        result
    }

    async fn fetch_inner(&self) -> Result<FetchResult, FetchError> {
        if !self.connected.load(Ordering::Acquire) {
            tracing::debug!(address = %self.config.address(), "connecting to station database");
            self.source.initialize().await?;
            self.connected.store(true, Ordering::Release);
        }

        let sensor_data = self.source.realtime_data(&self.config.station_mac).await?;
        let mut result = FetchResult::realtime(sensor_data, now());
        if self.variant.fetches_forecasts() {
            result.daily_forecast = self.source.daily_forecast().await?;
            result.hourly_forecast = self.source.hourly_forecast().await?;
        }
        tracing::debug!(
            daily = result.daily_forecast.len(),
            hourly = result.hourly_forecast.len(),
            "fetched station data"
        );
        Ok(result)
    }

    /// Release the connection.
    pub async fn close(&self) {
        self.connected.store(false, Ordering::Release);
        self.source.close().await;
    }
}
