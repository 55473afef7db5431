//! [`DataSource`] backed by a MySQL connection pool.

use std::time::Duration;

use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use tokio::sync::RwLock;

use meteobridge_app::ports::{DataSource, DataSourceFactory, SourceError};
use meteobridge_domain::connection::ConnectionConfig;
use meteobridge_domain::forecast::{ForecastDaily, ForecastHourly};
use meteobridge_domain::reading::RealtimeReading;
use meteobridge_domain::station::StationInfo;

use crate::error::MySqlSourceError;
use crate::rows::{DailyRow, HourlyRow, RealtimeRow, StationRow};

const SELECT_REALTIME: &str = "SELECT * FROM realtime_data WHERE ID = ?";
const SELECT_STATION: &str = r"
    SELECT mb_stationname, mb_platform, mb_ip, mb_swversion, mb_buildnum
    FROM realtime_data WHERE ID = ?
";
const SELECT_DAILY: &str = "SELECT * FROM daily_forecast ORDER BY forecast_time";
const SELECT_HOURLY: &str = "SELECT * FROM hourly_forecast ORDER BY forecast_time";

const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_CONNECTIONS: u32 = 2;

/// Builds [`MySqlDataSource`] clients.
#[derive(Debug, Clone)]
pub struct MySqlDataSourceFactory {
    acquire_timeout: Duration,
}

impl Default for MySqlDataSourceFactory {
    fn default() -> Self {
        Self {
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl MySqlDataSourceFactory {
    /// How long opening a session may take before it counts as a
    /// connection failure.
    #[must_use]
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

impl DataSourceFactory for MySqlDataSourceFactory {
    type Source = MySqlDataSource;

    fn build(&self, config: &ConnectionConfig) -> MySqlDataSource {
        MySqlDataSource::new(config, self.acquire_timeout)
    }
}

/// Reads one Meteobridge database.
///
/// The pool is opened by [`DataSource::initialize`] and replaced on every
/// later call to it.
pub struct MySqlDataSource {
    options: MySqlConnectOptions,
    acquire_timeout: Duration,
    pool: RwLock<Option<MySqlPool>>,
}

impl MySqlDataSource {
    /// Prepare a client for the given settings. Performs no IO.
    #[must_use]
    pub fn new(config: &ConnectionConfig, acquire_timeout: Duration) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database);
        Self {
            options,
            acquire_timeout,
            pool: RwLock::new(None),
        }
    }

    async fn pool(&self) -> Result<MySqlPool, MySqlSourceError> {
        self.pool
            .read()
            .await
            .clone()
            .ok_or(MySqlSourceError::NotInitialized)
    }
}

impl DataSource for MySqlDataSource {
    async fn initialize(&self) -> Result<(), SourceError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(self.acquire_timeout)
            .connect_with(self.options.clone())
            .await
            .map_err(MySqlSourceError::classify)?;

        let previous = self.pool.write().await.replace(pool);
        if let Some(previous) = previous {
            previous.close().await;
        }
        tracing::debug!("MySQL pool opened");
        Ok(())
    }

    async fn station_data(&self, station_mac: &str) -> Result<StationInfo, SourceError> {
        let pool = self.pool().await?;
        let row: Option<StationRow> = sqlx::query_as(SELECT_STATION)
            .bind(station_mac)
            .fetch_optional(&pool)
            .await
            .map_err(MySqlSourceError::classify)?;

        row.map(StationInfo::from).ok_or_else(|| SourceError::NoData {
            station: station_mac.to_string(),
        })
    }

    async fn realtime_data(&self, station_mac: &str) -> Result<RealtimeReading, SourceError> {
        let pool = self.pool().await?;
        let row: Option<RealtimeRow> = sqlx::query_as(SELECT_REALTIME)
            .bind(station_mac)
            .fetch_optional(&pool)
            .await
            .map_err(MySqlSourceError::classify)?;

        row.map(RealtimeReading::from)
            .ok_or_else(|| SourceError::NoData {
                station: station_mac.to_string(),
            })
    }

    async fn daily_forecast(&self) -> Result<Vec<ForecastDaily>, SourceError> {
        let pool = self.pool().await?;
        let rows: Vec<DailyRow> = sqlx::query_as(SELECT_DAILY)
            .fetch_all(&pool)
            .await
            .map_err(MySqlSourceError::classify)?;

        Ok(rows.into_iter().map(ForecastDaily::from).collect())
    }

    async fn hourly_forecast(&self) -> Result<Vec<ForecastHourly>, SourceError> {
        let pool = self.pool().await?;
        let rows: Vec<HourlyRow> = sqlx::query_as(SELECT_HOURLY)
            .fetch_all(&pool)
            .await
            .map_err(MySqlSourceError::classify)?;

        Ok(rows.into_iter().map(ForecastHourly::from).collect())
    }

    async fn close(&self) {
        let pool = self.pool.write().await.take();
        if let Some(pool) = pool {
            pool.close().await;
            tracing::debug!("MySQL pool closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConnectionConfig {
        ConnectionConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            username: "weather".to_string(),
            password: "secret".to_string(),
            database: "meteobridge".to_string(),
            station_mac: "AA:BB:CC".to_string(),
        }
    }

    #[tokio::test]
    async fn should_refuse_queries_before_initialize() {
        let source = MySqlDataSourceFactory::default().build(&config());

        let err = source.realtime_data("AA:BB:CC").await.unwrap_err();
        assert!(matches!(err, SourceError::Connection(_)));

        let err = source.daily_forecast().await.unwrap_err();
        assert!(matches!(err, SourceError::Connection(_)));
    }

    #[tokio::test]
    async fn should_report_connection_failure_for_unreachable_server() {
        let source = MySqlDataSourceFactory::default()
            .with_acquire_timeout(Duration::from_secs(2))
            .build(&config());

        let err = source.initialize().await.unwrap_err();
        assert!(matches!(err, SourceError::Connection(_)));
    }

    #[tokio::test]
    async fn should_close_without_open_pool() {
        let source = MySqlDataSourceFactory::default().build(&config());
        source.close().await;
        assert!(source.pool().await.is_err());
    }
}
