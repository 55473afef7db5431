//! Configuration loading: a TOML file with environment variable overrides.
//!
//! Looks for `meteobridge.toml` in the working directory. Every field has a
//! default so the file is optional. Environment variables take precedence
//! over file values.

use meteobridge_domain::connection::ConnectionConfig;
use meteobridge_domain::variant::IntegrationVariant;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Config entry store settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Which integration flavour to run.
    pub integration: IntegrationConfig,
    /// Stations imported through the config flow at startup.
    pub stations: Vec<ConnectionConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub variant: IntegrationVariant,
}

impl Config {
    /// Load configuration from `meteobridge.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result does not validate.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("meteobridge.toml")?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("METEOBRIDGE_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("METEOBRIDGE_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("METEOBRIDGE_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("METEOBRIDGE_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("METEOBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("METEOBRIDGE_VARIANT") {
            self.integration.variant = val
                .parse()
                .map_err(|err: meteobridge_domain::variant::UnknownVariant| {
                    ConfigError::Validation(err.to_string())
                })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        for station in &self.stations {
            station.validate().map_err(|err| {
                ConfigError::Validation(format!("station {}: {err}", station.station_mac))
            })?;
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8089,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:meteobridge.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "meteobridged=info,meteobridge=info,tower_http=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8089);
        assert_eq!(config.database.url, "sqlite:meteobridge.db?mode=rwc");
        assert_eq!(config.integration.variant, IntegrationVariant::Meteobridge);
        assert!(config.stations.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8089);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [integration]
            variant = 'meteobridgesql'

            [[stations]]
            host = 'db.local'
            username = 'weather'
            password = 'secret'
            database = 'meteobridge'
            station_mac = 'AA:BB:CC'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.integration.variant, IntegrationVariant::MeteobridgeSql);
        assert_eq!(config.stations.len(), 1);
        assert_eq!(config.stations[0].port, 3306);
        assert_eq!(config.stations[0].station_mac, "AA:BB:CC");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 8089);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_invalid_station() {
        let toml = "
            [[stations]]
            host = 'db.local'
            port = 0
            username = 'weather'
            password = 'secret'
            database = 'meteobridge'
            station_mac = 'AA:BB:CC'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("AA:BB:CC"));
    }

    #[test]
    fn should_apply_environment_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("METEOBRIDGE_BIND", "127.0.0.1:9191"),
                ("METEOBRIDGE_DATABASE_URL", "sqlite::memory:"),
                ("METEOBRIDGE_LOG", "debug"),
                ("METEOBRIDGE_VARIANT", "MeteobridgeSQL"),
            ]))
            .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9191");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.integration.variant, IntegrationVariant::MeteobridgeSql);
    }

    #[test]
    fn should_prefer_rust_log_over_own_log_variable() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("METEOBRIDGE_LOG", "debug"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_port_override() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("METEOBRIDGE_PORT", "http")]))
            .unwrap();
        assert_eq!(config.server.port, 8089);
    }

    #[test]
    fn should_reject_unknown_variant_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[("METEOBRIDGE_VARIANT", "netatmo")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8089");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
