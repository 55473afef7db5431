//! Database connection settings for one weather station.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default MySQL port.
pub const DEFAULT_PORT: u16 = 3306;

/// Everything needed to reach a Meteobridge database and select one station.
///
/// Supplied once at setup time (or reconfiguration) and immutable for the
/// lifetime of the data adapter built from it. `station_mac` is the unique key
/// of a config entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub station_mac: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl ConnectionConfig {
    /// Check that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] for the first blank text field
    /// and [`ValidationError::ZeroPort`] when the port is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("station_mac", &self.station_mac),
            ("host", &self.host),
            ("username", &self.username),
            ("password", &self.password),
            ("database", &self.database),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::EmptyField(name));
        }
        if self.port == 0 {
            return Err(ValidationError::ZeroPort);
        }
        Ok(())
    }

    /// `host:port` pair, for log fields.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("station_mac", &self.station_mac)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConnectionConfig {
        ConnectionConfig {
            host: "192.168.1.10".to_string(),
            port: DEFAULT_PORT,
            username: "meteo".to_string(),
            password: "secret".to_string(),
            database: "meteobridge".to_string(),
            station_mac: "AA:BB:CC".to_string(),
        }
    }

    #[test]
    fn should_accept_complete_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn should_reject_blank_host() {
        let mut cfg = config();
        cfg.host = "  ".to_string();
        assert_eq!(cfg.validate(), Err(ValidationError::EmptyField("host")));
    }

    #[test]
    fn should_reject_zero_port() {
        let mut cfg = config();
        cfg.port = 0;
        assert_eq!(cfg.validate(), Err(ValidationError::ZeroPort));
    }

    #[test]
    fn should_default_port_when_missing_from_input() {
        let json = r#"{
            "host": "db",
            "username": "u",
            "password": "p",
            "database": "d",
            "station_mac": "AA:BB:CC"
        }"#;
        let cfg: ConnectionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.port, 3306);
    }

    #[test]
    fn should_redact_password_in_debug_output() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn should_format_address() {
        assert_eq!(config().address(), "192.168.1.10:3306");
    }
}
