//! Integration variants.
//!
//! The bridge ships in two flavours that share everything but their domain
//! name and feature set. `Meteobridge` is the feature-complete one (sensors,
//! weather entity and forecasts); `MeteobridgeSql` only exposes sensors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Entity platforms an integration can set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Sensor,
    Weather,
}

/// Which flavour of the integration is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationVariant {
    #[default]
    Meteobridge,
    MeteobridgeSql,
}

impl IntegrationVariant {
    /// Domain name, used as the config entry domain and device identifier
    /// namespace.
    #[must_use]
    pub fn domain(self) -> &'static str {
        match self {
            Self::Meteobridge => "meteobridge",
            Self::MeteobridgeSql => "meteobridgesql",
        }
    }

    /// Whether daily and hourly forecasts are requested on every fetch.
    #[must_use]
    pub fn fetches_forecasts(self) -> bool {
        matches!(self, Self::Meteobridge)
    }

    /// Platforms set up for each config entry.
    #[must_use]
    pub fn platforms(self) -> &'static [Platform] {
        match self {
            Self::Meteobridge => &[Platform::Sensor, Platform::Weather],
            Self::MeteobridgeSql => &[Platform::Sensor],
        }
    }

    /// Whether the given platform is part of this variant.
    #[must_use]
    pub fn has_platform(self, platform: Platform) -> bool {
        self.platforms().contains(&platform)
    }
}

impl fmt::Display for IntegrationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.domain())
    }
}

/// Returned when parsing an unknown variant name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown integration variant `{0}`")]
pub struct UnknownVariant(pub String);

impl FromStr for IntegrationVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meteobridge" => Ok(Self::Meteobridge),
            "meteobridgesql" => Ok(Self::MeteobridgeSql),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fetch_forecasts_only_in_full_variant() {
        assert!(IntegrationVariant::Meteobridge.fetches_forecasts());
        assert!(!IntegrationVariant::MeteobridgeSql.fetches_forecasts());
    }

    #[test]
    fn should_expose_weather_platform_only_in_full_variant() {
        assert!(IntegrationVariant::Meteobridge.has_platform(Platform::Weather));
        assert!(!IntegrationVariant::MeteobridgeSql.has_platform(Platform::Weather));
        assert!(IntegrationVariant::MeteobridgeSql.has_platform(Platform::Sensor));
    }

    #[test]
    fn should_parse_domain_names() {
        assert_eq!(
            "meteobridgesql".parse::<IntegrationVariant>(),
            Ok(IntegrationVariant::MeteobridgeSql)
        );
        assert_eq!(
            "Meteobridge".parse::<IntegrationVariant>(),
            Ok(IntegrationVariant::Meteobridge)
        );
        assert!("weatherflow".parse::<IntegrationVariant>().is_err());
    }

    #[test]
    fn should_deserialize_from_domain_name() {
        let variant: IntegrationVariant = serde_json::from_str("\"meteobridgesql\"").unwrap();
        assert_eq!(variant, IntegrationVariant::MeteobridgeSql);
    }
}
