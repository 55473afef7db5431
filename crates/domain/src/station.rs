//! Station metadata reported by the Meteobridge bridge.

use serde::{Deserialize, Serialize};

/// Identity and firmware details of a Meteobridge station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationInfo {
    pub station_name: Option<String>,
    pub platform: Option<String>,
    pub ip: Option<String>,
    pub sw_version: Option<String>,
    pub build_number: Option<String>,
}

impl StationInfo {
    /// Station name, or the given fallback when the bridge did not report one.
    #[must_use]
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.station_name.as_deref().unwrap_or(fallback)
    }

    /// Marketing name of the bridge hardware.
    #[must_use]
    pub fn hardware_model(&self) -> Option<String> {
        self.platform.as_deref().map(|p| hardware_model(p).to_string())
    }

    /// Firmware as `"{sw_version}-{build_number}"`.
    #[must_use]
    pub fn firmware(&self) -> Option<String> {
        match (&self.sw_version, &self.build_number) {
            (Some(sw), Some(build)) => Some(format!("{sw}-{build}")),
            (Some(sw), None) => Some(sw.clone()),
            (None, _) => None,
        }
    }
}

/// Map a Meteobridge platform code to its product name.
#[must_use]
pub fn hardware_model(platform: &str) -> &str {
    match platform {
        "CARAMBOLA2" => "Meteobridge Pro",
        "mbnano" => "Meteobridge Nano",
        other => other,
    }
}
