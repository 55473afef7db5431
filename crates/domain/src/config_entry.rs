//! Config entry: one configured station, persisted across restarts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::connection::ConnectionConfig;
use crate::error::{MeteobridgeError, ValidationError};
use crate::id::EntryId;
use crate::time::{Timestamp, now};

/// A persisted station configuration.
///
/// `unique_id` is the station MAC and is unique within a `domain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub id: EntryId,
    pub domain: String,
    pub title: String,
    pub unique_id: String,
    pub data: ConnectionConfig,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConfigEntry {
    /// Create a builder for constructing a [`ConfigEntry`].
    #[must_use]
    pub fn builder() -> ConfigEntryBuilder {
        ConfigEntryBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`MeteobridgeError::Validation`] when `domain` or `title` is
    /// empty, when the connection settings are invalid, or when `unique_id`
    /// differs from the station MAC.
    pub fn validate(&self) -> Result<(), MeteobridgeError> {
        if self.domain.trim().is_empty() {
            return Err(ValidationError::EmptyField("domain").into());
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title").into());
        }
        self.data.validate()?;
        if self.unique_id != self.data.station_mac {
            return Err(ValidationError::UniqueIdMismatch.into());
        }
        Ok(())
    }

    /// Replace the connection settings, keeping the unique id in step.
    pub fn update_data(&mut self, data: ConnectionConfig) {
        self.unique_id.clone_from(&data.station_mac);
        self.data = data;
        self.updated_at = now();
    }
}

/// Step-by-step builder for [`ConfigEntry`].
#[derive(Debug, Default)]
pub struct ConfigEntryBuilder {
    id: Option<EntryId>,
    domain: Option<String>,
    title: Option<String>,
    data: Option<ConnectionConfig>,
    created_at: Option<Timestamp>,
    updated_at: Option<Timestamp>,
}

impl ConfigEntryBuilder {
    #[must_use]
    pub fn id(mut self, id: EntryId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn data(mut self, data: ConnectionConfig) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn created_at(mut self, at: Timestamp) -> Self {
        self.created_at = Some(at);
        self
    }

    #[must_use]
    pub fn updated_at(mut self, at: Timestamp) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Consume the builder, validate, and return a [`ConfigEntry`].
    ///
    /// The unique id is taken from the station MAC.
    ///
    /// # Errors
    ///
    /// Returns [`MeteobridgeError::Validation`] if connection settings are
    /// missing or any required field is empty.
    pub fn build(self) -> Result<ConfigEntry, MeteobridgeError> {
        let data = self
            .data
            .ok_or(ValidationError::EmptyField("station_mac"))?;
        let created_at = self.created_at.unwrap_or_else(now);
        let entry = ConfigEntry {
            id: self.id.unwrap_or_default(),
            domain: self.domain.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            unique_id: data.station_mac.clone(),
            data,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        };
        entry.validate()?;
        Ok(entry)
    }
}

/// Lifecycle state of a config entry inside the running daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    #[default]
    NotLoaded,
    SetupInProgress,
    Loaded,
    /// Setup failed with a transient error and is retried in the background.
    SetupRetry,
    /// Setup failed and will not be retried until reconfigured or reloaded.
    SetupError,
}

impl EntryState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotLoaded => "not_loaded",
            Self::SetupInProgress => "setup_in_progress",
            Self::Loaded => "loaded",
            Self::SetupRetry => "setup_retry",
            Self::SetupError => "setup_error",
        }
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
