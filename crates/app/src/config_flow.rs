//! Config and options flows: turn user input into persisted config entries.
//!
//! Both flows validate the input against the database before anything is
//! written: the connection must open and the station must have data.

use meteobridge_domain::config_entry::ConfigEntry;
use meteobridge_domain::connection::ConnectionConfig;
use meteobridge_domain::station::StationInfo;
use meteobridge_domain::variant::IntegrationVariant;

use crate::error::FlowError;
use crate::ports::{ConfigEntryRepository, DataSource, DataSourceFactory, SourceError};

/// Title given to entries created by the flows.
#[must_use]
pub fn entry_title(station: &StationInfo, station_mac: &str) -> String {
    format!("Meteobridge SQL ({})", station.name_or(station_mac))
}

/// Validates input and writes config entries for one integration variant.
pub struct ConfigFlow<'a, F, R> {
    factory: &'a F,
    repo: &'a R,
    variant: IntegrationVariant,
}

impl<'a, F, R> ConfigFlow<'a, F, R>
where
    F: DataSourceFactory,
    R: ConfigEntryRepository,
{
    pub fn new(factory: &'a F, repo: &'a R, variant: IntegrationVariant) -> Self {
        Self {
            factory,
            repo,
            variant,
        }
    }

    /// Connect with the given settings and look the station up.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Invalid`] for malformed input,
    /// [`FlowError::CannotConnect`] when the database is unreachable,
    /// [`FlowError::NoData`] when the station is unknown and
    /// [`FlowError::Unknown`] for other query failures.
    pub async fn validate_input(&self, input: &ConnectionConfig) -> Result<StationInfo, FlowError> {
        input.validate()?;
        let source = self.factory.build(input);
        let result: Result<StationInfo, SourceError> = async {
            source.initialize().await?;
            source.station_data(&input.station_mac).await
        }
        .await;
        source.close().await;

        result.map_err(|err| {
            let err = FlowError::from(err);
            tracing::error!(
                station = %input.station_mac,
                address = %input.address(),
                code = err.code(),
                error = %err,
                "station validation failed"
            );
            err
        })
    }

    /// Handle the user step: validate, enforce uniqueness, persist.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::AlreadyConfigured`] when the station already has
    /// an entry, any error of [`validate_input`](Self::validate_input), or
    /// [`FlowError::Storage`] when persisting fails.
    #[tracing::instrument(skip(self, input), fields(station = %input.station_mac))]
    pub async fn user_step(&self, input: ConnectionConfig) -> Result<ConfigEntry, FlowError> {
        self.ensure_unique(&input.station_mac, None).await?;
        let station = self.validate_input(&input).await?;

        let entry = ConfigEntry::builder()
            .domain(self.variant.domain())
            .title(entry_title(&station, &input.station_mac))
            .data(input)
            .build()?;
        let entry = self.repo.create(entry).await?;
        tracing::info!(entry_id = %entry.id, title = %entry.title, "config entry created");
        Ok(entry)
    }

    /// Handle the options step: validate new settings for an existing entry
    /// and persist them.
    ///
    /// The caller is responsible for reloading the entry.
    ///
    /// # Errors
    ///
    /// Same as [`user_step`](Self::user_step); uniqueness is only checked
    /// against other entries.
    #[tracing::instrument(skip(self, entry, input), fields(entry_id = %entry.id))]
    pub async fn options_step(
        &self,
        mut entry: ConfigEntry,
        input: ConnectionConfig,
    ) -> Result<ConfigEntry, FlowError> {
        self.ensure_unique(&input.station_mac, Some(&entry)).await?;
        let station = self.validate_input(&input).await?;

        entry.title = entry_title(&station, &input.station_mac);
        entry.update_data(input);
        entry.validate()?;
        let entry = self.repo.update(entry).await?;
        tracing::info!(title = %entry.title, "config entry updated");
        Ok(entry)
    }

    async fn ensure_unique(
        &self,
        station_mac: &str,
        current: Option<&ConfigEntry>,
    ) -> Result<(), FlowError> {
        let existing = self
            .repo
            .find_by_unique_id(self.variant.domain(), station_mac)
            .await?;
        match existing {
            Some(found) if current.is_none_or(|entry| entry.id != found.id) => {
                Err(FlowError::AlreadyConfigured {
                    unique_id: station_mac.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}
