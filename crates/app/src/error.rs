//! Categorized outcomes of fetching, setup and config flows.

use std::sync::Arc;

use serde::Serialize;

use meteobridge_domain::error::{MeteobridgeError, ValidationError};

use crate::ports::SourceError;

/// Category of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Connectivity,
    DataNotFound,
    Other,
}

/// Why a fetch failed.
///
/// Causes are shared so the error can be cached by a coordinator and handed
/// to every reader.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("cannot reach the station database")]
    Connectivity(#[source] Arc<SourceError>),

    #[error("no data found for the station")]
    DataNotFound(#[source] Arc<SourceError>),

    #[error("fetching station data failed")]
    Other(#[source] Arc<SourceError>),
}

impl FetchError {
    #[must_use]
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Connectivity(_) => FetchErrorKind::Connectivity,
            Self::DataNotFound(_) => FetchErrorKind::DataNotFound,
            Self::Other(_) => FetchErrorKind::Other,
        }
    }
}

impl From<SourceError> for FetchError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Connection(_) => Self::Connectivity(Arc::new(err)),
            SourceError::NoData { .. } => Self::DataNotFound(Arc::new(err)),
            SourceError::Query(_) => Self::Other(Arc::new(err)),
        }
    }
}

/// A steady-state refresh failed. The previous snapshot stays readable.
#[derive(Debug, Clone, thiserror::Error)]
#[error("error communicating with the station database")]
pub struct UpdateFailed {
    #[source]
    cause: FetchError,
}

impl UpdateFailed {
    #[must_use]
    pub fn new(cause: FetchError) -> Self {
        Self { cause }
    }

    #[must_use]
    pub fn cause(&self) -> &FetchError {
        &self.cause
    }

    #[must_use]
    pub fn into_cause(self) -> FetchError {
        self.cause
    }
}

/// Why setting up a config entry failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SetupError {
    /// The database could not be reached. Not retried.
    #[error("station database rejected the connection")]
    Unauthorized(#[source] FetchError),

    /// The station has no data yet. Retried with backoff.
    #[error("station data is not ready")]
    NotReady(#[source] FetchError),
}

impl SetupError {
    #[must_use]
    pub fn cause(&self) -> &FetchError {
        match self {
            Self::Unauthorized(cause) | Self::NotReady(cause) => cause,
        }
    }

    /// Whether the entry should be retried later.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }
}

impl From<FetchError> for SetupError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Connectivity(_) => Self::Unauthorized(err),
            FetchError::DataNotFound(_) | FetchError::Other(_) => Self::NotReady(err),
        }
    }
}

/// Why a config or options flow rejected its input.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("cannot connect to the station database")]
    CannotConnect(#[source] SourceError),

    #[error("the database has no data for this station")]
    NoData(#[source] SourceError),

    #[error("station {unique_id} is already configured")]
    AlreadyConfigured { unique_id: String },

    #[error("invalid input")]
    Invalid(#[from] ValidationError),

    #[error("unexpected error while validating the station")]
    Unknown(#[source] SourceError),

    #[error(transparent)]
    Storage(#[from] MeteobridgeError),
}

impl FlowError {
    /// Stable code shown to the user.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::CannotConnect(_) => "cannot_connect",
            Self::NoData(_) => "no_data",
            Self::AlreadyConfigured { .. } => "already_configured",
            Self::Invalid(_) => "invalid_input",
            Self::Unknown(_) => "unknown",
            Self::Storage(MeteobridgeError::NotFound(_)) => "not_found",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl From<SourceError> for FlowError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Connection(_) => Self::CannotConnect(err),
            SourceError::NoData { .. } => Self::NoData(err),
            SourceError::Query(_) => Self::Unknown(err),
        }
    }
}
