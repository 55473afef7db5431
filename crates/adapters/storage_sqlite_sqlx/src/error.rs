//! Failures of the config entry store.

use meteobridge_domain::error::MeteobridgeError;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Connecting to or querying the store failed.
    #[error("config entry store query failed")]
    Database(#[from] sqlx::Error),

    #[error("config entry store schema could not be migrated")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row cannot be turned back into a config entry.
    #[error("corrupt row in `{table}`: {reason}")]
    Corrupt {
        table: &'static str,
        reason: String,
    },
}

impl From<StorageError> for MeteobridgeError {
    fn from(err: StorageError) -> Self {
        match err {
            // Corruption found while decoding surfaces wrapped in sqlx.
            StorageError::Database(sqlx::Error::Decode(source)) => Self::Storage(source),
            other => Self::Storage(Box::new(other)),
        }
    }
}
