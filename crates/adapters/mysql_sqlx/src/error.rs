//! MySQL-specific errors and their mapping onto [`SourceError`].

use meteobridge_app::ports::SourceError;

/// MySQL server error numbers that mean the credentials or database name are
/// wrong rather than the query.
const ACCESS_ERRORS: [u16; 3] = [
    1044, // ER_DBACCESS_DENIED_ERROR
    1045, // ER_ACCESS_DENIED_ERROR
    1049, // ER_BAD_DB_ERROR
];

/// Errors originating from the MySQL data source.
#[derive(Debug, thiserror::Error)]
pub enum MySqlSourceError {
    /// The server could not be reached or refused the session.
    #[error("cannot open a MySQL session")]
    Connect(#[source] sqlx::Error),

    /// A query ran before `initialize` or after `close`.
    #[error("no open MySQL connection")]
    NotInitialized,

    /// A query failed on an open session.
    #[error("MySQL query failed")]
    Query(#[source] sqlx::Error),
}

impl MySqlSourceError {
    /// Sort a sqlx error into session or query failure.
    #[must_use]
    pub fn classify(err: sqlx::Error) -> Self {
        if is_connection_error(&err) {
            Self::Connect(err)
        } else {
            Self::Query(err)
        }
    }
}

fn is_connection_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db) => db
            .try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>()
            .is_some_and(|mysql| ACCESS_ERRORS.contains(&mysql.number())),
        _ => false,
    }
}

impl From<MySqlSourceError> for SourceError {
    fn from(err: MySqlSourceError) -> Self {
        match err {
            MySqlSourceError::Connect(_) | MySqlSourceError::NotInitialized => {
                Self::Connection(Box::new(err))
            }
            MySqlSourceError::Query(_) => Self::Query(Box::new(err)),
        }
    }
}

impl From<sqlx::Error> for MySqlSourceError {
    fn from(err: sqlx::Error) -> Self {
        Self::classify(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_treat_pool_timeout_as_connection_failure() {
        let err = SourceError::from(MySqlSourceError::from(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, SourceError::Connection(_)));
    }

    #[test]
    fn should_treat_io_error_as_connection_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = SourceError::from(MySqlSourceError::from(sqlx::Error::Io(io)));
        assert!(matches!(err, SourceError::Connection(_)));
    }

    #[test]
    fn should_treat_decode_failure_as_query_failure() {
        let err = SourceError::from(MySqlSourceError::from(sqlx::Error::ColumnNotFound(
            "temperature".to_string(),
        )));
        assert!(matches!(err, SourceError::Query(_)));
    }

    #[test]
    fn should_treat_missing_session_as_connection_failure() {
        let err = SourceError::from(MySqlSourceError::NotInitialized);
        assert!(matches!(err, SourceError::Connection(_)));
    }
}
