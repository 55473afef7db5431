//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`MeteobridgeError`] at port boundaries via `#[from]` or an explicit
//! `From` impl. No variant carries a bare `String` cause.

/// Top-level error crossing the domain/app/adapter boundaries.
#[derive(Debug, thiserror::Error)]
pub enum MeteobridgeError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A looked-up item does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A persistence adapter failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field is empty.
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    /// The database port is zero.
    #[error("port must be non-zero")]
    ZeroPort,

    /// A sensor description names a metric that readings do not carry.
    #[error("sensor `{0}` does not match any realtime reading field")]
    UnknownSensorKey(&'static str),

    /// Two sensor descriptions share the same key.
    #[error("sensor `{0}` is described more than once")]
    DuplicateSensorKey(&'static str),

    /// A config entry's unique id is not its station MAC.
    #[error("unique id must equal the station mac")]
    UniqueIdMismatch,

    /// A sensor accessor does not read the field named by its key.
    #[error("sensor `{0}` accessor does not read its own field")]
    AccessorMismatch(&'static str),
}

/// Returned when a lookup by id finds nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of item that was looked up (e.g. `"ConfigEntry"`).
    pub entity: &'static str,
    /// Identifier that was looked up.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_with_from() {
        let err: MeteobridgeError = ValidationError::ZeroPort.into();
        assert!(matches!(
            err,
            MeteobridgeError::Validation(ValidationError::ZeroPort)
        ));
    }

    #[test]
    fn should_display_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "ConfigEntry",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "ConfigEntry abc not found");
    }

    #[test]
    fn should_display_empty_field_name() {
        let err = ValidationError::EmptyField("host");
        assert_eq!(err.to_string(), "field `host` must not be empty");
    }

    #[test]
    fn should_keep_storage_source() {
        let io = std::io::Error::other("disk full");
        let err = MeteobridgeError::Storage(Box::new(io));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("disk full"));
    }
}
