//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use meteobridge_app::error::FlowError;
use meteobridge_domain::error::MeteobridgeError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Maps application errors to an HTTP response with appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    Domain(MeteobridgeError),
    Flow(FlowError),
    /// The path does not hold a valid entry id.
    InvalidId,
    /// The entry exists but is not loaded, so it has no runtime data.
    NotLoaded,
}

impl From<MeteobridgeError> for ApiError {
    fn from(err: MeteobridgeError) -> Self {
        Self::Domain(err)
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Storage(err) => Self::Domain(err),
            other => Self::Flow(other),
        }
    }
}

fn domain_status(err: &MeteobridgeError) -> (StatusCode, &'static str) {
    match err {
        MeteobridgeError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        MeteobridgeError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        MeteobridgeError::Storage(err) => {
            tracing::error!(error = %err, "storage error");
            (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Domain(err) => {
                let (status, code) = domain_status(err);
                let message = match err {
                    MeteobridgeError::Storage(_) => "internal server error".to_string(),
                    other => other.to_string(),
                };
                (status, code, message)
            }
            Self::Flow(err) => {
                let status = match err {
                    FlowError::AlreadyConfigured { .. } => StatusCode::CONFLICT,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.code(), err.to_string())
            }
            Self::InvalidId => (
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "entry id must be a UUID".to_string(),
            ),
            Self::NotLoaded => (
                StatusCode::CONFLICT,
                "not_loaded",
                "entry is not loaded".to_string(),
            ),
        };

        (
            status,
            Json(ErrorBody {
                error: code,
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteobridge_domain::error::NotFoundError;

    #[test]
    fn should_map_duplicate_station_to_conflict() {
        let err = ApiError::from(FlowError::AlreadyConfigured {
            unique_id: "AA:BB:CC".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn should_map_wrapped_not_found_to_404() {
        let err = ApiError::from(FlowError::Storage(
            NotFoundError {
                entity: "ConfigEntry",
                id: "x".to_string(),
            }
            .into(),
        ));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_hide_storage_details() {
        let err = ApiError::from(MeteobridgeError::Storage(Box::new(std::io::Error::other(
            "disk full",
        ))));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
