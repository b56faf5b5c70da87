//! Error → HTTP status mapping.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use dataforge_commons::DataForgeError;
use serde_json::json;
use std::fmt;

/// Wrapper giving [`DataForgeError`] an HTTP rendering.
///
/// Not-found kinds map to 404, client-correctable kinds to 400, a missing
/// container backend to 503, and everything unrecoverable to 500. The body
/// is always `{"error": message}`.
#[derive(Debug)]
pub struct ApiError(pub DataForgeError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<DataForgeError> for ApiError {
    fn from(err: DataForgeError) -> Self {
        ApiError(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            DataForgeError::InstanceNotFound(_) | DataForgeError::TableNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            DataForgeError::InvalidInput(_) | DataForgeError::InvalidSchema(_) => {
                StatusCode::BAD_REQUEST
            }
            DataForgeError::OrchestratorUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DataForgeError::ProvisioningFailed(_) | DataForgeError::RuntimeFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.0.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataforge_commons::InstanceId;

    #[test]
    fn test_not_found_kinds_are_404() {
        assert_eq!(
            ApiError(DataForgeError::InstanceNotFound(InstanceId::new(1))).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(DataForgeError::table_not_found("orders")).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_client_errors_are_400() {
        assert_eq!(
            ApiError(DataForgeError::invalid_input("bad")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(DataForgeError::invalid_schema("bad type")).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_infrastructure_errors() {
        assert_eq!(
            ApiError(DataForgeError::unavailable("no socket")).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(DataForgeError::provisioning("pull failed")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError(DataForgeError::runtime("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
