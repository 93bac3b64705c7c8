use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nittany_core::{ProviderError, ResponseEnvelope};
use thiserror::Error;
use tracing::{error, warn};

/// Every way a relay call can fail. The display text is exactly what the
/// caller sees; provider detail never reaches it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayError {
    /// Missing or mistyped `message`
    #[error("Message is required")]
    Validation,

    /// No credential in the environment
    #[error("API key not configured")]
    Configuration,

    /// The provider rejected the credential
    #[error("Invalid API key")]
    Auth,

    /// Network, timeout, bad status or unusable provider reply
    #[error("Failed to process your request. Please try again.")]
    Upstream,

    #[error("Method not allowed")]
    Method,
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation => StatusCode::BAD_REQUEST,
            RelayError::Method => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::Configuration | RelayError::Auth | RelayError::Upstream => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<&ProviderError> for RelayError {
    fn from(err: &ProviderError) -> Self {
        if err.is_auth_failure() {
            RelayError::Auth
        } else {
            RelayError::Upstream
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Relay call failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Relay call rejected");
        }

        (status, Json(ResponseEnvelope::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RelayError::Validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::Method.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            RelayError::Configuration.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(RelayError::Auth.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            RelayError::Upstream.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_provider_errors_collapse_to_safe_variants() {
        let auth = ProviderError::Unauthorized("authentication_error: invalid x-api-key".into());
        assert_eq!(RelayError::from(&auth), RelayError::Auth);

        let http = ProviderError::HttpError {
            status_code: 529,
            message: "overloaded_error: internal detail".into(),
        };
        let mapped = RelayError::from(&http);
        assert_eq!(mapped, RelayError::Upstream);
        assert!(!mapped.to_string().contains("overloaded"));

        let empty = ProviderError::EmptyResponse("No content in response".into());
        assert_eq!(RelayError::from(&empty), RelayError::Upstream);
    }
}
