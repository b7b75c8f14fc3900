//! Hub error types with HTTP status code mapping.
//!
//! [`HubError`] is the central error type for the hub. Each variant maps to
//! a specific HTTP status code and structured JSON error response. Probe
//! failures are never errors: they settle the probe state instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "invalid server address: exa mple.com",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Hub error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category    | HTTP Status               |
/// |-----------|-------------|---------------------------|
/// | 1000–1999 | Validation  | 400 Bad Request           |
/// | 3000–3999 | Server      | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The server address is blank.
    #[error("no valid address: server address is empty")]
    AddressUnset,

    /// The normalized server address is not a usable URL.
    #[error("invalid server address: {0}")]
    InvalidAddress(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Reading or writing the settings file failed.
    #[error("settings error: {0}")]
    SettingsError(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HubError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::AddressUnset => 1001,
            Self::InvalidAddress(_) => 1002,
            Self::InvalidRequest(_) => 1003,
            Self::Internal(_) => 3000,
            Self::SettingsError(_) => 3001,
            Self::ConfigError(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::AddressUnset | Self::InvalidAddress(_) | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::SettingsError(_) | Self::ConfigError(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns `true` for errors caused by an unusable server address.
    #[must_use]
    pub const fn is_address_error(&self) -> bool {
        matches!(self, Self::AddressUnset | Self::InvalidAddress(_))
    }
}

impl From<std::io::Error> for HubError {
    fn from(err: std::io::Error) -> Self {
        Self::SettingsError(err.to_string())
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_errors_are_client_errors() {
        assert_eq!(HubError::AddressUnset.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            HubError::InvalidAddress("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert!(HubError::AddressUnset.is_address_error());
        assert!(!HubError::Internal("x".to_string()).is_address_error());
    }

    #[test]
    fn io_errors_become_settings_errors() {
        let err: HubError = std::io::Error::other("disk full").into();
        assert_eq!(err.error_code(), 3001);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_carries_status() {
        let response = HubError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
