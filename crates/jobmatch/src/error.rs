use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Application-wide error taxonomy. Every operation of the lifecycle engine
/// raises one of these; the HTTP boundary maps them to status codes
/// uniformly via `IntoResponse`.
#[derive(Debug)]
pub enum AppError {
    /// Entity absent, or present but not owned by the caller.
    NotFound(String),
    /// Duplicate resource or illegal state transition.
    Conflict(String),
    /// Missing or invalid credential.
    Auth(AuthFailure),
    /// Malformed input, reported as field-level messages.
    Validation(Vec<FieldError>),
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No usable credential on the request (401).
    Unauthenticated,
    /// Valid credential, insufficient role or deactivated account (403).
    Forbidden,
}

/// One validation failure tied to a named input field.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unauthenticated() -> Self {
        Self::Auth(AuthFailure::Unauthenticated)
    }

    pub fn forbidden() -> Self {
        Self::Auth(AuthFailure::Forbidden)
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(what) => write!(f, "{what} not found"),
            AppError::Conflict(message) => write!(f, "{message}"),
            AppError::Auth(AuthFailure::Unauthenticated) => write!(f, "not authorized"),
            AppError::Auth(AuthFailure::Forbidden) => write!(f, "forbidden"),
            AppError::Validation(errors) => {
                write!(f, "validation failed ({} field(s))", errors.len())
            }
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Server(err) => write!(f, "server error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(AuthFailure::Unauthenticated) => StatusCode::UNAUTHORIZED,
            AppError::Auth(AuthFailure::Forbidden) => StatusCode::FORBIDDEN,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            AppError::Validation(errors) => Json(json!({
                "success": false,
                "message": self.to_string(),
                "errors": errors,
            })),
            _ => Json(json!({
                "success": false,
                "message": self.to_string(),
            })),
        };

        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}
