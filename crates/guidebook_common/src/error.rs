// --- File: crates/guidebook_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all Guidebook crates.
///
/// Feature crates keep their own error enums and convert into this one at the
/// HTTP boundary (`impl From<CrateError> for GuidebookError`).
#[derive(Error, Debug)]
pub enum GuidebookError {
    /// Missing or malformed request parameters. Never retried.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No usable Google credential for the guide. The caller has to start the
    /// external authorization flow again.
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    /// Guide or event does not exist.
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// An upstream provider (OAuth endpoint, calendar API) answered with a failure
    /// or could not be reached.
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl GuidebookError {
    /// Short machine readable label used as the `error` field of HTTP payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            GuidebookError::ValidationError(_) => "invalid_input",
            GuidebookError::AuthRequired(_) => "auth_required",
            GuidebookError::NotFoundError(_) => "not_found",
            GuidebookError::ExternalServiceError { .. } => "provider_error",
            GuidebookError::DatabaseError(_) => "database_error",
            GuidebookError::ConfigError(_) => "config_error",
            GuidebookError::InternalError(_) => "internal_error",
        }
    }

    /// Whether the caller should prompt the guide to reconnect Google Calendar.
    pub fn requires_auth(&self) -> bool {
        matches!(self, GuidebookError::AuthRequired(_))
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for GuidebookError {
    fn status_code(&self) -> u16 {
        match self {
            GuidebookError::ValidationError(_) => 400,
            GuidebookError::AuthRequired(_) => 401,
            GuidebookError::NotFoundError(_) => 404,
            GuidebookError::ExternalServiceError { .. } => 500,
            GuidebookError::DatabaseError(_) => 500,
            GuidebookError::ConfigError(_) => 500,
            GuidebookError::InternalError(_) => 500,
        }
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> GuidebookError {
    GuidebookError::ValidationError(message.to_string())
}

pub fn auth_required<T: fmt::Display>(message: T) -> GuidebookError {
    GuidebookError::AuthRequired(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> GuidebookError {
    GuidebookError::NotFoundError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> GuidebookError {
    GuidebookError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> GuidebookError {
    GuidebookError::ConfigError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(validation_error("bad").status_code(), 400);
        assert_eq!(auth_required("reconnect").status_code(), 401);
        assert_eq!(not_found("guide").status_code(), 404);
        assert_eq!(
            external_service_error("Google Calendar", "boom").status_code(),
            500
        );
        assert_eq!(config_error("missing").status_code(), 500);
    }

    #[test]
    fn test_only_auth_required_requests_reauthentication() {
        assert!(auth_required("x").requires_auth());
        assert!(!not_found("x").requires_auth());
        assert!(!external_service_error("OAuth", "x").requires_auth());
    }
}
