// --- File: crates/guidebook_gcal/src/error.rs ---
use guidebook_common::{
    auth_required, external_service_error, not_found, validation_error, GuidebookError,
};
use guidebook_db::DbError;
use thiserror::Error;

pub const OAUTH_SERVICE: &str = "Google OAuth";
pub const CALENDAR_SERVICE: &str = "Google Calendar";

#[derive(Error, Debug)]
pub enum GcalError {
    /// Missing or malformed parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No refresh token on file, or the provider revoked it.
    #[error("Google Calendar authentication required: {0}")]
    AuthRequired(String),

    /// Guide, calendar id or event does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The token endpoint or calendar API failed for a reason other than an
    /// invalid grant, including transport failures (`status` is then `None`).
    #[error("{service} error: {message}")]
    Provider {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Credential store error: {0}")]
    Store(#[from] DbError),
}

impl GcalError {
    pub fn provider(service: &'static str, status: Option<u16>, message: impl Into<String>) -> Self {
        GcalError::Provider {
            service,
            status,
            message: message.into(),
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, GcalError::AuthRequired(_))
    }
}

impl From<GcalError> for GuidebookError {
    fn from(err: GcalError) -> Self {
        match err {
            GcalError::InvalidInput(msg) => validation_error(msg),
            GcalError::AuthRequired(msg) => auth_required(msg),
            GcalError::NotFound(msg) => not_found(msg),
            GcalError::Provider {
                service,
                status: Some(status),
                message,
            } => external_service_error(service, format!("HTTP {}: {}", status, message)),
            GcalError::Provider { service, message, .. } => {
                external_service_error(service, message)
            }
            GcalError::Store(db) => db.into(),
        }
    }
}
