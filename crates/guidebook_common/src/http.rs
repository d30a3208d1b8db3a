// --- File: crates/guidebook_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{GuidebookError, HttpStatusCode};

pub mod client;

/// JSON body returned for every failed request.
///
/// `requiresAuth` is only present when the guide has to reconnect Google Calendar.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "requiresAuth", skip_serializing_if = "Option::is_none")]
    pub requires_auth: Option<bool>,
}

impl From<&GuidebookError> for ErrorBody {
    fn from(err: &GuidebookError) -> Self {
        Self {
            error: err.kind().to_string(),
            message: Some(err.to_string()),
            requires_auth: err.requires_auth().then_some(true),
        }
    }
}

impl IntoResponse for GuidebookError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status_code.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::info!("Request rejected ({}): {}", status_code.as_u16(), self);
        }
        (status_code, Json(ErrorBody::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{auth_required, not_found};

    #[test]
    fn test_auth_required_body_carries_flag() {
        let body = serde_json::to_value(ErrorBody::from(&auth_required("token revoked")))
            .expect("serializable");
        assert_eq!(body["error"], "auth_required");
        assert_eq!(body["requiresAuth"], true);
        assert!(body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("token revoked"));
    }

    #[test]
    fn test_other_errors_omit_requires_auth() {
        let body = serde_json::to_value(ErrorBody::from(&not_found("event"))).expect("serializable");
        assert_eq!(body["error"], "not_found");
        assert!(body.get("requiresAuth").is_none());
    }

    #[test]
    fn test_into_response_uses_status_code() {
        let response = auth_required("no refresh token").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let response = not_found("guide").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
