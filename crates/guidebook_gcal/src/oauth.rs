// --- File: crates/guidebook_gcal/src/oauth.rs ---
//! Exchange of stored refresh tokens for access tokens.
//!
//! A refresh token the provider no longer honors (`invalid_grant`, or a
//! successful response without an access token) is removed from the store, so
//! later calls for the same guide report "authentication required" without a
//! network round trip until the guide reconnects.

use crate::error::{GcalError, OAUTH_SERVICE};
use crate::models::{AccessToken, TokenStatus};
use chrono::Utc;
use guidebook_config::GoogleOAuthConfig;
use guidebook_db::GuideCredentialStore;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct TokenEndpointPayload {
    access_token: Option<String>,
    expires_in: Option<i64>,
    error: Option<String>,
    error_description: Option<String>,
}

pub struct TokenRefresher {
    store: Arc<dyn GuideCredentialStore>,
    http: Client,
    oauth: GoogleOAuthConfig,
}

impl TokenRefresher {
    pub fn new(store: Arc<dyn GuideCredentialStore>, http: Client, oauth: GoogleOAuthConfig) -> Self {
        Self { store, http, oauth }
    }

    /// Obtain a fresh access token for the guide.
    ///
    /// # Errors
    ///
    /// * `AuthRequired` when no usable refresh token is stored (no request is
    ///   made) or the provider rejected it (the stored token is cleared first)
    /// * `Provider` for any other token endpoint or transport failure; the
    ///   stored token is kept
    /// * `Store` when the credential store fails
    pub async fn refresh(&self, guide_id: &str) -> Result<AccessToken, GcalError> {
        let credential = self.store.get_credential(guide_id).await?;
        let Some(refresh_token) = credential
            .as_ref()
            .and_then(|credential| credential.usable_refresh_token())
        else {
            debug!("No refresh token on file for guide {}", guide_id);
            return Err(GcalError::AuthRequired(format!(
                "Guide {} has not connected Google Calendar",
                guide_id
            )));
        };

        let response = self
            .http
            .post(&self.oauth.token_url)
            .form(&[
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| {
                GcalError::provider(OAUTH_SERVICE, None, format!("token request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GcalError::provider(
                OAUTH_SERVICE,
                Some(status.as_u16()),
                format!("failed reading token response: {}", e),
            )
        })?;

        let payload = serde_json::from_str::<TokenEndpointPayload>(&body).ok();

        if payload.as_ref().and_then(|p| p.error.as_deref()) == Some("invalid_grant") {
            let detail = payload
                .as_ref()
                .and_then(|p| p.error_description.clone())
                .unwrap_or_else(|| "invalid_grant".to_string());
            self.invalidate(guide_id, &detail).await?;
            return Err(GcalError::AuthRequired(format!(
                "Google refused the stored refresh token for guide {}: {}",
                guide_id, detail
            )));
        }

        if !status.is_success() {
            let message = payload
                .and_then(|p| p.error_description.or(p.error))
                .unwrap_or(body);
            warn!(
                "Token endpoint returned {} for guide {}: {}",
                status, guide_id, message
            );
            return Err(GcalError::provider(
                OAUTH_SERVICE,
                Some(status.as_u16()),
                message,
            ));
        }

        let Some(payload) = payload else {
            return Err(GcalError::provider(
                OAUTH_SERVICE,
                Some(status.as_u16()),
                format!("invalid token response payload: {}", body),
            ));
        };

        match payload.access_token.filter(|token| !token.trim().is_empty()) {
            Some(value) => {
                debug!("Obtained access token for guide {}", guide_id);
                Ok(AccessToken {
                    value,
                    obtained_at: Utc::now(),
                    expires_in: payload.expires_in,
                })
            }
            None => {
                self.invalidate(guide_id, "token response carried no access token")
                    .await?;
                Err(GcalError::AuthRequired(format!(
                    "Google issued no access token for guide {}",
                    guide_id
                )))
            }
        }
    }

    /// Report whether the guide's stored credential currently works.
    ///
    /// Performs a real refresh, so a rejected token is cleared as a side effect.
    pub async fn check_token(&self, guide_id: &str) -> Result<TokenStatus, GcalError> {
        match self.refresh(guide_id).await {
            Ok(_) => Ok(TokenStatus::Valid),
            Err(GcalError::AuthRequired(reason)) => Ok(TokenStatus::RequiresAuth { reason }),
            Err(e) => Err(e),
        }
    }

    async fn invalidate(&self, guide_id: &str, reason: &str) -> Result<(), GcalError> {
        warn!(
            "Clearing Google credential for guide {}: {}",
            guide_id, reason
        );
        self.store.clear_credential(guide_id).await?;
        info!("Guide {} must reconnect Google Calendar", guide_id);
        Ok(())
    }
}
