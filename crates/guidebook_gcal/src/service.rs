// --- File: crates/guidebook_gcal/src/service.rs ---
//! Wiring of the calendar components and the per-request workflows.
//!
//! Every guide-scoped workflow runs token refresh, then calendar resolution,
//! then the calendar call, and stops at the first failure.

use crate::availability::{AvailabilityAggregator, ConflictChecker, GuideSelection};
use crate::error::GcalError;
use crate::gateway::EventGateway;
use crate::models::{
    AccessToken, AvailabilityResult, CalendarEvent, ConflictCheck, EventUpdate, NewEvent,
    TokenStatus,
};
use crate::oauth::TokenRefresher;
use crate::resolver::{CalendarPurpose, CalendarResolver};
use chrono::{DateTime, Utc};
use guidebook_common::{config_error, create_client, GuidebookError, HTTP_CLIENT};
use guidebook_config::{AppConfig, GcalConfig, GoogleOAuthConfig};
use guidebook_db::GuideCredentialStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state behind every calendar route.
pub struct GcalState {
    pub store: Arc<dyn GuideCredentialStore>,
    pub refresher: Arc<TokenRefresher>,
    pub resolver: Arc<CalendarResolver>,
    pub gateway: Arc<EventGateway>,
    pub aggregator: AvailabilityAggregator,
    pub conflicts: ConflictChecker,
}

impl GcalState {
    /// Build the state from the `google_oauth` and `gcal` config sections.
    ///
    /// `google_oauth` is required; `gcal` falls back to the public Google endpoints.
    pub fn from_config(
        config: &AppConfig,
        store: Arc<dyn GuideCredentialStore>,
    ) -> Result<Self, GuidebookError> {
        let oauth = config
            .google_oauth
            .clone()
            .ok_or_else(|| config_error("google_oauth configuration is missing"))?;
        if oauth.client_id.trim().is_empty() || oauth.client_secret.trim().is_empty() {
            return Err(config_error(
                "google_oauth client_id and client_secret must be set",
            ));
        }
        let gcal = config.gcal.clone().unwrap_or_default();
        Ok(Self::new(store, oauth, gcal))
    }

    pub fn new(
        store: Arc<dyn GuideCredentialStore>,
        oauth: GoogleOAuthConfig,
        gcal: GcalConfig,
    ) -> Self {
        let timeout = gcal.request_timeout_secs_or_default();
        let http = create_client(timeout, false).unwrap_or_else(|e| {
            warn!("Failed to build HTTP client ({}), using the shared default", e);
            HTTP_CLIENT.clone()
        });

        let refresher = Arc::new(TokenRefresher::new(store.clone(), http.clone(), oauth));
        let resolver = Arc::new(CalendarResolver::new(store.clone()));
        let gateway = Arc::new(EventGateway::new(
            http,
            gcal.api_base_url.clone(),
            gcal.time_zone_or_default(),
        ));
        info!(
            "Google Calendar gateway ready (api: {}, time zone: {}, timeout: {}s)",
            gcal.api_base_url,
            gateway.time_zone(),
            timeout
        );

        Self {
            aggregator: AvailabilityAggregator::new(
                store.clone(),
                refresher.clone(),
                gateway.clone(),
            ),
            conflicts: ConflictChecker::new(refresher.clone(), resolver.clone(), gateway.clone()),
            store,
            refresher,
            resolver,
            gateway,
        }
    }

    async fn booking_calendar(&self, guide_id: &str) -> Result<(AccessToken, String), GcalError> {
        let token = self.refresher.refresh(guide_id).await?;
        let calendar_id = self
            .resolver
            .resolve(guide_id, CalendarPurpose::Booking)
            .await?;
        Ok((token, calendar_id))
    }

    pub async fn check_guide_conflicts(
        &self,
        guide_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ConflictCheck, GcalError> {
        self.conflicts.check_guide_conflicts(guide_id, start, end).await
    }

    pub async fn guides_availability(
        &self,
        selection: GuideSelection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AvailabilityResult>, GcalError> {
        self.aggregator.aggregate(selection, start, end).await
    }

    pub async fn create_event(
        &self,
        guide_id: &str,
        event: &NewEvent,
    ) -> Result<CalendarEvent, GcalError> {
        let (token, calendar_id) = self.booking_calendar(guide_id).await?;
        self.gateway.create(&token, &calendar_id, event).await
    }

    pub async fn update_event(
        &self,
        guide_id: &str,
        event_id: &str,
        update: &EventUpdate,
    ) -> Result<CalendarEvent, GcalError> {
        if update.is_empty() {
            return Err(GcalError::InvalidInput(
                "at least one of summary, description, start_time or end_time is required"
                    .to_string(),
            ));
        }
        let (token, calendar_id) = self.booking_calendar(guide_id).await?;
        self.gateway
            .update(&token, &calendar_id, event_id, update)
            .await
    }

    pub async fn delete_event(&self, guide_id: &str, event_id: &str) -> Result<(), GcalError> {
        let (token, calendar_id) = self.booking_calendar(guide_id).await?;
        self.gateway.delete(&token, &calendar_id, event_id).await
    }

    pub async fn token_status(&self, guide_id: &str) -> Result<TokenStatus, GcalError> {
        self.refresher.check_token(guide_id).await
    }

    pub async fn refresh_token(&self, guide_id: &str) -> Result<AccessToken, GcalError> {
        self.refresher.refresh(guide_id).await
    }
}
