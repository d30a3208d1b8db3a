// --- File: crates/guidebook_gcal/src/availability.rs ---
//! Availability across guides and conflict checks for a single guide.

use crate::error::GcalError;
use crate::gateway::EventGateway;
use crate::models::{AvailabilityResult, CalendarEvent, ConflictCheck};
use crate::oauth::TokenRefresher;
use crate::resolver::{CalendarPurpose, CalendarResolver};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use guidebook_db::{ConnectedGuide, GuideCredentialStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which guides an availability lookup covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideSelection {
    All,
    Only(Vec<String>),
}

impl GuideSelection {
    /// Parse a comma separated id list; blank or absent means every connected guide.
    pub fn from_query(guide_ids: Option<&str>) -> Self {
        let ids: Vec<String> = guide_ids
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        if ids.is_empty() {
            GuideSelection::All
        } else {
            GuideSelection::Only(ids)
        }
    }
}

fn ensure_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), GcalError> {
    if start >= end {
        return Err(GcalError::InvalidInput(
            "start_time must be before end_time".to_string(),
        ));
    }
    Ok(())
}

pub struct AvailabilityAggregator {
    store: Arc<dyn GuideCredentialStore>,
    refresher: Arc<TokenRefresher>,
    gateway: Arc<EventGateway>,
}

impl AvailabilityAggregator {
    pub fn new(
        store: Arc<dyn GuideCredentialStore>,
        refresher: Arc<TokenRefresher>,
        gateway: Arc<EventGateway>,
    ) -> Self {
        Self {
            store,
            refresher,
            gateway,
        }
    }

    /// One result per selected guide, in selection order (store order for `All`).
    ///
    /// A failure for one guide is reported in that guide's result and never
    /// affects the others. Only a failure to list the connected guides fails
    /// the whole call.
    pub async fn aggregate(
        &self,
        selection: GuideSelection,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AvailabilityResult>, GcalError> {
        ensure_range(start, end)?;
        let connected = self.store.list_connected_guides().await?;

        let lookups: Vec<Result<ConnectedGuide, String>> = match selection {
            GuideSelection::All => connected.into_iter().map(Ok).collect(),
            GuideSelection::Only(ids) => ids
                .into_iter()
                .map(|id| {
                    connected
                        .iter()
                        .find(|guide| guide.id == id)
                        .cloned()
                        .ok_or(id)
                })
                .collect(),
        };
        info!(
            "Checking availability of {} guide(s) between {} and {}",
            lookups.len(),
            start,
            end
        );

        let results = join_all(lookups.into_iter().map(|lookup| async move {
            match lookup {
                Ok(guide) => self.guide_availability(&guide, start, end).await,
                Err(id) => AvailabilityResult::failed(
                    &id,
                    "",
                    format!("Guide {} has not connected Google Calendar", id),
                ),
            }
        }))
        .await;
        Ok(results)
    }

    async fn guide_availability(
        &self,
        guide: &ConnectedGuide,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AvailabilityResult {
        match self.fetch_events(guide, start, end).await {
            Ok(events) => {
                debug!(
                    "Guide {} has {} availability slot(s)",
                    guide.id,
                    events.len()
                );
                AvailabilityResult::found(&guide.id, &guide.name, events)
            }
            Err(e) => {
                warn!("Availability lookup failed for guide {}: {}", guide.id, e);
                AvailabilityResult::failed(&guide.id, &guide.name, e.to_string())
            }
        }
    }

    async fn fetch_events(
        &self,
        guide: &ConnectedGuide,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, GcalError> {
        let token = self.refresher.refresh(&guide.id).await?;
        let calendar_id = CalendarResolver::resolve_connected(guide)?;
        self.gateway
            .list_in_range(&token, &calendar_id, start, end)
            .await
    }
}

pub struct ConflictChecker {
    refresher: Arc<TokenRefresher>,
    resolver: Arc<CalendarResolver>,
    gateway: Arc<EventGateway>,
}

impl ConflictChecker {
    pub fn new(
        refresher: Arc<TokenRefresher>,
        resolver: Arc<CalendarResolver>,
        gateway: Arc<EventGateway>,
    ) -> Self {
        Self {
            refresher,
            resolver,
            gateway,
        }
    }

    /// Events on the guide's booking calendar overlapping `[start, end)`.
    pub async fn check_guide_conflicts(
        &self,
        guide_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ConflictCheck, GcalError> {
        ensure_range(start, end)?;
        let token = self.refresher.refresh(guide_id).await?;
        let calendar_id = self
            .resolver
            .resolve(guide_id, CalendarPurpose::Booking)
            .await?;

        let conflicts: Vec<CalendarEvent> = self
            .gateway
            .list_in_range(&token, &calendar_id, start, end)
            .await?
            .into_iter()
            .filter(|event| event.overlaps(start, end))
            .collect();

        info!(
            "Guide {} has {} conflict(s) between {} and {}",
            guide_id,
            conflicts.len(),
            start,
            end
        );
        Ok(ConflictCheck::from_conflicts(conflicts))
    }
}
