// --- File: crates/guidebook_gcal/src/models.rs ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Short-lived bearer credential obtained from a refresh token.
#[derive(Clone)]
pub struct AccessToken {
    pub value: String,
    pub obtained_at: DateTime<Utc>,
    /// Lifetime reported by the token endpoint, in seconds.
    pub expires_in: Option<i64>,
}

impl AccessToken {
    pub fn bearer(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("obtained_at", &self.obtained_at)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// A calendar entry as returned to callers.
///
/// All-day entries carry midnight UTC of their start and end dates.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub start: DateTime<Utc>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub end: DateTime<Utc>,
    /// Provider status: `confirmed`, `tentative` or `cancelled`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl CalendarEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status.eq_ignore_ascii_case("cancelled")
    }

    /// Half-open overlap with `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// Input for creating an event on a guide's booking calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub summary: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Partial update of an event. Only present fields are sent to the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventUpdate {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.description.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}

/// Result of an availability lookup for one guide.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResult {
    pub guide_id: String,
    pub name: String,
    pub events: Vec<CalendarEvent>,
    /// True when the guide marked at least one slot in the window.
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AvailabilityResult {
    pub fn found(guide_id: &str, guide_name: &str, events: Vec<CalendarEvent>) -> Self {
        Self {
            guide_id: guide_id.to_string(),
            name: guide_name.to_string(),
            is_available: !events.is_empty(),
            events,
            error: None,
        }
    }

    pub fn failed(guide_id: &str, guide_name: &str, error: impl Into<String>) -> Self {
        Self {
            guide_id: guide_id.to_string(),
            name: guide_name.to_string(),
            events: Vec::new(),
            is_available: false,
            error: Some(error.into()),
        }
    }
}

/// Outcome of checking a guide's booking calendar for a time range.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCheck {
    pub available: bool,
    pub conflicts: Vec<CalendarEvent>,
    pub message: String,
}

impl ConflictCheck {
    pub fn from_conflicts(conflicts: Vec<CalendarEvent>) -> Self {
        let message = if conflicts.is_empty() {
            "Guide is available for the requested time".to_string()
        } else {
            format!(
                "Guide has {} conflicting event(s) in the requested time",
                conflicts.len()
            )
        };
        Self {
            available: conflicts.is_empty(),
            conflicts,
            message,
        }
    }
}

/// Whether a guide's stored credential can currently produce an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    Valid,
    RequiresAuth { reason: String },
}

// --- HTTP request and response bodies ---

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams), into_params(parameter_in = Query))]
#[derive(Debug, Clone, Deserialize)]
pub struct TimeRangeQuery {
    /// RFC 3339 start of the range (inclusive).
    pub start_time: String,
    /// RFC 3339 end of the range (exclusive).
    pub end_time: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams), into_params(parameter_in = Query))]
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub start_time: String,
    pub end_time: String,
    /// Comma separated guide ids; all connected guides when absent.
    pub guide_ids: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams), into_params(parameter_in = Query))]
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteEventQuery {
    pub guide_id: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub guide_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEventRequest {
    pub guide_id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMutationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<CalendarEvent>,
    pub message: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStatusResponse {
    pub valid: bool,
    pub requires_auth: bool,
    pub message: String,
}

impl From<TokenStatus> for TokenStatusResponse {
    fn from(status: TokenStatus) -> Self {
        match status {
            TokenStatus::Valid => Self {
                valid: true,
                requires_auth: false,
                message: "Google Calendar connection is valid".to_string(),
            },
            TokenStatus::RequiresAuth { reason } => Self {
                valid: false,
                requires_auth: true,
                message: reason,
            },
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub obtained_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

impl From<AccessToken> for RefreshTokenResponse {
    fn from(token: AccessToken) -> Self {
        Self {
            access_token: token.value,
            obtained_at: token.obtained_at,
            expires_in: token.expires_in,
        }
    }
}
