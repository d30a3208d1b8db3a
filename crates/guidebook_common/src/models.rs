// --- File: crates/guidebook_common/src/models.rs ---

// Guide and credential rows shared by the credential store (guidebook-db) and
// the calendar workflows (guidebook-gcal).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A guide's stored Google OAuth credential.
///
/// `refresh_token == None` means the guide never connected Google Calendar or
/// the token was invalidated; every calendar operation for the guide must then
/// report "authentication required" without touching the network.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideCredential {
    pub guide_id: String,
    pub refresh_token: Option<String>,
    pub token_created_at: Option<DateTime<Utc>>,
}

impl GuideCredential {
    /// Returns the refresh token if one is stored and non-blank.
    pub fn usable_refresh_token(&self) -> Option<&str> {
        self.refresh_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

impl std::fmt::Debug for GuideCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuideCredential")
            .field("guide_id", &self.guide_id)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("token_created_at", &self.token_created_at)
            .finish()
    }
}

/// A guide that has a refresh token on file, as listed for availability lookups.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedGuide {
    pub id: String,
    pub name: String,
    pub refresh_token: String,
    pub availability_calendar_id: Option<String>,
}

impl std::fmt::Debug for ConnectedGuide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectedGuide")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("refresh_token", &"<redacted>")
            .field("availability_calendar_id", &self.availability_calendar_id)
            .finish()
    }
}

/// Public profile fields of a guide needed to address their calendars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideRecord {
    pub id: String,
    pub name: String,
    /// Doubles as the id of the guide's primary (booking) calendar.
    pub email: Option<String>,
    /// Separate calendar on which the guide marks the times they are available.
    pub availability_calendar_id: Option<String>,
}

impl GuideRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            availability_calendar_id: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_availability_calendar(mut self, calendar_id: impl Into<String>) -> Self {
        self.availability_calendar_id = Some(calendar_id.into());
        self
    }
}
