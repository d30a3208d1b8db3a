// --- File: crates/guidebook_gcal/src/gateway.rs ---
//! Google Calendar v3 event operations over plain REST.

use crate::error::{GcalError, CALENDAR_SERVICE};
use crate::models::{AccessToken, CalendarEvent, EventUpdate, NewEvent};
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info, warn};
use url::Url;

// --- Wire format ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct GoogleEventTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl GoogleEventTime {
    /// All-day boundaries are local midnight in the entry's own `timeZone`,
    /// or in `calendar_zone` when the entry carries none.
    fn instant(&self, calendar_zone: Tz) -> Option<DateTime<Utc>> {
        if let Some(date_time) = self.date_time.as_deref() {
            return DateTime::parse_from_rfc3339(date_time)
                .ok()
                .map(|t| t.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(self.date.as_deref()?, "%Y-%m-%d").ok()?;
        let zone = self
            .time_zone
            .as_deref()
            .and_then(|name| Tz::from_str(name).ok())
            .unwrap_or(calendar_zone);
        let midnight = zone
            .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
            .earliest()?;
        Some(midnight.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct GoogleEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
    pub start: Option<GoogleEventTime>,
    pub end: Option<GoogleEventTime>,
}

impl GoogleEvent {
    fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("cancelled"))
    }

    fn into_calendar_event(self, calendar_zone: Tz) -> Option<CalendarEvent> {
        let start = self.start.as_ref()?.instant(calendar_zone)?;
        let end = self.end.as_ref()?.instant(calendar_zone)?;
        Some(CalendarEvent {
            id: self.id.filter(|id| !id.is_empty())?,
            summary: self.summary.unwrap_or_default(),
            description: self.description,
            start,
            end,
            status: self.status.unwrap_or_else(|| "confirmed".to_string()),
            link: self.html_link,
        })
    }
}

#[derive(Debug, Deserialize)]
struct EventsPage {
    items: Option<Vec<GoogleEvent>>,
    #[serde(rename = "timeZone")]
    time_zone: Option<String>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Serialize)]
struct EventBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<GoogleEventTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<GoogleEventTime>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: Option<String>,
}

/// Converts a page of provider events, dropping cancelled ones and entries
/// without usable times. All-day dates are read in `calendar_zone`.
pub(crate) fn active_events(items: Vec<GoogleEvent>, calendar_zone: Tz) -> Vec<CalendarEvent> {
    items
        .into_iter()
        .filter(|item| !item.is_cancelled())
        .filter_map(|item| {
            let id = item.id.clone().unwrap_or_default();
            let event = item.into_calendar_event(calendar_zone);
            if event.is_none() {
                warn!("Skipping calendar event {:?} without usable start/end", id);
            }
            event
        })
        .collect()
}

// --- Gateway ---

pub struct EventGateway {
    http: Client,
    api_base_url: String,
    time_zone: Tz,
}

impl EventGateway {
    /// `time_zone` is the IANA zone attached to start/end times written to the
    /// provider; an unknown name falls back to UTC.
    pub fn new(http: Client, api_base_url: impl Into<String>, time_zone: &str) -> Self {
        let time_zone = Tz::from_str(time_zone).unwrap_or_else(|_| {
            warn!("Unknown time zone '{}', falling back to UTC", time_zone);
            Tz::UTC
        });
        Self {
            http,
            api_base_url: api_base_url.into(),
            time_zone,
        }
    }

    pub fn time_zone(&self) -> &'static str {
        self.time_zone.name()
    }

    fn events_endpoint(&self, calendar_id: &str) -> Result<Url, GcalError> {
        let mut url = Url::parse(&self.api_base_url).map_err(|e| {
            GcalError::provider(
                CALENDAR_SERVICE,
                None,
                format!("invalid calendar api base url: {}", e),
            )
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                GcalError::provider(
                    CALENDAR_SERVICE,
                    None,
                    "calendar api base url cannot be a base",
                )
            })?;
            segments.pop_if_empty();
            segments.push("calendars");
            segments.push(calendar_id);
            segments.push("events");
        }
        Ok(url)
    }

    fn event_endpoint(&self, calendar_id: &str, event_id: &str) -> Result<Url, GcalError> {
        let mut url = self.events_endpoint(calendar_id)?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                GcalError::provider(CALENDAR_SERVICE, None, "calendar events url cannot be a base")
            })?;
            segments.push(event_id);
        }
        Ok(url)
    }

    fn event_time(&self, instant: DateTime<Utc>) -> GoogleEventTime {
        GoogleEventTime {
            date_time: Some(
                instant
                    .with_timezone(&self.time_zone)
                    .to_rfc3339_opts(SecondsFormat::Secs, false),
            ),
            date: None,
            time_zone: Some(self.time_zone.name().to_string()),
        }
    }

    fn ensure_non_empty(value: &str, field: &str) -> Result<(), GcalError> {
        if value.trim().is_empty() {
            return Err(GcalError::InvalidInput(format!("{} must not be empty", field)));
        }
        Ok(())
    }

    fn transport_error(action: &str, e: reqwest::Error) -> GcalError {
        GcalError::provider(
            CALENDAR_SERVICE,
            None,
            format!("network error while {}: {}", action, e),
        )
    }

    fn http_error(status: StatusCode, body: &str) -> GcalError {
        let message = serde_json::from_str::<GoogleErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .unwrap_or_else(|| body.to_string());
        GcalError::provider(CALENDAR_SERVICE, Some(status.as_u16()), message)
    }

    async fn read_body(action: &str, response: Response) -> Result<(StatusCode, String), GcalError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GcalError::provider(
                CALENDAR_SERVICE,
                Some(status.as_u16()),
                format!("failed reading response while {}: {}", action, e),
            )
        })?;
        Ok((status, body))
    }

    fn parse_event(&self, action: &str, body: &str) -> Result<CalendarEvent, GcalError> {
        let parsed: GoogleEvent = serde_json::from_str(body).map_err(|e| {
            GcalError::provider(
                CALENDAR_SERVICE,
                None,
                format!("invalid event payload while {}: {}", action, e),
            )
        })?;
        parsed.into_calendar_event(self.time_zone).ok_or_else(|| {
            GcalError::provider(
                CALENDAR_SERVICE,
                None,
                format!("event returned while {} has no id or times", action),
            )
        })
    }

    /// Create an event on `calendar_id` and return it as stored by the provider.
    pub async fn create(
        &self,
        token: &AccessToken,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<CalendarEvent, GcalError> {
        Self::ensure_non_empty(calendar_id, "calendar id")?;
        Self::ensure_non_empty(&event.summary, "summary")?;
        if event.start_time >= event.end_time {
            return Err(GcalError::InvalidInput(
                "start_time must be before end_time".to_string(),
            ));
        }

        let body = EventBody {
            summary: Some(event.summary.clone()),
            description: event.description.clone(),
            start: Some(self.event_time(event.start_time)),
            end: Some(self.event_time(event.end_time)),
        };

        let response = self
            .http
            .post(self.events_endpoint(calendar_id)?)
            .bearer_auth(token.bearer())
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::transport_error("creating event", e))?;

        let (status, body) = Self::read_body("creating event", response).await?;
        if !status.is_success() {
            return Err(Self::http_error(status, &body));
        }
        let created = self.parse_event("creating event", &body)?;
        info!("Created event {} on calendar {}", created.id, calendar_id);
        Ok(created)
    }

    /// Patch the fields present in `update`; absent fields keep their values.
    pub async fn update(
        &self,
        token: &AccessToken,
        calendar_id: &str,
        event_id: &str,
        update: &EventUpdate,
    ) -> Result<CalendarEvent, GcalError> {
        Self::ensure_non_empty(calendar_id, "calendar id")?;
        Self::ensure_non_empty(event_id, "event id")?;
        if update.is_empty() {
            return Err(GcalError::InvalidInput(
                "at least one of summary, description, start_time or end_time is required"
                    .to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (update.start_time, update.end_time) {
            if start >= end {
                return Err(GcalError::InvalidInput(
                    "start_time must be before end_time".to_string(),
                ));
            }
        }

        let body = EventBody {
            summary: update.summary.clone(),
            description: update.description.clone(),
            start: update.start_time.map(|t| self.event_time(t)),
            end: update.end_time.map(|t| self.event_time(t)),
        };

        let response = self
            .http
            .patch(self.event_endpoint(calendar_id, event_id)?)
            .bearer_auth(token.bearer())
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::transport_error("updating event", e))?;

        let (status, body) = Self::read_body("updating event", response).await?;
        if status == StatusCode::NOT_FOUND {
            return Err(GcalError::NotFound(format!(
                "Event {} not found in calendar {}",
                event_id, calendar_id
            )));
        }
        if !status.is_success() {
            return Err(Self::http_error(status, &body));
        }
        let updated = self.parse_event("updating event", &body)?;
        info!("Updated event {} on calendar {}", event_id, calendar_id);
        Ok(updated)
    }

    /// Delete an event. An event that is already gone counts as deleted.
    pub async fn delete(
        &self,
        token: &AccessToken,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<(), GcalError> {
        Self::ensure_non_empty(calendar_id, "calendar id")?;
        Self::ensure_non_empty(event_id, "event id")?;

        let response = self
            .http
            .delete(self.event_endpoint(calendar_id, event_id)?)
            .bearer_auth(token.bearer())
            .send()
            .await
            .map_err(|e| Self::transport_error("deleting event", e))?;

        let (status, body) = Self::read_body("deleting event", response).await?;
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            info!(
                "Event {} was already absent from calendar {} ({})",
                event_id, calendar_id, status
            );
            return Ok(());
        }
        if !status.is_success() {
            return Err(Self::http_error(status, &body));
        }
        info!("Deleted event {} from calendar {}", event_id, calendar_id);
        Ok(())
    }

    /// Non-cancelled events overlapping `[start, end)`, recurring series
    /// expanded into instances, ordered by start time.
    pub async fn list_in_range(
        &self,
        token: &AccessToken,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, GcalError> {
        Self::ensure_non_empty(calendar_id, "calendar id")?;

        let endpoint = self.events_endpoint(calendar_id)?;
        let time_min = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = end.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut page_token: Option<String> = None;
        let mut events = Vec::new();

        loop {
            let mut req = self
                .http
                .get(endpoint.clone())
                .bearer_auth(token.bearer())
                .query(&[
                    ("singleEvents", "true"),
                    ("orderBy", "startTime"),
                    ("timeMin", time_min.as_str()),
                    ("timeMax", time_max.as_str()),
                ]);
            if let Some(page_token) = page_token.as_deref() {
                req = req.query(&[("pageToken", page_token)]);
            }

            let response = req
                .send()
                .await
                .map_err(|e| Self::transport_error("listing events", e))?;
            let (status, body) = Self::read_body("listing events", response).await?;
            if !status.is_success() {
                return Err(Self::http_error(status, &body));
            }

            let page: EventsPage = serde_json::from_str(&body).map_err(|e| {
                GcalError::provider(
                    CALENDAR_SERVICE,
                    None,
                    format!("invalid events list payload: {}", e),
                )
            })?;
            let calendar_zone = page
                .time_zone
                .as_deref()
                .and_then(|name| Tz::from_str(name).ok())
                .unwrap_or(self.time_zone);
            events.extend(active_events(page.items.unwrap_or_default(), calendar_zone));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!(
            "Listed {} event(s) on calendar {} between {} and {}",
            events.len(),
            calendar_id,
            time_min,
            time_max
        );
        Ok(events)
    }
}
