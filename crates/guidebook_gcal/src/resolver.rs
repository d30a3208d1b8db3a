// --- File: crates/guidebook_gcal/src/resolver.rs ---
use crate::error::GcalError;
use guidebook_db::{ConnectedGuide, GuideCredentialStore};
use std::sync::Arc;
use tracing::debug;

/// Which of a guide's calendars an operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarPurpose {
    /// The guide's primary calendar, addressed by their e-mail. Conflict
    /// checks and event mutations use it.
    Booking,
    /// The dedicated calendar on which the guide marks available slots.
    Availability,
}

impl CalendarPurpose {
    fn label(self) -> &'static str {
        match self {
            CalendarPurpose::Booking => "booking calendar (e-mail)",
            CalendarPurpose::Availability => "availability calendar id",
        }
    }
}

pub struct CalendarResolver {
    store: Arc<dyn GuideCredentialStore>,
}

impl CalendarResolver {
    pub fn new(store: Arc<dyn GuideCredentialStore>) -> Self {
        Self { store }
    }

    /// Calendar id to use for `purpose`. A missing guide and a missing or
    /// blank identifier both yield `NotFound`.
    pub async fn resolve(&self, guide_id: &str, purpose: CalendarPurpose) -> Result<String, GcalError> {
        let calendar_id = match purpose {
            CalendarPurpose::Booking => self.store.get_guide_email(guide_id).await?,
            CalendarPurpose::Availability => {
                self.store.get_availability_calendar_id(guide_id).await?
            }
        };
        Self::non_blank(guide_id, purpose, calendar_id)
    }

    /// Availability calendar of an already loaded connected guide, without a store lookup.
    pub fn resolve_connected(guide: &ConnectedGuide) -> Result<String, GcalError> {
        Self::non_blank(
            &guide.id,
            CalendarPurpose::Availability,
            guide.availability_calendar_id.clone(),
        )
    }

    fn non_blank(
        guide_id: &str,
        purpose: CalendarPurpose,
        calendar_id: Option<String>,
    ) -> Result<String, GcalError> {
        match calendar_id.map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() => {
                debug!("Resolved {} for guide {}: {}", purpose.label(), guide_id, id);
                Ok(id)
            }
            _ => Err(GcalError::NotFound(format!(
                "No {} configured for guide {}",
                purpose.label(),
                guide_id
            ))),
        }
    }
}
