// --- File: crates/guidebook_gcal/src/handlers.rs ---
use crate::availability::GuideSelection;
use crate::models::{
    AvailabilityQuery, AvailabilityResult, ConflictCheck, CreateEventRequest, DeleteEventQuery,
    EventMutationResponse, EventUpdate, NewEvent, RefreshTokenResponse, TimeRangeQuery,
    TokenStatusResponse, UpdateEventRequest,
};
use crate::service::GcalState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use chrono::{DateTime, Utc};
use guidebook_common::{validation_error, GuidebookError};
use std::sync::Arc;
use tracing::info;

type HandlerResult<T> = Result<Json<T>, GuidebookError>;

fn parse_instant(field: &str, value: &str) -> Result<DateTime<Utc>, GuidebookError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| {
            validation_error(format!(
                "Invalid {}: '{}' is not an RFC 3339 timestamp",
                field, value
            ))
        })
}

fn parse_range(start: &str, end: &str) -> Result<(DateTime<Utc>, DateTime<Utc>), GuidebookError> {
    let start = parse_instant("start_time", start)?;
    let end = parse_instant("end_time", end)?;
    if start >= end {
        return Err(validation_error("start_time must be before end_time"));
    }
    Ok((start, end))
}

fn non_blank(field: &str, value: &str) -> Result<(), GuidebookError> {
    if value.trim().is_empty() {
        return Err(validation_error(format!("{} is required", field)));
    }
    Ok(())
}

fn query_input<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, GuidebookError> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| validation_error(rejection.body_text()))
}

fn json_input<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, GuidebookError> {
    payload
        .map(|Json(p)| p)
        .map_err(|rejection| validation_error(rejection.body_text()))
}

/// Check a guide's booking calendar for events overlapping a time range.
#[axum::debug_handler]
pub async fn check_conflicts_handler(
    State(state): State<Arc<GcalState>>,
    Path(guide_id): Path<String>,
    query: Result<Query<TimeRangeQuery>, QueryRejection>,
) -> HandlerResult<ConflictCheck> {
    let query = query_input(query)?;
    let (start, end) = parse_range(&query.start_time, &query.end_time)?;

    let check = state.check_guide_conflicts(&guide_id, start, end).await?;
    Ok(Json(check))
}

/// Availability slots of all (or the selected) connected guides.
#[axum::debug_handler]
pub async fn guides_availability_handler(
    State(state): State<Arc<GcalState>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> HandlerResult<Vec<AvailabilityResult>> {
    let query = query_input(query)?;
    let (start, end) = parse_range(&query.start_time, &query.end_time)?;
    let selection = GuideSelection::from_query(query.guide_ids.as_deref());

    let results = state.guides_availability(selection, start, end).await?;
    Ok(Json(results))
}

#[axum::debug_handler]
pub async fn create_event_handler(
    State(state): State<Arc<GcalState>>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> HandlerResult<EventMutationResponse> {
    let request = json_input(payload)?;
    non_blank("guide_id", &request.guide_id)?;
    non_blank("summary", &request.summary)?;
    let (start_time, end_time) = parse_range(&request.start_time, &request.end_time)?;

    let event = NewEvent {
        summary: request.summary,
        description: request.description,
        start_time,
        end_time,
    };
    let created = state.create_event(&request.guide_id, &event).await?;
    info!("Created event {} for guide {}", created.id, request.guide_id);

    Ok(Json(EventMutationResponse {
        success: true,
        event_id: Some(created.id.clone()),
        event: Some(created),
        message: "Event created".to_string(),
    }))
}

#[axum::debug_handler]
pub async fn update_event_handler(
    State(state): State<Arc<GcalState>>,
    Path(event_id): Path<String>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> HandlerResult<EventMutationResponse> {
    let request = json_input(payload)?;
    non_blank("guide_id", &request.guide_id)?;

    let update = EventUpdate {
        summary: request.summary,
        description: request.description,
        start_time: request
            .start_time
            .as_deref()
            .map(|t| parse_instant("start_time", t))
            .transpose()?,
        end_time: request
            .end_time
            .as_deref()
            .map(|t| parse_instant("end_time", t))
            .transpose()?,
    };
    let updated = state
        .update_event(&request.guide_id, &event_id, &update)
        .await?;

    Ok(Json(EventMutationResponse {
        success: true,
        event_id: Some(updated.id.clone()),
        event: Some(updated),
        message: "Event updated".to_string(),
    }))
}

#[axum::debug_handler]
pub async fn delete_event_handler(
    State(state): State<Arc<GcalState>>,
    Path(event_id): Path<String>,
    query: Result<Query<DeleteEventQuery>, QueryRejection>,
) -> HandlerResult<EventMutationResponse> {
    let query = query_input(query)?;
    non_blank("guide_id", &query.guide_id)?;

    state.delete_event(&query.guide_id, &event_id).await?;

    Ok(Json(EventMutationResponse {
        success: true,
        event_id: Some(event_id),
        event: None,
        message: "Event deleted".to_string(),
    }))
}

/// Report whether the guide's Google connection works. A guide that must
/// reconnect is a normal answer here, not an error.
#[axum::debug_handler]
pub async fn token_status_handler(
    State(state): State<Arc<GcalState>>,
    Path(guide_id): Path<String>,
) -> HandlerResult<TokenStatusResponse> {
    let status = state.token_status(&guide_id).await?;
    Ok(Json(status.into()))
}

#[axum::debug_handler]
pub async fn refresh_token_handler(
    State(state): State<Arc<GcalState>>,
    Path(guide_id): Path<String>,
) -> HandlerResult<RefreshTokenResponse> {
    let token = state.refresh_token(&guide_id).await?;
    Ok(Json(token.into()))
}
