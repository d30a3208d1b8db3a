// --- File: crates/guidebook_gcal/src/doc.rs ---

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::models::{
    AvailabilityQuery, AvailabilityResult, CalendarEvent, ConflictCheck, CreateEventRequest,
    DeleteEventQuery, EventMutationResponse, RefreshTokenResponse, TimeRangeQuery,
    TokenStatusResponse, UpdateEventRequest,
};
use guidebook_common::ErrorBody;

#[utoipa::path(
    get,
    path = "/gcal/guides/{guide_id}/conflicts",
    params(
        ("guide_id" = String, Path, description = "Guide id"),
        TimeRangeQuery
    ),
    responses(
        (status = 200, description = "Events on the guide's booking calendar overlapping the range", body = ConflictCheck),
        (status = 400, description = "Missing or malformed time range", body = ErrorBody),
        (status = 401, description = "Guide must reconnect Google Calendar", body = ErrorBody,
         example = json!({"error": "auth_required", "message": "Google Calendar authentication required: Guide g1 has not connected Google Calendar", "requiresAuth": true})),
        (status = 404, description = "Guide has no e-mail configured", body = ErrorBody),
        (status = 500, description = "Google or database failure", body = ErrorBody)
    ),
    tag = "GCal"
)]
fn doc_check_conflicts_handler() {}

#[utoipa::path(
    get,
    path = "/gcal/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "One result per guide; failures are reported per guide", body = [AvailabilityResult]),
        (status = 400, description = "Missing or malformed time range", body = ErrorBody),
        (status = 500, description = "Connected guides could not be listed", body = ErrorBody)
    ),
    tag = "GCal"
)]
fn doc_guides_availability_handler() {}

#[utoipa::path(
    post,
    path = "/gcal/events",
    request_body(content = CreateEventRequest, example = json!({
        "guide_id": "g1",
        "summary": "Old town walking tour",
        "description": "Group of 12, meeting point at the fountain",
        "start_time": "2025-05-15T10:00:00+02:00",
        "end_time": "2025-05-15T12:00:00+02:00"
    })),
    responses(
        (status = 200, description = "Event created on the guide's booking calendar", body = EventMutationResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 401, description = "Guide must reconnect Google Calendar", body = ErrorBody),
        (status = 404, description = "Guide has no e-mail configured", body = ErrorBody),
        (status = 500, description = "Google or database failure", body = ErrorBody)
    ),
    tag = "GCal"
)]
fn doc_create_event_handler() {}

#[utoipa::path(
    patch,
    path = "/gcal/events/{event_id}",
    params(("event_id" = String, Path, description = "Google event id")),
    request_body(content = UpdateEventRequest, example = json!({
        "guide_id": "g1",
        "start_time": "2025-05-15T11:00:00+02:00"
    })),
    responses(
        (status = 200, description = "Event updated; absent fields keep their values", body = EventMutationResponse),
        (status = 400, description = "No fields to update or malformed times", body = ErrorBody),
        (status = 401, description = "Guide must reconnect Google Calendar", body = ErrorBody),
        (status = 404, description = "Event or guide calendar not found", body = ErrorBody),
        (status = 500, description = "Google or database failure", body = ErrorBody)
    ),
    tag = "GCal"
)]
fn doc_update_event_handler() {}

#[utoipa::path(
    delete,
    path = "/gcal/events/{event_id}",
    params(
        ("event_id" = String, Path, description = "Google event id"),
        DeleteEventQuery
    ),
    responses(
        (status = 200, description = "Event deleted or already gone", body = EventMutationResponse),
        (status = 401, description = "Guide must reconnect Google Calendar", body = ErrorBody),
        (status = 500, description = "Google or database failure", body = ErrorBody)
    ),
    tag = "GCal"
)]
fn doc_delete_event_handler() {}

#[utoipa::path(
    get,
    path = "/gcal/token/{guide_id}",
    params(("guide_id" = String, Path, description = "Guide id")),
    responses(
        (status = 200, description = "Connection status", body = TokenStatusResponse,
         example = json!({"valid": false, "requiresAuth": true, "message": "Google Calendar authentication required"})),
        (status = 500, description = "Google or database failure", body = ErrorBody)
    ),
    tag = "GCal"
)]
fn doc_token_status_handler() {}

#[utoipa::path(
    post,
    path = "/gcal/token/{guide_id}/refresh",
    params(("guide_id" = String, Path, description = "Guide id")),
    responses(
        (status = 200, description = "Fresh access token", body = RefreshTokenResponse),
        (status = 401, description = "Guide must reconnect Google Calendar", body = ErrorBody),
        (status = 500, description = "Google or database failure", body = ErrorBody)
    ),
    tag = "GCal"
)]
fn doc_refresh_token_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_check_conflicts_handler,
        doc_guides_availability_handler,
        doc_create_event_handler,
        doc_update_event_handler,
        doc_delete_event_handler,
        doc_token_status_handler,
        doc_refresh_token_handler
    ),
    components(
        schemas(
            CalendarEvent,
            ConflictCheck,
            AvailabilityResult,
            CreateEventRequest,
            UpdateEventRequest,
            EventMutationResponse,
            TokenStatusResponse,
            RefreshTokenResponse,
            ErrorBody
        )
    ),
    tags(
        (name = "GCal", description = "Guide calendars: conflicts, availability, events and tokens")
    )
)]
pub struct GcalApiDoc;
