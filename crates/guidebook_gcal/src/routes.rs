// --- File: crates/guidebook_gcal/src/routes.rs ---

use crate::handlers::{
    check_conflicts_handler, create_event_handler, delete_event_handler,
    guides_availability_handler, refresh_token_handler, token_status_handler,
    update_event_handler,
};
use crate::service::GcalState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

/// Calendar routes that browser clients may call, relative to the `/api`
/// prefix the backend nests them under.
pub fn public_routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route(
            "/gcal/guides/{guide_id}/conflicts",
            get(check_conflicts_handler),
        )
        .route("/gcal/availability", get(guides_availability_handler))
        .route("/gcal/events", post(create_event_handler))
        .route(
            "/gcal/events/{event_id}",
            patch(update_event_handler).delete(delete_event_handler),
        )
        .route("/gcal/token/{guide_id}", get(token_status_handler))
        .with_state(state)
}

/// Routes that hand out live Google access tokens. The backend mounts these
/// outside its CORS layer.
pub fn credential_routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/gcal/token/{guide_id}/refresh", post(refresh_token_handler))
        .with_state(state)
}

/// Every calendar route.
pub fn routes(state: Arc<GcalState>) -> Router {
    public_routes(state.clone()).merge(credential_routes(state))
}
