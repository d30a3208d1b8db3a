// --- File: crates/services/guidebook_backend/src/app.rs ---
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use guidebook_common::{log_result, GuidebookError};
use guidebook_config::AppConfig;
use guidebook_db::{DbClient, GuideCredentialStore, SqlGuideCredentialStore};
use guidebook_gcal::{credential_routes, public_routes, GcalState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

struct HealthState {
    db: DbClient,
}

#[axum::debug_handler]
async fn health_handler(State(state): State<Arc<HealthState>>) -> (StatusCode, Json<Value>) {
    if state.db.is_healthy().await {
        (StatusCode::OK, Json(json!({"status": "ok", "database": "up"})))
    } else {
        warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "degraded", "database": "down"})),
        )
    }
}

/// Build the full application router: `/api/health` plus the calendar routes
/// under `/api/gcal` when `use_gcal` is set.
///
/// The token refresh route is merged after the CORS layer, so browsers on
/// other origins cannot read the access token it returns.
pub async fn build_app(config: &AppConfig) -> Result<Router, GuidebookError> {
    let db = DbClient::new(config).await?;
    let store = SqlGuideCredentialStore::new(db.clone());
    log_result(
        store.init_schema().await,
        "Guide credential schema ready",
        "Failed to initialize guide credential schema",
    )?;

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .with_state(Arc::new(HealthState { db }));

    if config.use_gcal {
        let gcal_state = Arc::new(GcalState::from_config(config, Arc::new(store))?);
        router = router
            .merge(public_routes(gcal_state.clone()))
            .layer(CorsLayer::permissive())
            .merge(credential_routes(gcal_state));
        info!("Google Calendar routes mounted under /api/gcal");
    } else {
        router = router.layer(CorsLayer::permissive());
        warn!("use_gcal is disabled, calendar routes are not mounted");
    }

    #[allow(unused_mut)] // mutated only with the openapi feature
    let mut app = Router::new().nest("/api", router);

    #[cfg(feature = "openapi")]
    {
        use guidebook_gcal::doc::GcalApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Guidebook API",
                version = "0.1.0",
                description = "Guide calendar availability, conflicts and event management",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(GcalApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");
        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    Ok(app.layer(TraceLayer::new_for_http()))
}
