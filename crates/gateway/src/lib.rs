//! HTTP gateway for Atlas.
//!
//! Serves the embedded single-page research UI and a small JSON API around
//! the pipeline's single entry point:
//!
//! - `GET  /`              — the research form
//! - `GET  /health`        — liveness check
//! - `GET  /api/status`    — configuration status (credential presence only)
//! - `POST /api/research`  — run the pipeline for one question
//!
//! Built on Axum. The submit handler catches pipeline errors and returns
//! them as a JSON error body — a failed run never takes the server down.

pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use atlas_config::AppConfig;
use atlas_pipeline::Pipeline;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub pipeline: Pipeline,
    pub status: ConfigStatus,
}

/// What the UI may know about the configuration: presence booleans and the
/// model name, never the credentials themselves.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigStatus {
    pub model: String,
    pub api_key_configured: bool,
    pub search_enabled: bool,
}

impl ConfigStatus {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            api_key_configured: config.has_api_key(),
            search_enabled: config.search_enabled(),
        }
    }
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/status", get(status_handler))
        .route("/api/research", post(research_handler))
        .with_state(state)
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// Builds the pipeline once from the given config and shares it across
/// requests; per-request state (question, report) lives only in the browser.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let status = ConfigStatus::from_config(&config);
    let pipeline = Pipeline::from_config(&config)?;

    let state = Arc::new(GatewayState { pipeline, status });
    let router = build_router(state);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    info!(%addr, "Gateway listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn status_handler(State(state): State<SharedState>) -> Json<ConfigStatus> {
    Json(state.status.clone())
}

#[derive(Debug, Deserialize)]
struct ResearchRequest {
    question: String,
}

#[derive(Serialize)]
struct ResearchResponse {
    question: String,
    subquestions: Vec<String>,
    report: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    detail: String,
}

async fn research_handler(
    State(state): State<SharedState>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(question_chars = request.question.len(), "Research request received");

    match state.pipeline.run(&request.question).await {
        Ok(result) => Ok(Json(ResearchResponse {
            question: result.question,
            subquestions: result.subquestions,
            report: result.report,
        })),
        Err(e) => {
            error!(error = %e, "Pipeline run failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                    detail: format!("{e:?}"),
                }),
            ))
        }
    }
}
