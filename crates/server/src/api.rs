//! HTTP API: recommendation endpoint, health checks and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use foodlens_lib::{
    health::HealthRegistry,
    observability::PredictorMetrics,
    PredictionRequest, PredictorError, Recommender,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub health_registry: HealthRegistry,
    pub metrics: PredictorMetrics,
}

impl AppState {
    pub fn new(
        recommender: Arc<Recommender>,
        health_registry: HealthRegistry,
        metrics: PredictorMetrics,
    ) -> Self {
        Self {
            recommender,
            health_registry,
            metrics,
        }
    }
}

/// Errors surfaced by the recommend endpoint
#[derive(Debug)]
pub enum ApiError {
    Predictor(PredictorError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Predictor(e) => {
                let status = match e {
                    PredictorError::DataUnavailable { .. } | PredictorError::EmptyTrainingSet => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                    PredictorError::MalformedRecord { .. } | PredictorError::InvalidConfig(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.to_string())
            }
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Recommend a food quantity for a planned event
async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recommender = state.recommender.clone();
    let outcome = tokio::task::spawn_blocking(move || recommender.recommend(&request))
        .await
        .map_err(|e| {
            error!(error = %e, "Recommendation task failed");
            ApiError::Internal(format!("recommendation task failed: {}", e))
        })?;

    state.health_registry.record_recommendation(&outcome).await;

    outcome.map(Json).map_err(ApiError::Predictor)
}

/// Liveness: 200 while every component is at least degraded
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;
    (status_for(health.status.is_operational()), Json(health))
}

/// Readiness: 200 once started and no component is unhealthy
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;
    (status_for(readiness.ready), Json(readiness))
}

fn status_for(ok: bool) -> StatusCode {
    if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Prometheus metrics endpoint
async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.encode_text() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => ApiError::Internal(format!("failed to encode metrics: {}", e)).into_response(),
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/recommend", post(recommend))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
