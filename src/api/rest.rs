use axum::{
    Router,
    routing::get,
    extract::{State, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::error::Error;
use crate::interfaces::sample_store::SampleStore;
use crate::observability::metrics;
use crate::types::sample::Sample;

pub struct ApiState {
    pub store: Arc<dyn SampleStore>,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(prometheus_metrics))
        .route("/fees", get(list_fees))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_fees(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Sample>>, Error> {
    let samples = state.store.list_newest_first().await?;
    Ok(Json(samples))
}

async fn prometheus_metrics() -> Result<String, StatusCode> {
    metrics::render().map_err(|e| {
        tracing::error!("Failed to render metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
