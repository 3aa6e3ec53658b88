use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use notifier::{NotificationService, PipelineError};
use prometheus::Encoder;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::error::ApiResult;

pub struct ApiState {
    pub service: NotificationService,
    pub webhook_path: String,
    pub metrics_path: String,
}

pub fn build_router(state: Arc<ApiState>) -> Router {
    let webhook_path = state.webhook_path.clone();
    let metrics_path = state.metrics_path.clone();
    Router::new()
        .route("/health/readiness", get(healthz))
        .route("/health/liveness", get(healthz))
        .route(&metrics_path, get(metrics))
        .route(&webhook_path, post(receive_webhook))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Webhook sources get `200` whatever happens; failures are only logged.
#[instrument(skip_all, fields(bytes = body.len()))]
async fn receive_webhook(State(state): State<Arc<ApiState>>, body: Bytes) -> StatusCode {
    match state.service.handle(&body).await {
        Ok(report) => info!(
            kind = report.kind,
            issue = report.issue_number,
            recipients = report.recipients,
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed,
            "webhook event processed"
        ),
        Err(PipelineError::Parse(err)) => {
            warn!(error = %err, "dropping unsupported or malformed webhook body")
        }
        Err(err) => error!(error = %err, "dropping webhook event"),
    }
    StatusCode::OK
}

async fn metrics() -> ApiResult<impl IntoResponse> {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    let content_type = encoder.format_type().to_string();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], buffer))
}
