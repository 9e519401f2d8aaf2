//! Callback ingestion endpoint.
//!
//! The worker retries on 5xx, so persistence failures must surface as 500.
//! An unlinkable callback is acknowledged with 202: retrying it would not
//! make it resolvable, and the payload is already in the audit trail.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use crate::domain::models::{CallbackPayload, CallbackResolution};
use crate::infrastructure::database::{
    BatchRepositoryImpl, CallbackRepositoryImpl, SlotRepositoryImpl,
};
use crate::services::CallbackReconciler;

pub type SharedReconciler =
    Arc<CallbackReconciler<SlotRepositoryImpl, BatchRepositoryImpl, CallbackRepositoryImpl>>;

pub fn router(reconciler: SharedReconciler) -> Router {
    Router::new()
        .route("/callbacks/runs", post(ingest_callback))
        .route("/health", get(health))
        .with_state(reconciler)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn ingest_callback(
    State(reconciler): State<SharedReconciler>,
    Json(payload): Json<CallbackPayload>,
) -> Response {
    match reconciler.ingest(&payload).await {
        Ok(outcome) => {
            let code = match outcome.resolution {
                CallbackResolution::Unresolved => StatusCode::ACCEPTED,
                _ => StatusCode::OK,
            };
            let body = json!({
                "resolution": outcome.resolution,
                "batchId": outcome.batch_id,
                "batchCompleted": outcome.batch_completed,
            });
            (code, Json(body)).into_response()
        }
        Err(err) => {
            error!(%err, run_ref = %payload.run_ref, "callback ingestion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}
