//! Health check endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use corral_core::discovery::ServiceInstance;
use serde_json::{Value, json};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .route("/health/instance", get(instance))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn ready(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ready",
        "jobs": state.store.job_count(),
    }))
}

async fn instance(State(state): State<AppState>) -> Json<ServiceInstance> {
    Json(state.instance.as_ref().clone())
}
