//! Health check endpoint

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::db;
use crate::http::server::AppState;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    fn new(database_ok: bool) -> (StatusCode, Self) {
        let (code, status, database) = if database_ok {
            (StatusCode::OK, "ok", "ok")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
        };
        (
            code,
            Self {
                status,
                database,
                version: env!("CARGO_PKG_VERSION"),
            },
        )
    }
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = match db::pool::probe(&state.pool, PROBE_TIMEOUT).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "health probe failed");
            false
        }
    };
    let (code, body) = HealthResponse::new(database_ok);
    (code, Json(body))
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
