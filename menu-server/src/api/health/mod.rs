//! Health check routes
//!
//! | Path | Method | Meaning | Auth |
//! |------|--------|---------|------|
//! | /health | GET | Liveness | none |
//! | /health/detailed | GET | Storage checks and counters | none |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::Instant;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    catalog: CheckResult,
    orders: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    fn ok(started: Instant, stats: impl Serialize) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(started.elapsed().as_millis() as u64),
            stats: serde_json::to_value(stats).ok(),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            stats: None,
            message: Some(message.into()),
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let started = Instant::now();
    let catalog = match state.storage.get_stats() {
        Ok(stats) => CheckResult::ok(started, stats),
        Err(e) => CheckResult::error(format!("Catalog storage error: {e}")),
    };

    let started = Instant::now();
    let orders = match state.orders.storage().get_stats() {
        Ok(stats) => CheckResult::ok(started, stats),
        Err(e) => CheckResult::error(format!("Order storage error: {e}")),
    };

    let all_ok = catalog.status == "ok" && orders.status == "ok";

    Json(DetailedHealthResponse {
        status: if all_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        checks: HealthChecks { catalog, orders },
    })
}
