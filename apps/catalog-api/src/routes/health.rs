//! Health check handler.
//!
//! Reports liveness plus schema state for monitoring.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use catalog_db::migrations::migration_status;
use catalog_db::MigrationStatus;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub database: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migrations: Option<MigrationStatus>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
///
/// 200 when the pool answers and every embedded migration is applied,
/// 503 otherwise.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let database = state.db.health_check().await;

    let migrations = if database {
        match migration_status(state.db.pool()).await {
            Ok(status) => Some(status),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read migration status");
                None
            }
        }
    } else {
        None
    };

    let healthy = database && migrations.is_some_and(|m| m.is_current());
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let report = HealthReport {
        status: if healthy { "ok" } else { "unavailable" },
        database,
        migrations,
    };

    (status, Json(report))
}
