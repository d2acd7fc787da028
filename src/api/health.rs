//! Liveness and readiness probes

use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub status: String,
    pub strategy: String,
    pub missing_credentials: Vec<String>,
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /ready: credentials for the configured strategy are present.
///
/// Does not contact the provider; `testSendEmail` does that.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let mail = &state.config.mail;
    let missing: Vec<String> = mail
        .missing_credentials()
        .into_iter()
        .map(str::to_string)
        .collect();

    let status = if missing.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = ReadinessResponse {
        status: if missing.is_empty() { "ready" } else { "not_ready" }.to_string(),
        strategy: mail.strategy.to_string(),
        missing_credentials: missing,
    };

    (status, Json(body))
}
