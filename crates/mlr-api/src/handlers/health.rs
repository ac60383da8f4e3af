//! Health check handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub platforms: usize,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub metadata_api: CheckStatus,
    pub payment_gateway: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckStatus {
    fn from_configured(configured: bool, missing: &str) -> Self {
        if configured {
            Self {
                status: "ok".to_string(),
                error: None,
            }
        } else {
            Self {
                status: "error".to_string(),
                error: Some(format!("{} is not set", missing)),
            }
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Readiness check endpoint (readiness probe).
///
/// Reports whether both external collaborators have credentials. No
/// outbound calls are made.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let checks = ReadinessChecks {
        metadata_api: CheckStatus::from_configured(
            state.metadata.config().is_configured(),
            "RAPIDAPI_KEY",
        ),
        payment_gateway: CheckStatus::from_configured(
            state.payments.config().is_configured(),
            "FLUTTERWAVE_SECRET_KEY",
        ),
    };

    let all_ok = checks.metadata_api.is_ok() && checks.payment_gateway.is_ok();
    let response = ReadinessResponse {
        status: if all_ok { "ready" } else { "degraded" }.to_string(),
        platforms: state.classifier.registry().len(),
        checks,
    };

    if all_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
