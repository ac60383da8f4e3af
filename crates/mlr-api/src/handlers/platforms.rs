//! Platform registry and URL inspection handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mlr_models::{PlatformEntry, UrlInspection};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Body carrying a single user-pasted URL.
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct PlatformsResponse {
    pub platforms: Vec<PlatformEntry>,
}

/// List registered platforms in match order.
pub async fn list_platforms(State(state): State<AppState>) -> Json<PlatformsResponse> {
    Json(PlatformsResponse {
        platforms: state.classifier.registry().entries().to_vec(),
    })
}

/// Validate, normalize and classify a URL. Invalid URLs are reported in the
/// body, not as an error status.
pub async fn inspect_url(
    State(state): State<AppState>,
    body: Result<Json<UrlRequest>, JsonRejection>,
) -> ApiResult<Json<UrlInspection>> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let inspection = state.classifier.inspect(&request.url);
    metrics::record_classification(if inspection.valid {
        inspection.classification.label()
    } else {
        "invalid"
    });

    Ok(Json(inspection))
}
