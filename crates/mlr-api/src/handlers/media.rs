//! Media metadata lookup handler.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mlr_models::{parse_absolute_url, Classification, MediaInfo};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult, METADATA_FAILURE_MESSAGE};
use crate::handlers::platforms::UrlRequest;
use crate::metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct VideoDetailsResponse {
    pub platform: Classification,
    pub media: MediaInfo,
}

/// Validate and classify the URL, then forward it to the metadata API.
pub async fn get_video_details(
    State(state): State<AppState>,
    body: Result<Json<UrlRequest>, JsonRejection>,
) -> ApiResult<Json<VideoDetailsResponse>> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let url = request.url.trim();

    let parsed = parse_absolute_url(url).map_err(|e| {
        metrics::record_classification("invalid");
        ApiError::bad_request(format!("Please enter a valid URL ({})", e))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::bad_request("Only http and https URLs are supported"));
    }

    let platform = state.classifier.classify(url);
    metrics::record_classification(platform.label());

    if state.config.require_known_platform && !platform.is_known() {
        let host = parsed.host_str().unwrap_or_default().to_string();
        return Err(ApiError::UnsupportedPlatform(host));
    }

    let start = Instant::now();
    let result = state.metadata.fetch(url).await;
    let elapsed = start.elapsed().as_secs_f64();

    match result {
        Ok(media) => {
            metrics::record_upstream_call("metadata", "ok", elapsed);
            info!(
                platform = %platform.label(),
                formats = media.formats.len(),
                "Fetched video details"
            );
            Ok(Json(VideoDetailsResponse { platform, media }))
        }
        Err(e) => {
            metrics::record_upstream_call("metadata", e.kind(), elapsed);
            warn!(platform = %platform.label(), error = %e, "Metadata lookup failed");
            Err(ApiError::upstream(METADATA_FAILURE_MESSAGE, e.to_string()))
        }
    }
}
