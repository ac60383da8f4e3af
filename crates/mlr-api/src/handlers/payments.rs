//! Support payment handler.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use mlr_client::ClientError;
use mlr_models::{PaymentLink, SupportPaymentRequest};
use tracing::warn;

use crate::error::{ApiError, ApiResult, PAYMENT_FAILURE_MESSAGE};
use crate::metrics;
use crate::state::AppState;

/// Start a support payment and return the hosted checkout link.
pub async fn create_payment(
    State(state): State<AppState>,
    body: Result<Json<SupportPaymentRequest>, JsonRejection>,
) -> ApiResult<Json<PaymentLink>> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if let Some(message) = request.validation_message() {
        return Err(ApiError::bad_request(message));
    }

    let start = Instant::now();
    let result = state.payments.initialize(&request).await;
    let elapsed = start.elapsed().as_secs_f64();

    match result {
        Ok(link) => {
            metrics::record_upstream_call("payment", "ok", elapsed);
            Ok(Json(link))
        }
        Err(ClientError::InvalidRequest(message)) => Err(ApiError::bad_request(message)),
        Err(e) => {
            metrics::record_upstream_call("payment", e.kind(), elapsed);
            warn!(error = %e, "Payment initialization failed");
            Err(ApiError::upstream(PAYMENT_FAILURE_MESSAGE, e.to_string()))
        }
    }
}
