//! Support-payment request and response models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Checkout currency.
pub const SUPPORT_CURRENCY: &str = "NGN";

/// Smallest accepted contribution: 500 NGN, in kobo.
pub const MIN_SUPPORT_AMOUNT_MINOR: u64 = 50_000;

/// Request to start a support payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, JsonSchema)]
pub struct SupportPaymentRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    /// Amount in minor units (kobo).
    #[validate(range(min = 50_000, message = "Amount must be at least 500 NGN"))]
    pub amount_minor_units: u64,
}

impl SupportPaymentRequest {
    /// Amount in major units (naira), as the gateway expects it.
    pub fn amount_major(&self) -> f64 {
        self.amount_minor_units as f64 / 100.0
    }

    /// First validation message, for a single-line client error.
    ///
    /// Fields are checked in a fixed order (email, then amount).
    pub fn validation_message(&self) -> Option<String> {
        let errors = self.validate().err()?;
        let fields = errors.field_errors();
        let message = ["email", "amount_minor_units"]
            .iter()
            .filter_map(|field| fields.get(*field))
            .flat_map(|errs| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Invalid payment request".to_string());
        Some(message)
    }
}

/// Hosted checkout link returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PaymentLink {
    pub link: String,
    pub tx_ref: String,
}
