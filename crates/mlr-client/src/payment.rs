//! Payment gateway client (Flutterwave standard checkout).

use std::time::Duration;

use chrono::Utc;
use mlr_models::{PaymentLink, SupportPaymentRequest, SUPPORT_CURRENCY};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

/// Configuration for the payment client.
#[derive(Debug, Clone)]
pub struct PaymentClientConfig {
    /// Base URL of the gateway API
    pub base_url: String,
    /// Secret key used as bearer token; requests are refused when absent
    pub secret_key: Option<String>,
    /// Where the gateway sends the customer after checkout
    pub redirect_url: String,
    /// Checkout currency
    pub currency: String,
    /// Checkout page title
    pub title: String,
    /// Checkout page description
    pub description: String,
    /// Checkout page logo
    pub logo: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for PaymentClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.flutterwave.com".to_string(),
            secret_key: None,
            redirect_url: "http://localhost:8000/thank-you".to_string(),
            currency: SUPPORT_CURRENCY.to_string(),
            title: "Support Empire Media Downloader".to_string(),
            description: "Thank you for your support!".to_string(),
            logo: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl PaymentClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("PAYMENT_API_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            secret_key: std::env::var("FLUTTERWAVE_SECRET_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            redirect_url: std::env::var("PAYMENT_REDIRECT_URL").unwrap_or(defaults.redirect_url),
            currency: defaults.currency,
            title: std::env::var("PAYMENT_TITLE").unwrap_or(defaults.title),
            description: std::env::var("PAYMENT_DESCRIPTION").unwrap_or(defaults.description),
            logo: std::env::var("PAYMENT_LOGO_URL").ok(),
            timeout: Duration::from_secs(
                std::env::var("PAYMENT_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }
}

#[derive(Debug, Serialize)]
struct CheckoutRequest<'a> {
    tx_ref: &'a str,
    amount: f64,
    currency: &'a str,
    redirect_url: &'a str,
    customer: Customer<'a>,
    customizations: Customizations<'a>,
}

#[derive(Debug, Serialize)]
struct Customer<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Customizations<'a> {
    title: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CheckoutResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<CheckoutData>,
}

#[derive(Debug, Deserialize)]
struct CheckoutData {
    link: Option<String>,
}

/// Client for creating hosted checkout links.
#[derive(Debug, Clone)]
pub struct PaymentClient {
    http: Client,
    config: PaymentClientConfig,
}

impl PaymentClient {
    /// Create a new payment client.
    pub fn new(config: PaymentClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(PaymentClientConfig::from_env())
    }

    pub fn config(&self) -> &PaymentClientConfig {
        &self.config
    }

    /// Create a checkout session and return its hosted link.
    pub async fn initialize(&self, request: &SupportPaymentRequest) -> ClientResult<PaymentLink> {
        if let Some(message) = request.validation_message() {
            return Err(ClientError::InvalidRequest(message));
        }

        let secret_key = self
            .config
            .secret_key
            .as_deref()
            .ok_or_else(|| ClientError::not_configured("FLUTTERWAVE_SECRET_KEY is not set"))?;

        let tx_ref = new_tx_ref();
        let body = CheckoutRequest {
            tx_ref: &tx_ref,
            amount: request.amount_major(),
            currency: &self.config.currency,
            redirect_url: &self.config.redirect_url,
            customer: Customer {
                email: &request.email,
            },
            customizations: Customizations {
                title: &self.config.title,
                description: &self.config.description,
                logo: self.config.logo.as_deref(),
            },
        };

        let response = self
            .http
            .post(format!("{}/v3/payments", self.config.base_url))
            .bearer_auth(secret_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let parsed: Option<CheckoutResponse> = serde_json::from_slice(&bytes).ok();

        if !status.is_success() {
            warn!(status = %status, tx_ref = %tx_ref, "Payment gateway returned an error status");
            return Err(ClientError::UpstreamStatus {
                status: status.as_u16(),
                body: parsed
                    .and_then(|r| r.message)
                    .unwrap_or_else(|| String::from_utf8_lossy(&bytes).chars().take(512).collect()),
            });
        }

        let parsed = parsed.ok_or_else(|| {
            ClientError::InvalidResponse("payment gateway response is not valid JSON".to_string())
        })?;

        match (parsed.status.as_str(), parsed.data.and_then(|d| d.link)) {
            ("success", Some(link)) => {
                info!(tx_ref = %tx_ref, "Payment checkout created");
                Ok(PaymentLink { link, tx_ref })
            }
            _ => Err(ClientError::Rejected(
                parsed
                    .message
                    .unwrap_or_else(|| "Payment initialization failed".to_string()),
            )),
        }
    }
}

/// Transaction reference: `emp-<unix millis>-<8 hex>`.
fn new_tx_ref() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("emp-{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> PaymentClientConfig {
        PaymentClientConfig {
            base_url: server.uri(),
            secret_key: Some("FLWSECK_TEST".to_string()),
            redirect_url: "https://media.example.com/thank-you".to_string(),
            ..PaymentClientConfig::default()
        }
    }

    fn support(amount: u64) -> SupportPaymentRequest {
        SupportPaymentRequest {
            email: "fan@example.com".to_string(),
            amount_minor_units: amount,
        }
    }

    #[test]
    fn test_tx_ref_format() {
        let tx_ref = new_tx_ref();
        let parts: Vec<&str> = tx_ref.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "emp");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert_ne!(new_tx_ref(), new_tx_ref());
    }

    #[tokio::test]
    async fn test_initialize_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/payments"))
            .and(header("Authorization", "Bearer FLWSECK_TEST"))
            .and(body_partial_json(json!({
                "amount": 750.0,
                "currency": "NGN",
                "redirect_url": "https://media.example.com/thank-you",
                "customer": {"email": "fan@example.com"},
                "customizations": {"title": "Support Empire Media Downloader"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "Hosted Link",
                "data": {"link": "https://checkout.flutterwave.com/v3/hosted/pay/abc"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PaymentClient::new(config_for(&server)).unwrap();
        let link = client.initialize(&support(75_000)).await.unwrap();

        assert_eq!(link.link, "https://checkout.flutterwave.com/v3/hosted/pay/abc");
        assert!(link.tx_ref.starts_with("emp-"));
    }

    #[tokio::test]
    async fn test_initialize_rejected_without_link() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "message": "Invalid currency"
            })))
            .mount(&server)
            .await;

        let client = PaymentClient::new(config_for(&server)).unwrap();
        let err = client.initialize(&support(75_000)).await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected(ref m) if m == "Invalid currency"));
    }

    #[tokio::test]
    async fn test_initialize_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": "error",
                "message": "Invalid authorization key"
            })))
            .mount(&server)
            .await;

        let client = PaymentClient::new(config_for(&server)).unwrap();
        let err = client.initialize(&support(75_000)).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::UpstreamStatus { status: 401, ref body } if body == "Invalid authorization key"
        ));
    }

    #[tokio::test]
    async fn test_initialize_validates_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = PaymentClient::new(config_for(&server)).unwrap();
        let err = client.initialize(&support(10_000)).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_initialize_without_secret() {
        let server = MockServer::start().await;
        let mut config = config_for(&server);
        config.secret_key = None;

        let client = PaymentClient::new(config).unwrap();
        let err = client.initialize(&support(75_000)).await.unwrap_err();
        assert!(matches!(err, ClientError::NotConfigured(_)));
    }
}
