//! Media metadata API client (RapidAPI social-media downloader).

use std::time::Duration;

use mlr_models::MediaInfo;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Upstream error bodies are truncated to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Configuration for the metadata client.
#[derive(Debug, Clone)]
pub struct MetadataClientConfig {
    /// Base URL of the metadata API
    pub base_url: String,
    /// Path of the lookup endpoint
    pub endpoint_path: String,
    /// RapidAPI key; requests are refused when absent
    pub api_key: Option<String>,
    /// Value of the `X-RapidAPI-Host` header
    pub api_host: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for MetadataClientConfig {
    fn default() -> Self {
        let base_url = "https://social-media-video-downloader.p.rapidapi.com".to_string();
        Self {
            api_host: host_of(&base_url),
            base_url,
            endpoint_path: "/api/getSocialVideo".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl MetadataClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("METADATA_API_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        Self {
            api_host: std::env::var("RAPIDAPI_HOST").unwrap_or_else(|_| host_of(&base_url)),
            endpoint_path: std::env::var("METADATA_API_PATH").unwrap_or(defaults.endpoint_path),
            api_key: std::env::var("RAPIDAPI_KEY").ok().filter(|k| !k.trim().is_empty()),
            timeout: Duration::from_secs(
                std::env::var("METADATA_API_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            base_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn host_of(base_url: &str) -> String {
    url::Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Client for the third-party metadata lookup.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http: Client,
    config: MetadataClientConfig,
}

impl MetadataClient {
    /// Create a new metadata client.
    pub fn new(config: MetadataClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(MetadataClientConfig::from_env())
    }

    pub fn config(&self) -> &MetadataClientConfig {
        &self.config
    }

    /// Look up media metadata for `media_url`.
    ///
    /// Single attempt; any failure is returned without a partial payload.
    pub async fn fetch(&self, media_url: &str) -> ClientResult<MediaInfo> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ClientError::not_configured("RAPIDAPI_KEY is not set"))?;

        let endpoint = format!("{}{}", self.config.base_url, self.config.endpoint_path);
        debug!(endpoint = %endpoint, "Requesting media metadata");

        let response = self
            .http
            .get(&endpoint)
            .query(&[("url", media_url)])
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", &self.config.api_host)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Metadata API returned an error status");
            return Err(ClientError::UpstreamStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = response.bytes().await?;
        let info: MediaInfo = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("metadata payload: {}", e)))?;

        if info.is_empty() {
            return Err(ClientError::InvalidResponse(
                "metadata payload has no title, thumbnail or formats".to_string(),
            ));
        }

        Ok(info)
    }
}
