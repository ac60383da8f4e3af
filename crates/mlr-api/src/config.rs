//! API configuration.

use std::time::Duration;

use mlr_models::{PlatformRegistry, RegistryResult};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second (per client IP)
    pub rate_limit_rps: u32,
    /// Take the client IP from `X-Forwarded-For`/`X-Real-IP` (behind a proxy)
    pub trust_proxy_headers: bool,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Refuse metadata lookups for URLs that match no registered platform
    pub require_known_platform: bool,
    /// Extra platforms appended after the built-in ones (`name=a.com|b.com;...`)
    pub extra_platforms: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            trust_proxy_headers: false,
            request_timeout: Duration::from_secs(30),
            max_body_size: 64 * 1024,
            environment: "development".to_string(),
            require_known_platform: false,
            extra_platforms: None,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .or_else(|_| std::env::var("PORT"))
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            trust_proxy_headers: std::env::var("TRUST_PROXY_HEADERS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(64 * 1024),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            require_known_platform: std::env::var("REQUIRE_KNOWN_PLATFORM")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            extra_platforms: std::env::var("EXTRA_PLATFORMS")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        }
    }

    /// Build the platform registry: built-ins followed by `extra_platforms`.
    pub fn platform_registry(&self) -> RegistryResult<PlatformRegistry> {
        let builder = PlatformRegistry::builder_with_defaults();
        match &self.extra_platforms {
            Some(spec) => builder.register_from_spec(spec).build(),
            None => builder.build(),
        }
    }
}

/// `true`/`1`/`yes`/`on`, case-insensitive.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
