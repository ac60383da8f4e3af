//! Platform classification of user-supplied URLs.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::platform::{PlatformId, PlatformRegistry};
use crate::validation::{normalize_url, parse_absolute_url};

/// Outcome of classifying a URL. Always one of the two variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    Known { platform: PlatformId },
    Unknown,
}

impl Classification {
    pub fn known(platform: impl Into<String>) -> Self {
        Self::Known {
            platform: PlatformId::new(platform),
        }
    }

    pub fn platform(&self) -> Option<&PlatformId> {
        match self {
            Classification::Known { platform } => Some(platform),
            Classification::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Classification::Known { .. })
    }

    /// Label used for logs and metrics.
    pub fn label(&self) -> &str {
        match self {
            Classification::Known { platform } => platform.as_str(),
            Classification::Unknown => "unknown",
        }
    }
}

/// Validation, normalization and classification of a single input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct UrlInspection {
    pub input: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub classification: Classification,
}

/// Maps URLs to platforms using an owned, immutable registry.
///
/// Cloning is cheap; clones share the same registry.
#[derive(Debug, Clone)]
pub struct PlatformClassifier {
    registry: Arc<PlatformRegistry>,
}

impl PlatformClassifier {
    pub fn new(registry: PlatformRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// Classify a raw URL string. Unparsable input yields `Unknown`.
    pub fn classify(&self, input: &str) -> Classification {
        match parse_absolute_url(input) {
            Ok(url) => url
                .host_str()
                .map(|host| self.classify_host(host))
                .unwrap_or(Classification::Unknown),
            Err(_) => Classification::Unknown,
        }
    }

    /// Classify an already-extracted host.
    pub fn classify_host(&self, host: &str) -> Classification {
        let host = host.to_ascii_lowercase();
        match self.registry.find_match(&host) {
            Some(entry) => Classification::Known {
                platform: entry.platform.clone(),
            },
            None => Classification::Unknown,
        }
    }

    /// Validate, normalize and classify `input` in one pass.
    pub fn inspect(&self, input: &str) -> UrlInspection {
        let parsed = parse_absolute_url(input).ok();
        let host = parsed
            .as_ref()
            .and_then(|u| u.host_str())
            .map(|h| h.to_ascii_lowercase());
        let classification = host
            .as_deref()
            .map(|h| self.classify_host(h))
            .unwrap_or(Classification::Unknown);

        UrlInspection {
            input: input.to_string(),
            valid: parsed.is_some(),
            normalized_url: normalize_url(input),
            host,
            classification,
        }
    }
}

impl Default for PlatformClassifier {
    fn default() -> Self {
        Self::new(PlatformRegistry::default())
    }
}
