//! Platform registry: an ordered, immutable table mapping platform
//! identifiers to the domain fragments that identify them.
//!
//! The registry is built once at startup through [`PlatformRegistryBuilder`]
//! and never mutated afterwards, so it can be shared across threads without
//! locking.

use std::collections::HashSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a registered content platform (e.g. `youtube`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PlatformId(String);

impl PlatformId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlatformId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<&str> for PlatformId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A single platform and the domain fragments that identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PlatformEntry {
    pub platform: PlatformId,
    pub domain_suffixes: Vec<String>,
}

/// Configuration errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Platform '{0}' is registered more than once")]
    DuplicatePlatform(String),

    #[error("Platform identifier cannot be empty")]
    EmptyPlatform,

    #[error("Platform '{0}' has no domain suffixes")]
    NoSuffixes(String),

    #[error("Platform '{platform}' has invalid domain suffix '{suffix}'")]
    InvalidSuffix { platform: String, suffix: String },

    #[error("Invalid platform spec '{0}' (expected name=suffix1|suffix2)")]
    InvalidSpec(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Ordered, immutable platform table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PlatformRegistry {
    entries: Vec<PlatformEntry>,
}

impl PlatformRegistry {
    pub fn builder() -> PlatformRegistryBuilder {
        PlatformRegistryBuilder::default()
    }

    /// Builder pre-populated with the built-in platforms, for appending
    /// extra entries before `build()`.
    pub fn builder_with_defaults() -> PlatformRegistryBuilder {
        PlatformRegistryBuilder::default()
            .register_platform("youtube", ["youtube.com", "youtu.be"])
            .register_platform("facebook", ["facebook.com", "fb.com"])
            .register_platform("instagram", ["instagram.com"])
            .register_platform("tiktok", ["tiktok.com"])
            .register_platform("spotify", ["spotify.com"])
            .register_platform("netflix", ["netflix.com"])
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[PlatformEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, platform: &str) -> bool {
        self.entries.iter().any(|e| e.platform.as_str() == platform)
    }

    /// First entry (in registration order) with a suffix contained in
    /// `host`. `host` must already be lowercased.
    ///
    /// Matching is by substring, not strict suffix: `m.youtube.com` matches
    /// `youtube.com`, and so does `notyoutube.com.evil.net`.
    pub fn find_match(&self, host: &str) -> Option<&PlatformEntry> {
        self.entries
            .iter()
            .find(|entry| entry.domain_suffixes.iter().any(|s| host.contains(s.as_str())))
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        // The built-in table is statically known to be valid.
        Self {
            entries: PlatformRegistry::builder_with_defaults().pending,
        }
    }
}

/// Collects registrations; all validation happens in [`build`](Self::build)
/// so that a bad configuration fails once, at startup.
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistryBuilder {
    pending: Vec<PlatformEntry>,
    spec_errors: Vec<RegistryError>,
}

impl PlatformRegistryBuilder {
    /// Append a platform. Suffixes are trimmed and lowercased.
    pub fn register_platform<I, S>(mut self, platform: impl Into<String>, domain_suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let platform: String = platform.into();
        let domain_suffixes = domain_suffixes
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_lowercase())
            .collect();

        self.pending.push(PlatformEntry {
            platform: PlatformId::new(platform.trim()),
            domain_suffixes,
        });
        self
    }

    /// Append platforms from a `name=suffix1|suffix2;name2=suffix3` string.
    ///
    /// Blank segments are skipped. Malformed segments are reported by
    /// `build()`.
    pub fn register_from_spec(mut self, spec: &str) -> Self {
        for segment in spec.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            match segment.split_once('=') {
                Some((name, suffixes)) if !suffixes.trim().is_empty() => {
                    self = self.register_platform(name, suffixes.split('|'));
                }
                _ => self.spec_errors.push(RegistryError::InvalidSpec(segment.to_string())),
            }
        }
        self
    }

    /// Validate every registration and freeze the table.
    pub fn build(self) -> RegistryResult<PlatformRegistry> {
        if let Some(err) = self.spec_errors.into_iter().next() {
            return Err(err);
        }

        let mut seen = HashSet::new();
        for entry in &self.pending {
            let name = entry.platform.as_str();
            if name.is_empty() {
                return Err(RegistryError::EmptyPlatform);
            }
            if !seen.insert(name) {
                return Err(RegistryError::DuplicatePlatform(name.to_string()));
            }
            if entry.domain_suffixes.is_empty() {
                return Err(RegistryError::NoSuffixes(name.to_string()));
            }
            if let Some(bad) = entry.domain_suffixes.iter().find(|s| !is_valid_suffix(s)) {
                return Err(RegistryError::InvalidSuffix {
                    platform: name.to_string(),
                    suffix: bad.clone(),
                });
            }
        }

        Ok(PlatformRegistry {
            entries: self.pending,
        })
    }
}

fn is_valid_suffix(suffix: &str) -> bool {
    !suffix.is_empty()
        && !suffix.contains("://")
        && !suffix.contains('/')
        && !suffix.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order() {
        let registry = PlatformRegistry::default();
        let names: Vec<&str> = registry.entries().iter().map(|e| e.platform.as_str()).collect();
        assert_eq!(
            names,
            ["youtube", "facebook", "instagram", "tiktok", "spotify", "netflix"]
        );
        assert_eq!(registry, PlatformRegistry::builder_with_defaults().build().unwrap());
    }

    #[test]
    fn test_duplicate_platform_rejected() {
        let result = PlatformRegistry::builder()
            .register_platform("youtube", ["youtube.com"])
            .register_platform("youtube", ["youtu.be"])
            .build();
        assert_eq!(result, Err(RegistryError::DuplicatePlatform("youtube".to_string())));
    }

    #[test]
    fn test_duplicate_against_defaults_rejected() {
        let result = PlatformRegistry::builder_with_defaults()
            .register_platform("tiktok", ["vm.tiktok.com"])
            .build();
        assert!(matches!(result, Err(RegistryError::DuplicatePlatform(p)) if p == "tiktok"));
    }

    #[test]
    fn test_invalid_suffixes_rejected() {
        for bad in ["", "https://vimeo.com", "vimeo.com/video", "vim eo.com"] {
            let result = PlatformRegistry::builder()
                .register_platform("vimeo", [bad])
                .build();
            assert!(
                matches!(result, Err(RegistryError::InvalidSuffix { .. })),
                "suffix {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_empty_platform_and_no_suffixes() {
        let result = PlatformRegistry::builder()
            .register_platform("  ", ["a.com"])
            .build();
        assert_eq!(result, Err(RegistryError::EmptyPlatform));

        let result = PlatformRegistry::builder()
            .register_platform("vimeo", Vec::<String>::new())
            .build();
        assert_eq!(result, Err(RegistryError::NoSuffixes("vimeo".to_string())));
    }

    #[test]
    fn test_suffixes_are_lowercased() {
        let registry = PlatformRegistry::builder()
            .register_platform("vimeo", [" Vimeo.COM "])
            .build()
            .unwrap();
        assert_eq!(registry.entries()[0].domain_suffixes, vec!["vimeo.com"]);
    }

    #[test]
    fn test_register_from_spec() {
        let registry = PlatformRegistry::builder_with_defaults()
            .register_from_spec("vimeo=vimeo.com|player.vimeo.com; twitch=twitch.tv;")
            .build()
            .unwrap();
        assert_eq!(registry.len(), 8);
        assert!(registry.contains("vimeo"));
        assert_eq!(registry.entries()[7].platform, "twitch");
        assert_eq!(
            registry.entries()[6].domain_suffixes,
            vec!["vimeo.com", "player.vimeo.com"]
        );
    }

    #[test]
    fn test_register_from_spec_malformed() {
        let result = PlatformRegistry::builder().register_from_spec("vimeo").build();
        assert_eq!(result, Err(RegistryError::InvalidSpec("vimeo".to_string())));

        let result = PlatformRegistry::builder().register_from_spec("vimeo=").build();
        assert_eq!(result, Err(RegistryError::InvalidSpec("vimeo=".to_string())));
    }

    #[test]
    fn test_find_match_substring_semantics() {
        let registry = PlatformRegistry::default();
        assert_eq!(
            registry.find_match("m.youtube.com").map(|e| e.platform.as_str()),
            Some("youtube")
        );
        // Substring match is accepted imprecision.
        assert_eq!(
            registry.find_match("notyoutube.com.example").map(|e| e.platform.as_str()),
            Some("youtube")
        );
        assert!(registry.find_match("example.org").is_none());
    }
}
