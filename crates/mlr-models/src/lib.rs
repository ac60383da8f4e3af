//! Shared models for the media link resolver.
//!
//! This crate provides:
//! - URL validation and normalization
//! - The platform registry and classifier
//! - Typed media metadata and payment models

pub mod classifier;
pub mod media;
pub mod payment;
pub mod platform;
pub mod validation;

// Re-export common types
pub use classifier::{Classification, PlatformClassifier, UrlInspection};
pub use media::{MediaFormat, MediaInfo};
pub use payment::{PaymentLink, SupportPaymentRequest, MIN_SUPPORT_AMOUNT_MINOR, SUPPORT_CURRENCY};
pub use platform::{
    PlatformEntry, PlatformId, PlatformRegistry, PlatformRegistryBuilder, RegistryError,
    RegistryResult,
};
pub use validation::{extract_host, is_valid_url, normalize_url, parse_absolute_url, UrlError};
