//! Clients for the external collaborators of the media link resolver.
//!
//! - [`MetadataClient`]: looks up media metadata for a pasted URL
//! - [`PaymentClient`]: creates hosted checkout links for support payments
//!
//! Both make a single attempt per call; callers decide what to show the user.

pub mod error;
pub mod metadata;
pub mod payment;

pub use error::{ClientError, ClientResult};
pub use metadata::{MetadataClient, MetadataClientConfig};
pub use payment::{PaymentClient, PaymentClientConfig};
