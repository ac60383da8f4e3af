//! Application state.

use std::sync::Arc;

use anyhow::Context;
use mlr_client::{MetadataClient, MetadataClientConfig, PaymentClient, PaymentClientConfig};
use mlr_models::PlatformClassifier;

use crate::config::ApiConfig;

/// Shared application state.
///
/// The classifier's registry is frozen before the state is handed to the
/// router, so handlers read it without synchronization.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub classifier: PlatformClassifier,
    pub metadata: Arc<MetadataClient>,
    pub payments: Arc<PaymentClient>,
}

impl AppState {
    /// Create application state from config and environment.
    ///
    /// Fails on an invalid platform registry configuration.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        Self::with_clients(
            config,
            MetadataClientConfig::from_env(),
            PaymentClientConfig::from_env(),
        )
    }

    /// Create application state with explicit client configuration.
    pub fn with_clients(
        config: ApiConfig,
        metadata: MetadataClientConfig,
        payments: PaymentClientConfig,
    ) -> anyhow::Result<Self> {
        let registry = config
            .platform_registry()
            .context("invalid platform registry configuration")?;
        let metadata = MetadataClient::new(metadata).context("failed to build metadata client")?;
        let payments = PaymentClient::new(payments).context("failed to build payment client")?;

        Ok(Self {
            config,
            classifier: PlatformClassifier::new(registry),
            metadata: Arc::new(metadata),
            payments: Arc::new(payments),
        })
    }
}
