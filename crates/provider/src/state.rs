use crate::config::{Defaults, PollConfig, ProviderConfig};
use crate::isard::Isard;
use crate::isard::client::IsardClient;
use isard_common::prelude::Result;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Holds what every resource and data source needs: the Isard client, the poll
/// timings and the configured fallbacks.
///
#[derive(Clone)]
pub struct ProviderState {
    pub isard: Arc<dyn Isard>,
    pub poll: PollConfig,
    pub defaults: Defaults,
}

impl ProviderState {
    /// Connects to Isard (signing in if needed) and builds the shared state.
    ///
    /// # Arguments
    ///
    /// * `config`: Loaded provider configuration.
    ///
    /// # Returns
    ///
    /// The state shared by all resource operations.
    ///
    pub async fn configure(config: &ProviderConfig) -> Result<Self> {
        let client = IsardClient::connect(&config.connection).await?;
        tracing::info!(target: "config", endpoint = %config.connection.endpoint, "Provider configured");

        Ok(Self::new(Arc::new(client), config.poll.clone(), config.defaults.clone()))
    }

    pub fn new(isard: Arc<dyn Isard>, poll: PollConfig, defaults: Defaults) -> Self {
        Self {
            isard,
            poll,
            defaults,
        }
    }
}

impl Debug for ProviderState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderState")
            .field("Isard", &"Arc<dyn Isard>")
            .field("Poll", &self.poll)
            .field("Defaults", &self.defaults)
            .finish()
    }
}
