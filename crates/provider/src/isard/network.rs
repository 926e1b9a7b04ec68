use crate::isard::Networks;
use crate::isard::client::{IsardClient, segment};
use crate::isard::types::{Created, Network, NetworkUpdate, NewNetwork};
use async_trait::async_trait;
use isard_common::prelude::{IsardError, Result};
use reqwest::Method;

#[async_trait]
impl Networks for IsardClient {
    #[tracing::instrument(level = "trace", target = "client", skip(self, network), fields(name = %network.name))]
    async fn create_network(&self, network: &NewNetwork) -> Result<String> {
        let created = self
            .make_request::<NewNetwork, Created>(
                Method::POST,
                "/api/v3/user/networks",
                Some(network),
                IsardError::Create,
            )
            .await?;

        tracing::info!(target: "client", id = %created.id, "Network created");
        Ok(created.id)
    }

    async fn network(&self, id: &str) -> Result<Network> {
        let path = format!("/api/v3/user/networks/{}", segment(id));
        self.make_request::<(), Network>(Method::GET, &path, None, IsardError::Read)
            .await
    }

    async fn update_network(&self, id: &str, update: &NetworkUpdate) -> Result<()> {
        let path = format!("/api/v3/user/networks/{}", segment(id));
        self.make_empty_request(Method::PUT, &path, Some(update), IsardError::Update)
            .await
    }

    async fn delete_network(&self, id: &str) -> Result<()> {
        let path = format!("/api/v3/user/networks/{}", segment(id));
        self.delete_idempotent(&path).await
    }
}
