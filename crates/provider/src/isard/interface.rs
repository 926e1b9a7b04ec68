use crate::isard::NetworkInterfaces;
use crate::isard::client::{IsardClient, segment};
use crate::isard::types::{IdRef, NetworkInterface, NetworkInterfaceUpdate};
use async_trait::async_trait;
use isard_common::prelude::{IsardError, Result};
use reqwest::Method;

#[async_trait]
impl NetworkInterfaces for IsardClient {
    #[tracing::instrument(level = "trace", target = "client", skip(self, interface), fields(id = %interface.id))]
    async fn create_network_interface(&self, interface: &NetworkInterface) -> Result<()> {
        self.make_empty_request(
            Method::POST,
            "/api/v3/admin/table/add/interfaces",
            Some(interface),
            IsardError::Create,
        )
        .await?;

        tracing::info!(target: "client", "Network interface created");
        Ok(())
    }

    async fn network_interface(&self, id: &str) -> Result<NetworkInterface> {
        self.make_request(
            Method::POST,
            "/api/v3/admin/table/interfaces",
            Some(&IdRef::new(id)),
            IsardError::Read,
        )
        .await
    }

    async fn network_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        self.make_request::<(), Vec<NetworkInterface>>(
            Method::GET,
            "/api/v3/admin/table/interfaces",
            None,
            IsardError::List,
        )
        .await
    }

    async fn update_network_interface(&self, update: &NetworkInterfaceUpdate) -> Result<()> {
        self.make_empty_request(
            Method::PUT,
            "/api/v3/admin/table/update/interfaces",
            Some(update),
            IsardError::Update,
        )
        .await
    }

    async fn delete_network_interface(&self, id: &str) -> Result<()> {
        let path = format!("/api/v3/admin/table/interfaces/{}", segment(id));
        self.delete_idempotent(&path).await
    }
}
