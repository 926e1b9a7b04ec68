use crate::isard::QosNets;
use crate::isard::client::{IsardClient, segment};
use crate::isard::types::{IdRef, NewQosNet, QosNet, QosNetUpdate};
use async_trait::async_trait;
use isard_common::prelude::{IsardError, Result};
use reqwest::Method;

#[async_trait]
impl QosNets for IsardClient {
    /// The add endpoint does not return an ID, so the profile is read back by
    /// name. When that lookup fails the name itself is used as the ID.
    ///
    #[tracing::instrument(level = "trace", target = "client", skip(self, qos), fields(name = %qos.name))]
    async fn create_qos_net(&self, qos: &NewQosNet) -> Result<String> {
        self.make_empty_request(
            Method::POST,
            "/api/v3/admin/table/add/qos_net",
            Some(qos),
            IsardError::Create,
        )
        .await?;

        let id = match self.qos_net(&qos.name).await {
            Ok(created) => created.id,
            Err(error) => {
                tracing::debug!(target: "client", %error, "QoS read-back failed, using name as ID");
                qos.name.clone()
            }
        };

        tracing::info!(target: "client", %id, "QoS profile created");
        Ok(id)
    }

    async fn qos_net(&self, id: &str) -> Result<QosNet> {
        self.make_request(
            Method::POST,
            "/api/v3/admin/table/qos_net",
            Some(&IdRef::new(id)),
            IsardError::Read,
        )
        .await
    }

    async fn update_qos_net(&self, update: &QosNetUpdate) -> Result<()> {
        self.make_empty_request(
            Method::PUT,
            "/api/v3/admin/table/update/qos_net",
            Some(update),
            IsardError::Update,
        )
        .await
    }

    async fn delete_qos_net(&self, id: &str) -> Result<()> {
        let path = format!("/api/v3/admin/table/qos_net/{}", segment(id));
        self.delete_idempotent(&path).await
    }
}
