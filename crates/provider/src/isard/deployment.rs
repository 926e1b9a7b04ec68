use crate::isard::Deployments;
use crate::isard::client::{IsardClient, segment};
use crate::isard::types::{Created, Deployment, DeploymentDesktop, DeploymentPayload, DeploymentUpdate};
use crate::poller::{NOT_FOUND_STATUS, NotFoundPolicy, UNKNOWN_STATUS, is_terminal};
use async_trait::async_trait;
use isard_common::prelude::{IsardError, Result};
use reqwest::Method;

#[async_trait]
impl Deployments for IsardClient {
    #[tracing::instrument(level = "trace", target = "client", skip(self, deployment), fields(name = %deployment.name))]
    async fn create_deployment(&self, deployment: &DeploymentPayload) -> Result<String> {
        let created = self
            .make_request::<DeploymentPayload, Created>(
                Method::POST,
                "/api/v3/deployments",
                Some(deployment),
                IsardError::Create,
            )
            .await?;

        tracing::info!(target: "client", id = %created.id, "Deployment created");
        Ok(created.id)
    }

    async fn deployment(&self, id: &str) -> Result<Deployment> {
        let path = format!("/api/v3/deployment/{}", segment(id));
        self.make_request::<(), Deployment>(Method::GET, &path, None, IsardError::Read)
            .await
    }

    async fn deployment_status(&self, id: &str) -> Result<String> {
        let path = format!("/api/v3/deployment/{}", segment(id));
        match self
            .make_request::<(), Deployment>(Method::GET, &path, None, IsardError::Status)
            .await
        {
            Ok(deployment) => Ok(aggregate_status(&deployment.desktops)),
            Err(error) if error.is_not_found() => Ok(NOT_FOUND_STATUS.to_owned()),
            Err(error) => Err(error),
        }
    }

    async fn update_deployment(&self, id: &str, update: &DeploymentUpdate) -> Result<()> {
        let path = format!("/api/v3/deployment/{}", segment(id));
        self.make_empty_request(Method::PUT, &path, Some(update), IsardError::Update)
            .await
    }

    async fn stop_deployment(&self, id: &str) -> Result<()> {
        let path = format!("/api/v3/deployments/stop/{}", segment(id));
        self.make_empty_request::<()>(Method::PUT, &path, None, IsardError::Stop)
            .await
    }

    async fn delete_deployment(&self, id: &str, permanent: bool) -> Result<()> {
        let path = format!("/api/v3/deployments/{}/{}", segment(id), permanent);
        self.delete_idempotent(&path).await
    }
}

/// Folds the statuses of a deployment's desktops into one: the first desktop
/// still running decides, otherwise the deployment counts as stopped. A
/// desktop without a status counts as `unknown`.
///
fn aggregate_status(desktops: &[DeploymentDesktop]) -> String {
    desktops
        .iter()
        .map(|desktop| desktop.status.as_deref().unwrap_or(UNKNOWN_STATUS))
        .find(|status| !is_terminal(status, NotFoundPolicy::KeepPolling))
        .unwrap_or("stopped")
        .to_owned()
}
