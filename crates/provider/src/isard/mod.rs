pub mod client;
pub mod json;
pub mod types;

mod deployment;
mod desktop;
mod directory;
mod interface;
mod media;
mod network;
mod qos;

// -----------------------------------------------------------------------------

use crate::isard::types::*;
use async_trait::async_trait;
use derive_more::Display;
use isard_common::prelude::Result;

#[async_trait]
pub trait Desktops {
    async fn template_info(&self, template_id: &str) -> Result<DomainInfo>;
    async fn create_desktop(&self, desktop: &DesktopPayload) -> Result<String>;
    async fn desktop(&self, id: &str) -> Result<Desktop>;
    async fn desktop_status(&self, id: &str) -> Result<String>;
    async fn stop_desktop(&self, id: &str) -> Result<()>;
    async fn force_stop_desktop(&self, id: &str) -> Result<()>;
    async fn delete_desktop(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait Deployments {
    async fn create_deployment(&self, deployment: &DeploymentPayload) -> Result<String>;
    async fn deployment(&self, id: &str) -> Result<Deployment>;
    async fn deployment_status(&self, id: &str) -> Result<String>;
    async fn update_deployment(&self, id: &str, update: &DeploymentUpdate) -> Result<()>;
    async fn stop_deployment(&self, id: &str) -> Result<()>;
    async fn delete_deployment(&self, id: &str, permanent: bool) -> Result<()>;
}

#[async_trait]
pub trait Networks {
    async fn create_network(&self, network: &NewNetwork) -> Result<String>;
    async fn network(&self, id: &str) -> Result<Network>;
    async fn update_network(&self, id: &str, update: &NetworkUpdate) -> Result<()>;
    async fn delete_network(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait NetworkInterfaces {
    async fn create_network_interface(&self, interface: &NetworkInterface) -> Result<()>;
    async fn network_interface(&self, id: &str) -> Result<NetworkInterface>;
    async fn network_interfaces(&self) -> Result<Vec<NetworkInterface>>;
    async fn update_network_interface(&self, update: &NetworkInterfaceUpdate) -> Result<()>;
    async fn delete_network_interface(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait QosNets {
    async fn create_qos_net(&self, qos: &NewQosNet) -> Result<String>;
    async fn qos_net(&self, id: &str) -> Result<QosNet>;
    async fn update_qos_net(&self, update: &QosNetUpdate) -> Result<()>;
    async fn delete_qos_net(&self, id: &str) -> Result<()>;
}

#[async_trait]
pub trait Medias {
    async fn create_media(&self, media: &NewMedia) -> Result<Option<String>>;
    async fn media(&self, id: &str) -> Result<Media>;
    async fn medias(&self) -> Result<Vec<Media>>;
    async fn delete_media(&self, id: &str) -> Result<()>;
}

/// Read-only access to users and templates.
///
#[async_trait]
pub trait Directory {
    async fn users(&self) -> Result<Vec<User>>;
    async fn search_users(&self, term: &str) -> Result<Vec<User>>;
    async fn user(&self, id: &str) -> Result<User>;
    async fn templates(&self) -> Result<Vec<Template>>;
}

/// Anything able to report the current status string of an entity.
///
#[async_trait]
pub trait StatusSource {
    async fn status(&self, entity: &StatusRef) -> Result<String>;
}

/// Full Isard API surface used by resources and data sources.
///
pub trait Isard:
    Desktops
    + Deployments
    + Networks
    + NetworkInterfaces
    + QosNets
    + Medias
    + Directory
    + StatusSource
    + Send
    + Sync
{
}

impl<T> Isard for T where
    T: Desktops
        + Deployments
        + Networks
        + NetworkInterfaces
        + QosNets
        + Medias
        + Directory
        + StatusSource
        + Send
        + Sync
{
}

// -----------------------------------------------------------------------------

/// Kind of entity whose status can be waited on.
///
#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum EntityKind {
    #[display("desktop")]
    Desktop,
    #[display("deployment")]
    Deployment,
}

/// Reference to an entity watched by the status poller.
///
#[derive(Debug, Clone, PartialEq, Display)]
#[display("{kind}/{id}")]
pub struct StatusRef {
    pub kind: EntityKind,
    pub id: String,
}

impl StatusRef {
    /// Creates a new status reference.
    ///
    /// # Arguments
    ///
    /// * `kind`: Whether the ID names a desktop or a deployment.
    /// * `id`: Remote identifier of the entity.
    ///
    pub fn new(kind: EntityKind, id: &str) -> Self {
        Self {
            kind,
            id: id.to_owned(),
        }
    }
}
