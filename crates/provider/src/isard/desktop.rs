use crate::isard::client::{IsardClient, segment};
use crate::isard::types::{Created, Desktop, DesktopPayload, DomainInfo};
use crate::isard::Desktops;
use crate::poller::{NOT_FOUND_STATUS, UNKNOWN_STATUS};
use async_trait::async_trait;
use isard_common::prelude::{IsardError, Result};
use reqwest::Method;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct MultipleActions<'a> {
    ids: [&'a str; 1],
    action: &'a str,
}

#[async_trait]
impl Desktops for IsardClient {
    async fn template_info(&self, template_id: &str) -> Result<DomainInfo> {
        let path = format!("/api/v3/domain/info/{}", segment(template_id));
        self.make_request::<(), DomainInfo>(Method::GET, &path, None, IsardError::Read)
            .await
    }

    #[tracing::instrument(level = "trace", target = "client", skip(self, desktop), fields(name = %desktop.name))]
    async fn create_desktop(&self, desktop: &DesktopPayload) -> Result<String> {
        let created = self
            .make_request::<DesktopPayload, Created>(
                Method::POST,
                "/api/v3/persistent_desktop",
                Some(desktop),
                IsardError::Create,
            )
            .await?;

        tracing::info!(target: "client", id = %created.id, "Desktop created");
        Ok(created.id)
    }

    async fn desktop(&self, id: &str) -> Result<Desktop> {
        let path = format!("/api/v3/domain/info/{}", segment(id));
        let info = self
            .make_request::<(), DomainInfo>(Method::GET, &path, None, IsardError::Read)
            .await?;
        Ok(info.into_desktop(id))
    }

    async fn desktop_status(&self, id: &str) -> Result<String> {
        let path = format!("/api/v3/domain/info/{}", segment(id));
        match self
            .make_request::<(), DomainInfo>(Method::GET, &path, None, IsardError::Status)
            .await
        {
            Ok(info) => Ok(info.status.unwrap_or_else(|| UNKNOWN_STATUS.to_owned())),
            Err(error) if error.is_not_found() => Ok(NOT_FOUND_STATUS.to_owned()),
            Err(error) => Err(error),
        }
    }

    async fn stop_desktop(&self, id: &str) -> Result<()> {
        let path = format!("/api/v3/desktop/stop/{}", segment(id));
        self.make_empty_request::<()>(Method::GET, &path, None, IsardError::Stop)
            .await
    }

    async fn force_stop_desktop(&self, id: &str) -> Result<()> {
        let body = MultipleActions {
            ids: [id],
            action: "stopping",
        };
        self.make_empty_request(
            Method::POST,
            "/api/v3/admin/multiple_actions",
            Some(&body),
            IsardError::Stop,
        )
        .await
    }

    async fn delete_desktop(&self, id: &str) -> Result<()> {
        let path = format!("/api/v3/desktop/{}/true", segment(id));
        self.delete_idempotent(&path).await
    }
}
