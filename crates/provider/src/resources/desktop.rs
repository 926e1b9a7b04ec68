use crate::isard::types::{DesktopPayload, NewDesktop};
use crate::isard::{EntityKind, StatusRef};
use crate::resources::{self, Diagnostics, Resource};
use crate::state::ProviderState;
use async_trait::async_trait;
use isard_common::prelude::Result;

/// Desired configuration of a persistent desktop.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesktopPlan {
    pub desktop: NewDesktop,
    pub force_stop_on_destroy: bool,
}

/// Known state of a persistent desktop.
///
#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub id: String,
    pub desktop: NewDesktop,
    pub force_stop_on_destroy: bool,
}

/// Persistent desktop (`isard_vm`) derived from a template.
///
pub struct DesktopResource {
    provider: ProviderState,
}

impl DesktopResource {
    pub fn new(provider: ProviderState) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Resource for DesktopResource {
    type Plan = DesktopPlan;
    type State = DesktopState;

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(name = %plan.desktop.name))]
    async fn create(&self, plan: &DesktopPlan, diagnostics: &mut Diagnostics) -> Result<DesktopState> {
        let isard = &self.provider.isard;

        let template = isard.template_info(&plan.desktop.template_id).await?;
        let payload = DesktopPayload::build(&plan.desktop, &template, &self.provider.defaults.desktop);
        let id = isard.create_desktop(&payload).await?;
        tracing::info!(target: "resource", %id, "Desktop created");

        let mut state = DesktopState {
            id,
            desktop: plan.desktop.clone(),
            force_stop_on_destroy: plan.force_stop_on_destroy,
        };

        // Hardware left unset in the plan is whatever the template provided.
        match isard.desktop(&state.id).await {
            Ok(remote) => {
                state.desktop.vcpus = state.desktop.vcpus.or(remote.vcpus);
                state.desktop.memory = state.desktop.memory.or(remote.memory);
            }
            Err(error) => diagnostics.add_warning(
                "Could not read back desktop",
                format!("Desktop {} was created but reading it failed: {}", state.id, error),
            ),
        }

        Ok(state)
    }

    async fn read(&self, state: &DesktopState, _diagnostics: &mut Diagnostics) -> Result<Option<DesktopState>> {
        let remote = match self.provider.isard.desktop(&state.id).await {
            Ok(remote) => remote,
            Err(error) if error.is_not_found() => {
                tracing::info!(target: "resource", id = %state.id, "Desktop is gone");
                return Ok(None);
            }
            Err(error) => return Err(error),
        };

        let mut refreshed = state.clone();
        refreshed.desktop.name = remote.name;
        refreshed.desktop.description = remote.description.filter(|text| !text.is_empty());
        if let Some(template_id) = remote.template_id {
            refreshed.desktop.template_id = template_id;
        }
        // Configured hardware wins over the template values the API echoes.
        refreshed.desktop.vcpus = state.desktop.vcpus.or(remote.vcpus);
        refreshed.desktop.memory = state.desktop.memory.or(remote.memory);

        Ok(Some(refreshed))
    }

    /// Desktops are not modified in place; the plan is recorded as is.
    ///
    async fn update(
        &self,
        plan: &DesktopPlan,
        state: &DesktopState,
        _diagnostics: &mut Diagnostics,
    ) -> Result<DesktopState> {
        Ok(DesktopState {
            id: state.id.clone(),
            desktop: plan.desktop.clone(),
            force_stop_on_destroy: plan.force_stop_on_destroy,
        })
    }

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(id = %state.id))]
    async fn delete(&self, state: &DesktopState, diagnostics: &mut Diagnostics) -> Result<()> {
        let isard = &self.provider.isard;

        if state.force_stop_on_destroy {
            let stopped = isard.stop_desktop(&state.id).await;
            let entity = StatusRef::new(EntityKind::Desktop, &state.id);
            resources::settle_before_delete(&self.provider, &entity, stopped, diagnostics).await;
        }

        isard.delete_desktop(&state.id).await?;
        tracing::info!(target: "resource", "Desktop deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tests::provider;
    use reqwest::Method;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn plan() -> DesktopPlan {
        DesktopPlan {
            desktop: NewDesktop {
                name: "lab".to_owned(),
                template_id: "tpl".to_owned(),
                memory: Some(4.0),
                ..NewDesktop::default()
            },
            force_stop_on_destroy: true,
        }
    }

    #[tokio::test]
    async fn create_fills_unset_hardware_from_remote() {
        // Arrange
        let (mock_server, provider) = provider().await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/domain/info/tpl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "template",
                "hardware": {"vcpus": 4, "memory": 8.0, "videos": ["qxl"]}
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method(Method::POST))
            .and(path("/api/v3/persistent_desktop"))
            .and(body_partial_json(json!({"hardware": {"vcpus": 4, "memory": 4.0, "videos": ["qxl"]}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "d1"})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/domain/info/d1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "lab",
                "status": "Stopped",
                "create_dict": {"origin": "tpl"},
                "hardware": {"vcpus": 4, "memory": 8.0}
            })))
            .mount(&mock_server)
            .await;
        let resource = DesktopResource::new(provider);
        let mut diagnostics = Diagnostics::new();

        // Act
        let state = resource.create(&plan(), &mut diagnostics).await.unwrap();

        // Assert
        assert_eq!(state.id, "d1");
        assert_eq!(state.desktop.vcpus, Some(4));
        assert_eq!(state.desktop.memory, Some(4.0));
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn read_of_missing_desktop_drops_state() {
        // Arrange
        let (mock_server, provider) = provider().await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/domain/info/d1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;
        let resource = DesktopResource::new(provider);
        let state = DesktopState {
            id: "d1".to_owned(),
            desktop: plan().desktop,
            force_stop_on_destroy: false,
        };

        // Act
        let result = resource.read(&state, &mut Diagnostics::new()).await;

        // Assert
        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_warns_when_stop_fails_and_still_deletes() {
        // Arrange
        let (mock_server, provider) = provider().await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/desktop/stop/d1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("hypervisor offline"))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method(Method::DELETE))
            .and(path("/api/v3/desktop/d1/true"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
        let resource = DesktopResource::new(provider);
        let state = DesktopState {
            id: "d1".to_owned(),
            desktop: plan().desktop,
            force_stop_on_destroy: true,
        };
        let mut diagnostics = Diagnostics::new();

        // Act
        let result = resource.delete(&state, &mut diagnostics).await;

        // Assert
        assert!(result.is_ok());
        assert_eq!(diagnostics.warnings().len(), 1);
        assert!(diagnostics.warnings()[0].detail.contains("hypervisor offline"));
    }

    #[tokio::test]
    async fn delete_waits_for_stop_then_deletes() {
        // Arrange
        let (mock_server, provider) = provider().await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/desktop/stop/d1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/domain/info/d1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Stopping"})))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/domain/info/d1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Stopped"})))
            .mount(&mock_server)
            .await;
        Mock::given(method(Method::DELETE))
            .and(path("/api/v3/desktop/d1/true"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
        let resource = DesktopResource::new(provider);
        let state = DesktopState {
            id: "d1".to_owned(),
            desktop: plan().desktop,
            force_stop_on_destroy: true,
        };
        let mut diagnostics = Diagnostics::new();

        // Act
        let result = resource.delete(&state, &mut diagnostics).await;

        // Assert
        assert!(result.is_ok());
        assert!(diagnostics.is_empty());
    }

    #[tokio::test]
    async fn delete_warns_on_stop_timeout() {
        // Arrange
        let (mock_server, provider) = provider().await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/desktop/stop/d1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/domain/info/d1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Stopping"})))
            .mount(&mock_server)
            .await;
        Mock::given(method(Method::DELETE))
            .and(path("/api/v3/desktop/d1/true"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
        let resource = DesktopResource::new(provider);
        let state = DesktopState {
            id: "d1".to_owned(),
            desktop: plan().desktop,
            force_stop_on_destroy: true,
        };
        let mut diagnostics = Diagnostics::new();

        // Act
        let result = resource.delete(&state, &mut diagnostics).await;

        // Assert
        assert!(result.is_ok());
        assert_eq!(diagnostics.warnings().len(), 1);
        assert!(diagnostics.warnings()[0].detail.contains("Timeout"));
    }
}
