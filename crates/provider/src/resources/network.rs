use crate::isard::types::{Allowed, Network, NetworkUpdate, NewNetwork};
use crate::resources::{Diagnostics, Resource};
use crate::state::ProviderState;
use async_trait::async_trait;
use isard_common::prelude::Result;

/// Desired configuration of a user network.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkPlan {
    pub name: String,
    pub description: String,
    /// Falls back to the configured default model.
    pub model: Option<String>,
    pub qos_id: Option<String>,
    /// Falls back to an owner-only allowed map.
    pub allowed: Option<Allowed>,
}

/// User network. The state is the network as last read from the API, which
/// carries the computed `model`, `qos_id` and `metadata_id`.
///
pub struct NetworkResource {
    provider: ProviderState,
}

impl NetworkResource {
    pub fn new(provider: ProviderState) -> Self {
        Self { provider }
    }

    /// Lists the fields of the plan that differ from the state.
    ///
    fn changes(plan: &NetworkPlan, state: &Network) -> NetworkUpdate {
        let changed = |planned: &str, current: &Option<String>| {
            (current.as_deref().unwrap_or_default() != planned).then(|| planned.to_owned())
        };
        NetworkUpdate {
            name: (plan.name != state.name).then(|| plan.name.clone()),
            description: changed(&plan.description, &state.description),
            qos_id: plan
                .qos_id
                .as_deref()
                .and_then(|qos_id| changed(qos_id, &state.qos_id)),
            allowed: plan
                .allowed
                .clone()
                .filter(|allowed| state.allowed.as_ref() != Some(allowed)),
        }
    }
}

#[async_trait]
impl Resource for NetworkResource {
    type Plan = NetworkPlan;
    type State = Network;

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(name = %plan.name))]
    async fn create(&self, plan: &NetworkPlan, _diagnostics: &mut Diagnostics) -> Result<Network> {
        let isard = &self.provider.isard;

        let network = NewNetwork {
            name: plan.name.clone(),
            description: plan.description.clone(),
            model: plan
                .model
                .clone()
                .or_else(|| Some(self.provider.defaults.network.model.clone())),
            qos_id: plan.qos_id.clone().filter(|qos_id| !qos_id.is_empty()),
            allowed: Some(plan.allowed.clone().unwrap_or_else(Allowed::closed)),
        };
        let id = isard.create_network(&network).await?;
        tracing::info!(target: "resource", %id, "Network created");

        isard.network(&id).await
    }

    async fn read(&self, state: &Network, _diagnostics: &mut Diagnostics) -> Result<Option<Network>> {
        match self.provider.isard.network(&state.id).await {
            Ok(network) => Ok(Some(network)),
            Err(error) if error.is_not_found() => {
                tracing::info!(target: "resource", id = %state.id, "Network is gone");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(id = %state.id))]
    async fn update(
        &self,
        plan: &NetworkPlan,
        state: &Network,
        _diagnostics: &mut Diagnostics,
    ) -> Result<Network> {
        let isard = &self.provider.isard;

        let update = Self::changes(plan, state);
        if update.is_empty() {
            tracing::debug!(target: "resource", "Network unchanged");
        } else {
            isard.update_network(&state.id, &update).await?;
            tracing::info!(target: "resource", "Network updated");
        }

        isard.network(&state.id).await
    }

    async fn delete(&self, state: &Network, _diagnostics: &mut Diagnostics) -> Result<()> {
        self.provider.isard.delete_network(&state.id).await?;
        tracing::info!(target: "resource", id = %state.id, "Network deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isard::types::Access;
    use crate::resources::tests::provider;
    use reqwest::Method;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn remote() -> Network {
        serde_json::from_str(
            r#"{"id": "n1", "name": "lab-net", "description": "", "model": "virtio", "qos_id": "unlimited"}"#,
        )
        .unwrap()
    }

    #[test]
    fn changes_only_cover_modified_fields() {
        let plan = NetworkPlan {
            name: "lab-net".to_owned(),
            description: "Lab".to_owned(),
            qos_id: Some("unlimited".to_owned()),
            allowed: Some(Allowed {
                users: Some(Access::List(vec!["u1".to_owned()])),
                ..Allowed::closed()
            }),
            ..NetworkPlan::default()
        };

        let update = NetworkResource::changes(&plan, &remote());

        assert_eq!(update.name, None);
        assert_eq!(update.description.as_deref(), Some("Lab"));
        assert_eq!(update.qos_id, None);
        assert!(update.allowed.is_some());
    }

    #[tokio::test]
    async fn create_uses_model_default_and_reads_computed_fields() {
        // Arrange
        let (mock_server, provider) = provider().await;
        Mock::given(method(Method::POST))
            .and(path("/api/v3/user/networks"))
            .and(body_partial_json(json!({
                "model": "virtio",
                "allowed": {"roles": false, "categories": false, "groups": false, "users": []}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "n1"})))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/user/networks/n1"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"id": "n1", "name": "lab-net", "model": "virtio", "qos_id": "unlimited", "metadata_id": 12345678901234567890}"#,
                "application/json",
            ))
            .mount(&mock_server)
            .await;
        let resource = NetworkResource::new(provider);
        let plan = NetworkPlan {
            name: "lab-net".to_owned(),
            ..NetworkPlan::default()
        };

        // Act
        let state = resource.create(&plan, &mut Diagnostics::new()).await.unwrap();

        // Assert
        assert_eq!(state.id, "n1");
        assert_eq!(state.qos_id.as_deref(), Some("unlimited"));
        assert_eq!(state.metadata_id.as_deref(), Some("12345678901234567890"));
    }

    #[tokio::test]
    async fn update_sends_changed_fields() {
        // Arrange
        let (mock_server, provider) = provider().await;
        Mock::given(method(Method::PUT))
            .and(path("/api/v3/user/networks/n1"))
            .and(body_json(json!({"name": "lab-net-2"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method(Method::GET))
            .and(path("/api/v3/user/networks/n1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "n1", "name": "lab-net-2"})))
            .mount(&mock_server)
            .await;
        let resource = NetworkResource::new(provider);
        let plan = NetworkPlan {
            name: "lab-net-2".to_owned(),
            ..NetworkPlan::default()
        };

        // Act
        let state = resource
            .update(&plan, &remote(), &mut Diagnostics::new())
            .await
            .unwrap();

        // Assert
        assert_eq!(state.name, "lab-net-2");
    }
}
