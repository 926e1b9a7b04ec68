use crate::isard::types::{AccessLists, Deployment, DeploymentPayload, DeploymentUpdate, NewDeployment};
use crate::isard::{EntityKind, StatusRef};
use crate::resources::{self, Diagnostics, Resource};
use crate::state::ProviderState;
use async_trait::async_trait;
use isard_common::prelude::Result;

/// Desired configuration of a deployment.
///
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentPlan {
    pub deployment: NewDeployment,
    pub force_stop_on_destroy: bool,
}

/// Known state of a deployment. Hardware is kept as sent, since the API does
/// not report it back.
///
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentState {
    pub id: String,
    pub deployment: NewDeployment,
    pub force_stop_on_destroy: bool,
}

/// Deployment: one desktop per allowed user, created from a template.
///
pub struct DeploymentResource {
    provider: ProviderState,
}

impl DeploymentResource {
    pub fn new(provider: ProviderState) -> Self {
        Self { provider }
    }

    /// Starts a plan from the configured deployment defaults.
    ///
    pub fn plan(
        &self,
        name: &str,
        template_id: &str,
        desktop_name: &str,
        allowed: AccessLists,
    ) -> DeploymentPlan {
        DeploymentPlan {
            deployment: NewDeployment::new(
                name,
                template_id,
                desktop_name,
                allowed,
                &self.provider.defaults.deployment,
            ),
            force_stop_on_destroy: false,
        }
    }

    /// Copies the fields the API reports back onto a known state.
    ///
    fn refresh(state: &mut DeploymentState, remote: Deployment) {
        let deployment = &mut state.deployment;
        deployment.name = remote.name;
        deployment.description = remote.description.unwrap_or_default();
        if let Some(desktop_name) = remote.desktop_name {
            deployment.desktop_name = desktop_name;
        }
        if let Some(template_id) = remote.template_id {
            deployment.template_id = template_id;
        }
        deployment.visible = remote.visible;
        if let Some(allowed) = remote.allowed.as_ref() {
            deployment.allowed = AccessLists::from(allowed);
        }
    }
}

#[async_trait]
impl Resource for DeploymentResource {
    type Plan = DeploymentPlan;
    type State = DeploymentState;

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(name = %plan.deployment.name))]
    async fn create(&self, plan: &DeploymentPlan, diagnostics: &mut Diagnostics) -> Result<DeploymentState> {
        let isard = &self.provider.isard;

        let id = isard
            .create_deployment(&DeploymentPayload::from(&plan.deployment))
            .await?;
        tracing::info!(target: "resource", %id, "Deployment created");

        let mut state = DeploymentState {
            id,
            deployment: plan.deployment.clone(),
            force_stop_on_destroy: plan.force_stop_on_destroy,
        };

        match isard.deployment(&state.id).await {
            Ok(remote) => {
                if let Some(description) = remote.description.filter(|text| !text.is_empty()) {
                    state.deployment.description = description;
                }
                state.deployment.visible = remote.visible;
            }
            Err(error) => diagnostics.add_warning(
                "Could not read back deployment",
                format!("Deployment {} was created but reading it failed: {}", state.id, error),
            ),
        }

        Ok(state)
    }

    async fn read(
        &self,
        state: &DeploymentState,
        _diagnostics: &mut Diagnostics,
    ) -> Result<Option<DeploymentState>> {
        match self.provider.isard.deployment(&state.id).await {
            Ok(remote) => {
                let mut refreshed = state.clone();
                Self::refresh(&mut refreshed, remote);
                Ok(Some(refreshed))
            }
            Err(error) if error.is_not_found() => {
                tracing::info!(target: "resource", id = %state.id, "Deployment is gone");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(id = %state.id))]
    async fn update(
        &self,
        plan: &DeploymentPlan,
        state: &DeploymentState,
        _diagnostics: &mut Diagnostics,
    ) -> Result<DeploymentState> {
        self.provider
            .isard
            .update_deployment(&state.id, &DeploymentUpdate::from(&plan.deployment))
            .await?;
        tracing::info!(target: "resource", "Deployment updated");

        Ok(DeploymentState {
            id: state.id.clone(),
            deployment: plan.deployment.clone(),
            force_stop_on_destroy: plan.force_stop_on_destroy,
        })
    }

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(id = %state.id))]
    async fn delete(&self, state: &DeploymentState, diagnostics: &mut Diagnostics) -> Result<()> {
        let isard = &self.provider.isard;

        if state.force_stop_on_destroy {
            let stopped = isard.stop_deployment(&state.id).await;
            let entity = StatusRef::new(EntityKind::Deployment, &state.id);
            resources::settle_before_delete(&self.provider, &entity, stopped, diagnostics).await;
        }

        isard.delete_deployment(&state.id, true).await?;
        tracing::info!(target: "resource", "Deployment deleted");
        Ok(())
    }
}
