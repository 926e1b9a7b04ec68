use crate::isard::types::{NewQosNet, QosNet, QosNetUpdate};
use crate::resources::{Diagnostics, Resource};
use crate::state::ProviderState;
use async_trait::async_trait;
use isard_common::prelude::Result;

/// Network QoS profile with up to six bandwidth limits.
///
pub struct QosNetResource {
    provider: ProviderState,
}

impl QosNetResource {
    pub fn new(provider: ProviderState) -> Self {
        Self { provider }
    }
}

fn planned_state(id: &str, plan: &NewQosNet) -> QosNet {
    QosNet {
        id: id.to_owned(),
        name: plan.name.clone(),
        description: plan.description.clone(),
        bandwidth: plan.bandwidth.clone().unwrap_or_default(),
    }
}

#[async_trait]
impl Resource for QosNetResource {
    type Plan = NewQosNet;
    type State = QosNet;

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(name = %plan.name))]
    async fn create(&self, plan: &NewQosNet, _diagnostics: &mut Diagnostics) -> Result<QosNet> {
        let request = NewQosNet {
            description: plan.description.clone().filter(|text| !text.is_empty()),
            bandwidth: plan.bandwidth.clone().filter(|bandwidth| !bandwidth.is_empty()),
            ..plan.clone()
        };
        let id = self.provider.isard.create_qos_net(&request).await?;
        tracing::info!(target: "resource", %id, "QoS profile created");

        Ok(planned_state(&id, plan))
    }

    async fn read(&self, state: &QosNet, _diagnostics: &mut Diagnostics) -> Result<Option<QosNet>> {
        match self.provider.isard.qos_net(&state.id).await {
            Ok(remote) => Ok(Some(QosNet {
                id: state.id.clone(),
                description: remote.description.or_else(|| state.description.clone()),
                ..remote
            })),
            Err(error) if error.is_not_found() => {
                tracing::info!(target: "resource", id = %state.id, "QoS profile is gone");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(id = %state.id))]
    async fn update(
        &self,
        plan: &NewQosNet,
        state: &QosNet,
        _diagnostics: &mut Diagnostics,
    ) -> Result<QosNet> {
        let update = QosNetUpdate {
            id: state.id.clone(),
            name: Some(plan.name.clone()),
            description: plan.description.clone(),
            bandwidth: plan.bandwidth.clone(),
        };
        self.provider.isard.update_qos_net(&update).await?;
        tracing::info!(target: "resource", "QoS profile updated");

        Ok(planned_state(&state.id, plan))
    }

    async fn delete(&self, state: &QosNet, _diagnostics: &mut Diagnostics) -> Result<()> {
        self.provider.isard.delete_qos_net(&state.id).await?;
        tracing::info!(target: "resource", id = %state.id, "QoS profile deleted");
        Ok(())
    }
}
