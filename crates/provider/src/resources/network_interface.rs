use crate::isard::types::{NetworkInterface, NetworkInterfaceUpdate};
use crate::resources::{Diagnostics, Resource, non_empty};
use crate::state::ProviderState;
use async_trait::async_trait;
use isard_common::prelude::{Error, Result};

/// System network interface. The ID is chosen by the caller; `kind`, `model`
/// and `qos_id` are filled in from the API when left unset.
///
pub struct NetworkInterfaceResource {
    provider: ProviderState,
}

impl NetworkInterfaceResource {
    pub fn new(provider: ProviderState) -> Self {
        Self { provider }
    }

    /// Lists the fields of the plan that differ from the state.
    ///
    fn changes(plan: &NetworkInterface, state: &NetworkInterface) -> NetworkInterfaceUpdate {
        let changed = |planned: &Option<String>, current: &Option<String>| {
            non_empty(planned).filter(|planned| Some(planned) != current.as_ref())
        };
        NetworkInterfaceUpdate {
            id: state.id.clone(),
            name: (plan.name != state.name).then(|| plan.name.clone()),
            description: changed(&plan.description, &state.description),
            net: (plan.net != state.net).then(|| plan.net.clone()),
            kind: changed(&plan.kind, &state.kind),
            model: changed(&plan.model, &state.model),
            qos_id: changed(&plan.qos_id, &state.qos_id),
        }
    }

    /// Overlays what the API reports on a known interface, keeping local values
    /// for fields the API leaves empty.
    ///
    fn merge(mut known: NetworkInterface, remote: NetworkInterface) -> NetworkInterface {
        known.name = remote.name;
        known.net = remote.net;
        known.description = non_empty(&remote.description).or(known.description);
        known.kind = non_empty(&remote.kind).or(known.kind);
        known.model = non_empty(&remote.model).or(known.model);
        known.qos_id = non_empty(&remote.qos_id).or(known.qos_id);
        known.ifname = non_empty(&remote.ifname).or(known.ifname);
        known.allowed = remote.allowed.or(known.allowed);
        known
    }
}

#[async_trait]
impl Resource for NetworkInterfaceResource {
    type Plan = NetworkInterface;
    type State = NetworkInterface;

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(id = %plan.id))]
    async fn create(
        &self,
        plan: &NetworkInterface,
        _diagnostics: &mut Diagnostics,
    ) -> Result<NetworkInterface> {
        if plan.id.trim().is_empty() {
            return Err(Error::InvalidInput("network interface id is required".to_owned()));
        }
        let isard = &self.provider.isard;

        isard.create_network_interface(plan).await?;
        let remote = isard.network_interface(&plan.id).await?;

        Ok(Self::merge(plan.clone(), remote))
    }

    async fn read(
        &self,
        state: &NetworkInterface,
        _diagnostics: &mut Diagnostics,
    ) -> Result<Option<NetworkInterface>> {
        match self.provider.isard.network_interface(&state.id).await {
            Ok(remote) => Ok(Some(Self::merge(state.clone(), remote))),
            Err(error) if error.is_not_found() => {
                tracing::info!(target: "resource", id = %state.id, "Network interface is gone");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    #[tracing::instrument(level = "trace", target = "resource", skip_all, fields(id = %state.id))]
    async fn update(
        &self,
        plan: &NetworkInterface,
        state: &NetworkInterface,
        _diagnostics: &mut Diagnostics,
    ) -> Result<NetworkInterface> {
        let isard = &self.provider.isard;

        let update = Self::changes(plan, state);
        isard.update_network_interface(&update).await?;
        tracing::info!(target: "resource", "Network interface updated");

        let remote = isard.network_interface(&state.id).await?;
        let planned = NetworkInterface {
            id: state.id.clone(),
            ..plan.clone()
        };
        Ok(Self::merge(planned, remote))
    }

    async fn delete(&self, state: &NetworkInterface, _diagnostics: &mut Diagnostics) -> Result<()> {
        self.provider
            .isard
            .delete_network_interface(&state.id)
            .await?;
        tracing::info!(target: "resource", id = %state.id, "Network interface deleted");
        Ok(())
    }
}
