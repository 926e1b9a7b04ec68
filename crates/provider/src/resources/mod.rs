use crate::isard::StatusRef;
use crate::poller;
use crate::state::ProviderState;
use async_trait::async_trait;
use derive_more::Display;
use isard_common::prelude::Result;

pub mod deployment;
pub mod desktop;
pub mod media;
pub mod network;
pub mod network_interface;
pub mod qos_net;

// -----------------------------------------------------------------------------

/// Non-fatal problem reported to the host next to an operation's result.
///
#[derive(Debug, Clone, PartialEq, Display)]
#[display("{summary}: {detail}")]
pub struct Warning {
    pub summary: String,
    pub detail: String,
}

/// Warnings collected while a resource operation runs.
///
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and logs it.
    ///
    pub fn add_warning(&mut self, summary: &str, detail: impl Into<String>) {
        let warning = Warning {
            summary: summary.to_owned(),
            detail: detail.into(),
        };
        tracing::warn!(target: "resource", %warning, "Operation warning");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Create/Read/Update/Delete contract of a declarative resource.
///
/// `Plan` is the desired configuration and `State` the last known remote
/// state, computed fields included.
///
#[async_trait]
pub trait Resource: Send + Sync {
    type Plan: Send + Sync;
    type State: Send + Sync;

    /// Creates the remote entity and returns its full state.
    async fn create(&self, plan: &Self::Plan, diagnostics: &mut Diagnostics) -> Result<Self::State>;

    /// Refreshes the state. `None` means the entity is gone and must be
    /// dropped from the host's state.
    async fn read(&self, state: &Self::State, diagnostics: &mut Diagnostics) -> Result<Option<Self::State>>;

    /// Applies the plan to an existing entity.
    async fn update(
        &self,
        plan: &Self::Plan,
        state: &Self::State,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self::State>;

    /// Deletes the entity. An entity that is already gone counts as deleted.
    async fn delete(&self, state: &Self::State, diagnostics: &mut Diagnostics) -> Result<()>;
}

// -----------------------------------------------------------------------------

/// Waits for an entity to settle after a stop request, downgrading every
/// failure to a warning so that the deletion can go ahead.
///
/// # Arguments
///
/// * `provider`: Shared provider state.
/// * `entity`: Entity that was asked to stop.
/// * `stopped`: Outcome of the stop request. On failure no wait happens.
/// * `diagnostics`: Where the warnings go.
///
#[tracing::instrument(level = "trace", target = "resource", skip(provider, entity, stopped, diagnostics), fields(entity = %entity))]
pub(crate) async fn settle_before_delete(
    provider: &ProviderState,
    entity: &StatusRef,
    stopped: Result<()>,
    diagnostics: &mut Diagnostics,
) {
    if let Err(error) = stopped {
        diagnostics.add_warning(
            &format!("Could not stop {}", entity.kind),
            format!("Stopping {} failed: {}. Deleting anyway.", entity, error),
        );
        return;
    }

    let waited = poller::wait_until_stopped(
        provider.isard.as_ref(),
        entity,
        provider.poll.stop_timeout(),
        provider.poll.settings(),
    )
    .await;

    match waited {
        Ok(()) => tracing::debug!(target: "resource", "Entity stopped"),
        Err(error) => diagnostics.add_warning(
            &format!("Gave up waiting for {} to stop", entity.kind),
            format!("Waiting for {} failed: {}. Deleting anyway.", entity, error),
        ),
    }
}

/// Treats an empty string as unset.
///
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|value| !value.is_empty())
}
