use crate::data_sources::{Listing, contains, equals};
use crate::isard::Isard;
use crate::isard::types::NetworkInterface;
use isard_common::prelude::Result;

/// Structured filter on the interface listing.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceFilter {
    /// Case-sensitive substring of the interface name.
    pub name: Option<String>,
    pub kind: Option<String>,
    pub net: Option<String>,
}

/// How interfaces are selected. An exact `name` takes precedence over
/// `filter`.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceQuery {
    pub name: Option<String>,
    pub filter: Option<InterfaceFilter>,
}

impl InterfaceQuery {
    fn listing_id(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => format!("network-interface-{}", name),
            _ => "network-interfaces-all".to_owned(),
        }
    }

    fn select(&self, interfaces: Vec<NetworkInterface>) -> Vec<NetworkInterface> {
        match (self.name.as_deref(), &self.filter) {
            (Some(name), _) if !name.is_empty() => interfaces
                .into_iter()
                .filter(|interface| interface.name == name)
                .collect(),
            (_, Some(filter)) => interfaces
                .into_iter()
                .filter(|interface| {
                    contains(&interface.name, &filter.name)
                        && equals(interface.kind.as_deref(), &filter.kind)
                        && equals(Some(interface.net.as_str()), &filter.net)
                })
                .collect(),
            _ => interfaces,
        }
    }
}

/// Lists the system network interfaces selected by the query.
///
#[tracing::instrument(level = "trace", target = "data_source", skip(isard))]
pub async fn read(isard: &dyn Isard, query: &InterfaceQuery) -> Result<Listing<NetworkInterface>> {
    let interfaces = query.select(isard.network_interfaces().await?);
    tracing::debug!(target: "data_source", count = interfaces.len(), "Network interfaces selected");

    Ok(Listing::new(query.listing_id(), interfaces))
}
