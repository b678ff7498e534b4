//! The endpoint resolver: one listing call, flattened into discovery nodes.
//!
//! # How It Works
//!
//! 1. Lists the endpoints resource in the configured namespace, narrowed by
//!    a label selector when one is configured
//! 2. Walks records, subsets, and addresses, skipping whatever the API left
//!    absent
//! 3. Resolves each address's port from the well-known annotation, falling
//!    back to a subset port entry of the same name
//! 4. Returns the surviving addresses as discovery nodes, in API order

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::ResolverConfig;
use crate::error::Error;
use crate::k8s::{EndpointAddress, EndpointSubset, Endpoints, EndpointsApi, SERVICE_PORT_KEY};

/// A reachable host and port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// Host as reported by the API, verbatim.
    pub host: String,

    /// Resolved port.
    pub port: u16,
}

impl Address {
    /// Creates an address.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// One discovered member endpoint, handed to the membership layer.
///
/// The resolver only ever fills in the private address; the public address
/// and properties exist for the membership layer's benefit and start out
/// empty. Ownership transfers to the caller, which decides node lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveryNode {
    /// Private (cluster-internal) address of the member.
    pub private_address: Address,

    /// Public address; never set by this resolver.
    pub public_address: Option<Address>,

    /// Free-form metadata; never set by this resolver.
    pub properties: BTreeMap<String, String>,
}

impl DiscoveryNode {
    /// Creates a node with only a private address.
    #[must_use]
    pub fn with_private_address(private_address: Address) -> Self {
        Self {
            private_address,
            public_address: None,
            properties: BTreeMap::new(),
        }
    }
}

/// Resolves a service's current endpoints into discovery nodes.
///
/// Construction takes the selection criteria and the API collaborator; the
/// resolver holds no other state, so repeated [`resolve`](Self::resolve)
/// calls against an unchanged cluster return equal lists.
pub struct EndpointResolver<A> {
    config: ResolverConfig,
    api: A,
}

impl<A: EndpointsApi> EndpointResolver<A> {
    /// Creates a resolver over the given criteria and API access.
    #[must_use]
    pub fn new(config: ResolverConfig, api: A) -> Self {
        Self { config, api }
    }

    /// Performs one resolution pass.
    ///
    /// Issues exactly one list call and flattens the response. Records with
    /// absent subsets and subsets with absent addresses contribute nothing;
    /// an address whose port cannot be resolved is dropped rather than
    /// emitted with an undefined port. An empty list is a legitimate
    /// outcome, distinct from an error: the service exists but has no
    /// ready, port-resolvable endpoints.
    ///
    /// # Errors
    ///
    /// Propagates the underlying API failure untouched; whether a failed
    /// resolution is fatal or retryable is the caller's decision.
    pub async fn resolve(&self) -> Result<Vec<DiscoveryNode>, Error> {
        let selector = self.config.label_selector();

        tracing::debug!(
            "listing endpoints in {} (selector: {:?})",
            self.config.namespace,
            selector
        );

        let list = self
            .api
            .list(&self.config.namespace, selector.as_deref())
            .await?;

        let nodes = collect_nodes(&list.items);

        tracing::debug!(
            "resolved {} nodes in {} for {}",
            nodes.len(),
            self.config.namespace,
            self.config.service_name
        );

        Ok(nodes)
    }
}

/// Flattens endpoints records into discovery nodes, preserving API order.
fn collect_nodes(items: &[Endpoints]) -> Vec<DiscoveryNode> {
    let mut nodes = Vec::new();

    for record in items {
        let Some(subsets) = &record.subsets else {
            continue;
        };

        for subset in subsets {
            let Some(addresses) = &subset.addresses else {
                continue;
            };

            for address in addresses {
                if let Some(port) = resolve_port(address, subset) {
                    nodes.push(DiscoveryNode::with_private_address(Address::new(
                        address.ip.clone(),
                        port,
                    )));
                } else {
                    tracing::debug!("no resolvable port for address {}, skipping", address.ip);
                }
            }
        }
    }

    nodes
}

/// Resolves the member port for one address: the annotation on the address
/// itself wins, then a subset port entry named [`SERVICE_PORT_KEY`].
fn resolve_port(address: &EndpointAddress, subset: &EndpointSubset) -> Option<u16> {
    annotation_port(address).or_else(|| subset_port(subset))
}

fn annotation_port(address: &EndpointAddress) -> Option<u16> {
    match address.additional.get(SERVICE_PORT_KEY)? {
        Value::String(port) => port.parse().ok(),
        Value::Number(port) => port.as_u64().and_then(|p| u16::try_from(p).ok()),
        _ => None,
    }
}

fn subset_port(subset: &EndpointSubset) -> Option<u16> {
    subset.ports.as_ref().and_then(|ports| {
        ports
            .iter()
            .find(|p| p.name.as_deref() == Some(SERVICE_PORT_KEY))
            .and_then(|p| p.port)
            .and_then(|p| u16::try_from(p).ok())
    })
}
