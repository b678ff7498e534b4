#![deny(missing_docs)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Kubernetes endpoints-based member discovery for cluster membership layers.
//!
//! Clustered systems running on Kubernetes need to find their peers before
//! they can form a cluster. This crate resolves the current set of
//! network-reachable member endpoints by listing the endpoints resource in a
//! namespace (optionally narrowed by a label selector) and flattening the
//! response into plain address/port records for the host's membership layer.
//!
//! # Features
//!
//! - **One-shot resolution**: each [`EndpointResolver::resolve`] call is a
//!   fresh query; no caches, no watches, no retries
//! - **Tolerant of partial data**: services with no backing pods, no ready
//!   addresses, or no resolvable port simply contribute nothing
//! - **Injected API access**: the Kubernetes client collaborator is a
//!   constructor parameter, trivially substitutable in tests
//!
//! # Usage
//!
//! ```ignore
//! use discovery_k8s::{
//!     client_from_token, read_file_contents, EndpointResolver, KubeEndpointsApi,
//!     ResolverConfig,
//! };
//!
//! let token = read_file_contents("/var/run/secrets/kubernetes.io/serviceaccount/token")?;
//! let client = client_from_token("https://kubernetes.default.svc", token.trim())?;
//!
//! let config = ResolverConfig::new("my-service", "prod").with_label("cluster", "payments");
//! let resolver = EndpointResolver::new(config, KubeEndpointsApi::new(client));
//!
//! // Empty means "no ready endpoints right now", not failure.
//! let nodes = resolver.resolve().await?;
//! for node in nodes {
//!     println!("member at {}:{}", node.private_address.host, node.private_address.port);
//! }
//! ```

mod config;
mod error;
mod k8s;
mod resolver;

pub use config::{ResolverConfig, read_file_contents};
pub use error::Error;
pub use k8s::{
    EndpointAddress, EndpointPort, EndpointSubset, Endpoints, EndpointsApi, EndpointsList,
    KubeEndpointsApi, SERVICE_PORT_KEY, client_from_token,
};
pub use resolver::{Address, DiscoveryNode, EndpointResolver};
