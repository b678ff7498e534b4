//! Raw Kubernetes endpoints wire model and API access.
//!
//! The core/v1 endpoints resource is modeled with the crate's own serde
//! structs rather than the generated API types: the member port may arrive
//! as an out-of-band annotation on an individual address, and only a
//! flattened catch-all map preserves such properties through
//! deserialization. Null and absent fields both collapse to `None`; the
//! resolver treats either as "contributes nothing".

use std::collections::BTreeMap;

use async_trait::async_trait;
use http::Uri;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::ListParams;
use kube::core::Request;
use kube::{Client, Config};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// Well-known key carrying the member port.
///
/// Looked up first among an address's additional properties, then as the
/// name of a structured port entry on the enclosing subset.
pub const SERVICE_PORT_KEY: &str = "discovery-service-port";

/// A list of endpoints records, as returned by the namespace listing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EndpointsList {
    /// Records in the listing; typically one per matching service.
    #[serde(default)]
    pub items: Vec<Endpoints>,
}

/// One endpoints record: a named object holding a service's backing
/// addresses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Endpoints {
    /// Standard object metadata; the record is named after its service.
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Address groupings; absent when the service has no backing pods.
    #[serde(default)]
    pub subsets: Option<Vec<EndpointSubset>>,
}

/// A grouping of addresses sharing the same port configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EndpointSubset {
    /// Ready addresses; absent when no pods are ready.
    #[serde(default)]
    pub addresses: Option<Vec<EndpointAddress>>,

    /// Structured port entries exposed by the subset.
    #[serde(default)]
    pub ports: Option<Vec<EndpointPort>>,
}

/// A single reachable address within a subset.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EndpointAddress {
    /// IP of the backing pod, carried verbatim.
    #[serde(default)]
    pub ip: String,

    /// Whatever further properties the API response attached to the
    /// address; the [`SERVICE_PORT_KEY`] annotation lives here.
    #[serde(flatten)]
    pub additional: BTreeMap<String, Value>,
}

/// A named port entry on a subset.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EndpointPort {
    /// Port name; matched against [`SERVICE_PORT_KEY`] during fallback
    /// resolution.
    #[serde(default)]
    pub name: Option<String>,

    /// Port number.
    #[serde(default)]
    pub port: Option<i32>,
}

/// Listing access to the endpoints resource.
///
/// The resolver takes an implementation at construction; production code
/// passes [`KubeEndpointsApi`], tests pass a canned stand-in. No mocking
/// hooks are needed.
#[async_trait]
pub trait EndpointsApi {
    /// Lists endpoints in `namespace`, optionally narrowed by a
    /// `key=value` label selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] when the underlying call fails; the caller
    /// decides whether that is fatal or retryable.
    async fn list(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<EndpointsList, Error>;
}

/// Endpoints access backed by a [`kube::Client`].
///
/// The client is externally owned and cheap to clone; one client may back
/// any number of concurrent resolutions.
#[derive(Clone)]
pub struct KubeEndpointsApi {
    client: Client,
}

impl KubeEndpointsApi {
    /// Wraps an already-constructed client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EndpointsApi for KubeEndpointsApi {
    async fn list(
        &self,
        namespace: &str,
        label_selector: Option<&str>,
    ) -> Result<EndpointsList, Error> {
        let mut params = ListParams::default();
        if let Some(selector) = label_selector {
            params = params.labels(selector);
        }

        // A raw typed request rather than Api<Endpoints>: the generated
        // address type has no catch-all for additional properties.
        let request =
            Request::new(format!("/api/v1/namespaces/{namespace}/endpoints")).list(&params)?;

        Ok(self.client.request(request).await?)
    }
}

/// Builds an authenticated client from a cluster API url and bearer token.
///
/// The token is typically the mounted service-account token, loaded via
/// [`read_file_contents`](crate::read_file_contents). TLS verification and
/// timeouts follow [`Config`] defaults.
///
/// # Errors
///
/// Returns [`Error::InvalidApiUrl`] when `api_url` does not parse, and
/// [`Error::Api`] when client construction fails.
pub fn client_from_token(api_url: &str, token: &str) -> Result<Client, Error> {
    let cluster_url: Uri = api_url.parse()?;

    let mut config = Config::new(cluster_url);
    config.auth_info.token = Some(SecretString::from(token.to_string()));

    Ok(Client::try_from(config)?)
}
