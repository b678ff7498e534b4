//! Resolver selection criteria and credential helpers.

use std::fs;
use std::path::Path;

use crate::error::Error;

/// Selection criteria for endpoint resolution.
///
/// A configuration names the namespace to list endpoints in and, optionally,
/// a label selector narrowing the listing to one service's endpoints. The
/// label key and value always travel together; [`ResolverConfig::from_parts`]
/// rejects a partial pair at construction time.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Name of the service being resolved. Informational only; it is never
    /// used to filter the listing.
    pub service_name: String,

    /// The Kubernetes namespace to list endpoints in.
    pub namespace: String,

    /// Optional `(key, value)` label pair narrowing the listing.
    pub label: Option<(String, String)>,
}

impl ResolverConfig {
    /// Creates a configuration that resolves all endpoints in `namespace`.
    #[must_use]
    pub fn new(service_name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            namespace: namespace.into(),
            label: None,
        }
    }

    /// Narrows the listing to endpoints labeled `key=value`.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.label = Some((key.into(), value.into()));
        self
    }

    /// Assembles a configuration from independently sourced parts, e.g.
    /// deployment properties where the label key and value arrive as two
    /// separate optional settings.
    ///
    /// Empty strings count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PartialLabelSelector`] when only one of the label
    /// key and value is set; the "label vs. no-label" listing is a binary
    /// choice the resolver cannot arbitrate at call time.
    pub fn from_parts(
        service_name: impl Into<String>,
        label_key: Option<String>,
        label_value: Option<String>,
        namespace: impl Into<String>,
    ) -> Result<Self, Error> {
        let key = label_key.filter(|k| !k.is_empty());
        let value = label_value.filter(|v| !v.is_empty());

        let label = match (key, value) {
            (Some(key), Some(value)) => Some((key, value)),
            (None, None) => None,
            _ => return Err(Error::PartialLabelSelector),
        };

        Ok(Self {
            service_name: service_name.into(),
            namespace: namespace.into(),
            label,
        })
    }

    /// The `key=value` selector string for the API query, if labeled.
    pub(crate) fn label_selector(&self) -> Option<String> {
        self.label.as_ref().map(|(key, value)| format!("{key}={value}"))
    }
}

/// Reads a small UTF-8 text file and returns its contents exactly.
///
/// Used to load the service-account token mounted into the pod; the caller
/// typically trims the trailing newline before handing the token to
/// [`client_from_token`](crate::client_from_token).
///
/// # Errors
///
/// Returns [`Error::TokenFile`] when the path is unreadable or its contents
/// are not valid UTF-8.
pub fn read_file_contents(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| Error::TokenFile {
        path: path.to_path_buf(),
        source,
    })
}
