//! Crate error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while configuring or running endpoint resolution.
#[derive(Debug, Error)]
pub enum Error {
    /// A label key was supplied without a value, or vice versa.
    #[error("label key and label value must be provided together")]
    PartialLabelSelector,

    /// The cluster API url could not be parsed.
    #[error("invalid cluster API url: {0}")]
    InvalidApiUrl(#[from] http::uri::InvalidUri),

    /// The endpoints list request could not be constructed.
    #[error("failed to build endpoints list request: {0}")]
    BuildRequest(#[from] kube::core::request::Error),

    /// The Kubernetes API call failed (transport, authentication, or
    /// response decoding).
    #[error("endpoints list request failed: {0}")]
    Api(#[from] kube::Error),

    /// The token file could not be read.
    #[error("failed to read token file {}: {source}", path.display())]
    TokenFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
}
