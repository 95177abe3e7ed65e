//! Typed error types for the API client.

use std::io;
use std::path::PathBuf;

use svd_core::FetchError;

/// Failures outside of a single definition lookup: building the client,
/// loading credentials, logging in, and persisting the cache.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// `base_url` is not an absolute URL that can carry a path.
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client")]
    Build(#[source] reqwest::Error),

    /// Only one of the two credential variables is set.
    #[error("environment variable {var} is not set")]
    MissingCredential {
        /// The unset variable.
        var: &'static str,
    },

    /// The API rejected the credentials.
    #[error("credentials were rejected by the API")]
    LoginRejected,

    /// A request made while logging in failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The cache file could not be read or written.
    #[error("cache file {}", path.display())]
    StoreIo {
        /// The cache file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The cache file is not a JSON object.
    #[error("cache file {} is not a JSON object", path.display())]
    StoreFormat {
        /// The cache file.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Map a transport-level failure into a [`FetchError`].
pub(crate) fn transport(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Transport(format!("request timed out: {err}"))
    } else {
        FetchError::Transport(err.to_string())
    }
}
