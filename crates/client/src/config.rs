//! Configuration types for the API client.

use std::time::Duration;

/// Default API origin.
pub const DEFAULT_BASE_URL: &str = "https://supinic.com";

/// How to reach the supinic.com API.
///
/// Authenticated requests are only ever sent to the origin of
/// `base_url`.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme, host, and optional path prefix of the API.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(10),
            user_agent: format!("svd/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
