//! Blocking HTTP [`DefinitionSource`] for the supinic.com API.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use svd_core::resolve::{AliasRecord, ApiEnvelope, CommandDetailRecord};
use svd_core::{DefinitionSource, FetchError, StaticSession};
use url::{Origin, Url};

use crate::error::transport;
use crate::{ClientConfig, ClientError, Credentials};

/// Client for the supinic.com bot API.
///
/// When credentials are present every request is authenticated with the
/// `auth_user` / `auth_key` query parameters; authenticated requests are
/// refused for any origin other than the configured one.
#[derive(Debug)]
pub struct SupinicClient {
    http: reqwest::blocking::Client,
    base: Url,
    origin: Origin,
    credentials: Option<Credentials>,
}

#[derive(Deserialize)]
struct ResolvedUser {
    name: String,
}

impl SupinicClient {
    /// Build a client without credentials.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let invalid = || ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
        };
        let base = Url::parse(&config.base_url).map_err(|_| invalid())?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(invalid());
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            origin: base.origin(),
            base,
            credentials: None,
        })
    }

    /// Attach credentials.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// The attached credentials, if any.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    // ── URLs ────────────────────────────────────────────────────────────

    /// `<base>/api/<segments...>`, each segment percent-encoded.
    pub fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects bases that cannot carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    /// URL of a command's detail record.
    pub fn command_detail_url(&self, name: &str) -> Url {
        self.api_url(&["bot", "command", "detail", name])
    }

    /// URL of a user's alias record.
    pub fn alias_detail_url(&self, user: &str, name: &str) -> Url {
        self.api_url(&["bot", "user", user, "alias", "detail", name])
    }

    /// Add the credentials to `url`.
    ///
    /// Fails when there are no credentials or when `url` is on a different
    /// origin than the configured base URL.
    pub fn authorize(&self, mut url: Url) -> Result<Url, FetchError> {
        let credentials = self.credentials.as_ref().ok_or(FetchError::NotLoggedIn)?;
        if url.origin() != self.origin {
            return Err(FetchError::ForeignOrigin {
                origin: url.origin().ascii_serialization(),
            });
        }
        credentials.apply(&mut url);
        Ok(url)
    }

    // ── Requests ────────────────────────────────────────────────────────

    fn get(&self, url: Url) -> Result<reqwest::blocking::Response, FetchError> {
        tracing::debug!(path = url.path(), authed = self.credentials.is_some(), "GET");
        let url = match self.credentials {
            Some(_) => self.authorize(url)?,
            None => url,
        };
        self.http.get(url).send().map_err(transport)
    }

    fn get_data<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T, FetchError> {
        let response = self.get(url)?;
        let status = response.status();
        let body = response.text().map_err(transport)?;
        tracing::debug!(%status, bytes = body.len(), "response");

        match serde_json::from_str::<ApiEnvelope<T>>(&body) {
            Ok(envelope) => envelope.into_result(what),
            Err(_) if !status.is_success() => Err(FetchError::Api {
                message: format!("HTTP {status}"),
            }),
            Err(e) => Err(FetchError::Decode(e)),
        }
    }

    /// Check the credentials against the API.
    ///
    /// `Ok(false)` means the API refused them; server errors are returned
    /// as [`FetchError::Api`].
    pub fn verify_login(&self) -> Result<bool, FetchError> {
        let url = self.authorize(self.api_url(&["test", "auth"]))?;
        tracing::debug!(path = url.path(), "verifying credentials");
        let status = self.http.get(url).send().map_err(transport)?.status();
        if status.is_server_error() {
            return Err(FetchError::Api {
                message: format!("could not verify authorization: HTTP {status}"),
            });
        }
        Ok(status.is_success())
    }

    /// Look up the username belonging to a supibot user ID.
    pub fn resolve_username(&self, user_id: &str) -> Result<String, FetchError> {
        let url = self.api_url(&["bot", "user", "resolve", "ID", user_id]);
        let user: ResolvedUser = self.get_data(url, &format!("user ID {user_id}"))?;
        Ok(user.name)
    }

    /// Verify the attached credentials and work out who they belong to.
    ///
    /// A username already present in the credentials is trusted as-is.
    pub fn login(&mut self) -> Result<StaticSession, ClientError> {
        let credentials = self.credentials.clone().ok_or(FetchError::NotLoggedIn)?;
        if !self.verify_login()? {
            return Err(ClientError::LoginRejected);
        }
        let username = match credentials.username {
            Some(name) => name,
            None => {
                let name = self.resolve_username(&credentials.user_id)?;
                if let Some(c) = self.credentials.as_mut() {
                    c.username = Some(name.clone());
                }
                name
            }
        };
        tracing::debug!(%username, "logged in");
        Ok(StaticSession(username))
    }
}

impl DefinitionSource for SupinicClient {
    fn command_detail(&self, name: &str) -> Result<CommandDetailRecord, FetchError> {
        self.get_data(self.command_detail_url(name), &format!("command \"{name}\""))
    }

    fn alias_detail(&self, user: &str, name: &str) -> Result<AliasRecord, FetchError> {
        self.get_data(
            self.alias_detail_url(user, name),
            &format!("alias \"{name}\" of user \"{user}\""),
        )
    }
}
