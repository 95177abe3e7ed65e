//! API credentials and how they are attached to requests.

use std::fmt;

use url::Url;

use crate::ClientError;

/// Environment variable holding the supibot user ID.
pub const USER_ID_VAR: &str = "SVD_USER_ID";
/// Environment variable holding the supinic.com API key.
pub const API_KEY_VAR: &str = "SVD_API_KEY";
/// Environment variable holding the supibot username, if known.
pub const USERNAME_VAR: &str = "SVD_USERNAME";

const AUTH_USER_PARAM: &str = "auth_user";
const AUTH_KEY_PARAM: &str = "auth_key";

/// Supibot user ID plus API key, and the username once it is known.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Supibot user ID.
    pub user_id: String,
    /// supinic.com API key.
    pub api_key: String,
    /// Username within supibot.
    pub username: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("api_key", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

impl Credentials {
    /// Credentials without a known username.
    pub fn new(user_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            api_key: api_key.into(),
            username: None,
        }
    }

    /// Set the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Option<Self>, ClientError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read credentials through `get`. Empty values count as unset.
    ///
    /// Returns `Ok(None)` when neither the user ID nor the key is set, and
    /// an error when only one of them is.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Option<Self>, ClientError> {
        let read = |var: &str| get(var).filter(|v| !v.trim().is_empty());
        let creds = match (read(USER_ID_VAR), read(API_KEY_VAR)) {
            (None, None) => return Ok(None),
            (Some(_), None) => return Err(ClientError::MissingCredential { var: API_KEY_VAR }),
            (None, Some(_)) => return Err(ClientError::MissingCredential { var: USER_ID_VAR }),
            (Some(user_id), Some(api_key)) => Self::new(user_id, api_key),
        };
        Ok(Some(Self {
            username: read(USERNAME_VAR),
            ..creds
        }))
    }

    /// Set the `auth_user` / `auth_key` query parameters on `url`,
    /// replacing any already present.
    pub(crate) fn apply(&self, url: &mut Url) {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != AUTH_USER_PARAM && k != AUTH_KEY_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(AUTH_USER_PARAM, &self.user_id)
            .append_pair(AUTH_KEY_PARAM, &self.api_key);
    }
}
