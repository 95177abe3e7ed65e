//! Resolving command metadata and alias definitions through a cache.

mod cache;
mod fixture;
mod records;

pub use cache::{CacheStore, MemoryStore, alias_key, command_key};
pub use fixture::{FixtureError, FixtureSource};
pub use records::{AliasRecord, ApiEnvelope, ApiErrorBody, CommandDetailRecord, FlagSet};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::command::{AliasDefinition, CommandMetadata};
use crate::error::{AliasLinkError, FetchError, ParseError};

// ── Collaborator traits ─────────────────────────────────────────────────

/// Where command and alias definitions come from.
///
/// Implementations may block (e.g. on an HTTP request); the parser treats
/// every call as a plain function call.
pub trait DefinitionSource: Send + Sync {
    /// Fetch a command's detail record by invocation name.
    fn command_detail(&self, name: &str) -> Result<CommandDetailRecord, FetchError>;

    /// Fetch `user`'s alias `name`.
    fn alias_detail(&self, user: &str, name: &str) -> Result<AliasRecord, FetchError>;
}

/// The identity the parse runs as.
pub trait Session: Send + Sync {
    /// Username of the logged-in user; owns `$$name` aliases and is the
    /// `${executor}`.
    fn current_user(&self) -> &str;
}

/// A [`Session`] with a fixed username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSession(pub String);

impl Session for StaticSession {
    fn current_user(&self) -> &str {
        &self.0
    }
}

// ── Resolver ────────────────────────────────────────────────────────────

/// Cache-first lookup of command metadata and alias definitions.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    source: &'a dyn DefinitionSource,
    cache: &'a dyn CacheStore,
}

impl<'a> Resolver<'a> {
    /// Build a resolver over `source`, caching into `cache`.
    pub fn new(source: &'a dyn DefinitionSource, cache: &'a dyn CacheStore) -> Self {
        Self { source, cache }
    }

    /// Metadata for the command invoked as `name` (case-insensitive).
    ///
    /// Served from the cache when present; otherwise fetched once and
    /// stored. Fetch failures are returned as-is and not retried.
    pub fn resolve_metadata(&self, name: &str) -> Result<CommandMetadata, ParseError> {
        if name.is_empty() {
            return Err(ParseError::EmptyInvocation);
        }
        let name = name.to_lowercase();
        let key = command_key(&name);

        if let Some(meta) = self.cached::<CommandMetadata>(&key) {
            tracing::debug!(command = %name, "command detail cache hit");
            return Ok(meta);
        }

        tracing::debug!(command = %name, "command detail cache miss");
        let meta = self.source.command_detail(&name)?.into_metadata();
        self.store(&key, &meta);
        Ok(meta)
    }

    /// The definition of `user`'s alias `name`.
    ///
    /// A link record is followed exactly once; the final definition is
    /// cached under both the link's key and its target's key. A link whose
    /// target is itself a link is rejected.
    pub fn resolve_alias(&self, user: &str, name: &str) -> Result<AliasDefinition, ParseError> {
        let user = user.to_lowercase();
        let key = alias_key(&user, name);

        if let Some(def) = self.cached::<AliasDefinition>(&key) {
            tracing::debug!(%user, alias = %name, "alias cache hit");
            return Ok(def);
        }

        tracing::debug!(%user, alias = %name, "alias cache miss");
        let record = self.source.alias_detail(&user, name)?;

        let Some(link) = record.link_target() else {
            let def = record.into_definition().ok_or_else(|| AliasLinkError::Empty {
                user: user.clone(),
                name: name.to_owned(),
            })?;
            self.store(&key, &def);
            return Ok(def);
        };

        tracing::debug!(%user, alias = %name, target_user = %link.user, target = %link.name, "following alias link");
        let target_user = link.user.to_lowercase();
        let target_key = alias_key(&target_user, &link.name);
        let target = match self.cached::<AliasDefinition>(&target_key) {
            // A cached entry carrying a link was itself reached through one.
            Some(def) if def.link.is_some() => {
                return Err(AliasLinkError::ChainedLink {
                    user: target_user,
                    name: link.name,
                }
                .into());
            }
            Some(def) => def,
            None => {
                let target = self.source.alias_detail(&target_user, &link.name)?;
                if target.link_target().is_some() {
                    return Err(AliasLinkError::ChainedLink {
                        user: target_user,
                        name: link.name,
                    }
                    .into());
                }
                let def = target.into_definition().ok_or_else(|| AliasLinkError::Empty {
                    user: target_user.clone(),
                    name: link.name.clone(),
                })?;
                self.store(&target_key, &def);
                def
            }
        };

        let linked = AliasDefinition {
            link: Some(link),
            ..target
        };
        self.store(&key, &linked);
        Ok(linked)
    }

    fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.cache.get(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!(%key, error = %e, "ignoring unreadable cache entry");
                None
            }
        }
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(v) => self.cache.put(key, v),
            Err(e) => tracing::warn!(%key, error = %e, "could not cache entry"),
        }
    }
}
