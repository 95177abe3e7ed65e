//! Offline [`DefinitionSource`] backed by an in-memory fixture document.
//!
//! Fixture document shape:
//!
//! ```json
//! {
//!   "commands": [{ "name": "pipe", "aliases": ["|"], "params": [{"name": "_char", "type": "string"}] }],
//!   "aliases": [{ "user": "quinn", "name": "fish", "invocation": "rw", "arguments": ["${0+}"] }]
//! }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;

use super::DefinitionSource;
use super::records::{AliasRecord, CommandDetailRecord};
use crate::error::FetchError;

/// Error loading a fixture document.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The document is not valid JSON or has the wrong shape.
    #[error("invalid fixture document: {0}")]
    Json(#[from] serde_json::Error),

    /// Two commands answer to the same invocation name.
    #[error("invocation name `{name}` is claimed by more than one command")]
    DuplicateName {
        /// The clashing name (lower-cased).
        name: String,
    },
}

#[derive(Deserialize)]
struct FixtureDocument {
    #[serde(default)]
    commands: Vec<CommandDetailRecord>,
    #[serde(default)]
    aliases: Vec<FixtureAlias>,
}

#[derive(Deserialize)]
struct FixtureAlias {
    user: String,
    name: String,
    #[serde(flatten)]
    record: AliasRecord,
}

/// A fixed set of command and alias records.
///
/// Commands are found by canonical name or any of their aliases,
/// case-insensitively. Misses answer like the live API does, with
/// [`FetchError::Api`].
#[derive(Debug, Default)]
pub struct FixtureSource {
    commands: Vec<CommandDetailRecord>,
    aliases: Vec<(String, String, AliasRecord)>,
    fetches: AtomicUsize,
}

impl FixtureSource {
    /// An empty source; every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fixture document.
    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        let doc: FixtureDocument = serde_json::from_str(json)?;

        let mut seen = std::collections::BTreeSet::new();
        for cmd in &doc.commands {
            for name in std::iter::once(&cmd.name).chain(&cmd.aliases) {
                let name = name.to_lowercase();
                if !seen.insert(name.clone()) {
                    return Err(FixtureError::DuplicateName { name });
                }
            }
        }

        let mut source = Self::new();
        source.commands = doc.commands;
        for alias in doc.aliases {
            source = source.with_alias(alias.user, alias.name, alias.record);
        }
        Ok(source)
    }

    /// Add a command record.
    pub fn with_command(mut self, record: CommandDetailRecord) -> Self {
        self.commands.push(record);
        self
    }

    /// Add `user`'s alias `name`.
    pub fn with_alias(
        mut self,
        user: impl Into<String>,
        name: impl Into<String>,
        record: AliasRecord,
    ) -> Self {
        self.aliases
            .push((user.into().to_lowercase(), name.into(), record));
        self
    }

    /// Number of lookups served so far, hits and misses alike.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl DefinitionSource for FixtureSource {
    fn command_detail(&self, name: &str) -> Result<CommandDetailRecord, FetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let name = name.to_lowercase();
        self.commands
            .iter()
            .find(|c| {
                c.name.to_lowercase() == name || c.aliases.iter().any(|a| a.to_lowercase() == name)
            })
            .cloned()
            .ok_or_else(|| FetchError::Api {
                message: format!("Command \"{name}\" does not exist"),
            })
    }

    fn alias_detail(&self, user: &str, name: &str) -> Result<AliasRecord, FetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let user = user.to_lowercase();
        self.aliases
            .iter()
            .find(|(u, n, _)| *u == user && n == name)
            .map(|(_, _, record)| record.clone())
            .ok_or_else(|| FetchError::Api {
                message: format!("User \"{user}\" has no alias \"{name}\""),
            })
    }
}
