//! Wire shapes of the command and alias lookups.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::command::{AliasDefinition, AliasLink, CommandMetadata, ParameterDescriptor};
use crate::error::FetchError;

/// `{ data, error }` envelope returned by every API endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Payload on success.
    pub data: Option<T>,
    /// Error details on failure.
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// The `error` member of an [`ApiEnvelope`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Human-readable reason.
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Turn the envelope into its payload, or the error it reports.
    ///
    /// `what` names the lookup for the "no data" case.
    pub fn into_result(self, what: &str) -> Result<T, FetchError> {
        if let Some(error) = self.error {
            return Err(FetchError::Api {
                message: error
                    .message
                    .unwrap_or_else(|| "(empty error message)".to_owned()),
            });
        }
        self.data.ok_or_else(|| FetchError::MissingData {
            what: what.to_owned(),
        })
    }
}

/// Command flags, sent either as `{flag: bool}` or as a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagSet {
    /// Flags as an object; only `true` entries are set.
    Map(BTreeMap<String, bool>),
    /// Flags as a list of set names.
    List(Vec<String>),
}

impl Default for FlagSet {
    fn default() -> Self {
        FlagSet::List(Vec::new())
    }
}

impl FlagSet {
    /// The names of the set flags.
    pub fn into_set(self) -> BTreeSet<String> {
        match self {
            FlagSet::Map(map) => map.into_iter().filter(|(_, on)| *on).map(|(k, _)| k).collect(),
            FlagSet::List(list) => list.into_iter().collect(),
        }
    }
}

/// A command's detail record, as served by `/bot/command/detail/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDetailRecord {
    /// Canonical name.
    pub name: String,
    /// Alternative invocation names.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Author, usually `supinic`.
    #[serde(default)]
    pub author: Option<String>,
    /// Cooldown in milliseconds.
    #[serde(default)]
    pub cooldown: Option<u64>,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
    /// Flags.
    #[serde(default)]
    pub flags: FlagSet,
    /// Parameter schema.
    #[serde(default)]
    pub params: Vec<ParameterDescriptor>,
}

impl CommandDetailRecord {
    /// Reshape into [`CommandMetadata`].
    pub fn into_metadata(self) -> CommandMetadata {
        CommandMetadata {
            name: self.name,
            aliases: self.aliases,
            author: self.author.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            cooldown_ms: self.cooldown.unwrap_or_default(),
            flags: self.flags.into_set(),
            params: self.params,
        }
    }
}

/// An alias record, as served by `/bot/user/<user>/alias/detail/<name>`.
///
/// A record is either a definition (`invocation` + `arguments`) or a link
/// to another user's alias (`linkAuthor` + `linkName`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasRecord {
    /// Command the alias runs.
    #[serde(default)]
    pub invocation: Option<String>,
    /// Argument template.
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
    /// Owner of the linked alias.
    #[serde(default)]
    pub link_author: Option<String>,
    /// Name of the linked alias.
    #[serde(default)]
    pub link_name: Option<String>,
}

impl AliasRecord {
    /// A plain definition.
    pub fn definition(invocation: impl Into<String>, arguments: &[&str]) -> Self {
        Self {
            invocation: Some(invocation.into()),
            arguments: Some(arguments.iter().map(|s| s.to_string()).collect()),
            ..Self::default()
        }
    }

    /// A link to `user`'s alias `name`.
    pub fn link(user: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            link_author: Some(user.into()),
            link_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The link target, if this record is a link.
    pub fn link_target(&self) -> Option<AliasLink> {
        match (&self.link_author, &self.link_name) {
            (Some(user), Some(name)) => Some(AliasLink {
                user: user.clone(),
                name: name.clone(),
            }),
            _ => None,
        }
    }

    /// The definition carried by this record, if it has one.
    pub fn into_definition(self) -> Option<AliasDefinition> {
        Some(AliasDefinition {
            invocation: self.invocation?,
            arguments: self.arguments.unwrap_or_default(),
            link: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ParameterType;

    #[test]
    fn detail_with_flag_object() {
        let json = r#"{
            "name": "pipe",
            "aliases": ["|"],
            "author": "supinic",
            "cooldown": 5000,
            "description": "Pipes the result of one command to another.",
            "dynamicDescription": null,
            "flags": {"mention": false, "pipe": false, "whitelist": false, "developer": true},
            "params": [{"name": "_char", "type": "string"}, {"name": "_force", "type": "boolean"}]
        }"#;
        let meta = serde_json::from_str::<CommandDetailRecord>(json)
            .unwrap()
            .into_metadata();
        assert_eq!(meta.name, "pipe");
        assert_eq!(meta.cooldown_ms, 5000);
        assert_eq!(meta.flags.into_iter().collect::<Vec<_>>(), vec!["developer"]);
        assert_eq!(meta.params[0], ParameterDescriptor::new("_char", ParameterType::String));
    }

    #[test]
    fn detail_with_flag_list_and_missing_fields() {
        let json = r#"{"name": "ping", "flags": ["pipe", "mention"]}"#;
        let meta = serde_json::from_str::<CommandDetailRecord>(json)
            .unwrap()
            .into_metadata();
        assert!(meta.has_flag("pipe"));
        assert!(meta.has_flag("mention"));
        assert!(meta.params.is_empty());
        assert_eq!(meta.author, "");
    }

    #[test]
    fn envelope_error_wins() {
        let env: ApiEnvelope<CommandDetailRecord> =
            serde_json::from_str(r#"{"data": null, "error": {"message": "Command does not exist"}}"#)
                .unwrap();
        let err = env.into_result("command \"x\"").unwrap_err();
        assert_eq!(err.to_string(), "Command does not exist");

        let env: ApiEnvelope<CommandDetailRecord> = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(matches!(
            env.into_result("command \"x\""),
            Err(FetchError::MissingData { .. })
        ));
    }

    #[test]
    fn alias_records() {
        let rec: AliasRecord = serde_json::from_str(
            r#"{"name": "fish", "invocation": "rw", "arguments": ["${0+}"], "linkAuthor": null, "linkName": null}"#,
        )
        .unwrap();
        assert_eq!(rec.link_target(), None);
        let def = rec.into_definition().unwrap();
        assert_eq!(def.invocation, "rw");
        assert_eq!(def.arguments, vec!["${0+}"]);

        let rec: AliasRecord = serde_json::from_str(
            r#"{"invocation": null, "arguments": null, "linkAuthor": "quinn", "linkName": "fish"}"#,
        )
        .unwrap();
        assert_eq!(
            rec.link_target(),
            Some(AliasLink {
                user: "quinn".into(),
                name: "fish".into()
            })
        );
        assert!(rec.into_definition().is_none());
    }
}
