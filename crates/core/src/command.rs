//! Parsed command types: metadata, invocations, and the pipe/alias variants.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::params::ParamValue;
use crate::pipe::Delimiter;

/// Declared type of a named parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Free text. An implicit (unquoted) empty value is rejected.
    String,
    /// A finite number.
    Number,
    /// Literal `true` or `false`.
    Boolean,
    /// A calendar date or timestamp.
    Date,
    /// `key=value` pairs, accumulated per parameter.
    Object,
    /// A `/body/flags` regular expression.
    Regex,
    /// A language code or name.
    Language,
}

impl ParameterType {
    /// The type name as written in a command's schema.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Date => "date",
            ParameterType::Object => "object",
            ParameterType::Regex => "regex",
            ParameterType::Language => "language",
        }
    }
}

/// A single entry of a command's parameter schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name, matched exactly before the `:`.
    pub name: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub kind: ParameterType,
}

impl ParameterDescriptor {
    /// Build a descriptor.
    pub fn new(name: impl Into<String>, kind: ParameterType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Static definition of a command, as resolved from its invocation name.
///
/// Fetched once per name and cached for the lifetime of the process;
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandMetadata {
    /// Canonical command name (e.g. `"pipe"` for `|`).
    pub name: String,
    /// Alternative invocation names.
    pub aliases: Vec<String>,
    /// The command's author.
    pub author: String,
    /// Short description.
    pub description: String,
    /// Default cooldown in milliseconds.
    pub cooldown_ms: u64,
    /// Flags that are set for this command.
    pub flags: BTreeSet<String>,
    /// Ordered parameter schema.
    pub params: Vec<ParameterDescriptor>,
}

impl CommandMetadata {
    /// Look up a declared parameter by exact name.
    pub fn param(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Whether `flag` is set for this command.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}

/// Typed named-parameter values, keyed by declared name.
pub type Parameters = BTreeMap<String, ParamValue>;

/// A fully parsed command invocation.
///
/// Every call to [`crate::Parser::parse`] builds a fresh value; nothing in
/// it is shared with other parses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// The name used to invoke the command (after prefix rewriting).
    pub invocation: String,
    /// Static information about the command.
    pub metadata: CommandMetadata,
    /// Arguments exactly as given, before tokenizing.
    pub raw_arguments: Vec<String>,
    /// Positional arguments left after parameters were taken out.
    pub arguments: Vec<String>,
    /// Named parameters that were present.
    pub parameters: Parameters,
    /// Command-specific structure.
    pub variant: Variant,
}

impl Command {
    /// The pipe structure, if this is a pipe.
    pub fn pipe(&self) -> Option<&PipeData> {
        match &self.variant {
            Variant::Pipe(data) => Some(data),
            _ => None,
        }
    }

    /// The alias structure, if this is an alias invocation.
    pub fn alias(&self) -> Option<&AliasInvocation> {
        match &self.variant {
            Variant::Alias(data) => Some(data),
            _ => None,
        }
    }
}

/// Command-specific data, chosen by the command's name and argument shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variant {
    /// An ordinary command.
    None,
    /// The `pipe` command.
    Pipe(PipeData),
    /// The `alias` command used to run an alias (`$$name`, `alias run`, `alias try`).
    Alias(Box<AliasInvocation>),
}

/// Decomposed pipe: the sub-invocations in the order they were written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeData {
    /// The delimiter the arguments were split on.
    pub delimiter: Delimiter,
    /// One slot per segment.
    pub subcommands: Vec<PipeSlot>,
}

/// A single pipe segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipeSlot {
    /// The segment was parsed.
    Resolved {
        /// Segment command name.
        invocation: String,
        /// Segment arguments.
        args: Vec<String>,
        /// The parsed segment.
        command: Box<Command>,
    },
    /// A nested `pipe`; its boundaries depend on values only known while
    /// the outer pipe runs, so it is left unparsed.
    Deferred {
        /// Always `"pipe"`.
        invocation: String,
        /// Segment arguments, unparsed.
        args: Vec<String>,
    },
}

impl PipeSlot {
    /// The segment's command name.
    pub fn invocation(&self) -> &str {
        match self {
            PipeSlot::Resolved { invocation, .. } | PipeSlot::Deferred { invocation, .. } => {
                invocation
            }
        }
    }

    /// The parsed segment, unless deferred.
    pub fn command(&self) -> Option<&Command> {
        match self {
            PipeSlot::Resolved { command, .. } => Some(command),
            PipeSlot::Deferred { .. } => None,
        }
    }
}

/// A `(user, name)` pointer from one alias to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AliasLink {
    /// Owner of the target alias.
    pub user: String,
    /// Name of the target alias.
    pub name: String,
}

/// What an alias expands to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasDefinition {
    /// The command the alias runs.
    pub invocation: String,
    /// Argument template, including unresolved `${...}` tokens.
    pub arguments: Vec<String>,
    /// Set when the definition was reached through a link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<AliasLink>,
}

/// An invocation in its unparsed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unparsed {
    /// Command name.
    pub invocation: String,
    /// Arguments.
    pub args: Vec<String>,
}

/// The command an alias invocation is equivalent to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandEquivalent {
    /// The template applied to the caller's input.
    pub unparsed: Unparsed,
    /// That invocation, parsed.
    pub parsed: Box<Command>,
}

/// Data about an alias being run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasInvocation {
    /// The user the alias belongs to (not necessarily its creator).
    pub alias_user: String,
    /// The alias name.
    pub alias_name: String,
    /// Arguments passed to the alias.
    pub alias_input: Vec<String>,
    /// The resolved definition.
    pub alias_definition: AliasDefinition,
    /// The command the alias expands to.
    pub command_equivalent: CommandEquivalent,
}
