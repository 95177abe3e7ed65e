//! Supibot command parsing core.
//!
//! Turns a command invocation (`$rw words:3`, `$pipe ping | tt fancy`,
//! `$$fish foo bar`) into a fully resolved [`Command`]: typed named
//! parameters, positional arguments, decomposed pipes, and expanded alias
//! invocations. Command metadata and alias definitions come from a
//! [`DefinitionSource`] and are cached in a [`CacheStore`].
//!
//! The main entry point is [`Parser::parse`]; [`params::tokenize`] and
//! [`alias::apply_parameters`] are usable on their own.

#![warn(missing_docs)]

/// Alias invocation shapes and `${...}` template substitution.
pub mod alias;
/// Parsed command types.
pub mod command;
/// Error types.
pub mod error;
/// Language codes for `language` parameters.
pub mod language;
/// Named-parameter tokenizing and value coercion.
pub mod params;
/// Pipe delimiter selection and segment splitting.
pub mod pipe;
/// Metadata and alias resolution, caches, and definition sources.
pub mod resolve;

mod dump;
mod parser;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Parser
pub use parser::{Parser, ParserOptions};

// Data model
pub use command::{
    AliasDefinition, AliasInvocation, AliasLink, Command, CommandMetadata, ParameterDescriptor,
    ParameterType, PipeSlot, Variant,
};
pub use params::{ParamValue, Tokenized};

// Errors
pub use error::{
    AliasLinkError, AliasShapeError, FetchError, ParseError, SubstitutionError, TokenizeError,
};

// Collaborators
pub use language::{IsoLanguages, Language, LanguageLookup};
pub use resolve::{
    CacheStore, DefinitionSource, FixtureSource, MemoryStore, Resolver, Session, StaticSession,
};

// Serialization helpers
pub use dump::to_pretty_json;
