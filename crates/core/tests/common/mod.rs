//! Shared test helpers for `svd_core` integration tests.

#![allow(dead_code, unreachable_pub)]

use std::sync::Mutex;

use svd_core::error::FetchError;
use svd_core::resolve::{AliasRecord, CommandDetailRecord};
use svd_core::{
    DefinitionSource, FixtureSource, IsoLanguages, MemoryStore, Parser, ParserOptions, Resolver,
    StaticSession,
};

/// Commands and aliases shared by the integration tests.
pub const FIXTURES: &str = r#"{
    "commands": [
        {"name": "ping", "aliases": ["pang", "peng"], "author": "supinic", "cooldown": 5000},
        {"name": "alias", "aliases": ["$"], "cooldown": 2500},
        {
            "name": "pipe",
            "aliases": ["|"],
            "flags": {"developer": true, "pipe": false},
            "params": [{"name": "_char", "type": "string"}, {"name": "_force", "type": "boolean"}]
        },
        {"name": "randomword", "aliases": ["rw"], "params": [{"name": "words", "type": "number"}]},
        {"name": "texttransform", "aliases": ["tt"], "flags": ["pipe"]},
        {
            "name": "remind",
            "params": [{"name": "at", "type": "date"}, {"name": "private", "type": "boolean"}]
        },
        {
            "name": "translate",
            "params": [
                {"name": "from", "type": "language"},
                {"name": "to", "type": "language"},
                {"name": "confidence", "type": "boolean"}
            ]
        },
        {"name": "randomline", "aliases": ["rl"], "params": [{"name": "regex", "type": "regex"}]},
        {"name": "news", "params": [{"name": "filter", "type": "object"}, {"name": "source", "type": "string"}]}
    ],
    "aliases": [
        {"user": "me", "name": "fish", "invocation": "rw", "arguments": ["words:${0}", "${1+}"]},
        {"user": "me", "name": "greet", "invocation": "pipe", "arguments": ["ping", "|", "tt", "fancy", "${executor}", "in", "${channel}"]},
        {"user": "me", "name": "both", "invocation": "tt", "arguments": ["${-1}", "${0..-1}"]},
        {"user": "quinn", "name": "shout", "invocation": "tt", "arguments": ["uppercase", "${0+}"]},
        {"user": "me", "name": "qs", "linkAuthor": "quinn", "linkName": "shout"},
        {"user": "me", "name": "chain", "linkAuthor": "me", "linkName": "qs"},
        {"user": "me", "name": "loop", "invocation": "$", "arguments": ["loop"]},
        {"user": "me", "name": "bad", "invocation": "ping", "arguments": ["${0..2+}"]}
    ]
}"#;

/// The fixture document as a [`FixtureSource`].
pub fn fixtures() -> FixtureSource {
    FixtureSource::from_json_str(FIXTURES).unwrap_or_else(|e| panic!("bad fixtures: {e}"))
}

/// Split on single spaces, the way a console line is split.
pub fn args(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }
    line.split(' ').map(str::to_owned).collect()
}

/// A [`DefinitionSource`] that records every lookup it forwards.
pub struct Counting<S> {
    inner: S,
    pub calls: Mutex<Vec<String>>,
}

impl<S> Counting<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The recorded lookups, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl<S: DefinitionSource> DefinitionSource for Counting<S> {
    fn command_detail(&self, name: &str) -> Result<CommandDetailRecord, FetchError> {
        self.calls.lock().unwrap().push(format!("command:{name}"));
        self.inner.command_detail(name)
    }

    fn alias_detail(&self, user: &str, name: &str) -> Result<AliasRecord, FetchError> {
        self.calls.lock().unwrap().push(format!("alias:{user}/{name}"));
        self.inner.alias_detail(user, name)
    }
}

/// Everything a [`Parser`] borrows, owned in one place.
pub struct Harness {
    pub source: Counting<FixtureSource>,
    pub cache: MemoryStore,
    pub session: StaticSession,
    pub options: ParserOptions,
}

impl Harness {
    /// Fixture-backed harness running as user `me`.
    pub fn new() -> Self {
        Self {
            source: Counting::new(fixtures()),
            cache: MemoryStore::new(),
            session: StaticSession("me".into()),
            options: ParserOptions::default(),
        }
    }

    /// A parser over this harness.
    pub fn parser(&self) -> Parser<'_> {
        Parser::new(
            Resolver::new(&self.source, &self.cache),
            &self.session,
            &IsoLanguages,
        )
        .with_options(self.options.clone())
    }
}
