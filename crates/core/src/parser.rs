//! The parse orchestrator: from an invocation and its arguments to a
//! fully resolved [`Command`].

use crate::alias::{self, ALIAS};
use crate::command::{
    AliasInvocation, Command, CommandEquivalent, Parameters, PipeData, PipeSlot, Unparsed, Variant,
};
use crate::error::ParseError;
use crate::language::LanguageLookup;
use crate::params::{self, ParamValue};
use crate::pipe::{self, CHAR_PARAMETER, PIPE};
use crate::resolve::{Resolver, Session};

/// Knobs for a [`Parser`].
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// The privileged prefix character. `$name` is shorthand for running
    /// the `$` command with `name` as its first argument.
    pub prefix: char,
    /// Maximum nesting of alias expansions and pipe segments.
    pub max_depth: usize,
    /// Channel substituted for `${channel}`; `None` means private messages.
    pub channel: Option<String>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            prefix: '$',
            max_depth: 16,
            channel: None,
        }
    }
}

/// Parses command invocations, resolving metadata and aliases on the way.
pub struct Parser<'a> {
    resolver: Resolver<'a>,
    session: &'a dyn Session,
    languages: &'a dyn LanguageLookup,
    options: ParserOptions,
}

impl<'a> Parser<'a> {
    /// A parser with default [`ParserOptions`].
    pub fn new(
        resolver: Resolver<'a>,
        session: &'a dyn Session,
        languages: &'a dyn LanguageLookup,
    ) -> Self {
        Self {
            resolver,
            session,
            languages,
            options: ParserOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse `invocation` with `args`.
    ///
    /// Pipe segments and alias expansions are parsed recursively; the first
    /// failure anywhere aborts the whole parse.
    pub fn parse(&self, invocation: &str, args: &[String]) -> Result<Command, ParseError> {
        self.parse_at(invocation, args, 0)
    }

    /// Parse a console line such as `$ping` or `$$fish foo bar`.
    ///
    /// The line is split on single spaces; one leading prefix character is
    /// removed from the first word.
    pub fn parse_line(&self, line: &str) -> Result<Command, ParseError> {
        let line = line.trim_start();
        let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
        let invocation = head.strip_prefix(self.options.prefix).unwrap_or(head);
        let args: Vec<String> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split(' ').map(str::to_owned).collect()
        };
        self.parse(invocation, &args)
    }

    fn parse_at(
        &self,
        invocation: &str,
        args: &[String],
        depth: usize,
    ) -> Result<Command, ParseError> {
        if depth > self.options.max_depth {
            return Err(ParseError::RecursionLimit {
                limit: self.options.max_depth,
            });
        }
        tracing::trace!(%invocation, args = args.len(), depth, "parsing invocation");

        let prefix = self.options.prefix.to_string();
        let shorthand = invocation.len() > prefix.len() && invocation.starts_with(&prefix);
        let lookup = if shorthand { prefix.as_str() } else { invocation };

        let metadata = self.resolver.resolve_metadata(lookup)?;
        let tokenized = params::tokenize(&metadata.params, args, self.languages)?;

        let (invocation, arguments) = if shorthand {
            let mut arguments = Vec::with_capacity(tokenized.arguments.len() + 1);
            arguments.push(invocation[prefix.len()..].to_owned());
            arguments.extend(tokenized.arguments);
            (prefix.clone(), arguments)
        } else {
            (invocation.to_owned(), tokenized.arguments)
        };
        let parameters = tokenized.parameters;
        let bare_prefix = invocation == prefix;

        let variant = match metadata.name.as_str() {
            PIPE => Variant::Pipe(self.decompose_pipe(&arguments, &parameters, depth)?),
            ALIAS if alias::runs_alias(bare_prefix, &arguments) => Variant::Alias(Box::new(
                self.expand_alias(bare_prefix, &arguments, depth)?,
            )),
            _ => Variant::None,
        };

        Ok(Command {
            invocation,
            metadata,
            raw_arguments: args.to_vec(),
            arguments,
            parameters,
            variant,
        })
    }

    fn decompose_pipe(
        &self,
        arguments: &[String],
        parameters: &Parameters,
        depth: usize,
    ) -> Result<PipeData, ParseError> {
        let custom = parameters.get(CHAR_PARAMETER).and_then(ParamValue::as_str);
        let (delimiter, segments) = pipe::segments(arguments, custom);
        tracing::trace!(?delimiter, segments = segments.len(), "decomposed pipe");

        let mut subcommands = Vec::with_capacity(segments.len());
        for Unparsed { invocation, args } in segments {
            if invocation == PIPE {
                subcommands.push(PipeSlot::Deferred { invocation, args });
                continue;
            }
            let command = self.parse_at(&invocation, &args, depth + 1)?;
            subcommands.push(PipeSlot::Resolved {
                invocation,
                args,
                command: Box::new(command),
            });
        }
        Ok(PipeData {
            delimiter,
            subcommands,
        })
    }

    fn expand_alias(
        &self,
        bare_prefix: bool,
        arguments: &[String],
        depth: usize,
    ) -> Result<AliasInvocation, ParseError> {
        let executor = self.session.current_user();
        let target = alias::alias_target(bare_prefix, arguments, executor)?;
        let definition = self.resolver.resolve_alias(&target.user, &target.name)?;

        let args = alias::apply_parameters(
            executor,
            self.options.channel.as_deref(),
            &definition.arguments,
            &target.input,
        )?;
        let parsed = self.parse_at(&definition.invocation, &args, depth + 1)?;

        Ok(AliasInvocation {
            alias_user: target.user,
            alias_name: target.name,
            alias_input: target.input,
            command_equivalent: CommandEquivalent {
                unparsed: Unparsed {
                    invocation: definition.invocation.clone(),
                    args,
                },
                parsed: Box::new(parsed),
            },
            alias_definition: definition,
        })
    }
}
