mod render;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use svd_client::{ClientConfig, Credentials, DEFAULT_BASE_URL, FileStore, SupinicClient};
use svd_core::command::Parameters;
use svd_core::params::{render_arguments, tokenize};
use svd_core::{
    AliasDefinition, CacheStore, DefinitionSource, FixtureSource, IsoLanguages, MemoryStore,
    ParseError, ParserOptions, Resolver, StaticSession, to_pretty_json,
};
use tracing_subscriber::EnvFilter;

use crate::render::{Format, Painter};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "svd",
    version,
    about = "Supibot command debugger: see how supibot reads a command, its pipes, and its aliases"
)]
struct Cli {
    /// Output mode: "pretty" for a human-readable tree, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Read command and alias definitions from a JSON fixture file instead
    /// of the API.
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    /// Keep resolved definitions in this JSON file between runs.
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Run as this user: owner of `$$name` aliases and `${executor}`.
    /// Defaults to SVD_USERNAME, or the user the API credentials belong to.
    #[arg(long, global = true)]
    user: Option<String>,

    /// Channel substituted for `${channel}`. Private messages when omitted.
    #[arg(long, global = true)]
    channel: Option<String>,

    /// API origin.
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    api: String,

    /// Log resolver and HTTP activity to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a command line, e.g. `svd parse '$pipe rw | tt fancy'`.
    Parse {
        /// The line, prefix included. Several words are joined by spaces.
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },

    /// Split arguments into positional arguments and a command's typed
    /// parameters.
    Tokenize {
        /// Command whose parameter schema to use.
        command: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show a command's metadata.
    Detail {
        /// Command name or one of its aliases.
        command: String,
    },

    /// Show an alias definition, optionally applied to arguments.
    Alias {
        /// Owner of the alias.
        user: String,
        /// Alias name.
        name: String,
        /// Arguments to apply the alias template to.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    if let Err(err) = run(&cli, format) {
        match format {
            Format::Json => {
                render::print_error_json(&err);
                process::exit(1);
            }
            Format::Pretty => return Err(err),
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli, format: Format) -> Result<()> {
    let backend = Backend::open(cli)?;
    match &cli.cmd {
        Cmd::Parse { line } => cmd_parse(&backend, cli, &line.join(" "), format),
        Cmd::Tokenize { command, args } => cmd_tokenize(&backend, command, args, format),
        Cmd::Detail { command } => cmd_detail(&backend, command, format),
        Cmd::Alias { user, name, args } => cmd_alias(&backend, cli, user, name, args, format),
    }
}

// ── Backend ─────────────────────────────────────────────────────────────

/// Definition source, cache, and identity for one invocation of the tool.
struct Backend {
    source: Box<dyn DefinitionSource>,
    cache: Box<dyn CacheStore>,
    session: StaticSession,
}

impl Backend {
    fn open(cli: &Cli) -> Result<Self> {
        let cache: Box<dyn CacheStore> = match &cli.cache {
            Some(path) => Box::new(
                FileStore::open(path)
                    .with_context(|| format!("failed to open cache file '{}'", path.display()))?,
            ),
            None => Box::new(MemoryStore::new()),
        };

        if let Some(path) = &cli.fixtures {
            let source = load_fixtures(path)?;
            let username = cli
                .user
                .clone()
                .or_else(|| std::env::var(svd_client::USERNAME_VAR).ok())
                .unwrap_or_default();
            return Ok(Self {
                source: Box::new(source),
                cache,
                session: StaticSession(username),
            });
        }

        let mut config = ClientConfig::default();
        config.base_url = cli.api.clone();
        let mut client = SupinicClient::new(&config).context("failed to set up API client")?;

        let credentials = Credentials::from_env().context("invalid API credentials")?;
        let username = match (&cli.user, credentials) {
            (Some(user), credentials) => {
                if let Some(c) = credentials {
                    client = client.with_credentials(c);
                }
                user.clone()
            }
            (None, Some(c)) => {
                client = client.with_credentials(c);
                client.login().context("failed to log in")?.0
            }
            (None, None) => String::new(),
        };
        tracing::debug!(%username, api = %cli.api, "using the live API");

        Ok(Self {
            source: Box::new(client),
            cache,
            session: StaticSession(username),
        })
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.source.as_ref(), self.cache.as_ref())
    }
}

fn load_fixtures(path: &Path) -> Result<FixtureSource> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read fixtures file '{}'", path.display()))?;
    let source = FixtureSource::from_json_str(&json)
        .with_context(|| format!("failed to load fixtures file '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), "using fixtures");
    Ok(source)
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(backend: &Backend, cli: &Cli, line: &str, format: Format) -> Result<()> {
    let mut options = ParserOptions::default();
    options.channel = cli.channel.clone();
    let parser = svd_core::Parser::new(backend.resolver(), &backend.session, &IsoLanguages)
        .with_options(options);

    let cmd = match parser.parse_line(line) {
        Ok(cmd) => cmd,
        Err(err) if format == Format::Pretty => {
            render::report_parse_error(line, &err);
            process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    match format {
        Format::Json => println!("{}", to_pretty_json(&cmd)?),
        Format::Pretty => print!("{}", render::command_tree(&cmd, Painter::detect())?),
    }
    Ok(())
}

#[derive(Serialize)]
struct TokenizeReport<'a> {
    command: &'a str,
    arguments: &'a [String],
    parameters: &'a Parameters,
    rendered: Vec<String>,
}

fn cmd_tokenize(backend: &Backend, command: &str, args: &[String], format: Format) -> Result<()> {
    let meta = backend.resolver().resolve_metadata(command)?;
    let tokenized = tokenize(&meta.params, args, &IsoLanguages).map_err(ParseError::from)?;
    let report = TokenizeReport {
        command: &meta.name,
        arguments: &tokenized.arguments,
        parameters: &tokenized.parameters,
        rendered: render_arguments(&meta.params, &tokenized),
    };

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Pretty => {
            println!("{}", report.command);
            for arg in report.arguments {
                println!("  {arg:?}");
            }
            for (name, value) in report.parameters {
                println!("  {name}: {value}");
            }
            println!("  as written: {}", report.rendered.join(" "));
        }
    }
    Ok(())
}

fn cmd_detail(backend: &Backend, command: &str, format: Format) -> Result<()> {
    let meta = backend.resolver().resolve_metadata(command)?;
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&meta)?),
        Format::Pretty => print!("{}", render::metadata_summary(&meta, Painter::detect())?),
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AliasReport<'a> {
    user: &'a str,
    name: &'a str,
    definition: &'a AliasDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<Vec<String>>,
}

fn cmd_alias(
    backend: &Backend,
    cli: &Cli,
    user: &str,
    name: &str,
    args: &[String],
    format: Format,
) -> Result<()> {
    let definition = backend.resolver().resolve_alias(user, name)?;
    let applied = if args.is_empty() {
        None
    } else {
        let applied = svd_core::alias::apply_parameters(
            &backend.session.0,
            cli.channel.as_deref(),
            &definition.arguments,
            args,
        )
        .map_err(ParseError::from)?;
        Some(applied)
    };
    let report = AliasReport {
        user,
        name,
        definition: &definition,
        applied,
    };

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Pretty => {
            print!("{user}/{name}");
            if let Some(link) = &definition.link {
                print!(" (linked to {}/{})", link.user, link.name);
            }
            println!();
            println!(
                "  {} {}",
                definition.invocation,
                definition.arguments.join(" ")
            );
            if let Some(applied) = &report.applied {
                println!("  applied: {} {}", definition.invocation, applied.join(" "));
            }
        }
    }
    Ok(())
}
