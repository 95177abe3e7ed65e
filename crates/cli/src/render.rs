//! Terminal and JSON rendering of parse results and errors.
//!
//! Parse errors are shown as ariadne reports pointing into the command
//! line; parsed commands as an indented tree. JSON output goes to stdout
//! and is always a single document.

use std::fmt::{self, Write};
use std::io::{self, IsTerminal};
use std::ops::Range;

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use svd_core::command::{CommandMetadata, PipeData};
use svd_core::pipe::Delimiter;
use svd_core::{Command, ParseError, PipeSlot, TokenizeError, Variant};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for results and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Human-readable, coloured when stdout is a terminal.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// The format named by `--output`, or the one suited to stdout:
    /// pretty on a terminal, JSON when piped or redirected.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        Self::from_flag(explicit, io::stdout().is_terminal())
    }

    fn from_flag(explicit: Option<&str>, stdout_is_terminal: bool) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if stdout_is_terminal => Format::Pretty,
            _ => Format::Json,
        }
    }
}

/// Colours text when `enabled`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Painter {
    enabled: bool,
}

impl Painter {
    /// Colour only when stdout is a terminal.
    pub(crate) fn detect() -> Self {
        Self {
            enabled: io::stdout().is_terminal(),
        }
    }

    fn paint(self, text: &str, color: Color) -> String {
        if self.enabled {
            format!("{}", text.fg(color))
        } else {
            text.to_owned()
        }
    }
}

// ── Command tree ────────────────────────────────────────────────────────

/// Render a parsed command as an indented tree.
pub(crate) fn command_tree(cmd: &Command, painter: Painter) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_command(&mut out, cmd, 0, painter)?;
    Ok(out)
}

fn write_command(out: &mut String, cmd: &Command, depth: usize, p: Painter) -> fmt::Result {
    let pad = "  ".repeat(depth);

    write!(out, "{pad}{}", p.paint(&cmd.invocation, Color::Cyan))?;
    if !cmd.invocation.eq_ignore_ascii_case(&cmd.metadata.name) {
        write!(out, " ({})", cmd.metadata.name)?;
    }
    writeln!(out)?;

    if !cmd.arguments.is_empty() {
        writeln!(out, "{pad}  arguments: {}", quote_all(&cmd.arguments))?;
    }
    for (name, value) in &cmd.parameters {
        writeln!(out, "{pad}  {}: {value}", p.paint(name, Color::Yellow))?;
    }

    match &cmd.variant {
        Variant::None => Ok(()),
        Variant::Pipe(data) => write_pipe(out, data, depth, p),
        Variant::Alias(alias) => {
            write!(out, "{pad}  alias {}/{}", alias.alias_user, alias.alias_name)?;
            if let Some(link) = &alias.alias_definition.link {
                write!(out, " (linked to {}/{})", link.user, link.name)?;
            }
            writeln!(out)?;
            let unparsed = &alias.command_equivalent.unparsed;
            writeln!(
                out,
                "{pad}  expands to: {} {}",
                unparsed.invocation,
                quote_all(&unparsed.args)
            )?;
            write_command(out, &alias.command_equivalent.parsed, depth + 2, p)
        }
    }
}

fn write_pipe(out: &mut String, data: &PipeData, depth: usize, p: Painter) -> fmt::Result {
    let pad = "  ".repeat(depth);
    writeln!(out, "{pad}  pipe split on {}:", describe_delimiter(&data.delimiter))?;
    for (i, slot) in data.subcommands.iter().enumerate() {
        match slot {
            PipeSlot::Resolved { command, .. } => {
                writeln!(out, "{pad}    [{i}]")?;
                write_command(out, command, depth + 3, p)?;
            }
            PipeSlot::Deferred { invocation, args } => {
                writeln!(
                    out,
                    "{pad}    [{i}] {invocation} {} {}",
                    quote_all(args),
                    p.paint("(deferred)", Color::Magenta)
                )?;
            }
        }
    }
    Ok(())
}

fn describe_delimiter(delimiter: &Delimiter) -> String {
    match delimiter {
        Delimiter::Custom(s) => format!("custom {s:?}"),
        Delimiter::Pipe => "\" | \"".to_owned(),
        Delimiter::Bracket => "\" > \"".to_owned(),
        Delimiter::Isolated => "isolated | and >".to_owned(),
    }
}

fn quote_all(args: &[String]) -> String {
    args.iter()
        .map(|a| format!("{a:?}"))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Command metadata ────────────────────────────────────────────────────

/// Render a command's metadata as a short summary.
pub(crate) fn metadata_summary(meta: &CommandMetadata, painter: Painter) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write!(out, "{}", painter.paint(&meta.name, Color::Cyan))?;
    if !meta.aliases.is_empty() {
        write!(out, " (aliases: {})", meta.aliases.join(", "))?;
    }
    writeln!(out)?;
    if !meta.description.is_empty() {
        writeln!(out, "  {}", meta.description)?;
    }
    writeln!(out, "  cooldown: {} ms", meta.cooldown_ms)?;
    if !meta.flags.is_empty() {
        let flags: Vec<&str> = meta.flags.iter().map(String::as_str).collect();
        writeln!(out, "  flags: {}", flags.join(", "))?;
    }
    if !meta.params.is_empty() {
        writeln!(out, "  params:")?;
        for param in &meta.params {
            writeln!(
                out,
                "    {}: {}",
                painter.paint(&param.name, Color::Yellow),
                param.kind.as_str()
            )?;
        }
    }
    Ok(out)
}

// ── Errors ──────────────────────────────────────────────────────────────

/// Stable machine-readable name for an error.
pub(crate) fn error_kind(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<ParseError>() {
        Some(ParseError::Tokenize(_)) => "tokenize",
        Some(ParseError::Fetch(_)) => "fetch",
        Some(ParseError::AliasShape(_)) => "alias_shape",
        Some(ParseError::AliasLink(_)) => "alias_link",
        Some(ParseError::Substitution(_)) => "substitution",
        Some(ParseError::EmptyInvocation) => "empty_invocation",
        Some(ParseError::RecursionLimit { .. }) => "recursion_limit",
        Some(_) => "parse_failed",
        None => "command_failed",
    }
}

/// Print `{success: false, error, message}` to stdout.
pub(crate) fn print_error_json(err: &anyhow::Error) {
    let envelope = serde_json::json!({
        "success": false,
        "error": error_kind(err),
        "message": format!("{err:#}"),
    });
    println!("{envelope:#}");
}

/// Print a parse error as an ariadne report over `line` to stderr.
pub(crate) fn report_parse_error(line: &str, err: &ParseError) {
    const SOURCE: &str = "<input>";
    let span = error_span(line, err);
    let label = match err {
        ParseError::Tokenize(_) => "this parameter",
        ParseError::Fetch(_) => "while resolving this",
        ParseError::AliasShape(_) | ParseError::AliasLink(_) => "this alias",
        ParseError::Substitution(_) => "while expanding this alias",
        _ => "here",
    };

    let mut cache = (SOURCE, Source::from(line));
    Report::build(ReportKind::Error, (SOURCE, span.clone()))
        .with_message(err.to_string())
        .with_config(
            Config::default()
                .with_compact(false)
                .with_color(io::stderr().is_terminal()),
        )
        .with_label(
            Label::new((SOURCE, span))
                .with_message(label)
                .with_color(Color::Red),
        )
        .finish()
        .eprint(&mut cache)
        .ok();
}

/// Character range in `line` that `err` is about: the offending
/// `name:value` for parameter errors, otherwise the first word.
fn error_span(line: &str, err: &ParseError) -> Range<usize> {
    let name = match err {
        ParseError::Tokenize(
            TokenizeError::UnclosedQuote { name }
            | TokenizeError::InvalidValue { name }
            | TokenizeError::DuplicateKey { name, .. },
        ) => Some(name.as_str()),
        _ => None,
    };

    let bytes = name
        .and_then(|name| {
            let needle = format!("{name}:");
            // Last occurrence: duplicates are reported on the second one.
            let start = line.rfind(&needle)?;
            let end = match err {
                ParseError::Tokenize(TokenizeError::UnclosedQuote { .. }) => line.len(),
                _ => line[start..].find(' ').map_or(line.len(), |i| start + i),
            };
            Some(start..end)
        })
        .unwrap_or_else(|| {
            let start = line.len() - line.trim_start().len();
            let end = line[start..].find(' ').map_or(line.len(), |i| start + i);
            start..end
        });

    let to_chars = |byte: usize| line[..byte].chars().count();
    to_chars(bytes.start)..to_chars(bytes.end)
}
