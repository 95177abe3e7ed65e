//! Named-parameter tokenizer.
//!
//! Splits a command's argument text into positional arguments and typed
//! `name:value` parameters, according to the command's declared schema.
//! Only declared names are recognized; anything else stays positional.

mod coerce;
mod pattern;
mod value;

use std::collections::BTreeMap;

pub use value::{ParamValue, RegexValue};

use crate::command::{ParameterDescriptor, Parameters};
use crate::error::TokenizeError;
use crate::language::LanguageLookup;
use coerce::{Coerced, coerce};

/// A standalone `--` ends parameter scanning; the rest is positional.
pub const IGNORE_PARAMETERS_DELIMITER: &str = "--";

/// Result of tokenizing an argument string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tokenized {
    /// Positional arguments, in order.
    pub arguments: Vec<String>,
    /// Parameters that were present.
    pub parameters: Parameters,
}

/// Scanner state.
#[derive(Clone, Copy)]
enum State<'s> {
    /// Between arguments or inside a positional argument.
    Outside,
    /// Inside `name:value`, ended by a space.
    Unquoted(&'s ParameterDescriptor),
    /// Inside `name:"value"`, ended by an unescaped `"`.
    Quoted(&'s ParameterDescriptor),
}

/// Tokenize an argument list (joined with single spaces) against `schema`.
pub fn tokenize(
    schema: &[ParameterDescriptor],
    args: &[String],
    languages: &dyn LanguageLookup,
) -> Result<Tokenized, TokenizeError> {
    tokenize_str(schema, &args.join(" "), languages)
}

/// Tokenize raw argument text against `schema`.
///
/// Only the space character separates arguments. A `\"` inside a quoted
/// value is a literal quote. A standalone `--` stops scanning and every
/// remaining space-separated word becomes positional.
pub fn tokenize_str(
    schema: &[ParameterDescriptor],
    input: &str,
    languages: &dyn LanguageLookup,
) -> Result<Tokenized, TokenizeError> {
    let mut out = Tokenized::default();
    let mut buffer = String::new();
    let mut state = State::Outside;
    let mut chars = input.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        match state {
            State::Outside => match ch {
                ' ' if buffer == IGNORE_PARAMETERS_DELIMITER => {
                    out.arguments.extend(
                        input[i + 1..]
                            .split(' ')
                            .filter(|s| !s.is_empty())
                            .map(str::to_owned),
                    );
                    return Ok(out);
                }
                ' ' => {
                    if !buffer.is_empty() {
                        out.arguments.push(std::mem::take(&mut buffer));
                    }
                }
                ':' => match schema.iter().find(|p| p.name == buffer) {
                    Some(param) => {
                        buffer.clear();
                        state = if chars.next_if(|&(_, c)| c == '"').is_some() {
                            State::Quoted(param)
                        } else {
                            State::Unquoted(param)
                        };
                    }
                    None => buffer.push(ch),
                },
                _ => buffer.push(ch),
            },
            State::Unquoted(param) => {
                if ch == ' ' {
                    apply(&mut out.parameters, param, &buffer, false, languages)?;
                    buffer.clear();
                    state = State::Outside;
                } else {
                    buffer.push(ch);
                }
            }
            State::Quoted(param) => {
                if ch != '"' {
                    buffer.push(ch);
                } else if buffer.ends_with('\\') {
                    buffer.pop();
                    buffer.push('"');
                } else {
                    apply(&mut out.parameters, param, &buffer, true, languages)?;
                    buffer.clear();
                    state = State::Outside;
                }
            }
        }
    }

    match state {
        State::Quoted(param) => {
            return Err(TokenizeError::UnclosedQuote {
                name: param.name.clone(),
            });
        }
        State::Unquoted(param) => apply(&mut out.parameters, param, &buffer, false, languages)?,
        State::Outside => {
            if !buffer.is_empty() && buffer != IGNORE_PARAMETERS_DELIMITER {
                out.arguments.push(buffer);
            }
        }
    }
    Ok(out)
}

/// Coerce one occurrence and merge it into `parameters`.
fn apply(
    parameters: &mut Parameters,
    param: &ParameterDescriptor,
    raw: &str,
    explicit: bool,
    languages: &dyn LanguageLookup,
) -> Result<(), TokenizeError> {
    let coerced =
        coerce(raw, param.kind, explicit, languages).ok_or_else(|| TokenizeError::InvalidValue {
            name: param.name.clone(),
        })?;

    match coerced {
        Coerced::Value(value) => {
            parameters.insert(param.name.clone(), value);
        }
        Coerced::Entry { key, value } => {
            let entry = parameters
                .entry(param.name.clone())
                .or_insert_with(|| ParamValue::Object(BTreeMap::new()));
            let ParamValue::Object(map) = entry else {
                // A schema declaring the same name twice with different types.
                *entry = ParamValue::Object(BTreeMap::from([(key, value)]));
                return Ok(());
            };
            if map.contains_key(&key) {
                return Err(TokenizeError::DuplicateKey {
                    name: param.name.clone(),
                    key,
                });
            }
            map.insert(key, value);
        }
    }
    Ok(())
}

/// Write a tokenized result back out as an argument list.
///
/// Parameters come first, then positional arguments. A `--` is inserted
/// before the positional arguments when one of them would otherwise be
/// read as a parameter or as the delimiter itself. Tokenizing the joined
/// output yields `tokenized` again.
pub fn render_arguments(schema: &[ParameterDescriptor], tokenized: &Tokenized) -> Vec<String> {
    let mut out = Vec::new();

    for (name, value) in &tokenized.parameters {
        match value {
            ParamValue::Object(map) => {
                for (k, v) in map {
                    out.push(render_parameter(name, &format!("{k}={v}"), false));
                }
            }
            ParamValue::String(s) => out.push(render_parameter(name, s, s.is_empty())),
            other => out.push(render_parameter(name, &other.to_string(), false)),
        }
    }

    let looks_like_parameter = |arg: &str| {
        arg == IGNORE_PARAMETERS_DELIMITER
            || arg
                .match_indices(':')
                .any(|(idx, _)| schema.iter().any(|p| p.name == arg[..idx]))
    };
    if tokenized.arguments.iter().any(|a| looks_like_parameter(a)) {
        out.push(IGNORE_PARAMETERS_DELIMITER.to_owned());
    }
    out.extend(tokenized.arguments.iter().cloned());
    out
}

fn render_parameter(name: &str, value: &str, force_quotes: bool) -> String {
    if force_quotes || value.contains(' ') || value.contains('"') {
        format!("{name}:\"{}\"", value.replace('"', "\\\""))
    } else {
        format!("{name}:{value}")
    }
}
