//! Splitting a `pipe` command's arguments into sub-invocations.

use serde::Serialize;

use crate::command::Unparsed;

/// Name of the pipe command; nested pipes are never parsed ahead of time.
pub const PIPE: &str = "pipe";

/// Named parameter that overrides the delimiter.
pub const CHAR_PARAMETER: &str = "_char";

/// How the pipe's argument text was split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Delimiter {
    /// The literal string given with `_char:`.
    Custom(String),
    /// A standalone ` | `.
    Pipe,
    /// A standalone ` > `.
    Bracket,
    /// Any lone `|` or `>`, with or without surrounding spaces. Doubled
    /// characters (`||`, `>>`, `|>`) are literal text.
    Isolated,
}

const PIPE_SPACED: &str = " | ";
const BRACKET_SPACED: &str = " > ";

fn is_pipe_char(c: char) -> bool {
    matches!(c, '|' | '>')
}

/// Pick the delimiter for `text` (the positional arguments joined by
/// spaces), honouring a `_char` override.
///
/// Without an override: ` > ` is used only if it occurs strictly more
/// often than ` | `; if neither occurs, lone `|`/`>` characters are used.
pub fn select_delimiter(custom: Option<&str>, text: &str) -> Delimiter {
    if let Some(custom) = custom.filter(|c| !c.is_empty()) {
        return Delimiter::Custom(custom.to_owned());
    }

    let pipes = text.matches(PIPE_SPACED).count();
    let brackets = text.matches(BRACKET_SPACED).count();
    match (pipes, brackets) {
        (0, 0) => Delimiter::Isolated,
        (p, b) if b > p => Delimiter::Bracket,
        _ => Delimiter::Pipe,
    }
}

/// Split `text` on `delimiter`. Segments are returned untrimmed.
pub fn split<'t>(text: &'t str, delimiter: &Delimiter) -> Vec<&'t str> {
    match delimiter {
        Delimiter::Custom(s) => text.split(s.as_str()).collect(),
        Delimiter::Pipe => text.split(PIPE_SPACED).collect(),
        Delimiter::Bracket => text.split(BRACKET_SPACED).collect(),
        Delimiter::Isolated => split_isolated(text),
    }
}

fn split_isolated(text: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut segments = Vec::new();
    let mut start = 0;
    for (k, &(idx, c)) in chars.iter().enumerate() {
        if !is_pipe_char(c) {
            continue;
        }
        let before = k.checked_sub(1).map(|p| chars[p].1);
        let after = chars.get(k + 1).map(|&(_, c)| c);
        if before.is_some_and(is_pipe_char) || after.is_some_and(is_pipe_char) {
            continue;
        }
        segments.push(&text[start..idx]);
        start = idx + c.len_utf8();
    }
    segments.push(&text[start..]);
    segments
}

/// Split a pipe's positional arguments into unparsed sub-invocations, in
/// order. Each segment is trimmed; its first word is the invocation.
pub fn segments(arguments: &[String], custom: Option<&str>) -> (Delimiter, Vec<Unparsed>) {
    let text = arguments.join(" ");
    let delimiter = select_delimiter(custom, &text);
    let parts = split(&text, &delimiter)
        .into_iter()
        .map(|segment| {
            let mut words = segment.split_whitespace().map(str::to_owned);
            Unparsed {
                invocation: words.next().unwrap_or_default(),
                args: words.collect(),
            }
        })
        .collect();
    (delimiter, parts)
}
