//! `${...}` placeholder expansion in alias argument templates.

use crate::error::SubstitutionError;

/// Written in place of `${channel}` when the alias runs in private messages.
pub const PRIVATE_MESSAGES_CHANNEL: &str = "[private messages]";

/// Apply an alias argument template to the caller's arguments.
///
/// Each template element has its `${...}` tokens replaced, then is split on
/// whitespace; the pieces are flattened into the result. Recognized token
/// bodies:
///
/// - `N`, `N..M`, `N+`: caller arguments by index, range, or "from N on".
///   Negative indices count from the end.
/// - `executor` and `channel`.
///
/// Any other token is left as written.
pub fn apply_parameters(
    executor: &str,
    channel: Option<&str>,
    template: &[String],
    caller_args: &[String],
) -> Result<Vec<String>, SubstitutionError> {
    let mut out = Vec::new();
    for element in template {
        let replaced = replace_tokens(element, |body| {
            expand_token(body, executor, channel, caller_args)
        })?;
        out.extend(replaced.split_whitespace().map(str::to_owned));
    }
    Ok(out)
}

/// Replace every `${body}` in `text` with `f(body)`; `None` keeps the token.
///
/// A token body is at least one character and ends at the first `}` after
/// that; it never spans a newline.
fn replace_tokens<F>(text: &str, mut f: F) -> Result<String, SubstitutionError>
where
    F: FnMut(&str) -> Result<Option<String>, SubstitutionError>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let first_len = after.chars().next().map_or(0, char::len_utf8);
        let close = after
            .get(first_len..)
            .and_then(|tail| tail.find('}'))
            .map(|i| i + first_len)
            .filter(|&end| first_len > 0 && !after[..end].contains('\n'));

        match close {
            Some(end) => {
                let body = &after[..end];
                match f(body)? {
                    Some(replacement) => out.push_str(&replacement),
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push('$');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}

fn expand_token(
    body: &str,
    executor: &str,
    channel: Option<&str>,
    args: &[String],
) -> Result<Option<String>, SubstitutionError> {
    if is_strict_numeric(body) {
        if let Some(index) = find_index_token(body) {
            return expand_index(body, &index, args).map(Some);
        }
    }
    Ok(match body {
        "executor" => Some(executor.to_owned()),
        "channel" => Some(channel.unwrap_or(PRIVATE_MESSAGES_CHANNEL).to_owned()),
        _ => None,
    })
}

fn is_strict_numeric(body: &str) -> bool {
    !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '.' | '+'))
}

/// The parts of an `order..range+` index token.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexToken {
    order: i64,
    range: Option<i64>,
    rest: bool,
}

/// Find the leftmost `-?\d+(\.\.-?\d+)?\+?` in `body`.
fn find_index_token(body: &str) -> Option<IndexToken> {
    let b = body.as_bytes();
    (0..b.len()).find_map(|start| match_index_at(b, start))
}

fn match_index_at(b: &[u8], start: usize) -> Option<IndexToken> {
    let (order, mut pos) = match_signed(b, start)?;

    let mut range = None;
    if b.get(pos) == Some(&b'.') && b.get(pos + 1) == Some(&b'.') {
        if let Some((value, end)) = match_signed(b, pos + 2) {
            range = Some(value);
            pos = end;
        }
    }

    let rest = b.get(pos) == Some(&b'+');
    Some(IndexToken { order, range, rest })
}

/// Match `-?\d+` at `start`; returns the value (saturated) and end offset.
fn match_signed(b: &[u8], start: usize) -> Option<(i64, usize)> {
    let mut pos = start;
    let negative = b.get(pos) == Some(&b'-');
    if negative {
        pos += 1;
    }
    let digits_start = pos;
    while b.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    if pos == digits_start {
        return None;
    }

    let mut value: i64 = 0;
    for &d in &b[digits_start..pos] {
        value = value.saturating_mul(10).saturating_add(i64::from(d - b'0'));
    }
    Some((if negative { -value } else { value }, pos))
}

fn expand_index(body: &str, token: &IndexToken, args: &[String]) -> Result<String, SubstitutionError> {
    let len = args.len() as i64;
    let mut order = token.order;
    if order < 0 {
        order = len.saturating_add(order);
    }

    let mut range = token.range.map(|r| if r < 0 { len.saturating_add(r).saturating_add(1) } else { r });
    if let Some(r) = range {
        if r < order {
            range = Some(order);
            order = r;
        }
    }

    match (range, token.rest) {
        (Some(_), true) => Err(SubstitutionError::RangeWithRest {
            token: body.to_owned(),
        }),
        (None, true) => Ok(slice(args, order, len).join(" ")),
        (Some(end), false) => Ok(slice(args, order, end).join(" ")),
        (None, false) => Ok(usize::try_from(order)
            .ok()
            .and_then(|i| args.get(i))
            .cloned()
            .unwrap_or_default()),
    }
}

/// Slice with negative indices counted from the end and bounds clamped.
fn slice(args: &[String], start: i64, end: i64) -> &[String] {
    let len = args.len() as i64;
    let clamp = |i: i64| -> usize {
        let i = if i < 0 { (len + i).max(0) } else { i.min(len) };
        i as usize
    };
    let (start, end) = (clamp(start), clamp(end));
    if start >= end { &[] } else { &args[start..end] }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn apply(template: &[&str], args: &[&str]) -> Result<Vec<String>, SubstitutionError> {
        apply_parameters("quinn", Some("forsen"), &strings(template), &strings(args))
    }

    #[test]
    fn order_range_and_rest() {
        let out = apply(&["${0}", "${1..2}", "${3+}"], &["x", "y", "z", "w", "v"]).unwrap();
        assert_eq!(out, strings(&["x", "y", "w", "v"]));
    }

    #[test]
    fn range_end_is_inclusive_after_normalization() {
        let out = apply(&["${1..-1}"], &["a", "b", "c", "d"]).unwrap();
        assert_eq!(out, strings(&["b", "c", "d"]));
    }

    #[test]
    fn negative_order_counts_from_end() {
        let out = apply(&["${-1}", "${-2+}"], &["a", "b", "c"]).unwrap();
        assert_eq!(out, strings(&["c", "b", "c"]));
        // Same as the non-negative spellings.
        assert_eq!(
            apply(&["${-1}", "${-2+}"], &["a", "b", "c"]).unwrap(),
            apply(&["${2}", "${1+}"], &["a", "b", "c"]).unwrap()
        );
    }

    #[test]
    fn reversed_range_is_swapped() {
        let out = apply(&["${3..1}"], &["a", "b", "c", "d"]).unwrap();
        assert_eq!(out, strings(&["b", "c"]));
    }

    #[test]
    fn out_of_bounds_is_empty() {
        assert!(apply(&["${9}"], &["a"]).unwrap().is_empty());
        assert!(apply(&["${-9}"], &["a"]).unwrap().is_empty());
        assert!(apply(&["${5+}"], &["a"]).unwrap().is_empty());
    }

    #[test]
    fn range_with_rest_fails() {
        assert_eq!(
            apply(&["${0..2+}"], &["a", "b", "c"]),
            Err(SubstitutionError::RangeWithRest {
                token: "0..2+".into()
            })
        );
    }

    #[test]
    fn executor_and_channel() {
        let out = apply(&["hi", "${executor}", "in", "${channel}"], &[]).unwrap();
        assert_eq!(out, strings(&["hi", "quinn", "in", "forsen"]));

        let out =
            apply_parameters("quinn", None, &strings(&["${channel}"]), &[]).unwrap();
        assert_eq!(out, strings(&["[private", "messages]"]));
    }

    #[test]
    fn unknown_tokens_are_kept() {
        let out = apply(&["${foo}", "$", "${", "${}", "a${0}b"], &["X"]).unwrap();
        assert_eq!(out, strings(&["${foo}", "$", "${", "${}", "aXb"]));
    }

    #[test]
    fn non_strict_bodies_are_not_indices() {
        let out = apply(&["${0a}"], &["X"]).unwrap();
        assert_eq!(out, strings(&["${0a}"]));
    }

    #[test]
    fn element_may_expand_to_many_or_none() {
        let out = apply(&["pre ${0+}", "${5}"], &["a", "b"]).unwrap();
        assert_eq!(out, strings(&["pre", "a", "b"]));
    }

    #[test]
    fn leftmost_match_inside_body() {
        // "+1" has no index at offset 0; the match starts at "1".
        let out = apply(&["${+1}"], &["a", "b"]).unwrap();
        assert_eq!(out, strings(&["b"]));
        // A dangling ".." is not a range.
        let out = apply(&["${0..}"], &["a", "b"]).unwrap();
        assert_eq!(out, strings(&["a"]));
    }
}
