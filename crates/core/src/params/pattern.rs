//! `regex` parameter values: `/body/flags` strings compiled with the `regex` crate.

use regex::RegexBuilder;

use super::value::RegexValue;

/// Compile a `/body/flags` parameter value.
///
/// One leading and one trailing `/` are optional. The last unescaped `/`
/// separates the body from the flags; if the last `/` is escaped the whole
/// string is the body. Returns `None` if the body does not compile or the
/// flags are unknown or repeated.
pub(crate) fn parse_regexp(value: &str) -> Option<RegexValue> {
    let mut s = value;
    if let Some(rest) = s.strip_prefix('/') {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix('/') {
        s = rest;
    }

    let (body, flags) = match s.rfind('/') {
        Some(idx) if !s[..idx].ends_with('\\') => (&s[..idx], &s[idx + 1..]),
        _ => (s, ""),
    };

    let mut builder = RegexBuilder::new(body);
    let mut seen = String::new();
    for flag in flags.chars() {
        if seen.contains(flag) {
            return None;
        }
        seen.push(flag);
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            // Matching is always Unicode-aware; global/sticky/indices only
            // affect how a match is consumed, not what compiles.
            'u' | 'v' | 'g' | 'y' | 'd' => {}
            _ => return None,
        }
    }
    if seen.contains('u') && seen.contains('v') {
        return None;
    }

    let compiled = builder.build().ok()?;
    Some(RegexValue::new(body.to_owned(), flags.to_owned(), compiled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slashes_are_optional() {
        let r = parse_regexp("/ab+c/i").unwrap();
        assert_eq!(r.source(), "ab+c");
        assert_eq!(r.flags(), "i");
        assert!(r.regex().is_match("xABBC"));

        let r = parse_regexp("ab+c").unwrap();
        assert_eq!(r.source(), "ab+c");
        assert_eq!(r.flags(), "");

        let r = parse_regexp("/ab+c/").unwrap();
        assert_eq!(r.source(), "ab+c");
    }

    #[test]
    fn escaped_last_slash_is_part_of_the_body() {
        let r = parse_regexp(r"a\/b").unwrap();
        assert_eq!(r.source(), r"a\/b");
        assert_eq!(r.flags(), "");
        assert!(r.regex().is_match("a/b"));
    }

    #[test]
    fn last_slash_wins() {
        let r = parse_regexp("/a/b/gm").unwrap();
        assert_eq!(r.source(), "a/b");
        assert_eq!(r.flags(), "gm");
    }

    #[test]
    fn bad_patterns_and_flags_fail() {
        assert!(parse_regexp("/(unclosed/").is_none());
        assert!(parse_regexp("/a/q").is_none());
        assert!(parse_regexp("/a/ii").is_none());
        assert!(parse_regexp("/a/uv").is_none());
    }
}
