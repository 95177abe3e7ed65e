//! Per-type coercion of raw parameter text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::pattern::parse_regexp;
use super::value::ParamValue;
use crate::command::ParameterType;
use crate::language::LanguageLookup;

/// Outcome of coercing one `name:value` occurrence.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Coerced {
    /// A complete value that replaces any earlier one.
    Value(ParamValue),
    /// One `key=value` entry of an `object` parameter.
    Entry { key: String, value: String },
}

/// Coerce `value` to `kind`. `explicit` is true for quoted values.
///
/// Returns `None` when the value is invalid for the type.
pub(crate) fn coerce(
    value: &str,
    kind: ParameterType,
    explicit: bool,
    languages: &dyn LanguageLookup,
) -> Option<Coerced> {
    if value.is_empty() {
        // `cmd param:` is a typo; `cmd param:""` is a deliberate empty string.
        return match (kind, explicit) {
            (ParameterType::String, true) => Some(Coerced::Value(ParamValue::String(String::new()))),
            _ => None,
        };
    }

    let coerced = match kind {
        ParameterType::String => ParamValue::String(value.to_owned()),
        ParameterType::Number => ParamValue::Number(parse_number(value)?),
        ParameterType::Boolean => match value {
            "true" => ParamValue::Boolean(true),
            "false" => ParamValue::Boolean(false),
            _ => return None,
        },
        ParameterType::Date => ParamValue::Date(parse_date(value)?),
        ParameterType::Object => {
            let (key, value) = value.split_once('=')?;
            return Some(Coerced::Entry {
                key: key.to_owned(),
                value: value.to_owned(),
            });
        }
        ParameterType::Regex => ParamValue::Regex(parse_regexp(value)?),
        ParameterType::Language => ParamValue::Language(languages.resolve_language(value)?),
    };
    Some(Coerced::Value(coerced))
}

/// Parse a number with the same surface syntax as a JavaScript numeric
/// string: surrounding whitespace, decimal with exponent, and unsigned
/// `0x`/`0o`/`0b` integers. Only finite results are accepted.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let s = value.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() {
            return None;
        }
        let mut acc = 0f64;
        for ch in digits.chars() {
            acc = acc * f64::from(radix) + f64::from(ch.to_digit(radix)?);
        }
        return acc.is_finite().then_some(acc);
    }

    // Rust also accepts "inf"/"nan" spellings; both are rejected as non-finite.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    let n: f64 = s.parse().ok()?;
    n.is_finite().then_some(n)
}

/// Parse a calendar date or timestamp. Values without an offset are
/// interpreted as UTC.
pub(crate) fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let s = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d %Y"];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    // Year-month and bare year.
    if s.len() == 7 {
        if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)?
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc());
    }
    None
}
