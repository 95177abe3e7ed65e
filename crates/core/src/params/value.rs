//! Coerced parameter values and how they are written back out.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::language::Language;

/// A coerced named-parameter value.
///
/// The variant always matches the parameter's declared
/// [`ParameterType`](crate::ParameterType).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// `string` parameter.
    String(String),
    /// `number` parameter; always finite.
    Number(f64),
    /// `boolean` parameter.
    Boolean(bool),
    /// `date` parameter.
    Date(DateTime<Utc>),
    /// `object` parameter: every `key=value` given for it.
    Object(BTreeMap<String, String>),
    /// `regex` parameter.
    Regex(RegexValue),
    /// `language` parameter.
    Language(Language),
}

impl ParamValue {
    /// The string value, if this is a `string` parameter.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric value, if this is a `number` parameter.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean value, if this is a `boolean` parameter.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The key/value pairs, if this is an `object` parameter.
    pub fn as_object(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ParamValue::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    /// Formats the value the way it would be written after `name:`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => f.write_str(s),
            ParamValue::Number(n) => write!(f, "{n}"),
            ParamValue::Boolean(b) => write!(f, "{b}"),
            ParamValue::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            ParamValue::Object(map) => {
                let mut first = true;
                for (k, v) in map {
                    if !first {
                        f.write_str(" ")?;
                    }
                    first = false;
                    write!(f, "{k}={v}")?;
                }
                Ok(())
            }
            ParamValue::Regex(r) => write!(f, "{r}"),
            ParamValue::Language(l) => f.write_str(&l.code),
        }
    }
}

/// A compiled `regex` parameter, remembering how it was written.
#[derive(Debug, Clone)]
pub struct RegexValue {
    source: String,
    flags: String,
    compiled: regex::Regex,
}

impl RegexValue {
    pub(crate) fn new(source: String, flags: String, compiled: regex::Regex) -> Self {
        Self {
            source,
            flags,
            compiled,
        }
    }

    /// The pattern body, without delimiting slashes.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The flag characters that followed the body.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// The compiled expression.
    pub fn regex(&self) -> &regex::Regex {
        &self.compiled
    }
}

impl PartialEq for RegexValue {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

/// Writes `/source/flags`. A body containing `/` with no flags gets one
/// more trailing `/`, otherwise its last segment would read back as flags.
impl fmt::Display for RegexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)?;
        if self.flags.is_empty() && self.source.contains('/') {
            f.write_str("/")?;
        }
        Ok(())
    }
}

impl Serialize for RegexValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
