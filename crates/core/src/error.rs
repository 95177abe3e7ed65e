//! Error types for tokenizing, resolving, and parsing command invocations.

/// A named parameter could not be tokenized or coerced.
///
/// These are the "reply-worthy" failures: a console can show them to the
/// user as-is, without a stack trace.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// Input ended while a `name:"...` parameter was still open.
    #[error("unclosed quoted parameter `{name}`")]
    UnclosedQuote {
        /// The declared parameter name.
        name: String,
    },

    /// The value could not be coerced to the parameter's declared type.
    #[error("could not parse parameter `{name}`")]
    InvalidValue {
        /// The declared parameter name.
        name: String,
    },

    /// An `object` parameter received the same key twice.
    #[error("multiple values for parameter `{name}`, key `{key}`")]
    DuplicateKey {
        /// The declared parameter name.
        name: String,
        /// The repeated key.
        key: String,
    },
}

/// A command or alias definition could not be fetched.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The API answered with an error envelope.
    #[error("{message}")]
    Api {
        /// The message reported by the API.
        message: String,
    },

    /// The API answered without an error but also without data.
    #[error("response for {what} carried no data")]
    MissingData {
        /// What was being fetched, e.g. `command "ping"`.
        what: String,
    },

    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the expected shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// An authenticated request was attempted without credentials.
    #[error("cannot perform authenticated fetch: not logged in")]
    NotLoggedIn,

    /// An authenticated request targeted a different origin.
    #[error("cannot perform authenticated fetch: origin {origin} is not allowed")]
    ForeignOrigin {
        /// The rejected origin.
        origin: String,
    },
}

impl FetchError {
    /// Returns `true` if the remote side rejected the lookup (as opposed to
    /// the request failing to complete).
    pub fn is_api_error(&self) -> bool {
        matches!(self, FetchError::Api { .. } | FetchError::MissingData { .. })
    }
}

/// The positional layout of an alias invocation is malformed.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AliasShapeError {
    /// Fewer positional arguments than the invocation form requires.
    #[error("not enough args: expected at least {needed}, got {got}")]
    NotEnoughArgs {
        /// Minimum number of positional arguments for the detected form.
        needed: usize,
        /// Number of positional arguments actually supplied.
        got: usize,
    },

    /// The arguments do not describe any alias invocation form.
    #[error("not an alias invocation")]
    NotAliasInvocation,
}

/// An alias argument template could not be applied.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubstitutionError {
    /// A `${a..b+}` token mixes a range with the rest marker.
    #[error("cannot combine range (..) and rest (+) in `${{{token}}}`")]
    RangeWithRest {
        /// The offending token body.
        token: String,
    },
}

/// An alias link pointed at another link.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AliasLinkError {
    /// The link target is itself a link; only one level is followed.
    #[error("alias {user}/{name} is a link to another link")]
    ChainedLink {
        /// Owner of the intermediate link.
        user: String,
        /// Name of the intermediate link.
        name: String,
    },

    /// The record is neither a definition nor a link.
    #[error("alias {user}/{name} has neither a definition nor a link")]
    Empty {
        /// Owner of the alias.
        user: String,
        /// Name of the alias.
        name: String,
    },
}

/// Root error of a parse. The first failure anywhere in the recursion wins.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A parameter could not be tokenized or coerced.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// A definition could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The alias invocation was malformed.
    #[error(transparent)]
    AliasShape(#[from] AliasShapeError),

    /// The alias link could not be followed.
    #[error(transparent)]
    AliasLink(#[from] AliasLinkError),

    /// The alias template could not be applied.
    #[error(transparent)]
    Substitution(#[from] SubstitutionError),

    /// No command name was given (e.g. an empty pipe segment).
    #[error("empty command invocation")]
    EmptyInvocation,

    /// Alias or pipe nesting went deeper than the configured limit.
    #[error("command nesting exceeds the limit of {limit}")]
    RecursionLimit {
        /// The configured maximum depth.
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_are_classified() {
        assert!(
            FetchError::Api {
                message: "no such command".into()
            }
            .is_api_error()
        );
        assert!(FetchError::MissingData { what: "x".into() }.is_api_error());
        assert!(!FetchError::Transport("reset".into()).is_api_error());
        assert!(!FetchError::NotLoggedIn.is_api_error());
    }

    #[test]
    fn messages_name_the_parameter() {
        let e = TokenizeError::InvalidValue { name: "lang".into() };
        assert_eq!(e.to_string(), "could not parse parameter `lang`");
        let e = SubstitutionError::RangeWithRest {
            token: "0..2+".into(),
        };
        assert_eq!(
            e.to_string(),
            "cannot combine range (..) and rest (+) in `${0..2+}`"
        );
    }

    #[test]
    fn parse_error_is_transparent() {
        let e: ParseError = TokenizeError::UnclosedQuote { name: "q".into() }.into();
        assert_eq!(e.to_string(), "unclosed quoted parameter `q`");
    }
}
