//! Alias invocations: which alias is being run, and with what input.

mod substitute;

pub use substitute::{PRIVATE_MESSAGES_CHANNEL, apply_parameters};

use crate::error::AliasShapeError;

/// Name of the alias command; `$$name` is shorthand for it.
pub const ALIAS: &str = "alias";
/// Sub-command of `alias` that runs one of the caller's own aliases.
pub const RUN: &str = "run";
/// Sub-command of `alias` that runs someone else's alias.
pub const TRY: &str = "try";

/// The alias an invocation refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTarget {
    /// Owner of the alias.
    pub user: String,
    /// Alias name.
    pub name: String,
    /// Arguments handed to the alias.
    pub input: Vec<String>,
}

/// Whether an `alias` command with these arguments runs an alias (as
/// opposed to `alias add`, `alias code`, ...).
pub fn runs_alias(bare_prefix: bool, args: &[String]) -> bool {
    bare_prefix || matches!(args.first().map(String::as_str), Some(RUN | TRY))
}

/// Work out which alias is being run from the positional arguments.
///
/// Forms, in priority order:
///
/// - bare prefix (`$$name args...`): the current user's `name`
/// - `run name args...`: the current user's `name`
/// - `try user name args...`: `user`'s `name`
pub fn alias_target(
    bare_prefix: bool,
    args: &[String],
    current_user: &str,
) -> Result<AliasTarget, AliasShapeError> {
    let need = |needed: usize| {
        if args.len() < needed {
            Err(AliasShapeError::NotEnoughArgs {
                needed,
                got: args.len(),
            })
        } else {
            Ok(())
        }
    };

    need(1)?;
    if bare_prefix {
        return Ok(AliasTarget {
            user: current_user.to_owned(),
            name: args[0].clone(),
            input: args[1..].to_vec(),
        });
    }

    need(2)?;
    if args[0] == RUN {
        return Ok(AliasTarget {
            user: current_user.to_owned(),
            name: args[1].clone(),
            input: args[2..].to_vec(),
        });
    }

    need(3)?;
    if args[0] == TRY {
        return Ok(AliasTarget {
            user: args[1].clone(),
            name: args[2].clone(),
            input: args[3..].to_vec(),
        });
    }

    Err(AliasShapeError::NotAliasInvocation)
}
