//! JSON output of parsed commands.

use crate::command::Command;

/// Serialize a parsed command to a pretty-printed JSON string.
pub fn to_pretty_json(command: &Command) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(command)
}
