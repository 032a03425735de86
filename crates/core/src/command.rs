use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// One FFmpeg invocation's argument list, excluding the executable path
/// itself. Immutable once queued; collision resolution produces a rewritten
/// copy rather than mutating the original.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Command {
    pub args: Vec<String>,
}

impl Command {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// The ordered set of commands for one run. Insertion order is execution
/// order.
pub type CommandQueue = Vec<Command>;

/// Quotes a token for display if it contains whitespace. Display only, not
/// shell-safe escaping.
pub(crate) fn quote(token: &str) -> String {
    if token.contains(' ') {
        format!("\"{token}\"")
    } else {
        token.to_string()
    }
}

impl Display for Command {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.args.iter().map(|token| quote(token)).collect();
        formatter.write_str(&rendered.join(" "))
    }
}
