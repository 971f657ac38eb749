//! Task reference extraction from commit messages.
//!
//! A reference is a closing keyword, an optional colon, whitespace, `#` and
//! the numeric task ID, e.g. `Fixes #1204` or `closed: #77`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Closing keyword followed by `#<digits>`, case-insensitive.
static TASK_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:fixes|fixed|fix|solved|closes|closed|close)\s*:?\s+#(\d+)")
        .expect("task reference pattern is valid")
});

/// Numeric Asana task ID taken from a commit message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskReference(String);

impl TaskReference {
    /// Wrap a task gid, rejecting anything that is not a run of ASCII digits.
    #[must_use]
    pub fn from_gid(gid: &str) -> Option<Self> {
        if !gid.is_empty() && gid.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(gid.to_string()))
        } else {
            None
        }
    }

    /// The task gid as sent to the API.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Find the first task reference in a commit message.
///
/// Only the first match is returned; later references in the same message
/// are ignored.
#[must_use]
pub fn find_task_reference(message: &str) -> Option<TaskReference> {
    TASK_REFERENCE_RE
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| TaskReference(m.as_str().to_string()))
}
