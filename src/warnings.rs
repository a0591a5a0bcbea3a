use serde::{Deserialize, Serialize};

/// How seriously the caller should take a warning. `Error` means the query
/// is structurally broken; `Warning` and `Info` are advisory only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Structured, non-blocking diagnostic attached to a query or a synthesis
/// run. The `code` is the stable machine contract; `message` is a short
/// diagnostic for logs, not a localized user-facing string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWarning {
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

impl QueryWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Error)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Warning)
    }

    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, message, Severity::Info)
    }
}
