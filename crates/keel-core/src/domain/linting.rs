//! Lint findings.
//!
//! A [`LintingIssue`] is data, not an error: linters return them, they never
//! raise them. Whether an error-severity issue aborts generation is decided
//! by whoever consumes the list.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding: a human-readable reason and how bad it is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LintingIssue {
    pub reason: String,
    pub severity: Severity,
}

impl LintingIssue {
    pub fn new(reason: impl Into<String>, severity: Severity) -> Self {
        Self {
            reason: reason.into(),
            severity,
        }
    }

    pub fn warning(reason: impl Into<String>) -> Self {
        Self::new(reason, Severity::Warning)
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self::new(reason, Severity::Error)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for LintingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.reason)
    }
}

/// Convenience queries over a batch of issues.
pub trait LintingIssueExt {
    fn errors(&self) -> impl Iterator<Item = &LintingIssue>;
    fn warnings(&self) -> impl Iterator<Item = &LintingIssue>;

    fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}

impl LintingIssueExt for [LintingIssue] {
    fn errors(&self) -> impl Iterator<Item = &LintingIssue> {
        self.iter().filter(|i| i.severity == Severity::Error)
    }

    fn warnings(&self) -> impl Iterator<Item = &LintingIssue> {
        self.iter().filter(|i| i.severity == Severity::Warning)
    }
}
