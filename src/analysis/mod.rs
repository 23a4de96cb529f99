// Analysis module
//
// Findings produced by the detectors, and the issues they report.

pub mod detectors;

pub use detectors::{Number, PrivateApiDetector, RangeDetector};

use serde::{Serialize, Serializer};

/// A problem reported by a detector
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// The kind of problem
    pub issue: Issue,

    /// Severity level
    pub severity: Severity,

    /// What was checked: a member, class name or expression
    pub subject: String,

    /// Human readable explanation
    pub message: String,
}

impl Finding {
    pub fn new(issue: Issue, subject: impl Into<String>) -> Self {
        Self {
            issue,
            severity: issue.default_severity(),
            subject: subject.into(),
            message: issue.brief().to_string(),
        }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = message;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Types of issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Issue {
    /// Value or range outside of the allowed range
    Range,

    /// Reflective access to an internal class
    PrivateApi,

    /// Reflective access to a member that is blocked for apps
    BlockedPrivateApi,

    /// Reflective access to a member that becomes blocked at the target SDK
    SoonBlockedPrivateApi,

    /// Reflective access to a non-SDK member that is still allowed
    DiscouragedPrivateApi,
}

impl Issue {
    pub fn default_severity(&self) -> Severity {
        match self {
            Issue::Range => Severity::Error,
            Issue::PrivateApi => Severity::Warning,
            Issue::BlockedPrivateApi => Severity::Error,
            Issue::SoonBlockedPrivateApi => Severity::Error,
            Issue::DiscouragedPrivateApi => Severity::Warning,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Issue::Range => "LC001",
            Issue::PrivateApi => "LC002",
            Issue::BlockedPrivateApi => "LC003",
            Issue::SoonBlockedPrivateApi => "LC004",
            Issue::DiscouragedPrivateApi => "LC005",
        }
    }

    /// Lint id, as used in suppressions
    pub fn id(&self) -> &'static str {
        match self {
            Issue::Range => "Range",
            Issue::PrivateApi => "PrivateApi",
            Issue::BlockedPrivateApi => "BlockedPrivateApi",
            Issue::SoonBlockedPrivateApi => "SoonBlockedPrivateApi",
            Issue::DiscouragedPrivateApi => "DiscouragedPrivateApi",
        }
    }

    pub fn brief(&self) -> &'static str {
        match self {
            Issue::Range => "Outside Range",
            Issue::PrivateApi => "Using Private APIs",
            Issue::BlockedPrivateApi => "Using Blocked Private API",
            Issue::SoonBlockedPrivateApi => "Using Soon-to-Be Blocked Private API",
            Issue::DiscouragedPrivateApi => "Using Discouraged Private API",
        }
    }
}

impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
