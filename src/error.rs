// Error type shared by the library modules
//
// Precondition violations (out-of-range API levels, asking for a delta of
// ranges that are actually contained) panic instead of showing up here.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    #[diagnostic(code(lintconstraints::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A name was claimed both as a package and as an enclosing class
    #[error("`{name}` is used both as a package and as a class (line {line})")]
    #[diagnostic(
        code(lintconstraints::conflicting_container),
        help("the restriction source is malformed; fix or regenerate it")
    )]
    ConflictingContainer { name: String, line: usize },

    #[error("invalid API constraint `{0}`")]
    #[diagnostic(code(lintconstraints::invalid_constraint))]
    InvalidConstraint(String),

    #[error("cannot parse expression `{expression}`: {reason}")]
    #[diagnostic(
        code(lintconstraints::invalid_expression),
        help("use forms like `>= 21`, `SDK_INT < 26`, `in 21..25` or `in 21 until 26`")
    )]
    InvalidExpression { expression: String, reason: String },

    #[error("corrupt restriction database: {0}")]
    #[diagnostic(code(lintconstraints::corrupt_database))]
    CorruptDatabase(String),

    #[error("restriction database is stale (expected {expected}, found {found})")]
    #[diagnostic(code(lintconstraints::stale_database))]
    StaleDatabase { expected: String, found: String },

    #[error("restriction database would be {size} bytes, more than its u32 offsets can address")]
    #[diagnostic(code(lintconstraints::database_too_large))]
    DatabaseTooLarge { size: usize },

    #[error("invalid exclusion pattern `{pattern}`")]
    #[diagnostic(code(lintconstraints::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no restriction source configured")]
    #[diagnostic(
        code(lintconstraints::missing_source),
        help("set `restrictions.source` in the config file or pass --source")
    )]
    MissingSource,

    #[error("invalid configuration in {path}: {message}")]
    #[diagnostic(code(lintconstraints::config))]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn expression(expression: &str, reason: impl Into<String>) -> Self {
        Error::InvalidExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}
