//! Centralized color scheme for consistent output formatting
//!
//! Based on Rust compiler diagnostics design (RFC 1644)

use crate::analysis::Severity;
use colored::{ColoredString, Colorize};

/// Structural element colors
pub struct StructureColors;

impl StructureColors {
    /// Member, class or expression a finding is about
    pub fn subject(text: &str) -> ColoredString {
        text.cyan().bold()
    }

    /// Rule/issue code (e.g., LC001)
    pub fn rule_code(text: &str) -> ColoredString {
        text.magenta()
    }

    /// Lint id next to the code
    pub fn issue_id(text: &str) -> ColoredString {
        text.dimmed()
    }

    /// Count/statistics numbers
    pub fn count(text: &str) -> ColoredString {
        text.white().bold()
    }
}

/// Severity symbols for compact display
pub struct SeveritySymbol;

impl SeveritySymbol {
    pub fn error() -> &'static str {
        "✖"
    }

    pub fn warning() -> &'static str {
        "⚠"
    }

    pub fn info() -> &'static str {
        "ℹ"
    }

    pub fn colored(severity: &Severity) -> ColoredString {
        match severity {
            Severity::Error => Self::error().red().bold(),
            Severity::Warning => Self::warning().yellow(),
            Severity::Info => Self::info().blue(),
        }
    }
}

/// Box drawing characters for headers
pub struct BoxChars;

impl BoxChars {
    /// Light separator line
    pub fn light_line(width: usize) -> String {
        "─".repeat(width)
    }
}
