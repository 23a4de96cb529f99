//! Terminal reporter with colored output
//!
//! Based on Rust compiler diagnostic design (RFC 1644)

use crate::analysis::{Finding, Severity};
use crate::report::colors::{BoxChars, SeveritySymbol, StructureColors};
use colored::Colorize;
use std::fmt::Write;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Print the per-severity tally after the findings
    show_summary: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { show_summary: true }
    }

    pub fn with_summary(mut self, show: bool) -> Self {
        self.show_summary = show;
        self
    }

    pub fn report(&self, findings: &[Finding]) {
        print!("{}", self.render(findings));
    }

    pub fn render(&self, findings: &[Finding]) -> String {
        let mut out = String::new();
        if findings.is_empty() {
            let _ = writeln!(out, "{}", "No issues found!".green().bold());
            return out;
        }

        let _ = writeln!(
            out,
            "Found {} issues:",
            StructureColors::count(&findings.len().to_string())
        );
        let _ = writeln!(out);

        // Most severe first, stable within a severity
        let mut sorted: Vec<&Finding> = findings.iter().collect();
        sorted.sort_by(|a, b| b.severity.cmp(&a.severity));

        for finding in sorted {
            self.render_item(&mut out, finding);
        }

        if self.show_summary {
            let _ = writeln!(out, "{}", BoxChars::light_line(40).dimmed());
            let _ = writeln!(out, "{}", summary_line(findings));
        }
        out
    }

    fn render_item(&self, out: &mut String, finding: &Finding) {
        let _ = writeln!(
            out,
            "  {} [{}] {} {}",
            SeveritySymbol::colored(&finding.severity),
            StructureColors::rule_code(finding.issue.code()),
            StructureColors::issue_id(finding.issue.id()),
            StructureColors::subject(&finding.subject)
        );
        let _ = writeln!(out, "    {} {}", "→".dimmed(), finding.message);
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn summary_line(findings: &[Finding]) -> String {
    let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();
    let plural = |n: usize, word: &str| {
        if n == 1 {
            format!("{} {}", n, word)
        } else {
            format!("{} {}s", n, word)
        }
    };
    format!(
        "{}, {}, {} info",
        plural(count(Severity::Error), "error"),
        plural(count(Severity::Warning), "warning"),
        count(Severity::Info)
    )
}
