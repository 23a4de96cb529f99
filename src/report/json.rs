//! JSON reporter for machine-readable output

use crate::analysis::{Finding, Severity};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    total: usize,
    errors: usize,
    warnings: usize,
    findings: Vec<JsonFinding<'a>>,
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    code: &'static str,
    #[serde(flatten)]
    finding: &'a Finding,
}

/// Writes findings as JSON to a file, or to stdout
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn render(&self, findings: &[Finding]) -> Result<String> {
        let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();
        let report = JsonReport {
            version: env!("CARGO_PKG_VERSION"),
            total: findings.len(),
            errors: count(Severity::Error),
            warnings: count(Severity::Warning),
            findings: findings
                .iter()
                .map(|finding| JsonFinding {
                    code: finding.issue.code(),
                    finding,
                })
                .collect(),
        };
        serde_json::to_string_pretty(&report).into_diagnostic()
    }

    pub fn report(&self, findings: &[Finding]) -> Result<()> {
        let json = self.render(findings)?;
        match &self.output_path {
            Some(path) => {
                fs::write(path, json).into_diagnostic()?;
                info!("Report written to: {}", path.display());
            }
            None => println!("{}", json),
        }
        Ok(())
    }
}
