mod colors;
mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::analysis::Finding;
use miette::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Colored terminal output
    #[default]
    Terminal,
    /// JSON machine-readable format
    Json,
}

/// Reporter for outputting findings
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_summary: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_summary: true,
        }
    }

    /// Toggle the terminal severity tally; JSON always carries its counts
    pub fn with_summary(mut self, show: bool) -> Self {
        self.show_summary = show;
        self
    }

    /// Report the findings
    pub fn report(&self, findings: &[Finding]) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => {
                TerminalReporter::new().with_summary(self.show_summary).report(findings);
                Ok(())
            }
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(findings),
        }
    }
}
