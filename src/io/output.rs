use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::rules::RuleId;
use crate::runner::{RunStatus, ValidationReport};

/// Machine-readable report of one run
#[derive(Debug, Clone, Serialize)]
pub struct MachineReport<'a> {
    pub run_id: String,
    pub checked_at: String,
    pub annotated: String,
    pub original: String,
    pub status: RunStatus,
    #[serde(flatten)]
    pub report: &'a ValidationReport,
}

impl<'a> MachineReport<'a> {
    pub fn new(report: &'a ValidationReport, annotated: &Path, original: &Path) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            checked_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            annotated: annotated.display().to_string(),
            original: original.display().to_string(),
            status: report.status(),
            report,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Plain-text report, one line per rule
pub struct HumanReport<'a> {
    report: &'a ValidationReport,
}

impl<'a> HumanReport<'a> {
    pub fn new(report: &'a ValidationReport) -> Self {
        Self { report }
    }

    pub fn format(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "Found speakers: {}", self.report.speakers.join(", "));
        if !self.report.timeline_present {
            let _ = writeln!(output, "Timeline seems not to be present!");
        }

        for outcome in &self.report.outcomes {
            if outcome.passed() {
                let _ = writeln!(output, "{}", outcome.message);
            } else {
                let _ = writeln!(output, "{}: {}", outcome.rule, outcome.message);
            }
        }

        let verdict = match self.report.status() {
            RunStatus::AllPassed => "PASSED",
            RunStatus::SomeFailed => "FAILED",
        };
        let _ = writeln!(output, "\n{}", verdict);
        output
    }
}

/// The numbered list of rules
pub fn format_rule_catalogue() -> String {
    RuleId::ALL
        .iter()
        .map(|rule| format!("{}. {}\n", rule.number(), rule.title()))
        .collect()
}
