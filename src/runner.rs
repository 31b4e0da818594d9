use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::ValidationError;
use crate::models::Document;
use crate::rules::{
    check_containment, check_nonverbal_subset, check_structure_subset, check_text_equality,
    check_tier_presence, check_verbal_subset, ContainmentStrategy, RuleId, RuleOutcome,
};

/// Severity of a runner diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Error,
}

/// A message produced during one validation run
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Receiver for the diagnostics of a single run
pub trait DiagnosticsSink {
    fn emit(&mut self, diagnostic: Diagnostic);

    fn debug(&mut self, message: String) {
        self.emit(Diagnostic {
            severity: Severity::Debug,
            message,
        });
    }

    fn info(&mut self, message: String) {
        self.emit(Diagnostic {
            severity: Severity::Info,
            message,
        });
    }

    fn error(&mut self, message: String) {
        self.emit(Diagnostic {
            severity: Severity::Error,
            message,
        });
    }
}

/// Forwards diagnostics to the `tracing` subscriber
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Debug => debug!("{}", diagnostic.message),
            Severity::Info => info!("{}", diagnostic.message),
            Severity::Error => error!("{}", diagnostic.message),
        }
    }
}

/// Keeps diagnostics in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub diagnostics: Vec<Diagnostic>,
}

impl MemorySink {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}

impl DiagnosticsSink for MemorySink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    AllPassed,
    SomeFailed,
}

/// Everything a run found out about the annotated document
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Speakers owning at least one tier
    pub speakers: Vec<String>,
    /// Whether the annotated document carries a common timeline
    pub timeline_present: bool,
    pub containment: ContainmentStrategy,
    /// One outcome per rule, in run order
    pub outcomes: Vec<RuleOutcome>,
}

impl ValidationReport {
    pub fn status(&self) -> RunStatus {
        if self.timeline_present && self.outcomes.iter().all(RuleOutcome::passed) {
            RunStatus::AllPassed
        } else {
            RunStatus::SomeFailed
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

/// A source document the annotated file may have been derived from
#[derive(Debug, Clone)]
pub struct OriginalCandidate {
    /// File name or other label shown to the user
    pub label: String,
    pub document: Document,
}

/// Exactly one candidate must remain; anything else stops the run
pub fn select_original<T>(candidates: Vec<T>) -> Result<T, ValidationError> {
    let count = candidates.len();
    let mut candidates = candidates.into_iter();
    match (candidates.next(), count) {
        (Some(candidate), 1) => Ok(candidate),
        (None, _) => Err(ValidationError::Precondition(
            "Found no candidates for original file".to_string(),
        )),
        _ => Err(ValidationError::Precondition(format!(
            "Found {} candidates for original file, can't continue with multiple candidates",
            count
        ))),
    }
}

/// Runs every rule against an annotated document and its original
pub struct Validator<'a> {
    containment: ContainmentStrategy,
    sink: &'a mut dyn DiagnosticsSink,
}

impl<'a> Validator<'a> {
    pub fn new(containment: ContainmentStrategy, sink: &'a mut dyn DiagnosticsSink) -> Self {
        Self { containment, sink }
    }

    /// Select the single original among `candidates`, then run all rules.
    ///
    /// Zero or several candidates is the only condition that aborts a run.
    pub fn run_with_candidates(
        &mut self,
        annotated: &Document,
        candidates: Vec<OriginalCandidate>,
    ) -> Result<ValidationReport, ValidationError> {
        let original = select_original(candidates).inspect_err(|err| {
            self.sink.error(err.to_string());
        })?;
        self.sink.info(format!(
            "Found the original file for this annotation: {}",
            original.label
        ));
        Ok(self.run(annotated, &original.document))
    }

    /// Run rules 1 to 6 in order; a failing rule never stops the ones after it
    pub fn run(&mut self, annotated: &Document, original: &Document) -> ValidationReport {
        for rule in RuleId::ALL {
            self.sink.debug(format!("{}. {}", rule.number(), rule.title()));
        }

        let speakers: Vec<String> = annotated
            .speakers()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.sink
            .info(format!("Found speakers: {}", speakers.join(", ")));

        let timeline_present = annotated.timeline.is_some();
        if !timeline_present {
            self.sink
                .error("Timeline seems not to be present!".to_string());
        }

        let mut outcomes = Vec::with_capacity(RuleId::ALL.len());
        for rule in RuleId::ALL {
            let outcome = RuleOutcome::from_result(rule, self.evaluate(rule, annotated, original));
            if outcome.passed() {
                self.sink.info(outcome.message.clone());
            } else {
                self.sink.error(format!("{}: {}", rule, outcome.message));
            }
            outcomes.push(outcome);
        }

        ValidationReport {
            speakers,
            timeline_present,
            containment: self.containment,
            outcomes,
        }
    }

    fn evaluate(
        &self,
        rule: RuleId,
        annotated: &Document,
        original: &Document,
    ) -> Result<(), ValidationError> {
        match rule {
            RuleId::TierPresence => check_tier_presence(annotated),
            RuleId::NonverbalSubset => check_nonverbal_subset(annotated),
            RuleId::VerbalSubset => check_verbal_subset(annotated),
            RuleId::StructureSubset => check_structure_subset(annotated),
            RuleId::StructureContainment => check_containment(annotated, self.containment),
            RuleId::TextEquality => check_text_equality(annotated, original),
        }
    }
}

/// Run every rule with the default gap-tolerant containment, logging
/// through `tracing`
pub fn run_validation(annotated: &Document, original: &Document) -> Vec<RuleOutcome> {
    let mut sink = TracingSink;
    Validator::new(ContainmentStrategy::default(), &mut sink)
        .run(annotated, original)
        .outcomes
}
