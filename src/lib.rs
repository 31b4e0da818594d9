pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod rules;
pub mod runner;

pub use config::ValidatorConfig;
pub use error::{
    DuplicateMarkerError, ParseError, RuleViolation, UnknownCategoryError, ValidationError,
};
pub use io::{
    format_rule_catalogue, locate_original, parse_exb_bytes, parse_exb_file, parse_exb_str,
    HumanReport, MachineReport,
};
pub use models::{Document, Event, Tier, TierCategory, TimelineIndex, TimelineMarker};
pub use rules::{
    check_one_to_one_alignment, check_structure_boundaries, check_structure_containment,
    ContainmentStrategy, RuleId, RuleOutcome, RuleStatus,
};
pub use runner::{
    run_validation, select_original, DiagnosticsSink, MemorySink, OriginalCandidate, RunStatus,
    TracingSink, ValidationReport, Validator,
};
