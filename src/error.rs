use std::fmt;

use crate::models::TierCategory;
use crate::rules::RuleId;

/// Errors produced while evaluating a document
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    /// A required structural element is absent (timeline, expected tier)
    #[error("Structural error: {0}")]
    Structural(String),

    /// An expected tier is absent for a speaker
    #[error("Speaker {speaker} does not have a {category} tier")]
    MissingTier {
        speaker: String,
        category: TierCategory,
    },

    /// A lookup that must match exactly one tier matched several
    #[error("Speaker {speaker} has {count} tiers named '{display_name}', expected exactly one")]
    AmbiguousTier {
        speaker: String,
        display_name: String,
        count: usize,
    },

    /// A referenced marker id is not declared in the common timeline
    #[error("Timeline marker {0} is not declared in the common timeline")]
    UnknownMarker(String),

    /// A marker exists but carries no time offset
    #[error("Timeline marker {0} has no time offset")]
    UntimedMarker(String),

    /// A semantic inconsistency found by one of the rules
    #[error("{0}")]
    Violation(RuleViolation),

    /// The run cannot start at all (e.g. original document is ambiguous)
    #[error("Precondition failed: {0}")]
    Precondition(String),
}

impl ValidationError {
    /// Speaker the error is attributed to, if any
    pub fn speaker(&self) -> Option<&str> {
        match self {
            Self::Violation(violation) => violation.speaker.as_deref(),
            Self::MissingTier { speaker, .. } | Self::AmbiguousTier { speaker, .. } => {
                Some(speaker)
            }
            _ => None,
        }
    }

    /// Whether the error stems from absent or malformed structure rather
    /// than a rule's semantic check
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Structural(_)
                | Self::MissingTier { .. }
                | Self::AmbiguousTier { .. }
                | Self::UnknownMarker(_)
                | Self::UntimedMarker(_)
        )
    }
}

/// A failed rule, with enough detail to locate the problem in the source file
#[derive(Debug, Clone, PartialEq)]
pub struct RuleViolation {
    pub rule: RuleId,
    pub speaker: Option<String>,
    pub detail: String,
}

impl RuleViolation {
    pub fn new(rule: RuleId, detail: impl Into<String>) -> Self {
        Self {
            rule,
            speaker: None,
            detail: detail.into(),
        }
    }

    pub fn for_speaker(rule: RuleId, speaker: &str, detail: impl Into<String>) -> Self {
        Self {
            rule,
            speaker: Some(speaker.to_string()),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

impl From<RuleViolation> for ValidationError {
    fn from(violation: RuleViolation) -> Self {
        Self::Violation(violation)
    }
}

/// A timeline declares the same marker id twice
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Timeline marker {0} is declared more than once")]
pub struct DuplicateMarkerError(pub String);

/// A category attribute outside the annotation scheme
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Unknown tier category '{0}'")]
pub struct UnknownCategoryError(pub String);

/// Errors raised while turning EXB bytes into a [`crate::models::Document`]
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed EXB document: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    #[error("Timeline marker {id} has an invalid time value '{value}'")]
    InvalidTime { id: String, value: String },

    #[error(transparent)]
    DuplicateMarker(#[from] DuplicateMarkerError),

    #[error("Tier {0} has no display-name")]
    MissingAttribute(String),
}
