pub mod containment;
pub mod text;
pub mod tier_presence;
pub mod timestamps;

pub use containment::*;
pub use text::*;
pub use tier_presence::*;
pub use timestamps::*;

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// The consistency rules, in the order they are run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleId {
    /// Rule 1: every speaker has exactly the six expected tiers
    TierPresence,
    /// Rule 2: nonverbalDisfluency markers are a subset of the transcription's
    NonverbalSubset,
    /// Rule 3: verbalDisfluency markers are a subset of the transcription's
    VerbalSubset,
    /// Rule 4: disfluencyStructure markers are a subset of the transcription's
    StructureSubset,
    /// Rule 5: disfluencyStructure events sit inside verbalDisfluency events
    StructureContainment,
    /// Rule 6: transcription text is unchanged from the original
    TextEquality,
}

impl RuleId {
    pub const ALL: [RuleId; 6] = [
        RuleId::TierPresence,
        RuleId::NonverbalSubset,
        RuleId::VerbalSubset,
        RuleId::StructureSubset,
        RuleId::StructureContainment,
        RuleId::TextEquality,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Self::TierPresence => 1,
            Self::NonverbalSubset => 2,
            Self::VerbalSubset => 3,
            Self::StructureSubset => 4,
            Self::StructureContainment => 5,
            Self::TextEquality => 6,
        }
    }

    /// One-line description shown to annotators
    pub fn title(&self) -> &'static str {
        match self {
            Self::TierPresence => {
                "Each speaker has the added tiers additional, nonverbalDisfluency, verbalDisfluency and disfluencyStructure"
            }
            Self::NonverbalSubset => {
                "nonverbalDisfluency only uses timeline items that the transcription tier uses"
            }
            Self::VerbalSubset => {
                "verbalDisfluency only uses timeline items that the transcription tier uses"
            }
            Self::StructureSubset => {
                "disfluencyStructure only uses timeline items that the transcription tier uses"
            }
            Self::StructureContainment => {
                "disfluencyStructure is aligned n:1 to verbalDisfluency; each structure event lies within a verbal event"
            }
            Self::TextEquality => {
                "The transcription text, ignoring spaces, is unchanged from the original"
            }
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule {}", self.number())
    }
}

impl Serialize for RuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

/// Pass/fail status of a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    Pass,
    Fail,
}

/// Result of running one rule against a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub rule: RuleId,
    pub status: RuleStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl RuleOutcome {
    pub fn from_result(rule: RuleId, result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                rule,
                status: RuleStatus::Pass,
                message: format!("{} validated.", rule),
                speaker: None,
            },
            Err(err) => Self {
                rule,
                status: RuleStatus::Fail,
                message: err.to_string(),
                speaker: err.speaker().map(str::to_string),
            },
        }
    }

    pub fn passed(&self) -> bool {
        self.status == RuleStatus::Pass
    }
}
