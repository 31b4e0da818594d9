use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::UnknownCategoryError;

/// Tier categories known to the disfluency annotation scheme.
///
/// Any category outside the four auxiliary ones is treated as transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TierCategory {
    /// The primary transcription (the base text)
    Transcription,
    Additional,
    NonverbalDisfluency,
    VerbalDisfluency,
    DisfluencyStructure,
}

impl TierCategory {
    /// Categories added by the annotators, in the order their tiers are expected
    pub const AUXILIARY: [TierCategory; 4] = [
        TierCategory::Additional,
        TierCategory::NonverbalDisfluency,
        TierCategory::VerbalDisfluency,
        TierCategory::DisfluencyStructure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transcription => "transcription",
            Self::Additional => "additional",
            Self::NonverbalDisfluency => "nonverbalDisfluency",
            Self::VerbalDisfluency => "verbalDisfluency",
            Self::DisfluencyStructure => "disfluencyStructure",
        }
    }

    pub fn is_auxiliary(&self) -> bool {
        !matches!(self, Self::Transcription)
    }

    /// Map a raw `category` attribute onto the scheme
    pub fn from_attribute(category: Option<&str>) -> Self {
        category
            .and_then(|c| c.parse().ok())
            .unwrap_or(Self::Transcription)
    }

    /// Display name a tier of this category must carry for `speaker`
    pub fn display_name_for(&self, speaker: &str) -> String {
        match self {
            Self::Transcription => speaker.to_string(),
            category => format!("{} [{}]", speaker, category.as_str()),
        }
    }
}

impl fmt::Display for TierCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierCategory {
    type Err = UnknownCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "additional" => Ok(Self::Additional),
            "nonverbalDisfluency" => Ok(Self::NonverbalDisfluency),
            "verbalDisfluency" => Ok(Self::VerbalDisfluency),
            "disfluencyStructure" => Ok(Self::DisfluencyStructure),
            other => Err(UnknownCategoryError(other.to_string())),
        }
    }
}

/// One annotation unit spanning two timeline markers
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub start: String,
    pub end: String,
    pub text: Option<String>,
}

impl Event {
    pub fn new(start: impl Into<String>, end: impl Into<String>, text: Option<&str>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            text: text.map(str::to_string),
        }
    }
}

/// A speaker-owned, ordered sequence of events
#[derive(Debug, Clone, PartialEq)]
pub struct Tier {
    /// Tier id from the source file (`TIE0`, ...)
    pub id: String,
    /// Owning speaker; EXB allows speakerless tiers
    pub speaker: Option<String>,
    pub category: TierCategory,
    pub display_name: String,
    /// Events in declaration order
    pub events: Vec<Event>,
}

impl Tier {
    pub fn new(
        id: impl Into<String>,
        speaker: Option<&str>,
        category: TierCategory,
        display_name: impl Into<String>,
        events: Vec<Event>,
    ) -> Self {
        Self {
            id: id.into(),
            speaker: speaker.map(str::to_string),
            category,
            display_name: display_name.into(),
            events,
        }
    }

    pub fn is_owned_by(&self, speaker: &str) -> bool {
        self.speaker.as_deref() == Some(speaker)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Every start and end marker id used by this tier
    pub fn timestamps(&self) -> BTreeSet<&str> {
        self.events
            .iter()
            .flat_map(|e| [e.start.as_str(), e.end.as_str()])
            .collect()
    }

    /// Concatenated event text, skipping events without text
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| e.text.as_deref())
            .collect()
    }
}
