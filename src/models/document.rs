use std::collections::BTreeSet;

use super::{Event, Tier, TierCategory, TimelineIndex};
use crate::error::ValidationError;

/// A parsed transcription: speaker table, common timeline and tiers.
///
/// The accessor methods below perform no validation of their own; they only
/// fail when a structure they are asked for is absent or ambiguous.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Speaker ids declared in the speaker table, in declaration order
    pub speaker_table: Vec<String>,
    /// `None` when the file carries no common timeline
    pub timeline: Option<TimelineIndex>,
    /// Tiers in declaration order
    pub tiers: Vec<Tier>,
}

impl Document {
    pub fn new(speaker_table: Vec<String>, timeline: Option<TimelineIndex>, tiers: Vec<Tier>) -> Self {
        Self {
            speaker_table,
            timeline,
            tiers,
        }
    }

    /// The common timeline, or a structural error if the file has none
    pub fn timeline(&self) -> Result<&TimelineIndex, ValidationError> {
        self.timeline.as_ref().ok_or_else(|| {
            ValidationError::Structural("the document has no common timeline".to_string())
        })
    }

    /// Declared speakers that own at least one tier
    pub fn speakers(&self) -> BTreeSet<&str> {
        self.speaker_table
            .iter()
            .map(String::as_str)
            .filter(|speaker| self.tiers.iter().any(|t| t.is_owned_by(speaker)))
            .collect()
    }

    /// Tiers owned by `speaker`, optionally narrowed by category and display name
    pub fn tiers_for(
        &self,
        speaker: &str,
        category: Option<TierCategory>,
        display_name: Option<&str>,
    ) -> Vec<&Tier> {
        self.tiers
            .iter()
            .filter(|t| t.is_owned_by(speaker))
            .filter(|t| category.is_none_or(|c| t.category == c))
            .filter(|t| display_name.is_none_or(|n| t.display_name == n))
            .collect()
    }

    /// The speaker's primary transcription tier: the first non-auxiliary tier
    /// it owns, in declaration order
    pub fn primary_tier(&self, speaker: &str) -> Result<&Tier, ValidationError> {
        self.tiers_for(speaker, Some(TierCategory::Transcription), None)
            .into_iter()
            .next()
            .ok_or_else(|| ValidationError::MissingTier {
                speaker: speaker.to_string(),
                category: TierCategory::Transcription,
            })
    }

    /// The single tier of an auxiliary category for `speaker`.
    ///
    /// Matching is on owner, category and the conventional display name;
    /// zero or several matches is a structural error.
    pub fn auxiliary_tier(&self, speaker: &str, category: TierCategory) -> Result<&Tier, ValidationError> {
        let display_name = category.display_name_for(speaker);
        let matches = self.tiers_for(speaker, Some(category), Some(&display_name));
        match matches.as_slice() {
            [tier] => Ok(*tier),
            [] => Err(ValidationError::MissingTier {
                speaker: speaker.to_string(),
                category,
            }),
            many => Err(ValidationError::AmbiguousTier {
                speaker: speaker.to_string(),
                display_name,
                count: many.len(),
            }),
        }
    }

    /// Every event of every tier, in declaration order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.tiers.iter().flat_map(|t| t.events.iter())
    }
}

/// Events of a tier in declaration order
pub fn events_of(tier: &Tier) -> &[Event] {
    tier.events()
}

/// Start and end marker ids used by a tier
pub fn timestamps_of(tier: &Tier) -> BTreeSet<&str> {
    tier.timestamps()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;

    #[test]
    fn test_speakers_require_a_tier() {
        let mut doc = fixtures::annotated();
        doc.speaker_table.push("SILENT".to_string());

        let speakers: Vec<&str> = doc.speakers().into_iter().collect();
        assert_eq!(speakers, vec!["A"]);
    }

    #[test]
    fn test_tiers_for_filters() {
        let doc = fixtures::annotated();
        assert_eq!(doc.tiers_for("A", None, None).len(), 6);
        assert_eq!(doc.tiers_for("A", None, Some("A")).len(), 2);
        assert_eq!(
            doc.tiers_for("A", Some(TierCategory::VerbalDisfluency), None).len(),
            1
        );
        assert!(doc.tiers_for("B", None, None).is_empty());
    }

    #[test]
    fn test_primary_tier_is_first_transcription_tier() {
        let doc = fixtures::annotated();
        let primary = doc.primary_tier("A").unwrap();
        assert_eq!(primary.id, "TIE0");
        assert_eq!(events_of(primary).len(), 2);
        assert_eq!(timestamps_of(primary).len(), 3);
    }

    #[test]
    fn test_auxiliary_tier_missing_and_ambiguous() {
        let mut doc = fixtures::annotated();
        doc.tiers
            .retain(|t| t.category != TierCategory::DisfluencyStructure);
        let err = doc
            .auxiliary_tier("A", TierCategory::DisfluencyStructure)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingTier {
                speaker: "A".to_string(),
                category: TierCategory::DisfluencyStructure,
            }
        );

        let mut doc = fixtures::annotated();
        let extra = doc.auxiliary_tier("A", TierCategory::VerbalDisfluency).unwrap().clone();
        doc.tiers.push(extra);
        let err = doc
            .auxiliary_tier("A", TierCategory::VerbalDisfluency)
            .unwrap_err();
        assert!(matches!(err, ValidationError::AmbiguousTier { count: 2, .. }));
    }

    #[test]
    fn test_missing_timeline_is_structural() {
        let mut doc = fixtures::annotated();
        doc.timeline = None;
        assert!(matches!(doc.timeline(), Err(ValidationError::Structural(_))));
    }
}
