use std::collections::BTreeSet;

use super::RuleId;
use crate::error::{RuleViolation, ValidationError};
use crate::models::{Document, Tier, TierCategory};

/// Number of transcription tiers each speaker carries in the source format
pub const TRANSCRIPTION_TIERS_PER_SPEAKER: usize = 2;

/// Total number of tiers each annotated speaker must own
pub const TIERS_PER_SPEAKER: usize = TRANSCRIPTION_TIERS_PER_SPEAKER + TierCategory::AUXILIARY.len();

/// A tier the annotation scheme requires for a speaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpectedTier<'a> {
    pub speaker: &'a str,
    pub category: TierCategory,
}

impl ExpectedTier<'_> {
    pub fn display_name(&self) -> String {
        self.category.display_name_for(self.speaker)
    }

    fn matches(&self, tier: &Tier) -> bool {
        tier.is_owned_by(self.speaker)
            && tier.category == self.category
            && tier.display_name == self.display_name()
    }
}

/// Every tier expected for `speakers`, two transcription tiers first
pub fn expected_tiers<'a>(speakers: &BTreeSet<&'a str>) -> Vec<ExpectedTier<'a>> {
    speakers
        .iter()
        .flat_map(|&speaker| {
            std::iter::repeat_n(TierCategory::Transcription, TRANSCRIPTION_TIERS_PER_SPEAKER)
                .chain(TierCategory::AUXILIARY)
                .map(move |category| ExpectedTier { speaker, category })
        })
        .collect()
}

/// Match every expected tier against one tier from `tiers`, consuming it.
///
/// Returns the expected tiers with no match and the tiers left over.
fn multiset_difference<'a, 'd>(
    expected: Vec<ExpectedTier<'a>>,
    tiers: Vec<&'d Tier>,
) -> (Vec<ExpectedTier<'a>>, Vec<&'d Tier>) {
    let mut unmatched = tiers;
    let mut missing = Vec::new();
    for expected in expected {
        match unmatched.iter().position(|tier| expected.matches(tier)) {
            Some(index) => {
                unmatched.remove(index);
            }
            None => missing.push(expected),
        }
    }
    (missing, unmatched)
}

fn quoted_names(tiers: &[&Tier]) -> String {
    tiers
        .iter()
        .map(|t| format!("'{}'", t.display_name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Names the tiers a speaker lacks or has in excess, e.g. "; missing 'A [additional]'"
fn speaker_difference(doc: &Document, speaker: &str) -> String {
    let speakers: BTreeSet<&str> = [speaker].into_iter().collect();
    let (missing, extra) =
        multiset_difference(expected_tiers(&speakers), doc.tiers_for(speaker, None, None));

    let mut detail = String::new();
    if !missing.is_empty() {
        let names: Vec<String> = missing
            .iter()
            .map(|e| format!("'{}'", e.display_name()))
            .collect();
        detail.push_str(&format!("; missing {}", names.join(", ")));
    }
    if !extra.is_empty() {
        detail.push_str(&format!("; unexpected {}", quoted_names(&extra)));
    }
    detail
}

/// Rule 1: each speaker owns exactly the six expected tiers, and no tier
/// in the document is left over once every expected tier is matched.
pub fn check_tier_presence(doc: &Document) -> Result<(), ValidationError> {
    let speakers = doc.speakers();

    for &speaker in &speakers {
        let transcription = doc.tiers_for(speaker, None, Some(speaker)).len();
        if transcription != TRANSCRIPTION_TIERS_PER_SPEAKER {
            return Err(RuleViolation::for_speaker(
                RuleId::TierPresence,
                speaker,
                format!(
                    "For speaker {} {} transcription tiers were expected, but {} were found{}",
                    speaker,
                    TRANSCRIPTION_TIERS_PER_SPEAKER,
                    transcription,
                    speaker_difference(doc, speaker)
                ),
            )
            .into());
        }

        let owned = doc.tiers_for(speaker, None, None).len();
        if owned != TIERS_PER_SPEAKER {
            return Err(RuleViolation::for_speaker(
                RuleId::TierPresence,
                speaker,
                format!(
                    "For speaker {} exactly {} tiers were expected, but {} were found{}",
                    speaker,
                    TIERS_PER_SPEAKER,
                    owned,
                    speaker_difference(doc, speaker)
                ),
            )
            .into());
        }
    }

    let (missing, extra) =
        multiset_difference(expected_tiers(&speakers), doc.tiers.iter().collect());

    if let Some(expected) = missing.first() {
        return Err(RuleViolation::for_speaker(
            RuleId::TierPresence,
            expected.speaker,
            format!("Expected tier named '{}' was not found", expected.display_name()),
        )
        .into());
    }

    if !extra.is_empty() {
        return Err(RuleViolation::new(
            RuleId::TierPresence,
            format!("Found extra tiers: {}", quoted_names(&extra)),
        )
        .into());
    }

    Ok(())
}
