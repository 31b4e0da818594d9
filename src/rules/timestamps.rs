use super::RuleId;
use crate::error::{RuleViolation, ValidationError};
use crate::models::{Document, Tier, TierCategory};

/// Marker ids used by `tier` that `reference` never uses, in sorted order
pub fn unaligned_timestamps<'a>(tier: &'a Tier, reference: &Tier) -> Vec<&'a str> {
    let allowed = reference.timestamps();
    tier.timestamps()
        .into_iter()
        .filter(|id| !allowed.contains(id))
        .collect()
}

/// Whether every marker id of `tier` also occurs in `reference`
pub fn check_one_to_one_alignment(tier: &Tier, reference: &Tier) -> bool {
    unaligned_timestamps(tier, reference).is_empty()
}

fn subset_violation(rule: RuleId, speaker: &str, category: TierCategory, stray: &[&str]) -> ValidationError {
    RuleViolation::for_speaker(
        rule,
        speaker,
        format!(
            "For speaker {} the {} tier contains timestamps that are not in the transcription tier: {}",
            speaker,
            category,
            stray.join(", ")
        ),
    )
    .into()
}

fn check_subset(doc: &Document, rule: RuleId, category: TierCategory) -> Result<(), ValidationError> {
    for speaker in doc.speakers() {
        let primary = doc.primary_tier(speaker)?;
        let tier = doc.auxiliary_tier(speaker, category)?;
        let stray = unaligned_timestamps(tier, primary);
        if !stray.is_empty() {
            return Err(subset_violation(rule, speaker, category, &stray));
        }
    }
    Ok(())
}

/// Rule 2: the nonverbalDisfluency tier only uses markers of the transcription tier
pub fn check_nonverbal_subset(doc: &Document) -> Result<(), ValidationError> {
    check_subset(doc, RuleId::NonverbalSubset, TierCategory::NonverbalDisfluency)
}

/// Rule 3: the verbalDisfluency tier only uses markers of the transcription tier.
///
/// As soon as a speaker with an empty verbalDisfluency tier is reached the
/// whole rule passes; speakers after it are not inspected.
pub fn check_verbal_subset(doc: &Document) -> Result<(), ValidationError> {
    let category = TierCategory::VerbalDisfluency;
    for speaker in doc.speakers() {
        let primary = doc.primary_tier(speaker)?;
        let tier = doc.auxiliary_tier(speaker, category)?;
        if tier.events.is_empty() {
            return Ok(());
        }
        let stray = unaligned_timestamps(tier, primary);
        if !stray.is_empty() {
            return Err(subset_violation(RuleId::VerbalSubset, speaker, category, &stray));
        }
    }
    Ok(())
}

/// Rule 4: the disfluencyStructure tier only uses markers of the transcription tier.
///
/// Every speaker must have the tier at all before any containment is checked.
pub fn check_structure_subset(doc: &Document) -> Result<(), ValidationError> {
    let category = TierCategory::DisfluencyStructure;
    let speakers = doc.speakers();
    for &speaker in &speakers {
        doc.auxiliary_tier(speaker, category)?;
    }
    for &speaker in &speakers {
        let primary = doc.primary_tier(speaker)?;
        let tier = doc.auxiliary_tier(speaker, category)?;
        let stray = unaligned_timestamps(tier, primary);
        if !stray.is_empty() {
            return Err(subset_violation(RuleId::StructureSubset, speaker, category, &stray));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{self, event};

    fn stray_markers(result: Result<(), ValidationError>) -> (Option<String>, String) {
        match result {
            Err(ValidationError::Violation(v)) => (v.speaker, v.detail),
            other => panic!("expected a rule violation, got {:?}", other),
        }
    }

    #[test]
    fn test_alignment_helper() {
        let doc = fixtures::annotated();
        let primary = doc.primary_tier("A").unwrap();
        let verbal = doc.auxiliary_tier("A", TierCategory::VerbalDisfluency).unwrap();
        assert!(check_one_to_one_alignment(verbal, primary));
        assert!(!check_one_to_one_alignment(primary, verbal));
        assert_eq!(unaligned_timestamps(primary, verbal), vec!["T3"]);
    }

    #[test]
    fn test_fixture_passes_subset_rules() {
        let doc = fixtures::annotated();
        assert_eq!(check_nonverbal_subset(&doc), Ok(()));
        assert_eq!(check_verbal_subset(&doc), Ok(()));
        assert_eq!(check_structure_subset(&doc), Ok(()));
    }

    #[test]
    fn test_nonverbal_subset_iff_markers_shared() {
        let mut doc = fixtures::annotated();
        fixtures::tier_mut(&mut doc, "A", TierCategory::NonverbalDisfluency)
            .events
            .push(event("T2", "T3"));
        assert_eq!(check_nonverbal_subset(&doc), Ok(()));

        fixtures::tier_mut(&mut doc, "A", TierCategory::NonverbalDisfluency)
            .events
            .push(event("T3", "T4"));
        let (speaker, detail) = stray_markers(check_nonverbal_subset(&doc));
        assert_eq!(speaker.as_deref(), Some("A"));
        assert!(detail.ends_with(": T4"), "{}", detail);
    }

    #[test]
    fn test_nonverbal_tier_required() {
        let mut doc = fixtures::annotated();
        doc.tiers
            .retain(|t| t.category != TierCategory::NonverbalDisfluency);
        assert!(matches!(
            check_nonverbal_subset(&doc),
            Err(ValidationError::MissingTier { .. })
        ));
    }

    #[test]
    fn test_verbal_subset_violation() {
        let mut doc = fixtures::annotated();
        fixtures::tier_mut(&mut doc, "A", TierCategory::VerbalDisfluency)
            .events
            .push(event("T3", "T4"));
        let (_, detail) = stray_markers(check_verbal_subset(&doc));
        assert!(detail.contains("verbalDisfluency"));
    }

    #[test]
    fn test_empty_verbal_tier_passes_whole_rule() {
        let mut doc = fixtures::annotated();
        doc.speaker_table.push("B".to_string());
        doc.tiers.extend(fixtures::speaker_tiers("B", 6));
        // B carries a stray marker, but A's empty tier ends the rule first
        fixtures::tier_mut(&mut doc, "A", TierCategory::VerbalDisfluency)
            .events
            .clear();
        fixtures::tier_mut(&mut doc, "B", TierCategory::VerbalDisfluency)
            .events
            .push(event("T3", "T4"));
        assert_eq!(check_verbal_subset(&doc), Ok(()));
    }

    #[test]
    fn test_structure_marker_outside_transcription() {
        let mut doc = fixtures::annotated();
        fixtures::tier_mut(&mut doc, "A", TierCategory::DisfluencyStructure)
            .events
            .push(event("T2", "T9"));
        let (speaker, detail) = stray_markers(check_structure_subset(&doc));
        assert_eq!(speaker.as_deref(), Some("A"));
        assert!(detail.contains("T9"));
    }

    #[test]
    fn test_missing_structure_tier_is_distinct_failure() {
        let mut doc = fixtures::annotated();
        doc.tiers
            .retain(|t| t.category != TierCategory::DisfluencyStructure);
        assert_eq!(
            check_structure_subset(&doc),
            Err(ValidationError::MissingTier {
                speaker: "A".to_string(),
                category: TierCategory::DisfluencyStructure,
            })
        );
    }
}
