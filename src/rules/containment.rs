use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::RuleId;
use crate::error::{RuleViolation, ValidationError};
use crate::models::{Document, Tier, TierCategory, TimelineIndex};

/// How disfluencyStructure events are tied to verbalDisfluency events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentStrategy {
    /// Every structure event lies in time within some verbal event
    #[default]
    GapTolerant,
    /// The outer boundaries of the structure tier are verbal boundaries
    Strict,
}

/// Rule 5 under the chosen strategy
pub fn check_containment(
    doc: &Document,
    strategy: ContainmentStrategy,
) -> Result<(), ValidationError> {
    match strategy {
        ContainmentStrategy::GapTolerant => {
            let timeline = doc.timeline()?;
            check_structure_containment(doc, timeline)
        }
        ContainmentStrategy::Strict => check_structure_boundaries(doc),
    }
}

/// Marker ids left once every id used both as a start and as an end is
/// cancelled pairwise; what remains are the outer edges of the tier.
pub fn outer_boundaries(tier: &Tier) -> BTreeSet<&str> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for event in &tier.events {
        counts.entry(event.start.as_str()).or_default().0 += 1;
        counts.entry(event.end.as_str()).or_default().1 += 1;
    }
    counts
        .into_iter()
        .filter(|(_, (starts, ends))| starts != ends)
        .map(|(id, _)| id)
        .collect()
}

/// Rule 5, strict variant: the outer boundaries of disfluencyStructure must
/// all be marker ids used by verbalDisfluency.
pub fn check_structure_boundaries(doc: &Document) -> Result<(), ValidationError> {
    for speaker in doc.speakers() {
        let structure = doc.auxiliary_tier(speaker, TierCategory::DisfluencyStructure)?;
        let verbal = doc.auxiliary_tier(speaker, TierCategory::VerbalDisfluency)?;
        let verbal_timestamps = verbal.timestamps();

        let stray: Vec<&str> = outer_boundaries(structure)
            .into_iter()
            .filter(|id| !verbal_timestamps.contains(id))
            .collect();
        if !stray.is_empty() {
            return Err(RuleViolation::for_speaker(
                RuleId::StructureContainment,
                speaker,
                format!(
                    "For speaker {} the disfluencyStructure tier has boundaries that are not in the verbalDisfluency tier: {}",
                    speaker,
                    stray.join(", ")
                ),
            )
            .into());
        }
    }
    Ok(())
}

/// Rule 5, gap-tolerant variant: each disfluencyStructure event must be
/// enclosed in time by at least one verbalDisfluency event. Shared
/// boundaries are not required.
pub fn check_structure_containment(
    doc: &Document,
    timeline: &TimelineIndex,
) -> Result<(), ValidationError> {
    for speaker in doc.speakers() {
        let structure = doc.auxiliary_tier(speaker, TierCategory::DisfluencyStructure)?;
        let verbal = doc.auxiliary_tier(speaker, TierCategory::VerbalDisfluency)?;

        let mut unenclosed = Vec::new();
        for event in &structure.events {
            let (start, end) = timeline.resolve_interval(&event.start, &event.end)?;
            // Verbal events are resolved in order only until one encloses
            let mut enclosed = false;
            for v in &verbal.events {
                let (v_start, v_end) = timeline.resolve_interval(&v.start, &v.end)?;
                if v_start <= start && end <= v_end {
                    enclosed = true;
                    break;
                }
            }
            if !enclosed {
                unenclosed.push(format!("{}-{}", event.start, event.end));
            }
        }

        if !unenclosed.is_empty() {
            return Err(RuleViolation::for_speaker(
                RuleId::StructureContainment,
                speaker,
                format!(
                    "For speaker {} disfluencyStructure events are not enclosed by any verbalDisfluency event: {}",
                    speaker,
                    unenclosed.join(", ")
                ),
            )
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{self, event};

    fn five_markers() -> TimelineIndex {
        fixtures::timeline(&[
            ("T1", 0.0),
            ("T2", 1.0),
            ("T3", 2.0),
            ("T4", 3.0),
            ("T5", 4.0),
        ])
    }

    fn with_tiers(verbal: Vec<crate::models::Event>, structure: Vec<crate::models::Event>) -> Document {
        let mut doc = fixtures::annotated();
        doc.timeline = Some(five_markers());
        fixtures::tier_mut(&mut doc, "A", TierCategory::VerbalDisfluency).events = verbal;
        fixtures::tier_mut(&mut doc, "A", TierCategory::DisfluencyStructure).events = structure;
        doc
    }

    #[test]
    fn test_outer_boundaries_cancel_touching_edges() {
        let doc = with_tiers(
            vec![],
            vec![event("T1", "T2"), event("T2", "T3"), event("T3", "T5")],
        );
        let tier = doc.auxiliary_tier("A", TierCategory::DisfluencyStructure).unwrap();
        let outer: Vec<&str> = outer_boundaries(tier).into_iter().collect();
        assert_eq!(outer, vec!["T1", "T5"]);
    }

    #[test]
    fn test_strict_passes_on_shared_outer_edges() {
        let doc = with_tiers(
            vec![event("T1", "T3")],
            vec![event("T1", "T2"), event("T2", "T3")],
        );
        assert_eq!(check_structure_boundaries(&doc), Ok(()));
    }

    #[test]
    fn test_strict_rejects_gap_that_tolerant_accepts() {
        let doc = with_tiers(vec![event("T1", "T4")], vec![event("T2", "T3")]);
        assert!(check_structure_boundaries(&doc).is_err());
        assert_eq!(
            check_containment(&doc, ContainmentStrategy::GapTolerant),
            Ok(())
        );
    }

    #[test]
    fn test_enclosed_event_passes() {
        let doc = with_tiers(
            vec![event("T1", "T2"), event("T3", "T5")],
            vec![event("T1", "T2"), event("T3", "T4"), event("T4", "T5")],
        );
        let timeline = doc.timeline().unwrap();
        assert_eq!(check_structure_containment(&doc, timeline), Ok(()));
    }

    #[test]
    fn test_straddling_event_fails() {
        let doc = with_tiers(
            vec![event("T1", "T2"), event("T3", "T4")],
            vec![event("T1", "T4")],
        );
        let timeline = doc.timeline().unwrap();
        match check_structure_containment(&doc, timeline) {
            Err(ValidationError::Violation(v)) => {
                assert_eq!(v.rule, RuleId::StructureContainment);
                assert_eq!(v.speaker.as_deref(), Some("A"));
                assert!(v.detail.ends_with("T1-T4"), "{}", v.detail);
            }
            other => panic!("expected a rule violation, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_marker_is_reported() {
        let doc = with_tiers(vec![event("T1", "T4")], vec![event("T2", "T9")]);
        let timeline = doc.timeline().unwrap();
        assert_eq!(
            check_structure_containment(&doc, timeline),
            Err(ValidationError::UnknownMarker("T9".to_string()))
        );
    }

    #[test]
    fn test_unknown_verbal_marker_after_enclosing_event_is_not_reached() {
        let doc = with_tiers(
            vec![event("T1", "T2"), event("T2", "T99")],
            vec![event("T1", "T2")],
        );
        let timeline = doc.timeline().unwrap();
        assert_eq!(check_structure_containment(&doc, timeline), Ok(()));

        let doc = with_tiers(
            vec![event("T2", "T99"), event("T1", "T2")],
            vec![event("T1", "T2")],
        );
        let timeline = doc.timeline().unwrap();
        assert_eq!(
            check_structure_containment(&doc, timeline),
            Err(ValidationError::UnknownMarker("T99".to_string()))
        );
    }

    #[test]
    fn test_missing_timeline_fails_gap_tolerant_only() {
        let mut doc = with_tiers(vec![event("T1", "T3")], vec![event("T1", "T3")]);
        doc.timeline = None;
        assert!(matches!(
            check_containment(&doc, ContainmentStrategy::GapTolerant),
            Err(ValidationError::Structural(_))
        ));
        assert_eq!(check_containment(&doc, ContainmentStrategy::Strict), Ok(()));
    }
}
