//! In-memory documents shared by the unit tests.

use super::{Document, Event, Tier, TierCategory, TimelineIndex, TimelineMarker};

pub fn timeline(markers: &[(&str, f64)]) -> TimelineIndex {
    TimelineIndex::new(
        markers
            .iter()
            .map(|(id, time)| TimelineMarker::new(*id, *time))
            .collect(),
    )
    .unwrap()
}

pub fn tier(id: &str, speaker: &str, category: TierCategory, events: Vec<Event>) -> Tier {
    Tier::new(
        id,
        Some(speaker),
        category,
        category.display_name_for(speaker),
        events,
    )
}

pub fn event(start: &str, end: &str) -> Event {
    Event::new(start, end, None)
}

/// The six tiers of a correctly annotated speaker
pub fn speaker_tiers(speaker: &str, first_id: usize) -> Vec<Tier> {
    let id = |offset: usize| format!("TIE{}", first_id + offset);
    vec![
        tier(
            &id(0),
            speaker,
            TierCategory::Transcription,
            vec![
                Event::new("T1", "T2", Some("hel")),
                Event::new("T2", "T3", Some("lo")),
            ],
        ),
        tier(&id(1), speaker, TierCategory::Transcription, vec![]),
        tier(&id(2), speaker, TierCategory::Additional, vec![]),
        tier(&id(3), speaker, TierCategory::NonverbalDisfluency, vec![]),
        tier(
            &id(4),
            speaker,
            TierCategory::VerbalDisfluency,
            vec![event("T1", "T2")],
        ),
        tier(
            &id(5),
            speaker,
            TierCategory::DisfluencyStructure,
            vec![event("T1", "T2")],
        ),
    ]
}

/// Speaker "A" with all six tiers, primary text "hel" + "lo"
pub fn annotated() -> Document {
    Document::new(
        vec!["A".to_string()],
        Some(timeline(&[("T1", 0.0), ("T2", 1.0), ("T3", 2.0), ("T4", 3.0)])),
        speaker_tiers("A", 0),
    )
}

/// The unannotated source of [`annotated`], primary text "hel lo"
pub fn original() -> Document {
    Document::new(
        vec!["A".to_string()],
        Some(timeline(&[("T1", 0.0), ("T2", 1.0), ("T3", 2.0)])),
        vec![tier(
            "TIE0",
            "A",
            TierCategory::Transcription,
            vec![
                Event::new("T1", "T2", Some("hel ")),
                Event::new("T2", "T3", Some("lo")),
            ],
        )],
    )
}

/// Mutable access to one of the speaker's tiers by category
pub fn tier_mut<'a>(doc: &'a mut Document, speaker: &str, category: TierCategory) -> &'a mut Tier {
    doc.tiers
        .iter_mut()
        .find(|t| t.is_owned_by(speaker) && t.category == category)
        .unwrap()
}
