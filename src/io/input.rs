use std::path::Path;

use serde::Deserialize;

use crate::error::ParseError;
use crate::models::{Document, Event, Tier, TierCategory, TimelineIndex, TimelineMarker};

/// `<basic-transcription>` root of an EXB file
#[derive(Debug, Deserialize)]
struct RawTranscription {
    #[serde(default)]
    head: Option<RawHead>,
    #[serde(rename = "basic-body")]
    body: RawBody,
}

#[derive(Debug, Deserialize)]
struct RawHead {
    #[serde(default)]
    speakertable: Option<RawSpeakerTable>,
}

#[derive(Debug, Deserialize)]
struct RawSpeakerTable {
    #[serde(rename = "speaker", default)]
    speakers: Vec<RawSpeaker>,
}

#[derive(Debug, Deserialize)]
struct RawSpeaker {
    #[serde(rename = "@id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawBody {
    #[serde(rename = "common-timeline", default)]
    timeline: Option<RawTimeline>,
    #[serde(rename = "tier", default)]
    tiers: Vec<RawTier>,
}

#[derive(Debug, Deserialize)]
struct RawTimeline {
    #[serde(rename = "tli", default)]
    markers: Vec<RawMarker>,
}

#[derive(Debug, Deserialize)]
struct RawMarker {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@time", default)]
    time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTier {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@speaker", default)]
    speaker: Option<String>,
    #[serde(rename = "@category", default)]
    category: Option<String>,
    #[serde(rename = "@display-name", default)]
    display_name: Option<String>,
    #[serde(rename = "event", default)]
    events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "@start")]
    start: String,
    #[serde(rename = "@end")]
    end: String,
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

/// Parse an EXB file into a Document
pub fn parse_exb_file(path: &Path) -> Result<Document, ParseError> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_exb_bytes(&bytes)
}

/// Parse raw EXB bytes into a Document
pub fn parse_exb_bytes(bytes: &[u8]) -> Result<Document, ParseError> {
    let raw: RawTranscription = quick_xml::de::from_reader(bytes)?;
    build_document(raw)
}

/// Parse an EXB string into a Document
pub fn parse_exb_str(xml: &str) -> Result<Document, ParseError> {
    let raw: RawTranscription = quick_xml::de::from_str(xml)?;
    build_document(raw)
}

fn build_document(raw: RawTranscription) -> Result<Document, ParseError> {
    let speaker_table = raw
        .head
        .and_then(|h| h.speakertable)
        .map(|t| t.speakers.into_iter().map(|s| s.id).collect())
        .unwrap_or_default();

    let timeline = raw.body.timeline.map(build_timeline).transpose()?;

    let tiers = raw
        .body
        .tiers
        .into_iter()
        .map(build_tier)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Document::new(speaker_table, timeline, tiers))
}

fn build_timeline(raw: RawTimeline) -> Result<TimelineIndex, ParseError> {
    let markers = raw
        .markers
        .into_iter()
        .map(|m| match m.time {
            None => Ok(TimelineMarker::untimed(m.id)),
            Some(value) => match value.trim().parse::<f64>() {
                Ok(time) => Ok(TimelineMarker::new(m.id, time)),
                Err(_) => Err(ParseError::InvalidTime { id: m.id, value }),
            },
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TimelineIndex::new(markers)?)
}

fn build_tier(raw: RawTier) -> Result<Tier, ParseError> {
    let display_name = raw
        .display_name
        .ok_or_else(|| ParseError::MissingAttribute(raw.id.clone()))?;
    let events = raw
        .events
        .into_iter()
        .map(|e| Event {
            start: e.start,
            end: e.end,
            text: e.text,
        })
        .collect();

    Ok(Tier {
        id: raw.id,
        speaker: raw.speaker,
        category: TierCategory::from_attribute(raw.category.as_deref()),
        display_name,
        events,
    })
}
