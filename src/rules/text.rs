use super::RuleId;
use crate::error::{RuleViolation, ValidationError};
use crate::models::Document;

/// Drop every space character (U+0020); other whitespace is kept
pub fn strip_spaces(text: &str) -> String {
    text.chars().filter(|&c| c != ' ').collect()
}

/// Rule 6: for each speaker, the transcription text of the annotated
/// document equals that of the original once spaces are removed.
pub fn check_text_equality(doc: &Document, original: &Document) -> Result<(), ValidationError> {
    for speaker in doc.speakers() {
        let annotated = strip_spaces(&doc.primary_tier(speaker)?.text());
        let source = original.primary_tier(speaker).map_err(|_| {
            ValidationError::Structural(format!(
                "the original document has no transcription tier for speaker {}",
                speaker
            ))
        })?;

        if annotated != strip_spaces(&source.text()) {
            return Err(RuleViolation::for_speaker(
                RuleId::TextEquality,
                speaker,
                format!("Text for speaker {} does not match original", speaker),
            )
            .into());
        }
    }
    Ok(())
}
