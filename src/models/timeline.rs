use std::collections::HashMap;

use crate::error::{DuplicateMarkerError, ValidationError};

/// A named point on the common timeline
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineMarker {
    /// Marker identifier (the `tli` id, e.g. `T12`)
    pub id: String,
    /// Offset in seconds; EXB allows untimed markers
    pub time: Option<f64>,
}

impl TimelineMarker {
    pub fn new(id: impl Into<String>, time: f64) -> Self {
        Self {
            id: id.into(),
            time: Some(time),
        }
    }

    pub fn untimed(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            time: None,
        }
    }
}

/// The common timeline of a document, indexed by marker id.
///
/// Markers are kept in declaration order; a side map from id to position
/// makes every lookup O(1). Built once per document and read-only after.
#[derive(Debug, Clone, Default)]
pub struct TimelineIndex {
    markers: Vec<TimelineMarker>,
    positions: HashMap<String, usize>,
}

impl TimelineIndex {
    /// Build the index, rejecting duplicate marker ids
    pub fn new(markers: Vec<TimelineMarker>) -> Result<Self, DuplicateMarkerError> {
        let mut positions = HashMap::with_capacity(markers.len());
        for (position, marker) in markers.iter().enumerate() {
            if positions.insert(marker.id.clone(), position).is_some() {
                return Err(DuplicateMarkerError(marker.id.clone()));
            }
        }
        Ok(Self { markers, positions })
    }

    /// Markers in declaration order
    pub fn markers(&self) -> &[TimelineMarker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Look up a marker by id
    pub fn get(&self, id: &str) -> Option<&TimelineMarker> {
        self.positions.get(id).map(|&position| &self.markers[position])
    }

    /// Resolve a marker id to its time offset in seconds
    pub fn resolve_time(&self, id: &str) -> Result<f64, ValidationError> {
        let marker = self
            .get(id)
            .ok_or_else(|| ValidationError::UnknownMarker(id.to_string()))?;
        marker
            .time
            .ok_or_else(|| ValidationError::UntimedMarker(id.to_string()))
    }

    /// Resolve both ends of an interval
    pub fn resolve_interval(&self, start: &str, end: &str) -> Result<(f64, f64), ValidationError> {
        Ok((self.resolve_time(start)?, self.resolve_time(end)?))
    }
}
