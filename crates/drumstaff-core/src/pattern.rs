//! Drum pattern record
//!
//! The external store hands patterns over as a loose JSON object where every
//! key is either a drum track (`[bool; length]`) or pattern-wide metadata.
//! [`Pattern`] is the typed form of that object: an ordered track list plus
//! separate metadata fields.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::drum::{normalize, CanonicalDrum};
use crate::error::{DrumstaffError, Result};

/// Keys that carry metadata rather than a drum track
const METADATA_KEYS: [&str; 4] = ["length", "subdivisions", "offsets", "sections"];

/// Longest pattern accepted from outside
pub const MAX_STEPS: usize = 1 << 16;

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// One drum track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Key as spelled by the data source; toggles are reported against it
    pub key: String,
    pub drum: CanonicalDrum,
    pub steps: Vec<bool>,
}

impl Track {
    pub fn new(key: impl Into<String>, steps: Vec<bool>) -> Self {
        let key = key.into();
        let drum = normalize(&key);
        Self { key, drum, steps }
    }

    pub fn is_active(&self, step: usize) -> bool {
        self.steps.get(step).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pattern {
    length: usize,
    tracks: Vec<Track>,
    /// Per-step count labels ("1", "e", "&", "a", ...)
    pub subdivisions: Option<Vec<String>>,
    /// Per-step timing offsets, carried through untouched
    pub offsets: Option<Vec<f64>>,
    #[serde(skip, default = "next_revision")]
    revision: u64,
}

impl Default for Pattern {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Pattern {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            tracks: Vec::new(),
            subdivisions: None,
            offsets: None,
            revision: next_revision(),
        }
    }

    /// Builder-style track insertion, resizing `steps` to the pattern length
    pub fn with_track(mut self, key: impl Into<String>, steps: Vec<bool>) -> Self {
        self.set_track(key, steps);
        self
    }

    pub fn with_subdivisions(mut self, labels: Vec<String>) -> Self {
        self.subdivisions = Some(labels);
        self.touch();
        self
    }

    /// Parse the store's JSON object form
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(DrumstaffError::InvalidPattern("expected a JSON object".into()));
        };

        let tracks = collect_tracks(&map);
        let length = match map.get("length") {
            Some(v) => v.as_u64().and_then(|n| usize::try_from(n).ok()).ok_or_else(|| {
                DrumstaffError::InvalidPattern(format!("length must be a non-negative integer, got {v}"))
            })?,
            None => tracks.iter().map(|(_, s)| s.len()).max().unwrap_or(0),
        };
        if length > MAX_STEPS {
            return Err(DrumstaffError::InvalidPattern(format!(
                "length {length} exceeds the {MAX_STEPS} step limit"
            )));
        }

        let subdivisions = map.get("subdivisions").and_then(Value::as_array).map(|labels| {
            labels
                .iter()
                .map(|l| match l {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        });
        let offsets = map
            .get("offsets")
            .and_then(Value::as_array)
            .map(|o| o.iter().map(|v| v.as_f64().unwrap_or(0.0)).collect());

        let mut pattern = Self::new(length);
        pattern.subdivisions = subdivisions;
        pattern.offsets = offsets;
        for (key, steps) in tracks {
            if steps.len() != length {
                tracing::warn!(
                    "Track '{}' has {} steps, pattern length is {}; resizing",
                    key,
                    steps.len(),
                    length
                );
            }
            pattern.set_track(key, steps);
        }
        tracing::debug!("Parsed pattern: {} tracks, {} steps", pattern.tracks.len(), length);
        Ok(pattern)
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Token that changes on every mutation; never shared between two patterns
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, key: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.key == key)
    }

    /// Tracks in grid row order: cymbals and unknown voices on top, kick at the bottom
    pub fn rows(&self) -> Vec<&Track> {
        let mut rows: Vec<&Track> = self.tracks.iter().collect();
        rows.sort_by_key(|t| t.drum.row_rank());
        rows
    }

    pub fn subdivision(&self, step: usize) -> Option<&str> {
        self.subdivisions
            .as_ref()
            .and_then(|labels| labels.get(step))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Insert or replace a track, resizing it to the pattern length
    pub fn set_track(&mut self, key: impl Into<String>, mut steps: Vec<bool>) {
        let key = key.into();
        steps.resize(self.length, false);
        match self.tracks.iter_mut().find(|t| t.key == key) {
            Some(track) => track.steps = steps,
            None => self.tracks.push(Track::new(key, steps)),
        }
        self.touch();
    }

    /// Flip one step. A missing track is created all-off first.
    /// Returns the new state of the step.
    pub fn toggle_step(&mut self, key: &str, step: usize) -> Result<bool> {
        if step >= self.length {
            return Err(DrumstaffError::StepOutOfRange { step, length: self.length });
        }

        let idx = match self.tracks.iter().position(|t| t.key == key) {
            Some(idx) => idx,
            None => {
                tracing::debug!("Adding track '{}' on first toggle", key);
                self.tracks.push(Track::new(key, vec![false; self.length]));
                self.tracks.len() - 1
            }
        };

        let cell = &mut self.tracks[idx].steps[step];
        *cell = !*cell;
        let state = *cell;
        self.touch();
        Ok(state)
    }

    /// Turn every step off, keeping the tracks
    pub fn clear(&mut self) {
        for track in &mut self.tracks {
            track.steps.iter_mut().for_each(|s| *s = false);
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = next_revision();
    }
}

/// Keep entries whose value is an array of booleans, in document order
fn collect_tracks(map: &Map<String, Value>) -> Vec<(String, Vec<bool>)> {
    map.iter()
        .filter(|(key, _)| !METADATA_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            let Some(items) = value.as_array() else {
                tracing::debug!("Skipping non-track entry '{}'", key);
                return None;
            };
            let steps: Option<Vec<bool>> = items.iter().map(Value::as_bool).collect();
            if steps.is_none() {
                tracing::debug!("Skipping non-boolean array '{}'", key);
            }
            steps.map(|s| (key.clone(), s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_kick_step() {
        let mut pattern = Pattern::new(4).with_track("kick", vec![true, false, false, false]);
        assert!(pattern.toggle_step("kick", 1).unwrap());
        assert_eq!(pattern.track("kick").unwrap().steps, vec![true, true, false, false]);
    }

    #[test]
    fn test_toggle_round_trip() {
        let original = vec![false, true, false, true, false, false];
        let mut pattern = Pattern::new(6).with_track("snare", original.clone());
        pattern.toggle_step("snare", 2).unwrap();
        pattern.toggle_step("snare", 2).unwrap();
        assert_eq!(pattern.track("snare").unwrap().steps, original);

        pattern.toggle_step("snare", 1).unwrap();
        pattern.toggle_step("snare", 1).unwrap();
        assert_eq!(pattern.track("snare").unwrap().steps, original);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut pattern = Pattern::new(4).with_track("kick", vec![false; 4]);
        let err = pattern.toggle_step("kick", 4).unwrap_err();
        assert!(matches!(err, DrumstaffError::StepOutOfRange { step: 4, length: 4 }));
    }

    #[test]
    fn test_toggle_missing_track_creates_it() {
        let mut pattern = Pattern::new(8).with_track("kick", vec![false; 8]);
        assert!(pattern.toggle_step("crash", 3).unwrap());
        let crash = pattern.track("crash").unwrap();
        assert_eq!(crash.steps.len(), 8);
        assert!(crash.is_active(3));
        assert_eq!(crash.drum.display_name, "Crash");
    }

    #[test]
    fn test_revision_changes_on_mutation() {
        let mut pattern = Pattern::new(4).with_track("kick", vec![false; 4]);
        let before = pattern.revision();
        pattern.toggle_step("kick", 0).unwrap();
        assert_ne!(before, pattern.revision());
        assert_ne!(Pattern::new(4).revision(), Pattern::new(4).revision());
    }

    #[test]
    fn test_from_json_skips_metadata() {
        let json = r#"{
            "kick": [true, false, false, false],
            "HH Closed": [true, true, true, true],
            "length": 4,
            "subdivisions": ["1", "e", "&", "a"],
            "offsets": [0, 0.5, 0, -0.25],
            "sections": [{"name": "Verse"}],
            "velocity": [1, 2, 3, 4],
            "bpm": 120
        }"#;
        let pattern = Pattern::from_json_str(json).unwrap();
        assert_eq!(pattern.len(), 4);
        let keys: Vec<_> = pattern.tracks().iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["kick", "HH Closed"]);
        assert_eq!(pattern.subdivision(2), Some("&"));
        assert_eq!(pattern.offsets.as_deref(), Some(&[0.0, 0.5, 0.0, -0.25][..]));
    }

    #[test]
    fn test_from_json_resizes_tracks() {
        let json = r#"{
            "kick": [true, true],
            "snare": [false, false, false, false, true, true],
            "length": 4
        }"#;
        let pattern = Pattern::from_json_str(json).unwrap();
        assert_eq!(pattern.track("kick").unwrap().steps, vec![true, true, false, false]);
        assert_eq!(pattern.track("snare").unwrap().steps, vec![false; 4]);
    }

    #[test]
    fn test_from_json_derives_missing_length() {
        let pattern = Pattern::from_json_str(r#"{ "kick": [true, false, true] }"#).unwrap();
        assert_eq!(pattern.len(), 3);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(Pattern::from_json_str("[1, 2]"), Err(DrumstaffError::InvalidPattern(_))));
        assert!(matches!(
            Pattern::from_json_str(r#"{ "length": -1 }"#),
            Err(DrumstaffError::InvalidPattern(_))
        ));
        assert!(matches!(Pattern::from_json_str("{"), Err(DrumstaffError::Json(_))));
    }

    #[test]
    fn test_from_json_rejects_oversized_length() {
        let json = r#"{"kick":[true],"length":18446744073709551615}"#;
        assert!(matches!(Pattern::from_json_str(json), Err(DrumstaffError::InvalidPattern(_))));

        let json = format!(r#"{{"kick":[true],"length":{}}}"#, MAX_STEPS + 1);
        assert!(matches!(Pattern::from_json_str(&json), Err(DrumstaffError::InvalidPattern(_))));

        let json = format!(r#"{{"kick":[true],"length":{}}}"#, MAX_STEPS);
        assert_eq!(Pattern::from_json_str(&json).unwrap().len(), MAX_STEPS);
    }

    #[test]
    fn test_rows_order() {
        let pattern = Pattern::new(2)
            .with_track("kick", vec![false; 2])
            .with_track("snare", vec![false; 2])
            .with_track("ride", vec![false; 2])
            .with_track("ghost note", vec![false; 2]);
        let keys: Vec<_> = pattern.rows().iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, ["ride", "snare", "ghost note", "kick"]);
    }

    #[test]
    fn test_clear_keeps_tracks() {
        let mut pattern = Pattern::new(3).with_track("kick", vec![true, true, true]);
        pattern.clear();
        assert_eq!(pattern.tracks().len(), 1);
        assert_eq!(pattern.track("kick").unwrap().steps, vec![false; 3]);
    }
}
