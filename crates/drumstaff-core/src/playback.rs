//! Playback snapshot and edit events exchanged with the external controller

use serde::{Deserialize, Serialize};

use crate::counting::TimeSignature;

/// State of the playback clock for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Absolute step index into the pattern
    pub current_step: usize,
    pub is_playing: bool,
    pub bpm: u32,
    pub max_bpm: u32,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self { current_step: 0, is_playing: false, bpm: 90, max_bpm: 120 }
    }
}

impl PlaybackSnapshot {
    /// Seconds per step at the current tempo
    pub fn step_duration_secs(&self, sig: &TimeSignature) -> f64 {
        if self.bpm == 0 {
            return 0.0;
        }
        60.0 / self.bpm as f64 / sig.steps_per_beat.max(1) as f64
    }

    /// Elapsed time at the playhead, "M:SS"
    pub fn elapsed_label(&self, sig: &TimeSignature) -> String {
        format_clock(self.current_step as f64 * self.step_duration_secs(sig))
    }

    /// Pattern duration, "M:SS"
    pub fn total_label(&self, length: usize, sig: &TimeSignature) -> String {
        format_clock(length as f64 * self.step_duration_secs(sig))
    }
}

fn format_clock(secs: f64) -> String {
    let whole = secs.max(0.0).floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Request to flip one step, reported against the track key the data source used
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepToggle {
    pub drum_key: String,
    pub step: usize,
}

impl StepToggle {
    pub fn new(drum_key: impl Into<String>, step: usize) -> Self {
        Self { drum_key: drum_key.into(), step }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_labels() {
        let sig = TimeSignature::default();
        let snap = PlaybackSnapshot { current_step: 64, bpm: 120, ..Default::default() };
        // 120 bpm, sixteenths: 0.125 s per step
        assert_eq!(snap.elapsed_label(&sig), "0:08");
        assert_eq!(snap.total_label(1024, &sig), "2:08");
    }

    #[test]
    fn test_zero_bpm() {
        let snap = PlaybackSnapshot { bpm: 0, ..Default::default() };
        assert_eq!(snap.total_label(64, &TimeSignature::default()), "0:00");
    }
}
