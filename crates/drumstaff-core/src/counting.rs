//! Time signature, count labels and bar structure

use serde::{Deserialize, Serialize};

/// Steps grouped into beats and bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats_per_bar: usize,
    /// Subdivisions per beat (4 = sixteenth-note steps)
    pub steps_per_beat: usize,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self { beats_per_bar: 4, steps_per_beat: 4 }
    }
}

/// How a count label is emphasized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelEmphasis {
    /// Beat number ("1", "2", ...)
    Downbeat,
    /// "&"
    And,
    /// "e" / "a"
    Subdivision,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatLabel {
    pub text: String,
    pub emphasis: LabelEmphasis,
}

impl BeatLabel {
    fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let emphasis = emphasis_for(&text);
        Self { text, emphasis }
    }
}

fn emphasis_for(text: &str) -> LabelEmphasis {
    match text {
        "&" => LabelEmphasis::And,
        "e" | "a" => LabelEmphasis::Subdivision,
        t if !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()) => LabelEmphasis::Downbeat,
        _ => LabelEmphasis::Plain,
    }
}

/// Bar line in content space (step index, not pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLine {
    pub step: usize,
    /// The opening bar line is drawn heavier
    pub is_first: bool,
}

/// Beat number above the staff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatNumber {
    pub step: usize,
    pub beat: usize,
}

impl TimeSignature {
    pub fn steps_per_bar(&self) -> usize {
        (self.beats_per_bar * self.steps_per_beat).max(1)
    }

    fn steps_per_beat(&self) -> usize {
        self.steps_per_beat.max(1)
    }

    pub fn is_beat_start(&self, step: usize) -> bool {
        step % self.steps_per_beat() == 0
    }

    pub fn is_bar_start(&self, step: usize) -> bool {
        step % self.steps_per_bar() == 0
    }

    /// 1-based beat within the bar
    pub fn beat_in_bar(&self, step: usize) -> usize {
        (step % self.steps_per_bar()) / self.steps_per_beat() + 1
    }

    /// Count label for a step. A non-empty pattern-supplied label wins,
    /// otherwise "1 e & a 2 e & a ..." style counting is derived.
    pub fn beat_label(&self, step: usize, supplied: Option<&str>) -> BeatLabel {
        if let Some(text) = supplied.filter(|s| !s.is_empty()) {
            return BeatLabel::new(text);
        }

        let spb = self.steps_per_beat();
        let pos = step % spb;
        let text = match (spb, pos) {
            (_, 0) => self.beat_in_bar(step).to_string(),
            (4, 1) => "e".to_string(),
            (4, 3) | (3, 2) => "a".to_string(),
            (spb, pos) if pos * 2 == spb => "&".to_string(),
            (3, 1) => "&".to_string(),
            _ => String::new(),
        };
        BeatLabel::new(text)
    }

    /// Bar lines for the whole pattern, including the closing line
    pub fn bar_lines(&self, length: usize) -> Vec<BarLine> {
        let per_bar = self.steps_per_bar();
        let bars = length.div_ceil(per_bar);
        (0..=bars)
            .map(|bar| BarLine { step: bar * per_bar, is_first: bar == 0 })
            .collect()
    }

    pub fn beat_numbers(&self, length: usize) -> Vec<BeatNumber> {
        (0..length)
            .step_by(self.steps_per_beat())
            .map(|step| BeatNumber { step, beat: self.beat_in_bar(step) })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sig: TimeSignature, range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|s| sig.beat_label(s, None).text).collect()
    }

    #[test]
    fn test_default_sixteenth_counting() {
        let sig = TimeSignature::default();
        assert_eq!(
            texts(sig, 0..16),
            ["1", "e", "&", "a", "2", "e", "&", "a", "3", "e", "&", "a", "4", "e", "&", "a"]
        );
        assert_eq!(sig.beat_label(16, None).text, "1");
        assert_eq!(sig.beat_label(16, None).emphasis, LabelEmphasis::Downbeat);
        assert_eq!(sig.beat_label(2, None).emphasis, LabelEmphasis::And);
        assert_eq!(sig.beat_label(3, None).emphasis, LabelEmphasis::Subdivision);
    }

    #[test]
    fn test_eighth_and_triplet_counting() {
        let eighths = TimeSignature { beats_per_bar: 4, steps_per_beat: 2 };
        assert_eq!(texts(eighths, 0..4), ["1", "&", "2", "&"]);

        let triplets = TimeSignature { beats_per_bar: 2, steps_per_beat: 3 };
        assert_eq!(texts(triplets, 0..6), ["1", "&", "a", "2", "&", "a"]);
    }

    #[test]
    fn test_supplied_labels_win() {
        let sig = TimeSignature::default();
        let label = sig.beat_label(1, Some("&"));
        assert_eq!(label.text, "&");
        assert_eq!(label.emphasis, LabelEmphasis::And);
        assert_eq!(sig.beat_label(1, Some("")).text, "e");
        assert_eq!(sig.beat_label(0, Some("trip")).emphasis, LabelEmphasis::Plain);
    }

    #[test]
    fn test_bar_lines() {
        let sig = TimeSignature::default();
        let lines = sig.bar_lines(40);
        let steps: Vec<_> = lines.iter().map(|l| l.step).collect();
        assert_eq!(steps, [0, 16, 32, 48]);
        assert!(lines[0].is_first);
        assert!(!lines[1].is_first);
        assert_eq!(sig.bar_lines(0).len(), 1);
    }

    #[test]
    fn test_beat_numbers() {
        let sig = TimeSignature::default();
        let beats: Vec<_> = sig.beat_numbers(20).iter().map(|b| (b.step, b.beat)).collect();
        assert_eq!(beats, [(0, 1), (4, 2), (8, 3), (12, 4), (16, 1)]);
    }

    #[test]
    fn test_degenerate_signature_does_not_divide_by_zero() {
        let sig = TimeSignature { beats_per_bar: 0, steps_per_beat: 0 };
        assert!(sig.is_bar_start(3));
        assert_eq!(sig.beat_numbers(3).len(), 3);
    }
}
