//! Step clock standing in for the playback engine
//!
//! Advances `current_step` from frame time. No audio is produced; the views
//! only ever see the [`PlaybackSnapshot`] it hands out.

use drumstaff_core::{PlaybackSnapshot, TimeSignature};

const MIN_BPM: u32 = 20;
const BPM_STEP: u32 = 5;

pub(super) struct StepClock {
    bpm: u32,
    max_bpm: u32,
    playing: bool,
    current_step: usize,
    /// Seconds accumulated toward the next step
    phase: f64,
}

impl StepClock {
    pub fn new(bpm: u32, max_bpm: u32) -> Self {
        let max_bpm = max_bpm.max(MIN_BPM);
        Self {
            bpm: bpm.clamp(MIN_BPM, max_bpm),
            max_bpm,
            playing: false,
            current_step: 0,
            phase: 0.0,
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_step: self.current_step,
            is_playing: self.playing,
            bpm: self.bpm,
            max_bpm: self.max_bpm,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
        self.phase = 0.0;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.rewind();
    }

    pub fn rewind(&mut self) {
        self.current_step = 0;
        self.phase = 0.0;
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn bpm_up(&mut self) {
        self.bpm = (self.bpm + BPM_STEP).min(self.max_bpm);
    }

    pub fn bpm_down(&mut self) {
        self.bpm = self.bpm.saturating_sub(BPM_STEP).max(MIN_BPM);
    }

    /// Advance by `dt` seconds, wrapping at the pattern end.
    /// Returns true when the step changed.
    pub fn advance(&mut self, dt: f64, length: usize, sig: &TimeSignature) -> bool {
        if !self.playing || length == 0 {
            return false;
        }
        let step_secs = self.snapshot().step_duration_secs(sig);
        if step_secs <= 0.0 {
            return false;
        }

        self.phase += dt;
        let mut changed = false;
        while self.phase >= step_secs {
            self.phase -= step_secs;
            self.current_step = (self.current_step + 1) % length;
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_and_wrap() {
        let sig = TimeSignature::default();
        let mut clock = StepClock::new(120, 200);
        assert!(!clock.advance(1.0, 8, &sig));

        clock.toggle();
        // 0.125 s per step at 120 bpm
        assert!(!clock.advance(0.1, 8, &sig));
        assert!(clock.advance(0.05, 8, &sig));
        assert_eq!(clock.snapshot().current_step, 1);

        assert!(clock.advance(1.0, 8, &sig));
        assert_eq!(clock.snapshot().current_step, 1);
    }

    #[test]
    fn test_bpm_bounds() {
        let mut clock = StepClock::new(118, 120);
        clock.bpm_up();
        assert_eq!(clock.bpm(), 120);
        let mut clock = StepClock::new(22, 120);
        clock.bpm_down();
        assert_eq!(clock.bpm(), MIN_BPM);
        assert_eq!(StepClock::new(500, 120).bpm(), 120);
    }

    #[test]
    fn test_stop_rewinds() {
        let sig = TimeSignature::default();
        let mut clock = StepClock::new(120, 120);
        clock.toggle();
        clock.advance(0.5, 16, &sig);
        clock.stop();
        assert!(!clock.is_playing());
        assert_eq!(clock.snapshot().current_step, 0);
    }
}
