//! Staff notation view model
//!
//! The staff is built from independently cached layers:
//!
//! - static staff lines ([`STAFF_LINES`]), never change
//! - structure: bar lines and beat numbers, keyed by pattern length and time signature
//! - notes: visible noteheads, keyed by pattern revision and buffered step range
//! - playhead: rebuilt every tick from step indices alone
//! - interaction: hit targets for notes and empty slots, keyed like notes
//!
//! Structure, notes and hit targets live in content space (x before the
//! scroll translation), so scrolling within the buffer and playhead ticks
//! leave them untouched.

use std::ops::Range;
use std::sync::Arc;

use crate::cache::Memo;
use crate::counting::TimeSignature;
use crate::drum::{CanonicalDrum, DrumVoice, NoteheadKind};
use crate::layout::{LayoutMetrics, StepMapper};
use crate::pattern::Pattern;
use crate::playback::{PlaybackSnapshot, StepToggle};
use crate::viewport::{ViewportRequest, Window, BUFFER_STEPS};

/// Y of the five staff lines, top to bottom
pub const STAFF_LINES: [f32; 5] = [40.0, 60.0, 80.0, 100.0, 120.0];
pub const STAFF_LEFT_MARGIN: f32 = 40.0;
pub const STEP_WIDTH: f32 = 46.0;
pub const BEAT_NUMBER_Y: f32 = 25.0;
/// Vertical extent of the playhead line
pub const PLAYHEAD_SPAN: (f32, f32) = (20.0, 140.0);
/// Side of the square hit target around an existing note
pub const NOTE_HIT_SIZE: f32 = 30.0;
pub const SLOT_HIT_RADIUS: f32 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleNote {
    pub drum_key: String,
    pub drum_id: String,
    pub step: usize,
    /// Content-space x of the notehead centre
    pub x: f32,
    pub y: f32,
    pub notehead: NoteheadKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffBarLine {
    pub step: usize,
    pub x: f32,
    pub is_first: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaffBeatNumber {
    pub step: usize,
    pub x: f32,
    pub label: String,
}

/// Bar lines and beat numbers for the whole pattern
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureLayer {
    pub bar_lines: Vec<StaffBarLine>,
    pub beat_numbers: Vec<StaffBeatNumber>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    Rect { min_x: f32, min_y: f32, max_x: f32, max_y: f32 },
    Circle { x: f32, y: f32, radius: f32 },
}

impl HitShape {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        match *self {
            HitShape::Rect { min_x, min_y, max_x, max_y } => {
                px >= min_x && px <= max_x && py >= min_y && py <= max_y
            }
            HitShape::Circle { x, y, radius } => {
                let (dx, dy) = (px - x, py - y);
                dx * dx + dy * dy <= radius * radius
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitTarget {
    pub toggle: StepToggle,
    pub shape: HitShape,
}

/// Click targets in content space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionLayer {
    pub notes: Vec<HitTarget>,
    pub slots: Vec<HitTarget>,
}

impl InteractionLayer {
    /// Existing notes take precedence over empty slots
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&StepToggle> {
        self.notes
            .iter()
            .chain(&self.slots)
            .find(|t| t.shape.contains(x, y))
            .map(|t| &t.toggle)
    }
}

/// Playhead for one tick; never cached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayheadLayer {
    pub current_step: usize,
    /// Clamped column within the window
    pub index: Option<usize>,
    /// Screen x relative to the staff origin
    pub x: Option<f32>,
}

/// Everything the painter needs for one frame
#[derive(Debug, Clone)]
pub struct NotationFrame {
    pub mapper: StepMapper,
    pub structure: Arc<StructureLayer>,
    pub notes: Arc<[VisibleNote]>,
    pub interaction: Arc<InteractionLayer>,
    pub playhead: PlayheadLayer,
}

impl NotationFrame {
    pub fn window(&self) -> Window {
        self.mapper.window()
    }

    /// Translation from content space to screen space
    pub fn content_offset(&self) -> f32 {
        self.mapper.content_offset()
    }

    /// Resolve a click given in screen space (relative to the staff origin)
    pub fn hit_test(&self, x: f32, y: f32) -> Option<StepToggle> {
        self.interaction.hit_test(x - self.content_offset(), y).cloned()
    }
}

type NotesKey = (u64, Range<usize>);

/// One drum's place on the staff
struct StaffLane<'a> {
    key: &'a str,
    drum_id: &'a str,
    y: f32,
    notehead: NoteheadKind,
    steps: Option<&'a [bool]>,
}

impl StaffLane<'_> {
    fn is_active(&self, step: usize) -> bool {
        self.steps.and_then(|s| s.get(step)).copied().unwrap_or(false)
    }
}

/// Lanes for tracks with a staff position, then staff voices the pattern lacks
fn staff_lanes(pattern: &Pattern) -> Vec<StaffLane<'_>> {
    let mut lanes: Vec<StaffLane<'_>> = pattern
        .tracks()
        .iter()
        .filter_map(|track| {
            let y = track.drum.staff_y?;
            Some(StaffLane {
                key: track.key.as_str(),
                drum_id: track.drum.id.as_str(),
                y,
                notehead: track.drum.notehead,
                steps: Some(track.steps.as_slice()),
            })
        })
        .collect();

    for voice in DrumVoice::staff_voices() {
        let present = pattern.tracks().iter().any(|t| t.drum.voice == Some(voice));
        if present {
            continue;
        }
        let drum: CanonicalDrum = voice.canonical();
        lanes.push(StaffLane {
            key: voice.id(),
            drum_id: voice.id(),
            y: drum.staff_y.unwrap_or_default(),
            notehead: drum.notehead,
            steps: None,
        });
    }
    lanes
}

/// Layered, cached notation model for one view
pub struct NotationView {
    sig: TimeSignature,
    metrics: LayoutMetrics,
    structure: Memo<(usize, TimeSignature), StructureLayer>,
    notes: Memo<NotesKey, [VisibleNote]>,
    interaction: Memo<NotesKey, InteractionLayer>,
}

impl Default for NotationView {
    fn default() -> Self {
        Self::new(TimeSignature::default())
    }
}

impl NotationView {
    pub fn new(sig: TimeSignature) -> Self {
        Self {
            sig,
            metrics: LayoutMetrics::Fixed { left: STAFF_LEFT_MARGIN, step_width: STEP_WIDTH },
            structure: Memo::new(),
            notes: Memo::new(),
            interaction: Memo::new(),
        }
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.sig
    }

    pub fn set_time_signature(&mut self, sig: TimeSignature) {
        self.sig = sig;
    }

    /// Cache misses per layer: (structure, notes, interaction)
    pub fn computes(&self) -> (u64, u64, u64) {
        (self.structure.computes(), self.notes.computes(), self.interaction.computes())
    }

    /// Build the layers for one tick. `request.total_steps` is overridden
    /// by the pattern length.
    pub fn frame(
        &mut self,
        pattern: &Pattern,
        request: ViewportRequest,
        playback: &PlaybackSnapshot,
    ) -> NotationFrame {
        let window = ViewportRequest { total_steps: pattern.len(), ..request }.window();
        let mapper = StepMapper::new(window, self.metrics);
        let buffered = window.buffered(BUFFER_STEPS, pattern.len());
        let key: NotesKey = (pattern.revision(), buffered.clone());

        let sig = self.sig;
        let structure = self
            .structure
            .get_or_compute((pattern.len(), sig), || Arc::new(build_structure(pattern.len(), &sig, &mapper)));

        let notes = self.notes.get_or_compute(key.clone(), || {
            let notes = build_notes(pattern, buffered.clone(), &mapper);
            tracing::debug!("Rebuilt note layer: {} notes in {:?}", notes.len(), buffered);
            Arc::from(notes)
        });

        let interaction = self
            .interaction
            .get_or_compute(key, || Arc::new(build_interaction(pattern, buffered.clone(), &mapper)));

        let playhead = PlayheadLayer {
            current_step: playback.current_step,
            index: window.playhead_index(playback.current_step),
            x: mapper.playhead_x(playback.current_step),
        };

        NotationFrame { mapper, structure, notes, interaction, playhead }
    }
}

fn build_structure(length: usize, sig: &TimeSignature, mapper: &StepMapper) -> StructureLayer {
    let bar_lines = sig
        .bar_lines(length)
        .into_iter()
        .map(|line| StaffBarLine {
            step: line.step,
            x: mapper.content_left(line.step),
            is_first: line.is_first,
        })
        .collect();
    let beat_numbers = sig
        .beat_numbers(length)
        .into_iter()
        .map(|beat| StaffBeatNumber {
            step: beat.step,
            x: mapper.content_x(beat.step),
            label: beat.beat.to_string(),
        })
        .collect();
    StructureLayer { bar_lines, beat_numbers }
}

fn build_notes(pattern: &Pattern, range: Range<usize>, mapper: &StepMapper) -> Vec<VisibleNote> {
    let mut notes = Vec::new();
    for lane in staff_lanes(pattern) {
        for step in range.clone().filter(|&s| lane.is_active(s)) {
            notes.push(VisibleNote {
                drum_key: lane.key.to_string(),
                drum_id: lane.drum_id.to_string(),
                step,
                x: mapper.content_x(step),
                y: lane.y,
                notehead: lane.notehead,
            });
        }
    }
    notes
}

fn build_interaction(pattern: &Pattern, range: Range<usize>, mapper: &StepMapper) -> InteractionLayer {
    let half = NOTE_HIT_SIZE / 2.0;
    let lanes = staff_lanes(pattern);
    let mut layer = InteractionLayer::default();
    for (i, lane) in lanes.iter().enumerate() {
        // Lanes on the same staff line split the slot side by side
        let sharing = lanes.iter().filter(|l| l.y == lane.y).count();
        let rank = lanes[..i].iter().filter(|l| l.y == lane.y).count();

        for step in range.clone() {
            let (x, y) = (mapper.content_x(step), lane.y);
            let toggle = StepToggle::new(lane.key, step);
            if lane.is_active(step) {
                layer.notes.push(HitTarget {
                    toggle,
                    shape: HitShape::Rect {
                        min_x: x - half,
                        min_y: y - half,
                        max_x: x + half,
                        max_y: y + half,
                    },
                });
            } else {
                layer.slots.push(HitTarget { toggle, shape: slot_shape(x, y, rank, sharing) });
            }
        }
    }
    layer
}

fn slot_shape(x: f32, y: f32, rank: usize, sharing: usize) -> HitShape {
    if sharing <= 1 {
        return HitShape::Circle { x, y, radius: SLOT_HIT_RADIUS };
    }
    let width = 2.0 * SLOT_HIT_RADIUS / sharing as f32;
    let min_x = x - SLOT_HIT_RADIUS + rank as f32 * width;
    HitShape::Rect {
        min_x,
        min_y: y - SLOT_HIT_RADIUS,
        max_x: min_x + width,
        max_y: y + SLOT_HIT_RADIUS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridModel;
    use std::cmp::Ordering;

    fn pattern() -> Pattern {
        let mut kick = vec![false; 32];
        kick[0] = true;
        kick[12] = true;
        let mut snare = vec![false; 32];
        snare[4] = true;
        let mut ghost = vec![false; 32];
        ghost[6] = true;
        Pattern::new(32)
            .with_track("Kick", kick)
            .with_track("snare", snare)
            .with_track("ghost", ghost)
            .with_track("Shaker", vec![true; 32])
    }

    fn snap(current_step: usize) -> PlaybackSnapshot {
        PlaybackSnapshot { current_step, is_playing: true, ..Default::default() }
    }

    #[test]
    fn test_only_staff_drums_become_notes() {
        let mut view = NotationView::default();
        let frame = view.frame(&pattern(), ViewportRequest::new(32, 0, 20), &snap(0));
        let keys: Vec<_> = frame.notes.iter().map(|n| (n.drum_key.as_str(), n.step)).collect();
        assert_eq!(keys, [("Kick", 0), ("Kick", 12), ("snare", 4)]);
        assert_eq!(frame.notes[0].y, 120.0);
        assert_eq!(frame.notes[0].drum_id, "kick");
    }

    #[test]
    fn test_notes_include_buffer() {
        let mut view = NotationView::default();
        let frame = view.frame(&pattern(), ViewportRequest::new(32, 6, 4), &snap(6));
        assert_eq!(frame.window(), Window { start: 6, end: 10 });
        // buffered range 4..12 excludes step 12 and includes step 4
        let steps: Vec<_> = frame.notes.iter().map(|n| n.step).collect();
        assert_eq!(steps, [4]);
    }

    #[test]
    fn test_playhead_tick_reuses_layers() {
        let mut view = NotationView::default();
        let p = pattern();
        let req = ViewportRequest::new(32, 0, 20);
        let a = view.frame(&p, req, &snap(0));
        let b = view.frame(&p, req, &snap(1));
        assert!(Arc::ptr_eq(&a.structure, &b.structure));
        assert!(Arc::ptr_eq(&a.notes, &b.notes));
        assert!(Arc::ptr_eq(&a.interaction, &b.interaction));
        assert_ne!(a.playhead, b.playhead);
        assert_eq!(view.computes(), (1, 1, 1));
    }

    #[test]
    fn test_toggle_invalidates_notes_but_not_structure() {
        let mut view = NotationView::default();
        let mut p = pattern();
        let req = ViewportRequest::new(32, 0, 20);
        let a = view.frame(&p, req, &snap(0));
        p.toggle_step("snare", 8).unwrap();
        let b = view.frame(&p, req, &snap(0));
        assert!(Arc::ptr_eq(&a.structure, &b.structure));
        assert!(!Arc::ptr_eq(&a.notes, &b.notes));
        assert_eq!(b.notes.len(), a.notes.len() + 1);
    }

    #[test]
    fn test_scroll_moves_translation_only() {
        let mut view = NotationView::default();
        let p = pattern();
        let a = view.frame(&p, ViewportRequest::new(32, 0, 20), &snap(0));
        let b = view.frame(&p, ViewportRequest::new(32, 5, 20), &snap(0));
        assert_eq!(a.content_offset(), 0.0);
        assert_eq!(b.content_offset(), -5.0 * STEP_WIDTH);
        let note = b.notes.iter().find(|n| n.step == 12).unwrap();
        assert_eq!(note.x + b.content_offset(), b.mapper.step_center(12));
    }

    #[test]
    fn test_empty_slots_cover_every_free_staff_position() {
        let mut view = NotationView::default();
        let p = pattern();
        let frame = view.frame(&p, ViewportRequest::new(32, 0, 4), &snap(0));
        // buffered range 0..6, 8 staff voices
        let total = 6 * DrumVoice::staff_voices().count();
        assert_eq!(frame.interaction.notes.len(), 2);
        assert_eq!(frame.interaction.slots.len(), total - 2);
        assert!(frame.interaction.slots.iter().any(|t| t.toggle == StepToggle::new("crash", 3)));
        assert!(!frame.interaction.slots.iter().any(|t| t.toggle.drum_key == "ghost"));
        assert!(!frame.interaction.slots.iter().any(|t| t.toggle.drum_key == "Shaker"));
    }

    #[test]
    fn test_hit_test_in_screen_space() {
        let mut view = NotationView::default();
        let p = pattern();
        let frame = view.frame(&p, ViewportRequest::new(32, 10, 10), &snap(0));
        let x = frame.mapper.step_center(12);
        assert_eq!(frame.hit_test(x + 10.0, 120.0 - 10.0), Some(StepToggle::new("Kick", 12)));
        assert_eq!(frame.hit_test(x, 80.0), Some(StepToggle::new("snare", 12)));
        assert_eq!(frame.hit_test(x, 60.0), None);
    }

    #[test]
    fn test_hats_split_shared_slot() {
        let mut view = NotationView::default();
        let p = Pattern::new(16).with_track("kick", vec![false; 16]);
        let frame = view.frame(&p, ViewportRequest::new(16, 0, 8), &snap(0));
        let x = frame.mapper.step_center(3);
        assert_eq!(frame.hit_test(x - 6.0, 46.0), Some(StepToggle::new("hihat", 3)));
        assert_eq!(frame.hit_test(x + 6.0, 46.0), Some(StepToggle::new("openhat", 3)));
        assert_eq!(frame.hit_test(x, 120.0), Some(StepToggle::new("kick", 3)));
    }

    #[test]
    fn test_current_step_matches_grid_when_scrolled_past() {
        let mut view = NotationView::default();
        let p = Pattern::new(64).with_track("kick", vec![true; 64]);
        let request = ViewportRequest::new(64, 10, 20);
        let frame = view.frame(&p, request, &snap(5));
        let grid = GridModel::build(&p, request.window(), 5, &TimeSignature::default());

        assert!(grid.columns.iter().all(|c| !c.is_current));
        assert_eq!(frame.playhead.index, Some(0));
        for note in frame.notes.iter() {
            let relation = frame.mapper.relation(note.step, frame.playhead.current_step);
            assert_eq!(relation, Ordering::Greater, "step {}", note.step);
        }

        let frame = view.frame(&p, request, &snap(14));
        let grid = GridModel::build(&p, request.window(), 14, &TimeSignature::default());
        let current: Vec<_> = grid.columns.iter().filter(|c| c.is_current).map(|c| c.step).collect();
        let at_playhead: Vec<_> = frame
            .notes
            .iter()
            .filter(|n| frame.mapper.relation(n.step, 14) == Ordering::Equal)
            .map(|n| n.step)
            .collect();
        assert_eq!(current, [14]);
        assert_eq!(at_playhead, current);
    }

    #[test]
    fn test_structure_spans_pattern() {
        let mut view = NotationView::default();
        let frame = view.frame(&pattern(), ViewportRequest::new(32, 0, 20), &snap(0));
        let bars: Vec<_> = frame.structure.bar_lines.iter().map(|b| (b.step, b.x)).collect();
        assert_eq!(bars, [(0, 40.0), (16, 40.0 + 16.0 * 46.0), (32, 40.0 + 32.0 * 46.0)]);
        assert_eq!(frame.structure.beat_numbers.len(), 8);
        assert_eq!(frame.structure.beat_numbers[5].label, "2");
    }

    #[test]
    fn test_playhead_clamped_after_scroll() {
        let mut view = NotationView::default();
        let p = Pattern::new(64).with_track("kick", vec![false; 64]);
        let frame = view.frame(&p, ViewportRequest::new(64, 0, 20), &snap(5));
        assert_eq!(frame.playhead.index, Some(5));
        let frame = view.frame(&p, ViewportRequest::new(64, 10, 20), &snap(5));
        assert_eq!(frame.playhead.index, Some(0));
        assert_eq!(frame.playhead.x, Some(STAFF_LEFT_MARGIN + STEP_WIDTH / 2.0));
    }

    #[test]
    fn test_empty_pattern_frame() {
        let mut view = NotationView::default();
        let frame = view.frame(&Pattern::new(0), ViewportRequest::new(0, 0, 20), &snap(0));
        assert!(frame.notes.is_empty());
        assert!(frame.interaction.slots.is_empty());
        assert_eq!(frame.playhead.x, None);
    }
}
