//! Step grid view model
//!
//! One row per track, one column per visible step. The painter only walks
//! what is in here, so its cost never depends on the full pattern length.

use crate::counting::{BeatLabel, TimeSignature};
use crate::drum::CanonicalDrum;
use crate::pattern::Pattern;
use crate::playback::StepToggle;
use crate::viewport::Window;

#[derive(Debug, Clone, PartialEq)]
pub struct GridColumn {
    /// Absolute step index
    pub step: usize,
    pub label: BeatLabel,
    pub is_current: bool,
    pub is_beat_start: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub drum_key: String,
    pub drum: CanonicalDrum,
    /// Active flags for the visible columns only
    pub cells: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    pub window: Window,
    pub rows: Vec<GridRow>,
    pub columns: Vec<GridColumn>,
    /// Column the playhead is drawn in
    pub playhead_index: Option<usize>,
    /// More steps exist off-screen to the left
    pub fade_left: bool,
    pub fade_right: bool,
}

impl GridModel {
    pub fn build(pattern: &Pattern, window: Window, current_step: usize, sig: &TimeSignature) -> Self {
        let columns = window
            .steps()
            .map(|step| GridColumn {
                step,
                label: sig.beat_label(step, pattern.subdivision(step)),
                is_current: step == current_step,
                is_beat_start: sig.is_beat_start(step),
            })
            .collect();

        let rows = pattern
            .rows()
            .into_iter()
            .map(|track| GridRow {
                drum_key: track.key.clone(),
                drum: track.drum.clone(),
                cells: window.steps().map(|step| track.is_active(step)).collect(),
            })
            .collect();

        Self {
            window,
            rows,
            columns,
            playhead_index: window.playhead_index(current_step),
            fade_left: window.has_hidden_left(),
            fade_right: window.has_hidden_right(pattern.len()),
        }
    }

    /// Edit intent for a clicked cell
    pub fn toggle_at(&self, row: usize, col: usize) -> Option<StepToggle> {
        let row = self.rows.get(row)?;
        let column = self.columns.get(col)?;
        Some(StepToggle::new(row.drum_key.clone(), column.step))
    }
}
