//! Visible step window
//!
//! [`compute_window`] is the one place that decides which steps are on
//! screen. Grid and notation both go through it, so the playhead and the
//! notes cannot drift apart between views.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Steps kept on each side of the strict window so notes scrolling in are ready
pub const BUFFER_STEPS: usize = 2;

/// What the caller asks to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportRequest {
    pub total_steps: usize,
    pub scroll_offset: usize,
    /// Must be > 0 to show anything
    pub visible_step_count: usize,
}

impl ViewportRequest {
    pub fn new(total_steps: usize, scroll_offset: usize, visible_step_count: usize) -> Self {
        Self { total_steps, scroll_offset, visible_step_count }
    }

    pub fn window(&self) -> Window {
        compute_window(self.total_steps, self.scroll_offset, self.visible_step_count)
    }

    /// Largest offset that still fills the view
    pub fn max_offset(&self) -> usize {
        self.total_steps.saturating_sub(self.visible_step_count)
    }

    /// Scroll offset that pages the view onto `current_step`.
    /// Unchanged while the step is already visible.
    pub fn follow(&self, current_step: usize) -> usize {
        let window = self.window();
        if window.contains(current_step) || self.visible_step_count == 0 {
            return window.start;
        }
        let page = (current_step / self.visible_step_count) * self.visible_step_count;
        page.min(self.max_offset())
    }
}

/// Clamped visible range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn visible_steps(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn contains(&self, step: usize) -> bool {
        (self.start..self.end).contains(&step)
    }

    pub fn steps(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Column the playhead is drawn in, clamped to the window.
    /// `None` only when nothing is visible.
    pub fn playhead_index(&self, current_step: usize) -> Option<usize> {
        let visible = self.visible_steps();
        if visible == 0 {
            return None;
        }
        Some(current_step.saturating_sub(self.start).min(visible - 1))
    }

    /// Window widened by `buffer` steps each side, capped to the pattern
    pub fn buffered(&self, buffer: usize, total_steps: usize) -> Range<usize> {
        self.start.saturating_sub(buffer)..(self.end + buffer).min(total_steps)
    }

    pub fn has_hidden_left(&self) -> bool {
        self.start > 0
    }

    pub fn has_hidden_right(&self, total_steps: usize) -> bool {
        self.end < total_steps
    }
}

pub fn compute_window(total_steps: usize, scroll_offset: usize, visible_step_count: usize) -> Window {
    let max_start = total_steps.saturating_sub(visible_step_count);
    let start = scroll_offset.min(max_start);
    let end = (start + visible_step_count).min(total_steps);
    Window { start, end }
}
