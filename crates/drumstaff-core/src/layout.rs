//! Step index to screen position mapping shared by the grid and notation views

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::viewport::Window;

/// How steps are laid out horizontally
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LayoutMetrics {
    /// Grid: visible steps share `width` equally
    Proportional { left: f32, width: f32 },
    /// Notation: constant `step_width`, content scrolls by a pixel offset
    Fixed { left: f32, step_width: f32 },
}

/// Mapper for one window and one layout.
///
/// All positions are screen x unless the method says content space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepMapper {
    window: Window,
    metrics: LayoutMetrics,
}

impl StepMapper {
    pub fn new(window: Window, metrics: LayoutMetrics) -> Self {
        Self { window, metrics }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    pub fn cell_width(&self) -> f32 {
        match self.metrics {
            LayoutMetrics::Proportional { width, .. } => {
                let visible = self.window.visible_steps();
                if visible == 0 { 0.0 } else { width / visible as f32 }
            }
            LayoutMetrics::Fixed { step_width, .. } => step_width,
        }
    }

    fn left(&self) -> f32 {
        match self.metrics {
            LayoutMetrics::Proportional { left, .. } | LayoutMetrics::Fixed { left, .. } => left,
        }
    }

    /// Width of the visible track area
    pub fn viewport_width(&self) -> f32 {
        match self.metrics {
            LayoutMetrics::Proportional { width, .. } => width,
            LayoutMetrics::Fixed { step_width, .. } => step_width * self.window.visible_steps() as f32,
        }
    }

    /// Horizontal translation applied to content space. Zero for proportional layouts.
    pub fn content_offset(&self) -> f32 {
        match self.metrics {
            LayoutMetrics::Proportional { .. } => 0.0,
            LayoutMetrics::Fixed { step_width, .. } => -(self.window.start as f32) * step_width,
        }
    }

    /// Left edge of `step` in content space
    pub fn content_left(&self, step: usize) -> f32 {
        match self.metrics {
            LayoutMetrics::Proportional { .. } => self.step_left(step),
            LayoutMetrics::Fixed { left, step_width } => left + step as f32 * step_width,
        }
    }

    /// Centre of `step` in content space
    pub fn content_x(&self, step: usize) -> f32 {
        self.content_left(step) + self.cell_width() / 2.0
    }

    /// Left edge of `step` on screen; may lie outside the viewport
    pub fn step_left(&self, step: usize) -> f32 {
        let rel = step as f32 - self.window.start as f32;
        self.left() + rel * self.cell_width()
    }

    pub fn step_center(&self, step: usize) -> f32 {
        self.step_left(step) + self.cell_width() / 2.0
    }

    /// Centre of `step` as a fraction of the viewport width.
    /// Identical for both layouts given the same window.
    pub fn viewport_fraction(&self, step: usize) -> f32 {
        let visible = self.window.visible_steps();
        if visible == 0 {
            return 0.0;
        }
        (step as f32 - self.window.start as f32 + 0.5) / visible as f32
    }

    /// Playhead x, clamped into the window
    pub fn playhead_x(&self, current_step: usize) -> Option<f32> {
        let index = self.window.playhead_index(current_step)?;
        Some(self.step_center(self.window.start + index))
    }

    /// Visible step under screen x
    pub fn step_at(&self, x: f32) -> Option<usize> {
        let cell = self.cell_width();
        if cell <= 0.0 {
            return None;
        }
        let rel = (x - self.left()) / cell;
        if rel < 0.0 {
            return None;
        }
        let step = self.window.start + rel.floor() as usize;
        self.window.contains(step).then_some(step)
    }

    /// Where `step` sits relative to the playing step. Uses the unclamped
    /// step, so a playhead parked at the window edge marks nothing as current.
    pub fn relation(&self, step: usize, current_step: usize) -> Ordering {
        step.cmp(&current_step)
    }
}
