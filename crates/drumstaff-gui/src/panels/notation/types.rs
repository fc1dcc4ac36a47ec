//! Colors and sizes for the staff panel.

use egui::Color32;

// -- Palette --

pub(super) const PAPER: Color32 = Color32::from_gray(236);
pub(super) const INK: Color32 = Color32::from_gray(30);
pub(super) const STAFF_LINE: Color32 = Color32::from_gray(90);
pub(super) const BAR_LINE: Color32 = Color32::from_gray(60);
pub(super) const BEAT_NUMBER: Color32 = Color32::from_gray(110);
pub(super) const PLAYHEAD: Color32 = Color32::from_rgb(220, 60, 60);
pub(super) const SLOT_HOVER: Color32 = Color32::from_rgba_premultiplied(8, 16, 40, 50);
pub(super) const PAST_NOTE: Color32 = Color32::from_gray(120);

// -- Geometry --

/// Staff height in content units, including beat numbers above
pub(super) const STAFF_HEIGHT: f32 = 150.0;
pub(super) const NOTEHEAD_RX: f32 = 7.0;
pub(super) const NOTEHEAD_RY: f32 = 5.0;
pub(super) const X_HALF: f32 = 5.0;
pub(super) const STEM_LENGTH: f32 = 30.0;
pub(super) const ELLIPSE_SEGMENTS: usize = 16;
