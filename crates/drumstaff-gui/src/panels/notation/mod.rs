//! Staff notation panel
//!
//! Paints the cached layers from [`NotationView`] in screen space. The staff
//! itself is fixed; structure and notes are translated by the frame's
//! content offset and clipped to the panel.

mod drawing;
mod types;

use drumstaff_core::{
    DrumVoice, NotationView, Pattern, PlaybackSnapshot, StepToggle, TimeSignature, ViewportRequest,
};
use egui::{RichText, Sense, Ui, Vec2};

use types::STAFF_HEIGHT;

use super::voice_color;

pub struct NotationPanel {
    view: NotationView,
}

impl Default for NotationPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl NotationPanel {
    pub fn new() -> Self {
        Self { view: NotationView::new(TimeSignature::default()) }
    }

    /// Paint one frame. Returns the note or slot the user clicked.
    pub fn ui(
        &mut self,
        ui: &mut Ui,
        pattern: &Pattern,
        request: ViewportRequest,
        playback: &PlaybackSnapshot,
    ) -> Option<StepToggle> {
        let frame = self.view.frame(pattern, request, playback);
        let mapper = frame.mapper;
        let width = (drumstaff_core::notation::STAFF_LEFT_MARGIN + mapper.viewport_width() + 16.0)
            .max(ui.available_width());

        let (response, painter) = ui.allocate_painter(Vec2::new(width, STAFF_HEIGHT), Sense::click());
        let rect = response.rect;
        let painter = painter.with_clip_rect(rect);

        self.draw_staff(&painter, rect);
        self.draw_structure(&painter, &frame, rect);
        self.draw_notes(&painter, &frame, rect);
        if let Some(hover) = response.hover_pos() {
            self.draw_hover(&painter, &frame, rect, hover);
        }
        self.draw_playhead(&painter, &frame, rect);

        self.legend(ui);

        if !response.clicked() {
            return None;
        }
        let pos = response.interact_pointer_pos()?;
        let local = pos - rect.min;
        frame.hit_test(local.x, local.y)
    }

    fn legend(&self, ui: &mut Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 12.0;
            for voice in DrumVoice::staff_voices() {
                let drum = voice.canonical();
                ui.label(RichText::new(&drum.symbol).color(voice_color(&drum)));
                ui.label(RichText::new(&drum.display_name).small());
            }
        });
    }
}
