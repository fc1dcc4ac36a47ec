//! Bottom toolbar: view switch, playback, tempo and scroll

use egui::{Color32, RichText, Ui};

use crate::app::{DisplayMode, VISIBLE_STEPS};

/// Actions that can be triggered from transport
#[derive(Clone, Debug, PartialEq)]
pub enum TransportAction {
    SetMode(DisplayMode),
    TogglePlay,
    Stop,
    Clear,
    BpmDown,
    BpmUp,
    Scroll(usize),
    SetVisibleSteps(usize),
    ToggleFollow,
    LoadPattern,
    ClearLoaded,
}

/// What the toolbar shows this frame
pub struct TransportStatus {
    pub mode: DisplayMode,
    pub is_playing: bool,
    pub bpm: u32,
    pub max_bpm: u32,
    pub elapsed: String,
    pub total: String,
    pub scroll_offset: usize,
    pub max_offset: usize,
    pub visible_steps: usize,
    pub follow: bool,
    pub has_loaded: bool,
}

pub struct TransportPanel;

impl Default for TransportPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportPanel {
    pub fn new() -> Self {
        Self
    }

    pub fn ui(&mut self, ui: &mut Ui, status: &TransportStatus) -> Vec<TransportAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 8.0;

            for (mode, label) in [(DisplayMode::Grid, "Grid"), (DisplayMode::Notation, "Notation")] {
                if ui.selectable_label(status.mode == mode, label).clicked() && status.mode != mode {
                    actions.push(TransportAction::SetMode(mode));
                }
            }

            ui.separator();

            let play_text = if status.is_playing { "\u{23F8}" } else { "\u{25B6}" };
            if ui.button(RichText::new(play_text).size(20.0)).clicked() {
                actions.push(TransportAction::TogglePlay);
            }
            if ui.button(RichText::new("\u{23F9}").size(20.0)).clicked() {
                actions.push(TransportAction::Stop);
            }

            ui.monospace(format!("{} / {}", status.elapsed, status.total));

            ui.separator();

            if ui
                .add_enabled(status.bpm > 20, egui::Button::new("\u{2212}"))
                .clicked()
            {
                actions.push(TransportAction::BpmDown);
            }
            ui.label(RichText::new(format!("{} BPM", status.bpm)).strong());
            if ui
                .add_enabled(status.bpm < status.max_bpm, egui::Button::new("+"))
                .clicked()
            {
                actions.push(TransportAction::BpmUp);
            }

            ui.separator();

            let mut offset = status.scroll_offset;
            let slider = egui::Slider::new(&mut offset, 0..=status.max_offset.max(1)).text("Step");
            if ui.add_enabled(status.max_offset > 0, slider).changed() {
                actions.push(TransportAction::Scroll(offset.min(status.max_offset)));
            }

            let mut visible = status.visible_steps;
            if ui
                .add(egui::DragValue::new(&mut visible).range(VISIBLE_STEPS).suffix(" steps"))
                .changed()
            {
                actions.push(TransportAction::SetVisibleSteps(visible));
            }

            let follow_color = if status.follow {
                Color32::from_rgb(100, 200, 100)
            } else {
                Color32::from_gray(150)
            };
            let follow_btn = ui.button(RichText::new("\u{21E5}").color(follow_color));
            if follow_btn.clicked() {
                actions.push(TransportAction::ToggleFollow);
            }
            follow_btn.on_hover_text("Follow playhead");

            ui.separator();

            if ui.button("Clear").clicked() {
                actions.push(TransportAction::Clear);
            }
            if ui.button("Load\u{2026}").clicked() {
                actions.push(TransportAction::LoadPattern);
            }
            if status.has_loaded && ui.button("Clear Loaded").clicked() {
                actions.push(TransportAction::ClearLoaded);
            }
        });

        actions
    }
}
