//! Main application state

mod clock;
mod config;
mod loader;
mod types;

use std::path::PathBuf;

use drumstaff_core::{GridModel, Pattern, StepToggle, TimeSignature, ViewportRequest};
use eframe::CreationContext;
use egui::{Context, Key};

pub use types::{DisplayMode, VISIBLE_STEPS};
use clock::StepClock;
use config::{load_config, save_config, AppConfig};

use crate::panels::{DrumGridPanel, NotationPanel, TransportAction, TransportPanel, TransportStatus};

pub struct DrumstaffApp {
    config: AppConfig,
    clock: StepClock,
    sig: TimeSignature,

    /// Working pattern; edits land here
    pattern: Pattern,
    /// File the pattern came from, if not the demo
    loaded_from: Option<PathBuf>,

    mode: DisplayMode,
    scroll_offset: usize,

    // Panels
    transport_panel: TransportPanel,
    grid_panel: DrumGridPanel,
    notation_panel: NotationPanel,
}

impl DrumstaffApp {
    pub fn new(_cc: &CreationContext<'_>) -> Self {
        let config = load_config();
        let clock = StepClock::new(config.transport.bpm, config.transport.max_bpm);
        Self {
            mode: config.view.mode,
            clock,
            sig: TimeSignature::default(),
            pattern: loader::demo_pattern(),
            loaded_from: None,
            scroll_offset: 0,
            transport_panel: TransportPanel::new(),
            grid_panel: DrumGridPanel::new(),
            notation_panel: NotationPanel::new(),
            config,
        }
    }

    fn request(&self) -> ViewportRequest {
        ViewportRequest::new(self.pattern.len(), self.scroll_offset, self.config.view.visible_steps)
    }

    fn status(&self) -> TransportStatus {
        let snapshot = self.clock.snapshot();
        TransportStatus {
            mode: self.mode,
            is_playing: snapshot.is_playing,
            bpm: snapshot.bpm,
            max_bpm: snapshot.max_bpm,
            elapsed: snapshot.elapsed_label(&self.sig),
            total: snapshot.total_label(self.pattern.len(), &self.sig),
            scroll_offset: self.scroll_offset,
            max_offset: self.request().max_offset(),
            visible_steps: self.config.view.visible_steps,
            follow: self.config.view.follow_playhead,
            has_loaded: self.loaded_from.is_some(),
        }
    }

    fn title(&self) -> String {
        self.loaded_from
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Demo groove".to_string())
    }

    fn apply_toggle(&mut self, toggle: StepToggle) {
        match self.pattern.toggle_step(&toggle.drum_key, toggle.step) {
            Ok(active) => tracing::debug!("Toggled {} step {} -> {}", toggle.drum_key, toggle.step, active),
            Err(e) => tracing::error!("Failed to toggle {} step {}: {}", toggle.drum_key, toggle.step, e),
        }
    }

    fn handle_transport(&mut self, action: TransportAction) {
        match action {
            TransportAction::SetMode(mode) => {
                self.mode = mode;
                self.config.view.mode = mode;
                save_config(&self.config);
            }
            TransportAction::TogglePlay => self.clock.toggle(),
            TransportAction::Stop => {
                self.clock.stop();
                self.scroll_offset = 0;
            }
            TransportAction::Clear => {
                self.pattern.clear();
                tracing::info!("Cleared pattern");
            }
            TransportAction::BpmDown => {
                self.clock.bpm_down();
                self.config.transport.bpm = self.clock.bpm();
                save_config(&self.config);
            }
            TransportAction::BpmUp => {
                self.clock.bpm_up();
                self.config.transport.bpm = self.clock.bpm();
                save_config(&self.config);
            }
            TransportAction::Scroll(offset) => self.scroll_offset = offset,
            TransportAction::SetVisibleSteps(steps) => {
                self.config.view.visible_steps = steps;
                self.scroll_offset = self.scroll_offset.min(self.request().max_offset());
                save_config(&self.config);
            }
            TransportAction::ToggleFollow => {
                self.config.view.follow_playhead = !self.config.view.follow_playhead;
                save_config(&self.config);
            }
            TransportAction::LoadPattern => {
                if let Some(path) = loader::pick_pattern_file() {
                    self.load(path);
                }
            }
            TransportAction::ClearLoaded => {
                self.pattern = loader::demo_pattern();
                self.loaded_from = None;
                self.clock.stop();
                self.scroll_offset = 0;
            }
        }
    }

    fn load(&mut self, path: PathBuf) {
        match loader::load_pattern_file(&path) {
            Ok(pattern) => {
                self.pattern = pattern;
                self.loaded_from = Some(path);
                self.clock.stop();
                self.scroll_offset = 0;
            }
            Err(e) => tracing::error!("{:#}", e),
        }
    }

    fn handle_keys(&mut self, ctx: &Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let max_offset = self.request().max_offset();
        ctx.input(|i| {
            if i.key_pressed(Key::Space) {
                self.clock.toggle();
            }
            if i.key_pressed(Key::ArrowRight) {
                self.scroll_offset = (self.scroll_offset + 1).min(max_offset);
            }
            if i.key_pressed(Key::ArrowLeft) {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
        });
    }
}

impl eframe::App for DrumstaffApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        let dt = ctx.input(|i| i.stable_dt) as f64;
        if self.clock.advance(dt, self.pattern.len(), &self.sig) && self.config.view.follow_playhead {
            self.scroll_offset = self.request().follow(self.clock.snapshot().current_step);
        }
        if self.clock.is_playing() {
            ctx.request_repaint();
        }

        let status = self.status();
        let mut actions = Vec::new();
        egui::TopBottomPanel::bottom("transport").show(ctx, |ui| {
            ui.add_space(4.0);
            actions = self.transport_panel.ui(ui, &status);
            ui.add_space(4.0);
        });

        let title = self.title();
        let playback = self.clock.snapshot();
        let request = self.request();
        let mut toggle = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&title);
                ui.label(format!(
                    "{} steps, {} tracks, {}-{} of {}",
                    self.pattern.len(),
                    self.pattern.tracks().len(),
                    request.window().start + 1,
                    request.window().end,
                    self.pattern.len(),
                ));
            });
            ui.separator();

            egui::ScrollArea::both().show(ui, |ui| match self.mode {
                DisplayMode::Grid => {
                    let model =
                        GridModel::build(&self.pattern, request.window(), playback.current_step, &self.sig);
                    toggle = self.grid_panel.ui(ui, &model);
                }
                DisplayMode::Notation => {
                    toggle = self.notation_panel.ui(ui, &self.pattern, request, &playback);
                }
            });
        });

        if let Some(toggle) = toggle {
            self.apply_toggle(toggle);
        }
        for action in actions {
            self.handle_transport(action);
        }
    }
}
