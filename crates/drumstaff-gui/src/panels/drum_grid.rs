//! Step grid panel: one row per track, one cell per visible step

use drumstaff_core::{GridModel, LabelEmphasis, LayoutMetrics, StepMapper, StepToggle};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2};

use super::voice_color;

const BACKGROUND: Color32 = Color32::from_gray(28);
const CELL_OFF: Color32 = Color32::from_gray(45);
const CURRENT_COLUMN: Color32 = Color32::from_rgba_premultiplied(24, 24, 8, 40);
const PLAYHEAD: Color32 = Color32::from_rgb(255, 200, 60);
const FADE_STRIPS: usize = 8;

pub struct DrumGridPanel {
    /// Height of each drum row
    row_height: f32,
    /// Width of the label column
    label_width: f32,
    /// Height of each header row (step numbers, counts)
    header_height: f32,
}

impl Default for DrumGridPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DrumGridPanel {
    pub fn new() -> Self {
        Self { row_height: 38.0, label_width: 110.0, header_height: 18.0 }
    }

    /// Paint the grid. Returns the cell the user clicked, if any.
    pub fn ui(&mut self, ui: &mut Ui, model: &GridModel) -> Option<StepToggle> {
        let height = self.header_height * 2.0 + self.row_height * model.rows.len().max(1) as f32;
        let (response, painter) =
            ui.allocate_painter(Vec2::new(ui.available_width(), height), Sense::click());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let grid_rect = Rect::from_min_max(Pos2::new(rect.left() + self.label_width, rect.top()), rect.max);
        let mapper = StepMapper::new(
            model.window,
            LayoutMetrics::Proportional { left: grid_rect.left(), width: grid_rect.width() },
        );
        let rows_top = rect.top() + self.header_height * 2.0;

        if model.rows.is_empty() || model.columns.is_empty() {
            painter.text(
                grid_rect.center(),
                Align2::CENTER_CENTER,
                "Empty pattern",
                FontId::proportional(14.0),
                Color32::from_gray(120),
            );
            return None;
        }

        self.draw_header(&painter, model, &mapper, rect.top());
        self.draw_labels(&painter, model, rect, rows_top);
        self.draw_cells(&painter, model, &mapper, rows_top, response.hover_pos());

        let bottom = rows_top + self.row_height * model.rows.len() as f32;
        if let Some(index) = model.playhead_index {
            let x = mapper.step_center(model.window.start + index);
            painter.line_segment(
                [Pos2::new(x, rect.top() + self.header_height), Pos2::new(x, bottom)],
                Stroke::new(2.0, PLAYHEAD),
            );
        }

        if model.fade_left {
            draw_fade(&painter, grid_rect, mapper.cell_width(), true);
        }
        if model.fade_right {
            draw_fade(&painter, grid_rect, mapper.cell_width(), false);
        }

        if !response.clicked() {
            return None;
        }
        let pos = response.interact_pointer_pos()?;
        let (row, col) = self.cell_at(pos, &mapper, rows_top)?;
        model.toggle_at(row, col)
    }

    fn cell_at(&self, pos: Pos2, mapper: &StepMapper, rows_top: f32) -> Option<(usize, usize)> {
        if pos.y < rows_top {
            return None;
        }
        let step = mapper.step_at(pos.x)?;
        let row = ((pos.y - rows_top) / self.row_height).floor() as usize;
        Some((row, step - mapper.window().start))
    }

    fn draw_header(&self, painter: &egui::Painter, model: &GridModel, mapper: &StepMapper, top: f32) {
        for column in &model.columns {
            let x = mapper.step_center(column.step);

            painter.text(
                Pos2::new(x, top + self.header_height / 2.0),
                Align2::CENTER_CENTER,
                (column.step + 1).to_string(),
                FontId::monospace(9.0),
                Color32::from_gray(110),
            );

            let (size, color) = match column.label.emphasis {
                LabelEmphasis::Downbeat => (13.0, Color32::WHITE),
                LabelEmphasis::And => (12.0, Color32::from_rgb(150, 180, 255)),
                LabelEmphasis::Subdivision => (10.0, Color32::from_gray(140)),
                LabelEmphasis::Plain => (10.0, Color32::from_gray(170)),
            };
            let color = if column.is_current { PLAYHEAD } else { color };
            painter.text(
                Pos2::new(x, top + self.header_height * 1.5),
                Align2::CENTER_CENTER,
                &column.label.text,
                FontId::proportional(size),
                color,
            );
        }
    }

    fn draw_labels(&self, painter: &egui::Painter, model: &GridModel, rect: Rect, rows_top: f32) {
        for (i, row) in model.rows.iter().enumerate() {
            let y = rows_top + i as f32 * self.row_height;
            let label_rect = Rect::from_min_size(
                Pos2::new(rect.left(), y),
                Vec2::new(self.label_width, self.row_height),
            );
            painter.rect_filled(label_rect, 0.0, Color32::from_gray(35));
            let border = Stroke::new(0.5, Color32::from_gray(20));
            painter.rect_stroke(label_rect, 0.0, border, StrokeKind::Inside);

            painter.text(
                Pos2::new(label_rect.left() + 8.0, label_rect.center().y),
                Align2::LEFT_CENTER,
                &row.drum.symbol,
                FontId::proportional(16.0),
                voice_color(&row.drum),
            );
            painter.text(
                Pos2::new(label_rect.left() + 30.0, label_rect.center().y),
                Align2::LEFT_CENTER,
                &row.drum.display_name,
                FontId::proportional(12.0),
                Color32::from_gray(200),
            );
        }
    }

    fn draw_cells(
        &self,
        painter: &egui::Painter,
        model: &GridModel,
        mapper: &StepMapper,
        rows_top: f32,
        hover: Option<Pos2>,
    ) {
        let cell_width = mapper.cell_width();
        let bottom = rows_top + self.row_height * model.rows.len() as f32;
        let hovered = hover.and_then(|pos| self.cell_at(pos, mapper, rows_top));

        for (col, column) in model.columns.iter().enumerate() {
            let left = mapper.step_left(column.step);
            for (row_idx, row) in model.rows.iter().enumerate() {
                let y = rows_top + row_idx as f32 * self.row_height;
                let cell = Rect::from_min_size(Pos2::new(left, y), Vec2::new(cell_width, self.row_height))
                    .shrink(2.0);
                let active = row.cells.get(col).copied().unwrap_or(false);

                let color = if active { voice_color(&row.drum) } else { CELL_OFF };
                painter.rect_filled(cell, 3.0, color);
                if hovered == Some((row_idx, col)) {
                    painter.rect_stroke(cell, 3.0, Stroke::new(1.5, Color32::WHITE), StrokeKind::Inside);
                }
                if active {
                    painter.text(
                        cell.center(),
                        Align2::CENTER_CENTER,
                        &row.drum.symbol,
                        FontId::proportional(14.0),
                        Color32::BLACK,
                    );
                }
            }

            if column.is_current {
                let highlight =
                    Rect::from_min_max(Pos2::new(left, rows_top), Pos2::new(left + cell_width, bottom));
                painter.rect_filled(highlight, 0.0, CURRENT_COLUMN);
            }

            let line = if column.is_beat_start {
                Stroke::new(1.5, Color32::from_gray(90))
            } else {
                Stroke::new(0.5, Color32::from_gray(50))
            };
            painter.line_segment([Pos2::new(left, rows_top), Pos2::new(left, bottom)], line);
        }
    }
}

/// Shade one edge to hint at steps scrolled out of view
fn draw_fade(painter: &egui::Painter, grid_rect: Rect, cell_width: f32, left_edge: bool) {
    let width = cell_width.min(grid_rect.width() / 4.0);
    let strip = width / FADE_STRIPS as f32;
    for i in 0..FADE_STRIPS {
        let alpha = (160.0 * (1.0 - i as f32 / FADE_STRIPS as f32)) as u8;
        let x = if left_edge {
            grid_rect.left() + i as f32 * strip
        } else {
            grid_rect.right() - (i + 1) as f32 * strip
        };
        let band =
            Rect::from_min_max(Pos2::new(x, grid_rect.top()), Pos2::new(x + strip, grid_rect.bottom()));
        painter.rect_filled(band, 0.0, Color32::from_rgba_unmultiplied(28, 28, 28, alpha));
    }
}
