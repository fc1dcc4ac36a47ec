use std::cmp::Ordering;

use drumstaff_core::notation::{HitShape, BEAT_NUMBER_Y, PLAYHEAD_SPAN, STAFF_LEFT_MARGIN, STAFF_LINES};
use drumstaff_core::{normalize, NotationFrame, NoteheadKind, VisibleNote};
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2};

use super::types::*;
use super::NotationPanel;

impl NotationPanel {
    pub(super) fn draw_staff(&self, painter: &Painter, rect: Rect) {
        painter.rect_filled(rect, 0.0, PAPER);
        for y in STAFF_LINES {
            painter.line_segment(
                [Pos2::new(rect.left() + 8.0, rect.top() + y), Pos2::new(rect.right() - 8.0, rect.top() + y)],
                Stroke::new(1.0, STAFF_LINE),
            );
        }

        // Percussion clef: two thick bars on the middle lines
        let clef_x = rect.left() + 16.0;
        for dx in [0.0, 6.0] {
            painter.line_segment(
                [
                    Pos2::new(clef_x + dx, rect.top() + STAFF_LINES[1]),
                    Pos2::new(clef_x + dx, rect.top() + STAFF_LINES[3]),
                ],
                Stroke::new(3.0, INK),
            );
        }
    }

    pub(super) fn draw_structure(&self, painter: &Painter, frame: &NotationFrame, rect: Rect) {
        let offset = frame.content_offset();
        let visible = (rect.left() + STAFF_LEFT_MARGIN - 2.0)..=rect.right();

        for line in &frame.structure.bar_lines {
            let x = rect.left() + line.x + offset;
            if !visible.contains(&x) {
                continue;
            }
            let width = if line.is_first { 2.5 } else { 1.0 };
            painter.line_segment(
                [
                    Pos2::new(x, rect.top() + STAFF_LINES[0]),
                    Pos2::new(x, rect.top() + STAFF_LINES[STAFF_LINES.len() - 1]),
                ],
                Stroke::new(width, BAR_LINE),
            );
        }

        for beat in &frame.structure.beat_numbers {
            let x = rect.left() + beat.x + offset;
            if !visible.contains(&x) {
                continue;
            }
            painter.text(
                Pos2::new(x, rect.top() + BEAT_NUMBER_Y),
                Align2::CENTER_CENTER,
                &beat.label,
                FontId::proportional(11.0),
                BEAT_NUMBER,
            );
        }
    }

    pub(super) fn draw_notes(&self, painter: &Painter, frame: &NotationFrame, rect: Rect) {
        let offset = frame.content_offset();
        let min_x = rect.left() + STAFF_LEFT_MARGIN - NOTEHEAD_RX;

        for note in frame.notes.iter() {
            let center = Pos2::new(rect.left() + note.x + offset, rect.top() + note.y);
            if center.x < min_x || center.x > rect.right() + NOTEHEAD_RX {
                continue;
            }
            let color = match frame.mapper.relation(note.step, frame.playhead.current_step) {
                Ordering::Less => PAST_NOTE,
                Ordering::Equal => PLAYHEAD,
                Ordering::Greater => INK,
            };
            draw_notehead(painter, note, center, color);
        }
    }

    pub(super) fn draw_hover(&self, painter: &Painter, frame: &NotationFrame, rect: Rect, hover: Pos2) {
        let local = hover - rect.min;
        let Some(toggle) = frame.hit_test(local.x, local.y) else {
            return;
        };
        let offset = frame.content_offset();
        let is_note = frame.interaction.notes.iter().any(|t| t.toggle == toggle);
        let target = frame
            .interaction
            .notes
            .iter()
            .chain(&frame.interaction.slots)
            .find(|t| t.toggle == toggle);

        let anchor = match target.map(|t| t.shape) {
            Some(HitShape::Circle { x, y, radius }) => {
                let center = Pos2::new(rect.left() + x + offset, rect.top() + y);
                painter.circle_filled(center, radius, SLOT_HOVER);
                center - Vec2::new(0.0, radius)
            }
            Some(HitShape::Rect { min_x, min_y, max_x, max_y }) => {
                let bounds = Rect::from_min_max(
                    Pos2::new(rect.left() + min_x + offset, rect.top() + min_y),
                    Pos2::new(rect.left() + max_x + offset, rect.top() + max_y),
                );
                if is_note {
                    painter.rect_stroke(bounds, 4.0, Stroke::new(1.5, PLAYHEAD), StrokeKind::Inside);
                } else {
                    painter.rect_filled(bounds, 2.0, SLOT_HOVER);
                }
                bounds.center_top()
            }
            None => return,
        };

        // Hi-hat and open hat share a line, so name the voice under the pointer
        painter.text(
            anchor - Vec2::new(0.0, 2.0),
            Align2::CENTER_BOTTOM,
            normalize(&toggle.drum_key).display_name,
            FontId::proportional(10.0),
            INK,
        );
    }

    pub(super) fn draw_playhead(&self, painter: &Painter, frame: &NotationFrame, rect: Rect) {
        let Some(x) = frame.playhead.x else {
            return;
        };
        let x = rect.left() + x;
        painter.line_segment(
            [Pos2::new(x, rect.top() + PLAYHEAD_SPAN.0), Pos2::new(x, rect.top() + PLAYHEAD_SPAN.1)],
            Stroke::new(2.0, PLAYHEAD),
        );
    }
}

fn draw_notehead(painter: &Painter, note: &VisibleNote, center: Pos2, color: Color32) {
    match note.notehead {
        NoteheadKind::Filled => {
            painter.add(Shape::convex_polygon(ellipse(center), color, Stroke::NONE));
        }
        NoteheadKind::Open => {
            draw_cross(painter, center, color);
            painter.circle_stroke(center, X_HALF + 3.0, Stroke::new(1.0, color));
        }
        NoteheadKind::X => draw_cross(painter, center, color),
    }

    // Stems up
    let stem_x = center.x + NOTEHEAD_RX - 1.0;
    painter.line_segment(
        [Pos2::new(stem_x, center.y), Pos2::new(stem_x, center.y - STEM_LENGTH)],
        Stroke::new(1.0, color),
    );
}

fn draw_cross(painter: &Painter, center: Pos2, color: Color32) {
    let stroke = Stroke::new(2.0, color);
    let d = Vec2::splat(X_HALF);
    painter.line_segment([center - d, center + d], stroke);
    painter.line_segment([center + Vec2::new(-X_HALF, X_HALF), center + Vec2::new(X_HALF, -X_HALF)], stroke);
}

fn ellipse(center: Pos2) -> Vec<Pos2> {
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let t = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
            Pos2::new(center.x + NOTEHEAD_RX * t.cos(), center.y + NOTEHEAD_RY * t.sin())
        })
        .collect()
}
