#![cfg(feature = "egui")]

//! Pure painting helpers for the diagram canvas.
//!
//! Everything here is a function of the current frame's inputs (screen-space
//! geometry, style variant, animation progress); no state is kept between
//! frames except [`EdgeAnimation`], which only records when the traversal
//! started.

use std::time::Instant;

use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, StrokeKind, vec2};
use egui::epaint::Shape;

use crate::model::{EdgeRef, Node};

use super::style::{ACCENT_RED, CategoryStyle, EdgeVariant};

/// Duration of the edge traversal marker, non-repeating.
pub const TRAVERSAL_ANIM_SECS: f32 = 1.0;

/// A one-shot marker traveling along the current step's edge. Retriggered
/// by constructing a new value whenever the current edge changes.
#[derive(Debug, Clone)]
pub struct EdgeAnimation {
    pub edge: EdgeRef,
    started: Instant,
}

impl EdgeAnimation {
    pub fn new(edge: EdgeRef) -> Self {
        Self {
            edge,
            started: Instant::now(),
        }
    }

    /// Progress in `[0, 1]`, clamped once the duration has elapsed.
    pub fn progress(&self) -> f32 {
        (self.started.elapsed().as_secs_f32() / TRAVERSAL_ANIM_SECS).min(1.0)
    }

    pub fn finished(&self) -> bool {
        self.started.elapsed().as_secs_f32() >= TRAVERSAL_ANIM_SECS
    }
}

/// Draw an edge line with its arrowhead, plus the traversal marker when
/// `marker_progress` is set.
pub fn paint_edge(
    painter: &Painter,
    from: Pos2,
    to: Pos2,
    variant: EdgeVariant,
    marker_progress: Option<f32>,
) {
    let stroke = variant.stroke();
    if variant.dashed() {
        painter.extend(Shape::dashed_line(&[from, to], stroke, 8.0, 8.0));
    } else {
        painter.line_segment([from, to], stroke);
    }
    paint_arrowhead(painter, from, to, stroke.color);

    if let Some(t) = marker_progress {
        let pos = from + (to - from) * t;
        painter.circle_filled(pos, 7.0, ACCENT_RED.gamma_multiply(0.35));
        painter.circle_filled(pos, 4.0, Color32::WHITE);
    }
}

fn paint_arrowhead(painter: &Painter, from: Pos2, to: Pos2, color: Color32) {
    let dir = to - from;
    let len = dir.length();
    if len < f32::EPSILON {
        return;
    }
    let dir = dir / len;
    let perp = vec2(-dir.y, dir.x);
    let tip = to;
    let base = tip - dir * 10.0;
    painter.add(Shape::convex_polygon(
        vec![tip, base + perp * 4.0, base - perp * 4.0],
        color,
        Stroke::NONE,
    ));
}

/// Draw a payload descriptor chip near the edge midpoint. The chip
/// brightens while its edge is being traversed.
pub fn paint_payload_label(
    painter: &Painter,
    mid: Pos2,
    text: &str,
    traversing: bool,
    zoom: f32,
) {
    let font = FontId::monospace((9.0 * zoom).max(5.0));
    let (bg, fg, border) = if traversing {
        (
            Color32::from_rgb(88, 18, 25),
            Color32::WHITE,
            ACCENT_RED,
        )
    } else {
        (
            Color32::from_rgb(18, 22, 30).gamma_multiply(0.85),
            Color32::from_rgb(100, 116, 139),
            Color32::from_rgb(51, 65, 85),
        )
    };
    let galley = painter.layout_no_wrap(text.to_string(), font, fg);
    let rect = Rect::from_center_size(mid, galley.size() + vec2(10.0, 5.0));
    painter.rect_filled(rect, 4.0, bg);
    painter.rect_stroke(rect, 4.0, Stroke::new(1.0, border), StrokeKind::Outside);
    painter.galley(rect.min + vec2(5.0, 2.5), galley, fg);
}

/// Draw a collapsed node: rounded body, icon, label underneath the icon.
/// The active node gets the category's highlight border and a glow.
pub fn paint_collapsed_node(
    painter: &Painter,
    node: &Node,
    rect: Rect,
    style: &CategoryStyle,
    icon: &str,
    active: bool,
    zoom: f32,
) {
    if active {
        painter.rect_filled(rect.expand(5.0), 14.0, style.active_border.gamma_multiply(0.18));
    }
    painter.rect_filled(rect, 10.0, style.fill);
    let border = if active { style.active_border } else { style.border };
    painter.rect_stroke(rect, 10.0, Stroke::new(2.0, border), StrokeKind::Outside);

    let icon_color = if active { Color32::WHITE } else { style.icon };
    painter.text(
        rect.center() - vec2(0.0, rect.height() * 0.14),
        Align2::CENTER_CENTER,
        icon,
        FontId::proportional((22.0 * zoom).max(8.0)),
        icon_color,
    );
    let label_color = if active { Color32::WHITE } else { style.label };
    painter.text(
        rect.center_bottom() - vec2(0.0, rect.height() * 0.18),
        Align2::CENTER_CENTER,
        &node.label,
        FontId::proportional((9.0 * zoom).max(5.0)),
        label_color,
    );
}

/// Draw an expanded detail card: header row, wrapped description, and the
/// "view details" affordance along the bottom edge.
pub fn paint_expanded_node(
    painter: &Painter,
    node: &Node,
    rect: Rect,
    style: &CategoryStyle,
    icon: &str,
    active: bool,
    zoom: f32,
) {
    painter.rect_filled(rect.translate(vec2(3.0, 4.0)), 12.0, Color32::from_black_alpha(120));
    painter.rect_filled(rect, 12.0, style.fill);
    let border = if active { style.active_border } else { style.border };
    painter.rect_stroke(rect, 12.0, Stroke::new(2.0, border), StrokeKind::Outside);

    let pad = 12.0 * zoom;
    let header = rect.min + vec2(pad, pad);
    painter.text(
        header,
        Align2::LEFT_TOP,
        icon,
        FontId::proportional((14.0 * zoom).max(6.0)),
        style.icon,
    );
    painter.text(
        header + vec2(22.0 * zoom, 0.0),
        Align2::LEFT_TOP,
        &node.label,
        FontId::proportional((13.0 * zoom).max(6.0)),
        Color32::WHITE,
    );

    let body_font = FontId::proportional((10.0 * zoom).max(5.0));
    let body = painter.layout(
        node.description.clone(),
        body_font,
        Color32::from_rgb(203, 213, 225),
        rect.width() - 2.0 * pad,
    );
    painter.galley(rect.min + vec2(pad, pad + 20.0 * zoom), body, Color32::WHITE);

    painter.line_segment(
        [
            rect.left_bottom() + vec2(pad, -18.0 * zoom),
            rect.right_bottom() + vec2(-pad, -18.0 * zoom),
        ],
        Stroke::new(1.0, Color32::from_white_alpha(24)),
    );
    painter.text(
        rect.left_bottom() + vec2(pad, -6.0 * zoom),
        Align2::LEFT_BOTTOM,
        "⤢ Ver Detalhes",
        FontId::proportional((9.0 * zoom).max(5.0)),
        ACCENT_RED,
    );
}
