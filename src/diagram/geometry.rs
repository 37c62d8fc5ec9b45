#![cfg(feature = "egui")]

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::layout::LayoutStore;
use crate::model::Node;

/// World-space footprint of a collapsed node (icon + label).
pub const COLLAPSED_SIZE: Vec2 = vec2(80.0, 80.0);
/// World-space footprint of an expanded node (detail card).
pub const EXPANDED_SIZE: Vec2 = vec2(256.0, 120.0);

/// World-space rectangle of a node given its current visual form. The
/// node's `x`/`y` is the top-left corner in both forms, so expanding grows
/// the footprint right/downwards.
pub fn node_rect(node: &Node, expanded: bool) -> Rect {
    let size = if expanded { EXPANDED_SIZE } else { COLLAPSED_SIZE };
    Rect::from_min_size(pos2(node.x, node.y), size)
}

/// Center of a node's current footprint. Edge anchor math starts from here
/// and must be recomputed per render: collapsed and expanded footprints
/// differ, so cached centers would detach edges when a card opens.
pub fn node_center(node: &Node, expanded: bool) -> Pos2 {
    node_rect(node, expanded).center()
}

/// Point on `rect`'s boundary where the segment from its center toward
/// `toward` exits. This is the visual anchor of an edge at that node.
pub fn boundary_anchor(rect: Rect, toward: Pos2) -> Pos2 {
    let center = rect.center();
    let dir = toward - center;
    if dir.x.abs() < f32::EPSILON && dir.y.abs() < f32::EPSILON {
        return center;
    }
    let tx = if dir.x.abs() > f32::EPSILON {
        (rect.width() * 0.5) / dir.x.abs()
    } else {
        f32::INFINITY
    };
    let ty = if dir.y.abs() > f32::EPSILON {
        (rect.height() * 0.5) / dir.y.abs()
    } else {
        f32::INFINITY
    };
    let t = tx.min(ty).min(1.0);
    center + dir * t
}

/// Midpoint between two anchors, used to place payload labels.
pub fn edge_midpoint(a: Pos2, b: Pos2) -> Pos2 {
    pos2((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Topmost node under a world position, honoring render z-order: the
/// expanded node paints above everything, and otherwise later nodes paint
/// above earlier ones.
pub fn hit_test<'a>(
    layout: &'a LayoutStore,
    expanded: Option<&str>,
    world: Pos2,
) -> Option<&'a Node> {
    if let Some(id) = expanded {
        if let Some(node) = layout.node(id) {
            if node_rect(node, true).contains(world) {
                return Some(node);
            }
        }
    }
    layout
        .nodes()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .find(|n| {
            let is_expanded = expanded == Some(n.id.as_str());
            node_rect(n, is_expanded).contains(world)
        })
}
