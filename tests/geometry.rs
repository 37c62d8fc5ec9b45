#![cfg(feature = "egui")]

use eframe::egui::pos2;
use flowdeck::diagram::{
    COLLAPSED_SIZE, EXPANDED_SIZE, boundary_anchor, edge_midpoint, node_center, node_rect,
};
use flowdeck::model::{Node, NodeCategory};

fn node_at(x: f32, y: f32) -> Node {
    Node {
        id: "n".into(),
        label: "N".into(),
        x,
        y,
        category: NodeCategory::Infrastructure,
        description: String::new(),
    }
}

#[test]
fn test_node_rect_grows_when_expanded() {
    let n = node_at(100.0, 50.0);
    let collapsed = node_rect(&n, false);
    let expanded = node_rect(&n, true);
    assert_eq!(collapsed.min, pos2(100.0, 50.0));
    assert_eq!(collapsed.size(), COLLAPSED_SIZE);
    // Expansion keeps the top-left corner anchored.
    assert_eq!(expanded.min, collapsed.min);
    assert_eq!(expanded.size(), EXPANDED_SIZE);
}

#[test]
fn test_node_center() {
    let n = node_at(0.0, 0.0);
    assert_eq!(node_center(&n, false), pos2(40.0, 40.0));
}

#[test]
fn test_boundary_anchor_exits_toward_target() {
    let n = node_at(0.0, 0.0);
    let rect = node_rect(&n, false);
    // Target directly to the right: the anchor is the right edge midpoint.
    let anchor = boundary_anchor(rect, pos2(400.0, 40.0));
    assert!((anchor.x - 80.0).abs() < 1e-3);
    assert!((anchor.y - 40.0).abs() < 1e-3);
    // Target directly below: bottom edge midpoint.
    let anchor = boundary_anchor(rect, pos2(40.0, 400.0));
    assert!((anchor.x - 40.0).abs() < 1e-3);
    assert!((anchor.y - 80.0).abs() < 1e-3);
}

#[test]
fn test_boundary_anchor_diagonal_stays_on_rim() {
    let n = node_at(0.0, 0.0);
    let rect = node_rect(&n, false);
    let anchor = boundary_anchor(rect, pos2(300.0, 200.0));
    let on_rim = (anchor.x - rect.max.x).abs() < 1e-3 || (anchor.y - rect.max.y).abs() < 1e-3;
    assert!(on_rim, "anchor {anchor:?} not on rectangle boundary");
    assert!(rect.expand(1e-3).contains(anchor));
}

#[test]
fn test_boundary_anchor_target_inside_rect() {
    let n = node_at(0.0, 0.0);
    let rect = node_rect(&n, false);
    // Degenerate case: the target sits inside the rect; the anchor must
    // stay within it rather than shooting past.
    let anchor = boundary_anchor(rect, pos2(50.0, 45.0));
    assert!(rect.contains(anchor));
}

#[test]
fn test_edge_midpoint() {
    assert_eq!(
        edge_midpoint(pos2(0.0, 10.0), pos2(100.0, 30.0)),
        pos2(50.0, 20.0)
    );
}
