#![cfg(feature = "egui")]

use std::collections::BTreeMap;

use eframe::egui::{pos2, vec2};
use flowdeck::catalog::Catalog;
use flowdeck::diagram::{
    CLICK_THRESHOLD, Gesture, GestureOutcome, InteractionController, Viewport, hit_test,
};
use flowdeck::layout::LayoutStore;
use flowdeck::model::{Node, NodeCategory, NodeDetail};

fn two_node_layout() -> LayoutStore {
    let node = |id: &str, x: f32, y: f32| Node {
        id: id.to_string(),
        label: id.to_uppercase(),
        x,
        y,
        category: NodeCategory::DomainService,
        description: String::new(),
    };
    let detail = |id: &str| NodeDetail {
        title: id.to_string(),
        subtitle: String::new(),
        content: String::new(),
        algorithms: vec![],
        tech_stack: vec![],
        kpis: vec![],
        cross_domain: None,
    };
    let mut details = BTreeMap::new();
    details.insert("alpha".to_string(), detail("alpha"));
    details.insert("beta".to_string(), detail("beta"));
    let catalog = Catalog {
        nodes: vec![node("alpha", 0.0, 0.0), node("beta", 200.0, 0.0)],
        edges: vec![],
        details,
    };
    LayoutStore::from_catalog(&catalog)
}

#[test]
fn test_background_press_starts_pan_and_collapses() {
    let mut layout = two_node_layout();
    let mut vp = Viewport::new();
    let mut ctl = InteractionController::new();
    ctl.expand("alpha");

    ctl.pointer_down(pos2(500.0, 500.0), None, &vp);
    assert!(matches!(ctl.gesture(), Gesture::Panning { .. }));
    // Collapse happens on press, not release.
    assert_eq!(ctl.expanded_node(), None);

    ctl.pointer_move(pos2(540.0, 470.0), &mut vp, &mut layout);
    assert_eq!(vp.pan, vec2(40.0, -30.0));
    assert_eq!(ctl.pointer_up(pos2(540.0, 470.0)), GestureOutcome::None);
    assert!(matches!(ctl.gesture(), Gesture::Idle));
}

#[test]
fn test_node_press_suppresses_pan() {
    let mut layout = two_node_layout();
    let mut vp = Viewport::new();
    let mut ctl = InteractionController::new();

    let hit = layout.node("alpha").cloned();
    ctl.pointer_down(pos2(40.0, 40.0), hit.as_ref(), &vp);
    assert_eq!(ctl.dragging_node(), Some("alpha"));

    ctl.pointer_move(pos2(140.0, 90.0), &mut vp, &mut layout);
    assert_eq!(vp.pan, vec2(0.0, 0.0));
    let moved = layout.node("alpha").unwrap();
    assert_eq!((moved.x, moved.y), (100.0, 50.0));
}

#[test]
fn test_node_drag_is_scaled_by_zoom() {
    let mut layout = two_node_layout();
    let mut vp = Viewport::new();
    vp.zoom_at(pos2(0.0, 0.0), 1.0); // zoom = 2.0
    let mut ctl = InteractionController::new();

    let hit = layout.node("alpha").cloned();
    ctl.pointer_down(pos2(40.0, 40.0), hit.as_ref(), &vp);
    ctl.pointer_move(pos2(140.0, 40.0), &mut vp, &mut layout);
    // 100 screen px at zoom 2 is 50 world units.
    assert_eq!(layout.node("alpha").unwrap().x, 50.0);
}

#[test]
fn test_release_within_threshold_is_a_click() {
    let mut layout = two_node_layout();
    let mut vp = Viewport::new();
    let mut ctl = InteractionController::new();

    let hit = layout.node("alpha").cloned();
    ctl.pointer_down(pos2(40.0, 40.0), hit.as_ref(), &vp);
    ctl.pointer_move(pos2(42.0, 41.0), &mut vp, &mut layout);
    let outcome = ctl.pointer_up(pos2(42.0, 41.0));
    assert_eq!(
        outcome,
        GestureOutcome::NodeClicked {
            id: "alpha".into(),
            expanded: true
        }
    );
    assert_eq!(ctl.expanded_node(), Some("alpha"));
    // Manhattan displacement 2+1 = 3 stays within the threshold.
    assert!(2.0 + 1.0 <= CLICK_THRESHOLD);
}

#[test]
fn test_release_past_threshold_is_a_drag_not_a_click() {
    let mut layout = two_node_layout();
    let vp = Viewport::new();
    let mut ctl = InteractionController::new();

    let hit = layout.node("alpha").cloned();
    ctl.pointer_down(pos2(40.0, 40.0), hit.as_ref(), &vp);
    let outcome = ctl.pointer_up(pos2(44.0, 44.0));
    // Manhattan displacement 8 exceeds the threshold.
    assert_eq!(outcome, GestureOutcome::None);
    assert_eq!(ctl.expanded_node(), None);
}

#[test]
fn test_click_toggles_expansion_both_ways() {
    let layout = two_node_layout();
    let vp = Viewport::new();
    let mut ctl = InteractionController::new();
    let hit = layout.node("alpha").cloned();

    ctl.pointer_down(pos2(40.0, 40.0), hit.as_ref(), &vp);
    ctl.pointer_up(pos2(40.0, 40.0));
    assert_eq!(ctl.expanded_node(), Some("alpha"));

    // Second click on the same node collapses it and still reports a click.
    ctl.pointer_down(pos2(40.0, 40.0), hit.as_ref(), &vp);
    let outcome = ctl.pointer_up(pos2(40.0, 40.0));
    assert_eq!(
        outcome,
        GestureOutcome::NodeClicked {
            id: "alpha".into(),
            expanded: false
        }
    );
    assert_eq!(ctl.expanded_node(), None);
}

#[test]
fn test_expanding_one_node_collapses_the_other() {
    let layout = two_node_layout();
    let vp = Viewport::new();
    let mut ctl = InteractionController::new();

    let alpha = layout.node("alpha").cloned();
    ctl.pointer_down(pos2(40.0, 40.0), alpha.as_ref(), &vp);
    ctl.pointer_up(pos2(40.0, 40.0));
    assert_eq!(ctl.expanded_node(), Some("alpha"));

    let beta = layout.node("beta").cloned();
    ctl.pointer_down(pos2(240.0, 40.0), beta.as_ref(), &vp);
    ctl.pointer_up(pos2(240.0, 40.0));
    assert_eq!(ctl.expanded_node(), Some("beta"));
}

#[test]
fn test_hit_test_prefers_expanded_node() {
    let mut layout = two_node_layout();
    // Overlap beta onto alpha; alpha is earlier in insertion order.
    layout.move_node("beta", 20.0, 0.0);
    // Without expansion the later node wins.
    let hit = hit_test(&layout, None, pos2(50.0, 40.0)).unwrap();
    assert_eq!(hit.id, "beta");
    // An expanded alpha paints on top, so it captures the hit.
    let hit = hit_test(&layout, Some("alpha"), pos2(50.0, 40.0)).unwrap();
    assert_eq!(hit.id, "alpha");
}

#[test]
fn test_hit_test_misses_empty_canvas() {
    let layout = two_node_layout();
    assert!(hit_test(&layout, None, pos2(-500.0, -500.0)).is_none());
}
