//! Egui-based interactive diagram presenter (feature = "egui").
//!
//! The canvas, gesture handling, styling and side panels are split into
//! submodules; [`DiagramApp`] ties them together as an `eframe::App`.

#![cfg(feature = "egui")]

mod geometry;
mod interaction;
mod panels;
mod render;
mod state;
mod style;
mod ui;
mod viewport;

pub use geometry::{
    COLLAPSED_SIZE, EXPANDED_SIZE, boundary_anchor, edge_midpoint, hit_test, node_center,
    node_rect,
};
pub use interaction::{CLICK_THRESHOLD, Gesture, GestureOutcome, InteractionController};
pub use panels::{InspectorAction, detail_panel, inspector_panel};
pub use render::{EdgeAnimation, TRAVERSAL_ANIM_SECS};
pub use state::{DiagramApp, ReauthDialog};
pub use style::{CategoryStyle, EdgeVariant, category_style, edge_variant, legend_color, node_icon};
pub use viewport::{Viewport, ZOOM_MAX, ZOOM_MIN};
