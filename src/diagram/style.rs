#![cfg(feature = "egui")]

//! Visual styling for node categories and edge variants.
//!
//! Styling is the only thing a [`NodeCategory`] drives. Every lookup here
//! matches exhaustively, so adding a category fails to compile until each
//! style decision is made for it.

use eframe::egui::{Color32, Stroke};

use crate::model::NodeCategory;

/// Accent red used for active highlights and the traversal marker.
pub const ACCENT_RED: Color32 = Color32::from_rgb(234, 29, 44);
/// Indigo used for organizational nodes and edges.
pub const ORG_INDIGO: Color32 = Color32::from_rgb(99, 102, 241);
/// Canvas background.
pub const CANVAS_BG: Color32 = Color32::from_rgb(13, 13, 15);

/// Colors for one node category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryStyle {
    pub fill: Color32,
    pub border: Color32,
    /// Border while the node is the simulation's active node.
    pub active_border: Color32,
    pub icon: Color32,
    pub label: Color32,
}

/// Style for a category. Closed and exhaustive on purpose.
pub fn category_style(category: NodeCategory) -> CategoryStyle {
    match category {
        NodeCategory::Channel => CategoryStyle {
            fill: Color32::from_rgb(30, 41, 59),
            border: Color32::from_rgb(71, 85, 105),
            active_border: Color32::WHITE,
            icon: Color32::WHITE,
            label: Color32::from_rgb(226, 232, 240),
        },
        NodeCategory::DomainService => CategoryStyle {
            fill: Color32::from_rgb(88, 18, 25),
            border: Color32::from_rgb(170, 50, 60),
            active_border: ACCENT_RED,
            icon: ACCENT_RED,
            label: Color32::from_rgb(254, 226, 226),
        },
        NodeCategory::Infrastructure => CategoryStyle {
            fill: Color32::from_rgb(24, 32, 44),
            border: Color32::from_rgb(51, 65, 85),
            active_border: Color32::from_rgb(52, 211, 153),
            icon: Color32::from_rgb(16, 185, 129),
            label: Color32::from_rgb(203, 213, 225),
        },
        NodeCategory::Organization => CategoryStyle {
            fill: Color32::from_rgb(42, 38, 90),
            border: Color32::from_rgb(99, 102, 241),
            active_border: Color32::from_rgb(129, 140, 248),
            icon: Color32::from_rgb(129, 140, 248),
            label: Color32::from_rgb(199, 210, 254),
        },
    }
}

/// Legend swatch color per category.
pub fn legend_color(category: NodeCategory) -> Color32 {
    match category {
        NodeCategory::Channel => Color32::from_rgb(100, 116, 139),
        NodeCategory::DomainService => ACCENT_RED,
        NodeCategory::Infrastructure => Color32::from_rgb(16, 185, 129),
        NodeCategory::Organization => ORG_INDIGO,
    }
}

/// Icon glyph for a node. Per-node where the id is known, with a category
/// fallback for catalogs loaded from file.
pub fn node_icon(id: &str, category: NodeCategory) -> &'static str {
    match id {
        "consumer_app" => "📱",
        "courier_app" => "🛵",
        "partner_portal" => "🏪",
        "confluent_kafka" => "🧵",
        "vertex_fs" => "📦",
        "bigquery" => "🗄",
        "vector_db" => "🧭",
        "vertex_endpoints" => "⚡",
        "rag_engine" => "📚",
        "n8n" => "🔁",
        "discovery_ai" | "ads_ai" | "logistics_ai" | "risk_ai" | "partner_ai"
        | "support_ai" => "🧠",
        _ => match category {
            NodeCategory::Channel => "🖥",
            NodeCategory::DomainService => "🧠",
            NodeCategory::Infrastructure => "⚙",
            NodeCategory::Organization => "👥",
        },
    }
}

/// Visual variant of an edge for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeVariant {
    /// The simulation's current edge: bright, animated marker on top.
    Traversal,
    /// An edge touching an organization node: dashed indigo.
    Organizational,
    /// Everything else: dim structural background.
    Structural,
}

/// Classify an edge given its endpoint categories and whether it is the
/// simulation's current edge.
pub fn edge_variant(from: NodeCategory, to: NodeCategory, traversing: bool) -> EdgeVariant {
    if traversing {
        EdgeVariant::Traversal
    } else if from == NodeCategory::Organization || to == NodeCategory::Organization {
        EdgeVariant::Organizational
    } else {
        EdgeVariant::Structural
    }
}

impl EdgeVariant {
    pub fn stroke(&self) -> Stroke {
        match self {
            EdgeVariant::Traversal => Stroke::new(3.0, ACCENT_RED),
            EdgeVariant::Organizational => {
                Stroke::new(2.0, ORG_INDIGO.gamma_multiply(0.6))
            }
            EdgeVariant::Structural => {
                Stroke::new(1.5, Color32::from_rgb(51, 65, 85).gamma_multiply(0.5))
            }
        }
    }

    pub fn dashed(&self) -> bool {
        matches!(self, EdgeVariant::Organizational)
    }
}
