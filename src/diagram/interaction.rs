#![cfg(feature = "egui")]

//! Pointer gesture disambiguation.
//!
//! Every pointer event maps deterministically to a transition of a small
//! state machine — `Idle`, `Panning`, `DraggingNode` — so the whole
//! interaction layer can be unit tested without a rendering surface.
//! Mutual exclusion is structural: there is one gesture slot, and a
//! pointer-down on a node claims it before the canvas can start a pan.

use eframe::egui::{Pos2, Vec2, pos2};

use crate::layout::LayoutStore;
use crate::model::Node;

use super::viewport::Viewport;

/// Total screen-space displacement (Manhattan) below which a pointer
/// down/up pair counts as a click rather than a drag.
pub const CLICK_THRESHOLD: f32 = 5.0;

/// The gesture currently in progress. At most one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    /// Canvas pan; anchored at the pointer and pan values at gesture start.
    Panning {
        pointer_start: Pos2,
        pan_start: Vec2,
    },
    /// Node drag; anchored at the pointer position and the node's world
    /// position at gesture start.
    DraggingNode {
        id: String,
        pointer_start: Pos2,
        node_start: Pos2,
    },
}

/// What a completed gesture amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    None,
    /// Pointer released within the click threshold over a node. The
    /// expansion was toggled; `expanded` is the node's new expansion state.
    /// Selection observers are notified in both directions of the toggle.
    NodeClicked { id: String, expanded: bool },
}

/// Gesture state plus the single expanded-card slot.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    gesture: Gesture,
    expanded: Option<String>,
}

impl Default for Gesture {
    fn default() -> Self {
        Gesture::Idle
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Id of the node currently being dragged, if any.
    pub fn dragging_node(&self) -> Option<&str> {
        match &self.gesture {
            Gesture::DraggingNode { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Id of the expanded node, if any. At most one node is expanded.
    pub fn expanded_node(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Expand a node directly, collapsing any other expanded node.
    pub fn expand(&mut self, id: impl Into<String>) {
        self.expanded = Some(id.into());
    }

    /// Pointer pressed. A hit node claims the gesture as a (potential)
    /// drag, suppressing canvas pan; empty canvas starts a pan and
    /// collapses any expanded card.
    pub fn pointer_down(&mut self, screen: Pos2, hit: Option<&Node>, viewport: &Viewport) {
        if !matches!(self.gesture, Gesture::Idle) {
            return;
        }
        match hit {
            Some(node) => {
                self.gesture = Gesture::DraggingNode {
                    id: node.id.clone(),
                    pointer_start: screen,
                    node_start: pos2(node.x, node.y),
                };
            }
            None => {
                self.gesture = Gesture::Panning {
                    pointer_start: screen,
                    pan_start: viewport.pan,
                };
                self.expanded = None;
            }
        }
    }

    /// Pointer moved. Applies the delta since gesture start to the pan or
    /// the dragged node; node deltas are scaled by 1/zoom because node
    /// positions live in world space. Deltas are applied in event order.
    pub fn pointer_move(
        &mut self,
        screen: Pos2,
        viewport: &mut Viewport,
        layout: &mut LayoutStore,
    ) {
        match &self.gesture {
            Gesture::Idle => {}
            Gesture::Panning {
                pointer_start,
                pan_start,
            } => {
                viewport.pan = *pan_start + (screen - *pointer_start);
            }
            Gesture::DraggingNode {
                id,
                pointer_start,
                node_start,
            } => {
                let d = (screen - *pointer_start) / viewport.zoom;
                // Unknown id here means the layout changed under us; the
                // move is then a no-op, which is the intended guard.
                let id = id.clone();
                layout.move_node(&id, node_start.x + d.x, node_start.y + d.y);
            }
        }
    }

    /// Pointer released. Ends the gesture; a node gesture whose total
    /// displacement stayed within [`CLICK_THRESHOLD`] resolves as a click
    /// and toggles that node's expansion.
    pub fn pointer_up(&mut self, screen: Pos2) -> GestureOutcome {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::DraggingNode {
                id, pointer_start, ..
            } => {
                let d = screen - pointer_start;
                if d.x.abs() + d.y.abs() <= CLICK_THRESHOLD {
                    let expanded = self.expanded.as_deref() != Some(id.as_str());
                    self.expanded = expanded.then(|| id.clone());
                    GestureOutcome::NodeClicked { id, expanded }
                } else {
                    GestureOutcome::None
                }
            }
            _ => GestureOutcome::None,
        }
    }
}
