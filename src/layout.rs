//! Mutable node positions plus the static edge set.
//!
//! Node iteration order is the catalog's insertion order and never changes,
//! even when nodes are dragged; render z-order (dragged/expanded node on top)
//! is a derived concern handled by the renderer, not here.

use indexmap::IndexMap;

use crate::catalog::Catalog;
use crate::model::{Edge, Node};

/// Positioned nodes and the session's edge set.
#[derive(Debug, Clone)]
pub struct LayoutStore {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
}

impl LayoutStore {
    /// Build a layout from a validated catalog.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let nodes = catalog
            .nodes
            .iter()
            .map(|n| (n.id.clone(), n.clone()))
            .collect();
        Self {
            nodes,
            edges: catalog.edges.clone(),
        }
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Move a node to a new world position. Unknown ids are a no-op and
    /// return `false`.
    pub fn move_node(&mut self, id: &str, x: f32, y: f32) -> bool {
        match self.nodes.get_mut(id) {
            Some(n) => {
                n.x = x;
                n.y = y;
                true
            }
            None => false,
        }
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges, static for the session.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
