use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Nodes
// ────────────────────────────────────────────────────────────────────────────

/// Closed set of node categories. Categories drive presentation only
/// (color, icon, legend entry); adding one is a compile-time-visible change
/// because every style lookup matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// User-facing surfaces (consumer app, courier app, partner portal).
    Channel,
    /// Domain AI services ("brains").
    DomainService,
    /// Data/ML infrastructure (event bus, feature store, vector search…).
    Infrastructure,
    /// Organization departments consuming the platform.
    Organization,
}

impl NodeCategory {
    /// Human-readable legend label.
    pub fn legend_label(&self) -> &'static str {
        match self {
            NodeCategory::Channel => "Canais",
            NodeCategory::DomainService => "IA de Domínio",
            NodeCategory::Infrastructure => "Infraestrutura",
            NodeCategory::Organization => "Organização",
        }
    }
}

/// A positioned diagram node.
///
/// `id` is the stable identity; `x`/`y` are world coordinates (independent of
/// pan/zoom) of the node's top-left corner and are the only attributes mutated
/// at runtime (via drag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub category: NodeCategory,
    pub description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Edges
// ────────────────────────────────────────────────────────────────────────────

/// A directed edge between two nodes. Immutable for a session; both endpoints
/// must resolve to existing node ids (validated at load).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Short payload descriptor rendered near the edge midpoint when the
    /// global payload-label toggle is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

/// Reference to an edge by its endpoints, as used by simulation steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRef {
    pub from: String,
    pub to: String,
}

impl EdgeRef {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// True if this reference points at the given edge.
    pub fn matches(&self, edge: &Edge) -> bool {
        self.from == edge.from && self.to == edge.to
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Node detail records
// ────────────────────────────────────────────────────────────────────────────

/// One "benefits from" entry in a cross-domain impact list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactIn {
    pub source: String,
    pub benefit: String,
}

/// One "improves others" entry in a cross-domain impact list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactOut {
    pub target: String,
    pub improvement: String,
}

/// Cross-domain synergy: which nodes feed this one and which it optimizes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossDomainImpact {
    pub inputs: Vec<ImpactIn>,
    pub outputs: Vec<ImpactOut>,
}

/// Static descriptive record behind a node, shown in the detail panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDetail {
    pub title: String,
    pub subtitle: String,
    /// Body text; lines starting with `*` render as bullet points.
    pub content: String,
    pub algorithms: Vec<String>,
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub kpis: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_domain: Option<CrossDomainImpact>,
}

// ────────────────────────────────────────────────────────────────────────────
// Simulation script
// ────────────────────────────────────────────────────────────────────────────

/// Direction of a quantified benefit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

/// A quantitative benefit callout attached to a step payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoiMetric {
    pub label: String,
    pub value: String,
    pub trend: Trend,
}

/// How the inspector should present a payload's `data` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadView {
    #[default]
    Json,
    Ranking,
}

/// Structured content shown in the data inspector while a step is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepPayload {
    pub title: String,
    pub description: String,
    /// Free-form structured data, pretty-printed in the inspector.
    pub data: serde_json::Value,
    #[serde(default)]
    pub view: PayloadView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<RoiMetric>,
}

/// One step of the scripted walkthrough. Steps form an ordered, immutable
/// list indexed by `step_id` (monotonic from 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStep {
    pub step_id: usize,
    /// Node highlighted while this step is current.
    pub node: String,
    /// Edge traversed to reach `node`, if any (step 0 typically has none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeRef>,
    /// Console line appended when this step is applied.
    pub log: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<StepPayload>,
}
