//! Static diagram configuration: nodes, edges, and per-node detail records.
//!
//! The catalog is data, not behavior. It is read-only after load and every
//! edge endpoint and detail key is validated against the node set up front —
//! a dangling reference is a data-integrity defect and fails fast with a
//! descriptive error instead of rendering a broken edge later.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::model::{
    CrossDomainImpact, Edge, ImpactIn, ImpactOut, Node, NodeCategory, NodeDetail,
};

/// The full static configuration of a diagram: node set, edge set, and the
/// detail record shown when a node is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub details: BTreeMap<String, NodeDetail>,
}

impl Catalog {
    /// Load a catalog from a JSON file and validate it.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Open catalog {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&text)
            .with_context(|| format!("Parse catalog {}", path.display()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check referential integrity: unique node ids, edge endpoints that
    /// resolve, and a detail record for every node.
    pub fn validate(&self) -> Result<()> {
        let mut ids: HashSet<&str> = HashSet::new();
        for n in &self.nodes {
            if !ids.insert(n.id.as_str()) {
                bail!("Duplicate node id '{}'", n.id);
            }
        }
        for e in &self.edges {
            if !ids.contains(e.from.as_str()) {
                bail!("Edge '{}' -> '{}' references unknown node '{}'", e.from, e.to, e.from);
            }
            if !ids.contains(e.to.as_str()) {
                bail!("Edge '{}' -> '{}' references unknown node '{}'", e.from, e.to, e.to);
            }
        }
        for n in &self.nodes {
            if !self.details.contains_key(&n.id) {
                bail!("Node '{}' has no detail record", n.id);
            }
        }
        for id in self.details.keys() {
            if !ids.contains(id.as_str()) {
                bail!("Detail record for unknown node '{}'", id);
            }
        }
        Ok(())
    }

    /// Look up the detail record for a node id.
    pub fn detail(&self, id: &str) -> Option<&NodeDetail> {
        self.details.get(id)
    }

    /// The built-in delivery-platform catalog. Always valid; the debug
    /// assertion guards against edits that break referential integrity.
    pub fn builtin() -> Self {
        let catalog = build_builtin();
        debug_assert!(catalog.validate().is_ok());
        catalog
    }
}

/// Helper to create a node concisely.
fn node(
    id: &str,
    label: &str,
    x: f32,
    y: f32,
    category: NodeCategory,
    description: &str,
) -> Node {
    Node {
        id: id.to_string(),
        label: label.to_string(),
        x,
        y,
        category,
        description: description.to_string(),
    }
}

/// Helper to create an edge with an optional payload descriptor.
fn edge(from: &str, to: &str, label: Option<&str>, payload: Option<&str>) -> Edge {
    Edge {
        from: from.to_string(),
        to: to.to_string(),
        label: label.map(str::to_string),
        payload: payload.map(str::to_string),
    }
}

/// Helper to create a detail record concisely.
fn detail(
    title: &str,
    subtitle: &str,
    content: &str,
    algorithms: &[&str],
    tech_stack: &[&str],
    kpis: &[&str],
) -> NodeDetail {
    NodeDetail {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        content: content.to_string(),
        algorithms: algorithms.iter().map(|s| s.to_string()).collect(),
        tech_stack: tech_stack.iter().map(|s| s.to_string()).collect(),
        kpis: kpis.iter().map(|s| s.to_string()).collect(),
        cross_domain: None,
    }
}

fn impact(inputs: &[(&str, &str)], outputs: &[(&str, &str)]) -> CrossDomainImpact {
    CrossDomainImpact {
        inputs: inputs
            .iter()
            .map(|(source, benefit)| ImpactIn {
                source: source.to_string(),
                benefit: benefit.to_string(),
            })
            .collect(),
        outputs: outputs
            .iter()
            .map(|(target, improvement)| ImpactOut {
                target: target.to_string(),
                improvement: improvement.to_string(),
            })
            .collect(),
    }
}

fn build_builtin() -> Catalog {
    use NodeCategory::*;

    // Coordinates laid out for a roughly 1300x560 world.
    let nodes = vec![
        // ── Channels (left column) ───────────────────────────────────────
        node("consumer_app", "Consumer App", 40.0, 60.0, Channel,
            "Mobile app where customers browse, order and track deliveries."),
        node("courier_app", "Courier App", 40.0, 230.0, Channel,
            "Driver app receiving dispatch assignments and optimized routes."),
        node("partner_portal", "Partner Portal", 40.0, 400.0, Channel,
            "Web portal where restaurants manage menu, demand and payouts."),
        // ── Infrastructure (middle band) ─────────────────────────────────
        node("confluent_kafka", "Confluent Kafka", 220.0, 230.0, Infrastructure,
            "Event backbone: every click, GPS ping and order flows through here."),
        node("vertex_fs", "Feature Store", 400.0, 120.0, Infrastructure,
            "Low-latency online features, consistent with offline training data."),
        node("bigquery", "BigQuery", 400.0, 340.0, Infrastructure,
            "Analytical warehouse; training sets and BI are derived here."),
        node("vector_db", "Vector Search", 560.0, 40.0, Infrastructure,
            "ANN index over menu, reviews and support knowledge embeddings."),
        node("vertex_endpoints", "Model Serving", 560.0, 230.0, Infrastructure,
            "Online endpoints serving ranking, ETA and fraud models."),
        node("n8n", "Workflow Automation", 560.0, 430.0, Infrastructure,
            "Low-code workflows reacting to platform events (alerts, blocks)."),
        node("rag_engine", "RAG Engine", 720.0, 120.0, Infrastructure,
            "Retrieval-augmented generation service grounding LLM answers."),
        // ── Domain AI services ───────────────────────────────────────────
        node("discovery_ai", "Discovery IA", 880.0, 20.0, DomainService,
            "Personalized storefront: restaurant and dish recommendations."),
        node("ads_ai", "Ads IA", 880.0, 110.0, DomainService,
            "Sponsored placement auctions balancing relevance and revenue."),
        node("logistics_ai", "Logística IA", 880.0, 200.0, DomainService,
            "Dispatch brain: courier allocation, ETA prediction, routing."),
        node("risk_ai", "Risk IA", 880.0, 290.0, DomainService,
            "Trust & safety: payment fraud, account takeover, abuse."),
        node("partner_ai", "Partner IA", 880.0, 380.0, DomainService,
            "Restaurant operations copilot: demand forecast, menu insights."),
        node("support_ai", "Suporte IA", 880.0, 470.0, DomainService,
            "Customer-experience assistant resolving tickets with context."),
        // ── Organization departments ─────────────────────────────────────
        node("dept_marketing", "Marketing", 1100.0, 60.0, Organization,
            "Campaigns and growth, powered by ads and discovery signals."),
        node("dept_product", "Produto", 1100.0, 150.0, Organization,
            "Product teams steering discovery and app experience."),
        node("dept_operations", "Operações", 1100.0, 250.0, Organization,
            "City operations monitoring logistics and support quality."),
        node("dept_engineering", "Engenharia", 1100.0, 350.0, Organization,
            "Platform engineering owning serving and data infrastructure."),
        node("dept_finance", "Finanças", 1100.0, 440.0, Organization,
            "Finance consuming warehouse data for margin and payout control."),
    ];

    let edges = vec![
        // Operational flow into the event bus
        edge("consumer_app", "confluent_kafka", Some("events"), Some("clickstream")),
        edge("courier_app", "confluent_kafka", Some("telemetry"), Some("gps_ping")),
        edge("partner_portal", "confluent_kafka", Some("status"), Some("order_status")),
        // Fan-out from the bus
        edge("confluent_kafka", "vertex_fs", None, Some("features")),
        edge("confluent_kafka", "bigquery", None, Some("raw_events")),
        edge("confluent_kafka", "n8n", None, Some("triggers")),
        // Serving path
        edge("vertex_fs", "vertex_endpoints", None, Some("online_features")),
        edge("bigquery", "vertex_endpoints", Some("retrain"), Some("batch_train")),
        edge("bigquery", "vector_db", None, Some("embeddings")),
        edge("vector_db", "rag_engine", None, Some("contexto")),
        // Models feeding the domain brains
        edge("vertex_endpoints", "discovery_ai", None, Some("scores")),
        edge("vertex_endpoints", "ads_ai", None, Some("bids")),
        edge("vertex_endpoints", "logistics_ai", None, Some("eta")),
        edge("vertex_endpoints", "risk_ai", None, Some("risk_score")),
        edge("rag_engine", "partner_ai", None, Some("insights")),
        edge("rag_engine", "support_ai", None, Some("resposta")),
        edge("n8n", "partner_ai", None, Some("alertas")),
        edge("risk_ai", "n8n", None, Some("bloqueios")),
        // Back to the channels
        edge("discovery_ai", "consumer_app", None, Some("vitrine")),
        edge("ads_ai", "consumer_app", None, Some("ads")),
        edge("support_ai", "consumer_app", None, Some("chat")),
        edge("logistics_ai", "courier_app", None, Some("rotas")),
        edge("partner_ai", "partner_portal", None, Some("painel")),
        // Organizational dependencies (rendered dashed)
        edge("dept_marketing", "ads_ai", None, None),
        edge("dept_product", "discovery_ai", None, None),
        edge("dept_operations", "logistics_ai", None, None),
        edge("dept_operations", "support_ai", None, None),
        edge("dept_engineering", "vertex_endpoints", None, None),
        edge("dept_finance", "bigquery", None, None),
    ];

    let mut details: BTreeMap<String, NodeDetail> = BTreeMap::new();

    details.insert("consumer_app".into(), detail(
        "Consumer App", "Principal canal de demanda",
        "Every session produces a dense event stream: impressions, searches, \
         cart changes, checkout.\n\
         * Instrumented end to end; events land in Kafka in under a second.\n\
         * Storefront ranking, ads and support chat are all served in-app.",
        &["Session stitching", "Event schema versioning"],
        &["Kotlin/Swift", "GraphQL BFF", "Confluent Kafka"],
        &["Conversão de sessão +12%"],
    ));
    details.insert("courier_app".into(), detail(
        "Courier App", "Canal de oferta logística",
        "Streams GPS pings and delivery state transitions; receives dispatch \
         offers and turn-by-turn routes computed by Logística IA.",
        &["Geo-hashing", "Offer acceptance model"],
        &["Kotlin", "MQTT bridge", "Maps SDK"],
        &[],
    ));
    details.insert("partner_portal".into(), detail(
        "Partner Portal", "Canal dos restaurantes",
        "Restaurants manage menus, track prep-time performance and read \
         AI-generated demand forecasts.",
        &["Prep-time estimation", "Menu normalization"],
        &["React", "BigQuery BI Engine"],
        &[],
    ));
    details.insert("confluent_kafka".into(), detail(
        "Confluent Kafka", "Espinha dorsal de eventos",
        "Decouples producers from the dozens of consumers downstream.\n\
         * Key-partitioning keeps per-order event sequences in order.\n\
         * Backpressure protects the feature store during traffic spikes.",
        &["Log-structured storage", "Key partitioning", "Exactly-once sinks"],
        &["Confluent Cloud", "Schema Registry", "Kafka Connect"],
        &["Latência p99 < 150ms"],
    ));
    details.insert("vertex_fs".into(), detail(
        "Feature Store", "Features online/offline consistentes",
        "Single definition of every feature, materialized both to the online \
         store (serving) and the warehouse (training) to avoid skew.",
        &["Point-in-time joins", "TTL-based freshness"],
        &["Vertex AI Feature Store", "Dataflow"],
        &["Training/serving skew ~0"],
    ));
    details.insert("bigquery".into(), detail(
        "BigQuery", "Data warehouse analítico",
        "All raw events are archived here; training datasets, finance marts \
         and embeddings pipelines are derived views.",
        &["Partitioned ingestion", "Materialized views"],
        &["BigQuery", "dbt", "Dataform"],
        &[],
    ));
    details.insert("vector_db".into(), detail(
        "Vector Search", "Índice ANN da plataforma",
        "Embeddings of menus, reviews and support articles, queried by the \
         RAG engine with tenant filters.\n\
         * HNSW-backed index; filtered queries stay under 20ms.",
        &["HNSW", "ScaNN", "Filtered ANN"],
        &["Vertex AI Vector Search"],
        &[],
    ));
    details.insert("vertex_endpoints".into(), detail(
        "Model Serving", "Endpoints online de ML",
        "Ranking, ETA, fraud and bidding models served behind autoscaling \
         endpoints with shadow deployments for new versions.",
        &["Two-tower ranking", "Gradient-boosted ETA", "Shadow traffic"],
        &["Vertex AI Endpoints", "Triton"],
        &["p95 de inferência 45ms"],
    ));
    details.insert("n8n".into(), detail(
        "Workflow Automation", "Automação low-code",
        "Operational glue: reacts to risk blocks, SLA breaches and partner \
         alerts without engineering involvement.",
        &["Event-driven workflows"],
        &["n8n", "Cloud Run"],
        &[],
    ));
    details.insert("rag_engine".into(), detail(
        "RAG Engine", "Geração aumentada por recuperação",
        "Grounds LLM responses in retrieved platform context before answering \
         support tickets or partner questions.\n\
         * Retrieve, rerank, then generate with citations.",
        &["Hybrid retrieval", "Cross-encoder rerank", "Prompt assembly"],
        &["LangChain", "Cloud Run", "Gemini"],
        &[],
    ));

    let mut d = detail(
        "Discovery IA", "Vitrine personalizada",
        "Ranks restaurants and dishes per user, context and time of day. \
         Retrained daily from warehouse snapshots.",
        &["Two-tower retrieval", "LambdaMART rerank", "Exploração ε-greedy"],
        &["Vertex AI", "Feature Store"],
        &["CTR da vitrine +9%", "Tempo até pedido −14%"],
    );
    d.cross_domain = Some(impact(
        &[
            ("Risk IA", "Filters fraudulent merchants out of candidate sets"),
            ("Logística IA", "ETA feasibility keeps undeliverable options hidden"),
        ],
        &[
            ("Ads IA", "Organic relevance scores calibrate sponsored auctions"),
            ("Marketing", "Segment embeddings reused for campaign targeting"),
        ],
    ));
    details.insert("discovery_ai".into(), d);

    let mut d = detail(
        "Ads IA", "Monetização patrocinada",
        "Runs the sponsored-placement auction; blends bid value with the \
         organic relevance score so ads never wreck the storefront.",
        &["GSP auction", "pCTR calibration", "Budget pacing"],
        &["Vertex AI", "BigQuery"],
        &["Receita de ads +18%"],
    );
    d.cross_domain = Some(impact(
        &[("Discovery IA", "Organic scores used as the auction quality term")],
        &[("Finanças", "Auction logs feed margin attribution")],
    ));
    details.insert("ads_ai".into(), d);

    let mut d = detail(
        "Logística IA", "Despacho e roteirização",
        "Allocates couriers to orders and predicts kitchen-ready times so \
         the courier arrives when the food does.",
        &["Hungarian matching", "ETA GBDT", "Batching heuristics"],
        &["Vertex AI", "OR-Tools"],
        &["Tempo de entrega −11%", "Ocupação de entregadores +7%"],
    );
    d.cross_domain = Some(impact(
        &[("Partner IA", "Prep-time forecasts tighten pickup timing")],
        &[
            ("Discovery IA", "Feasible-ETA signal hides undeliverable stores"),
            ("Operações", "Dispatch telemetry drives city dashboards"),
        ],
    ));
    details.insert("logistics_ai".into(), d);

    let mut d = detail(
        "Risk IA", "Confiança e segurança",
        "Scores every payment and account action in-line; hard blocks are \
         executed through automation workflows.",
        &["Gradient boosting", "Graph features", "Velocity rules"],
        &["Vertex AI", "n8n"],
        &["Chargeback −23%"],
    );
    d.cross_domain = Some(impact(
        &[("Confluent Kafka", "Real-time event velocity features")],
        &[("Discovery IA", "Merchant trust scores filter candidates")],
    ));
    details.insert("risk_ai".into(), d);

    let mut d = detail(
        "Partner IA", "Copiloto do restaurante",
        "Turns warehouse and RAG context into plain-language guidance for \
         restaurant owners: demand, pricing, menu gaps.",
        &["Demand forecast", "LLM summarization"],
        &["Gemini", "RAG Engine", "BigQuery"],
        &[],
    );
    d.cross_domain = Some(impact(
        &[("RAG Engine", "Grounded answers over partner documentation")],
        &[("Logística IA", "Prep-time forecasts feed dispatch timing")],
    ));
    details.insert("partner_ai".into(), d);

    let mut d = detail(
        "Suporte IA", "Experiência do cliente",
        "Resolves the long tail of tickets with order context retrieved at \
         answer time; hands off to humans with a summary attached.",
        &["Intent classification", "RAG answering", "Handoff summarization"],
        &["Gemini", "RAG Engine"],
        &["Resolução automática 61%"],
    );
    d.cross_domain = Some(impact(
        &[("Logística IA", "Live delivery state grounds 'where is my order'")],
        &[("Operações", "Ticket clusters surface systemic issues")],
    ));
    details.insert("support_ai".into(), d);

    details.insert("dept_marketing".into(), detail(
        "Marketing", "Crescimento e campanhas",
        "Consumes discovery segments and ads performance to plan campaigns.",
        &[], &["Looker", "BigQuery"], &[],
    ));
    details.insert("dept_product".into(), detail(
        "Produto", "Direção de produto",
        "Owns the storefront experience; reads experiment readouts from the \
         warehouse.",
        &[], &["Experiment platform"], &[],
    ));
    details.insert("dept_operations".into(), detail(
        "Operações", "Operações de cidade",
        "Watches dispatch health and support quality per city in real time.",
        &[], &["Looker", "n8n"], &[],
    ));
    details.insert("dept_engineering".into(), detail(
        "Engenharia", "Plataforma",
        "Runs the serving and data infrastructure every domain team builds on.",
        &[], &["Vertex AI", "Confluent"], &[],
    ));
    details.insert("dept_finance".into(), detail(
        "Finanças", "Margem e repasses",
        "Closes the books from warehouse marts; audits ads revenue share.",
        &[], &["BigQuery", "dbt"], &[],
    ));

    Catalog { nodes, edges, details }
}
