//! The scripted walkthrough: one order event traced end to end.
//!
//! The script is a pure, static list of [`SimulationStep`]s. It depends on a
//! single slowly-changing parameter (the selected region) and is regenerated
//! wholesale when that parameter changes, never patched incrementally.

use anyhow::{Result, bail};
use serde_json::json;

use crate::catalog::Catalog;
use crate::model::{EdgeRef, PayloadView, RoiMetric, SimulationStep, StepPayload, Trend};

/// Regions the walkthrough can be localized to.
pub const REGIONS: &[&str] = &["São Paulo", "Rio de Janeiro", "Belo Horizonte"];

/// Default region used when none is selected.
pub const DEFAULT_REGION: &str = "São Paulo";

fn payload(title: &str, description: &str, data: serde_json::Value) -> StepPayload {
    StepPayload {
        title: title.to_string(),
        description: description.to_string(),
        data,
        view: PayloadView::Json,
        impact: None,
        roi: None,
    }
}

fn roi(label: &str, value: &str, trend: Trend) -> RoiMetric {
    RoiMetric {
        label: label.to_string(),
        value: value.to_string(),
        trend,
    }
}

/// Build the full walkthrough script for the given region.
///
/// `step_id`s are assigned positionally, so the returned list always
/// satisfies `steps[i].step_id == i`.
pub fn build_script(region: &str) -> Vec<SimulationStep> {
    let mut steps: Vec<SimulationStep> = Vec::with_capacity(16);
    let mut step = |node: &str, edge: Option<(&str, &str)>, log: String, payload: Option<StepPayload>| {
        steps.push(SimulationStep {
            step_id: steps.len(),
            node: node.to_string(),
            edge: edge.map(|(f, t)| EdgeRef::new(f, t)),
            log,
            payload,
        });
    };

    step(
        "consumer_app",
        None,
        format!("Usuário abre App em {region}"),
        Some(payload(
            "Sessão iniciada",
            "A session starts and the clickstream begins flowing. Every \
             impression is an event with user, store and geo context.",
            json!({
                "event": "session_start",
                "region": region,
                "platform": "android",
                "experiments": ["storefront_v9", "eta_badge"],
            }),
        )),
    );

    step(
        "confluent_kafka",
        Some(("consumer_app", "confluent_kafka")),
        "Kafka: evento de clique publicado no tópico app-events".to_string(),
        Some(payload(
            "Evento no barramento",
            "Key-partitioning by user id keeps this session's events ordered \
             for every consumer downstream.",
            json!({
                "topic": "app-events",
                "partition_key": "user_8812",
                "lag_ms": 40,
            }),
        )),
    );

    step(
        "vertex_fs",
        Some(("confluent_kafka", "vertex_fs")),
        "Feature Store: features online atualizadas".to_string(),
        Some(payload(
            "Features frescas",
            "The same feature definitions serve training and inference, so \
             the ranking model sees exactly what it was trained on.",
            json!({
                "entity": "user_8812",
                "features": {
                    "orders_30d": 11,
                    "avg_ticket": 47.9,
                    "last_cuisine": "japonesa",
                },
                "freshness_s": 2,
            }),
        )),
    );

    step(
        "vertex_endpoints",
        Some(("vertex_fs", "vertex_endpoints")),
        "Model Serving: modelo de ranking invocado".to_string(),
        Some(payload(
            "Inferência online",
            "The two-tower ranking model scores candidate stores with the \
             online features joined in.",
            json!({
                "model": "storefront-ranker-v9",
                "candidates": 412,
                "latency_ms": 41,
            }),
        )),
    );

    let mut p = payload(
        "Vitrine personalizada",
        "Discovery blends relevance, ETA feasibility and trust into the final \
         storefront order.",
        json!([
            { "rank": 1, "store": "Sushi da Vila", "score": 0.93 },
            { "rank": 2, "store": "Cantina Mia", "score": 0.88 },
            { "rank": 3, "store": "Burger 22", "score": 0.84 },
        ]),
    );
    p.view = PayloadView::Ranking;
    p.impact = Some(
        "Personalized ranking is the platform's single largest conversion \
         lever."
            .to_string(),
    );
    p.roi = Some(roi("Conversão", "+12%", Trend::Up));
    step(
        "discovery_ai",
        Some(("vertex_endpoints", "discovery_ai")),
        "Discovery IA: vitrine personalizada calculada".to_string(),
        Some(p),
    );

    step(
        "consumer_app",
        Some(("discovery_ai", "consumer_app")),
        "App: vitrine renderizada, pedido criado".to_string(),
        Some(payload(
            "Pedido confirmado",
            "The user orders from the first recommendation; checkout emits \
             an order-created event.",
            json!({
                "order_id": "ord_55120",
                "store": "Sushi da Vila",
                "total": 68.4,
            }),
        )),
    );

    let mut p = payload(
        "Antifraude em linha",
        "The payment is scored before capture; velocity and graph features \
         come straight from the event bus.",
        json!({
            "order_id": "ord_55120",
            "risk_score": 0.04,
            "decision": "approve",
            "latency_ms": 80,
        }),
    );
    p.roi = Some(roi("Chargeback", "-23%", Trend::Down));
    step(
        "risk_ai",
        Some(("vertex_endpoints", "risk_ai")),
        "Risk IA: pagamento aprovado em 80ms".to_string(),
        Some(p),
    );

    let mut p = payload(
        "Despacho otimizado",
        "Courier allocation solves a matching problem across all open orders \
         in the city, not one order at a time.",
        json!({
            "order_id": "ord_55120",
            "courier": "c_3391",
            "pickup_eta_min": 9,
            "delivery_eta_min": 27,
        }),
    );
    p.impact = Some(
        "Matching at city scale raises courier utilization without hurting \
         delivery time."
            .to_string(),
    );
    p.roi = Some(roi("Tempo de entrega", "-11%", Trend::Down));
    step(
        "logistics_ai",
        Some(("vertex_endpoints", "logistics_ai")),
        "Logística IA: entregador alocado, rota calculada".to_string(),
        Some(p),
    );

    step(
        "courier_app",
        Some(("logistics_ai", "courier_app")),
        "Courier App: oferta aceita, rota enviada".to_string(),
        Some(payload(
            "Rota no app do entregador",
            "The courier receives the offer with pickup timing aligned to \
             the kitchen's predicted ready time.",
            json!({
                "courier": "c_3391",
                "distance_km": 3.2,
                "ready_in_min": 8,
            }),
        )),
    );

    step(
        "bigquery",
        Some(("confluent_kafka", "bigquery")),
        "BigQuery: eventos do pedido arquivados".to_string(),
        Some(payload(
            "Arquivo analítico",
            "Raw events land partitioned by day; tomorrow's training \
             snapshot and the finance mart both derive from them.",
            json!({
                "dataset": "events.raw",
                "rows_appended": 184,
            }),
        )),
    );

    step(
        "vector_db",
        Some(("bigquery", "vector_db")),
        "Vector Search: embeddings do cardápio atualizados".to_string(),
        Some(payload(
            "Índice atualizado",
            "Fresh review and menu embeddings keep retrieval grounded in \
             what the store sells today.",
            json!({
                "index": "platform-knowledge",
                "upserts": 37,
            }),
        )),
    );

    step(
        "rag_engine",
        Some(("vector_db", "rag_engine")),
        "RAG Engine: contexto do pedido indexado".to_string(),
        Some(payload(
            "Contexto recuperável",
            "Order context is now retrievable: support and partner answers \
             will cite it instead of hallucinating.",
            json!({
                "chunks": 5,
                "reranker": "cross-encoder",
            }),
        )),
    );

    let mut p = payload(
        "Suporte preparado",
        "If the customer asks anything, the assistant already has the order \
         timeline and can answer in one turn.",
        json!({
            "intent_coverage": 0.61,
            "handoff": "with_summary",
        }),
    );
    p.impact = Some(
        "Most 'where is my order' tickets resolve without a human agent."
            .to_string(),
    );
    p.roi = Some(roi("Resolução automática", "61%", Trend::Up));
    step(
        "support_ai",
        Some(("rag_engine", "support_ai")),
        "Suporte IA: resumo do pedido disponível".to_string(),
        Some(p),
    );

    steps
}

/// Validate a script against a catalog: every step's node must exist and
/// every step edge must match a catalog edge. Dangling references are a
/// data defect and fail fast, like catalog validation itself.
pub fn validate_script(catalog: &Catalog, steps: &[SimulationStep]) -> Result<()> {
    for s in steps {
        if !catalog.nodes.iter().any(|n| n.id == s.node) {
            bail!("Step {} references unknown node '{}'", s.step_id, s.node);
        }
        if let Some(e) = &s.edge {
            if !catalog.edges.iter().any(|edge| e.matches(edge)) {
                bail!(
                    "Step {} references unknown edge '{}' -> '{}'",
                    s.step_id, e.from, e.to
                );
            }
        }
    }
    Ok(())
}
