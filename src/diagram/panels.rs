#![cfg(feature = "egui")]

//! Stateless side-panel presenters.
//!
//! Both panels are pure functions of their inputs: the detail panel maps a
//! selected node id to its static detail record, the inspector maps the
//! simulation's current payload to structured sections. Absence of data
//! renders a placeholder, never an error. Data flows in as parameters and
//! requested actions flow out as return values.

use eframe::egui::{self, Color32, RichText, Ui};

use crate::catalog::Catalog;
use crate::media::{MediaArtifact, MediaKind, MediaSession, SlotState};
use crate::model::{PayloadView, StepPayload, Trend};

use super::style::{ACCENT_RED, category_style};

/// Action requested from inside the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectorAction {
    None,
    GenerateVideo,
    GenerateImage,
}

fn section_heading(ui: &mut Ui, accent: Color32, text: &str) {
    ui.label(RichText::new(text).color(accent).strong().small());
    ui.add_space(4.0);
}

/// Render the architecture detail panel for the selected node, or the
/// placeholder when nothing is selected.
pub fn detail_panel(ui: &mut Ui, catalog: &Catalog, selected: Option<&str>) {
    let Some((node, detail)) = selected.and_then(|id| {
        let node = catalog.nodes.iter().find(|n| n.id == id)?;
        let detail = catalog.detail(id)?;
        Some((node, detail))
    }) else {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.label(RichText::new("Detalhes da Arquitetura").strong().size(16.0));
            ui.label(
                RichText::new("Selecione um domínio ou componente para ver a estratégia.")
                    .color(Color32::from_rgb(100, 116, 139)),
            );
        });
        return;
    };

    let style = category_style(node.category);
    let accent = style.icon;

    ui.label(
        RichText::new(node.category.legend_label().to_uppercase())
            .color(Color32::from_rgb(148, 163, 184))
            .small(),
    );
    ui.heading(RichText::new(&detail.title).color(Color32::WHITE));
    ui.label(RichText::new(&detail.subtitle).color(Color32::from_rgb(203, 213, 225)));
    ui.add_space(8.0);

    for line in detail.content.lines() {
        let line = line.trim();
        if line.is_empty() {
            ui.add_space(4.0);
        } else if let Some(bullet) = line.strip_prefix('*') {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("•").color(accent));
                ui.label(bullet.trim());
            });
        } else {
            ui.label(line);
        }
    }

    if let Some(synergy) = &detail.cross_domain {
        ui.add_space(10.0);
        section_heading(ui, accent, "SINERGIA ENTRE DOMÍNIOS");
        if !synergy.inputs.is_empty() {
            ui.label(RichText::new("Ingere contexto de").small().strong());
            for item in &synergy.inputs {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(&item.source).strong());
                    ui.label(RichText::new(&item.benefit).color(Color32::from_rgb(148, 163, 184)));
                });
            }
        }
        if !synergy.outputs.is_empty() {
            ui.label(RichText::new("Otimiza downstream").small().strong());
            for item in &synergy.outputs {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(&item.target).strong());
                    ui.label(
                        RichText::new(&item.improvement).color(Color32::from_rgb(148, 163, 184)),
                    );
                });
            }
        }
    }

    if !detail.kpis.is_empty() {
        ui.add_space(10.0);
        section_heading(ui, accent, "IMPACTO PROJETADO");
        for kpi in &detail.kpis {
            ui.label(RichText::new(kpi).color(Color32::from_rgb(226, 232, 240)));
        }
    }

    if !detail.tech_stack.is_empty() {
        ui.add_space(10.0);
        section_heading(ui, accent, "TECH STACK");
        ui.horizontal_wrapped(|ui| {
            for tech in &detail.tech_stack {
                ui.label(
                    RichText::new(tech)
                        .background_color(Color32::from_white_alpha(10))
                        .color(Color32::from_rgb(226, 232, 240))
                        .small(),
                );
            }
        });
    }

    if !detail.algorithms.is_empty() {
        ui.add_space(10.0);
        section_heading(ui, accent, "ALGORITMOS PRINCIPAIS");
        for algo in &detail.algorithms {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("•").color(accent));
                ui.label(RichText::new(algo).color(Color32::from_rgb(148, 163, 184)));
            });
        }
    }
}

/// Render the data inspector for the current step payload, or the
/// placeholder when the simulation is idle. Returns the action the user
/// requested this frame, if any.
pub fn inspector_panel(
    ui: &mut Ui,
    payload: Option<&StepPayload>,
    media: &MediaSession,
) -> InspectorAction {
    let Some(payload) = payload else {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.label(
                RichText::new("AGUARDANDO SINAIS")
                    .color(Color32::from_rgb(71, 85, 105))
                    .small(),
            );
        });
        return InspectorAction::None;
    };

    let mut action = InspectorAction::None;

    ui.horizontal(|ui| {
        ui.label(RichText::new(&payload.title).strong().color(Color32::WHITE));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                RichText::new("AO VIVO")
                    .color(Color32::from_rgb(52, 211, 153))
                    .small(),
            );
        });
    });
    ui.separator();

    // Media generator affordances: single-flight, so each button disappears
    // while its request is pending.
    match media.state(MediaKind::Video) {
        SlotState::Empty => {
            if ui
                .button(RichText::new("▶ Gerar vídeo").color(ACCENT_RED))
                .clicked()
            {
                action = InspectorAction::GenerateVideo;
            }
        }
        SlotState::Pending => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Renderizando vídeo…").color(ACCENT_RED).small());
            });
        }
        SlotState::Ready(MediaArtifact::Video(Some(url))) => {
            ui.hyperlink_to("🎬 Vídeo gerado", url);
        }
        SlotState::Ready(_) => {
            ui.label(RichText::new("Nenhum vídeo retornado").small());
        }
        SlotState::Failed(err) => {
            ui.label(
                RichText::new(format!("Falha na geração: {err}"))
                    .color(ACCENT_RED)
                    .small(),
            );
        }
    }
    match media.state(MediaKind::Image) {
        SlotState::Empty => {
            if ui
                .button(RichText::new("🖼 Gerar imagem").color(ACCENT_RED))
                .clicked()
            {
                action = InspectorAction::GenerateImage;
            }
        }
        SlotState::Pending => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Gerando imagem…").color(ACCENT_RED).small());
            });
        }
        SlotState::Ready(MediaArtifact::Image(Some(_))) => {
            ui.label(RichText::new("🖼 Imagem gerada").color(Color32::from_rgb(52, 211, 153)));
        }
        SlotState::Ready(_) => {
            ui.label(RichText::new("Nenhuma imagem retornada").small());
        }
        SlotState::Failed(err) => {
            ui.label(
                RichText::new(format!("Falha na geração: {err}"))
                    .color(ACCENT_RED)
                    .small(),
            );
        }
    }

    if payload.impact.is_some() || payload.roi.is_some() {
        ui.add_space(6.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            if let Some(impact) = &payload.impact {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new("✔").color(Color32::from_rgb(52, 211, 153)));
                    ui.label(impact);
                });
            }
            if let Some(roi) = &payload.roi {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(roi.label.to_uppercase())
                            .color(Color32::from_rgb(52, 211, 153))
                            .small(),
                    );
                    ui.label(RichText::new(&roi.value).strong().color(Color32::WHITE));
                    let arrow = match roi.trend {
                        Trend::Up => "↑",
                        Trend::Down => "↓",
                    };
                    ui.label(RichText::new(arrow).color(Color32::from_rgb(52, 211, 153)));
                });
            }
        });
    }

    ui.add_space(6.0);
    ui.label(
        RichText::new(&payload.description)
            .italics()
            .color(Color32::from_rgb(148, 163, 184)),
    );
    ui.add_space(6.0);

    match payload.view {
        PayloadView::Ranking => render_ranking(ui, &payload.data),
        PayloadView::Json => render_json(ui, &payload.data),
    }

    action
}

fn render_json(ui: &mut Ui, data: &serde_json::Value) {
    let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.label(
            RichText::new(pretty)
                .monospace()
                .color(Color32::from_rgb(147, 197, 253)),
        );
    });
}

fn render_ranking(ui: &mut Ui, data: &serde_json::Value) {
    let Some(rows) = data.as_array() else {
        render_json(ui, data);
        return;
    };
    for row in rows {
        let rank = row.get("rank").and_then(|v| v.as_u64()).unwrap_or(0);
        let store = row.get("store").and_then(|v| v.as_str()).unwrap_or("?");
        let score = row.get("score").and_then(|v| v.as_f64()).unwrap_or(0.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("#{rank}")).monospace().color(ACCENT_RED));
            ui.label(RichText::new(store).color(Color32::WHITE));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{score:.2}"))
                        .monospace()
                        .color(Color32::from_rgb(148, 163, 184)),
                );
            });
        });
    }
}
