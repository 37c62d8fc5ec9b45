#![cfg(feature = "egui")]

//! Per-frame UI composition: top control bar, diagram canvas, detail /
//! inspector sidebar, console panel and the re-authentication modal.
//!
//! Control flow follows a collect-then-apply pattern — widget closures only
//! record the requested action into a frame-local value, and the action is
//! applied after the closure returns, so no panel ever holds a long-lived
//! mutable borrow of the app.

use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Align2, Color32, Context, FontId, Pos2, Rect, RichText, pos2, vec2};

use crate::media::{GeminiClient, MediaEvent, MediaKind};
use crate::model::NodeCategory;
use crate::script::REGIONS;
use crate::sim::SimPhase;

use super::geometry::{boundary_anchor, edge_midpoint, hit_test, node_rect};
use super::interaction::GestureOutcome;
use super::panels::{InspectorAction, detail_panel, inspector_panel};
use super::render::{
    paint_collapsed_node, paint_edge, paint_expanded_node, paint_payload_label,
};
use super::state::{DiagramApp, ReauthDialog};
use super::style::{CANVAS_BG, category_style, edge_variant, legend_color, node_icon};

const CONSOLE_HEIGHT: f32 = 150.0;

/// Sidebar tracks the window: a quarter of the screen, clamped so neither a
/// narrow laptop nor an ultrawide produces an unusable panel.
fn sidebar_width(screen_width: f32) -> f32 {
    (screen_width * 0.25).clamp(280.0, 420.0)
}

/// Actions collected from the top bar, applied after the panel closes.
enum TopAction {
    None,
    Start,
    Advance,
    Reset,
    Region(String),
    Summary,
}

pub fn update(app: &mut DiagramApp, ctx: &Context, _frame: &mut eframe::Frame) {
    process_media_events(app);

    top_bar(app, ctx);
    console_panel(app, ctx);
    sidebar(app, ctx);
    canvas(app, ctx);
    reauth_modal(app, ctx);

    // Keep animating while a traversal marker or background request is live.
    let anim_live = app.edge_anim.as_ref().is_some_and(|a| !a.finished());
    if anim_live {
        ctx.request_repaint();
    } else if app.media.is_pending(MediaKind::Text)
        || app.media.is_pending(MediaKind::Image)
        || app.media.is_pending(MediaKind::Video)
    {
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}

/// Drain settled media results into console lines; an auth failure opens
/// the one-shot re-authentication dialog.
fn process_media_events(app: &mut DiagramApp) {
    for event in app.media.poll() {
        match event {
            MediaEvent::Ready(MediaKind::Video) => {
                app.engine.log("🎬 Vídeo gerado — pronto para reprodução");
            }
            MediaEvent::Ready(MediaKind::Text) => {
                app.engine.log("✨ Resumo de IA disponível");
            }
            MediaEvent::Ready(MediaKind::Image) => {
                app.engine.log("🖼 Imagem gerada");
            }
            MediaEvent::Failed(kind, err) => {
                app.engine.log(format!("⚠ Falha na geração ({kind:?}): {err}"));
            }
            MediaEvent::AuthRequired(_) => {
                app.engine.log("⚠ Credencial da API rejeitada");
                app.reauth = Some(ReauthDialog::default());
            }
        }
    }
}

fn top_bar(app: &mut DiagramApp, ctx: &Context) {
    let mut action = TopAction::None;
    egui::TopBottomPanel::top("controls").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("Plataforma de Dados & IA")
                    .strong()
                    .color(Color32::WHITE),
            );
            ui.separator();

            match app.engine.phase() {
                SimPhase::Idle | SimPhase::Completed => {
                    if ui.button("▶ Iniciar Simulação").clicked() {
                        action = TopAction::Start;
                    }
                }
                SimPhase::Running(_) => {
                    if ui.button("Próximo Passo ▸").clicked() {
                        action = TopAction::Advance;
                    }
                }
            }
            if ui.button("⟲ Reiniciar").clicked() {
                action = TopAction::Reset;
            }
            if app.engine.phase() == SimPhase::Completed {
                let pending = app.media.is_pending(MediaKind::Text);
                if ui
                    .add_enabled(!pending, egui::Button::new("✨ Resumo IA"))
                    .clicked()
                {
                    action = TopAction::Summary;
                }
            }

            ui.separator();
            let mut region = app.engine.region().to_string();
            egui::ComboBox::from_label("Região")
                .selected_text(&region)
                .show_ui(ui, |ui| {
                    for r in REGIONS {
                        ui.selectable_value(&mut region, r.to_string(), *r);
                    }
                });
            if region != app.engine.region() {
                action = TopAction::Region(region);
            }

            ui.separator();
            ui.checkbox(&mut app.show_payloads, "Payloads");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = match app.engine.phase() {
                    SimPhase::Idle => "pronto".to_string(),
                    SimPhase::Running(i) => {
                        format!("passo {}/{}", i + 1, app.engine.step_count())
                    }
                    SimPhase::Completed => "concluído".to_string(),
                };
                ui.label(RichText::new(label).weak().monospace());
            });
        });
    });

    match action {
        TopAction::None => {}
        TopAction::Start => app.start_run(),
        TopAction::Advance => app.advance_run(),
        TopAction::Reset => app.reset_run(),
        TopAction::Region(r) => app.set_region(&r),
        TopAction::Summary => app.request_summary(),
    }
}

fn console_panel(app: &DiagramApp, ctx: &Context) {
    egui::TopBottomPanel::bottom("console")
        .exact_height(CONSOLE_HEIGHT)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(
                RichText::new("CONSOLE DE EVENTOS")
                    .small()
                    .color(Color32::from_rgb(71, 85, 105)),
            );
            ui.separator();
            if app.engine.console().is_empty() {
                ui.label(RichText::new("—").weak().monospace());
                return;
            }
            for (i, line) in app.engine.console().entries().enumerate() {
                let color = if i == 0 {
                    Color32::from_rgb(74, 222, 128)
                } else {
                    Color32::from_rgb(100, 116, 139)
                };
                ui.label(RichText::new(format!("▸ {line}")).monospace().color(color));
            }
        });
}

fn sidebar(app: &mut DiagramApp, ctx: &Context) {
    let mut action = InspectorAction::None;
    egui::SidePanel::right("sidebar")
        .exact_width(sidebar_width(ctx.screen_rect().width()))
        .resizable(false)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                detail_panel(ui, &app.catalog, app.selected_node.as_deref());
                ui.separator();
                action = inspector_panel(ui, app.engine.payload(), &app.media);
                if let Some(summary) = app.summary_text() {
                    ui.separator();
                    ui.label(
                        RichText::new("RESUMO DA JORNADA")
                            .small()
                            .color(Color32::from_rgb(71, 85, 105)),
                    );
                    ui.label(RichText::new(summary).italics());
                }
            });
        });
    match action {
        InspectorAction::GenerateVideo => app.request_video(),
        InspectorAction::GenerateImage => app.request_image(),
        InspectorAction::None => {}
    }
}

fn canvas(app: &mut DiagramApp, ctx: &Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        let response = ui.interact(
            rect,
            ui.id().with("diagram_canvas"),
            egui::Sense::click_and_drag(),
        );
        let painter = ui.painter_at(rect);

        handle_pointer(app, ctx, rect, &response);

        painter.rect_filled(rect, 0.0, CANVAS_BG);
        paint_grid(&painter, rect, &app.viewport);
        paint_edges(app, &painter, rect);
        paint_nodes(app, &painter, rect);
        paint_legend(&painter, rect);
        zoom_controls(app, ui, rect);
    });
}

/// One frame of canvas pointer input, taken after egui's widget
/// arbitration. `pressed` is set only when the press belongs to the canvas
/// widget itself, so chrome painted over the canvas (zoom buttons, floating
/// windows) consumes its own presses instead of starting a gesture.
#[derive(Debug, Clone, Copy, Default)]
struct CanvasInput {
    pressed: bool,
    released: bool,
    /// Pointer position in canvas-local coordinates.
    pointer: Option<Pos2>,
    scroll: f32,
}

fn handle_pointer(app: &mut DiagramApp, ctx: &Context, rect: Rect, response: &egui::Response) {
    let (pressed, released, pointer_pos, scroll) = ctx.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.interact_pos(),
            i.raw_scroll_delta.y,
        )
    });
    let input = CanvasInput {
        pressed: pressed && response.is_pointer_button_down_on(),
        released,
        pointer: pointer_pos.map(|pos| pos - rect.min.to_vec2()),
        scroll: if response.hovered() { scroll } else { 0.0 },
    };
    apply_canvas_input(app, input);
}

/// Translate arbitration-filtered pointer input into gesture transitions.
/// A release always reaches the controller so a gesture ends even when the
/// pointer leaves the canvas mid-drag.
fn apply_canvas_input(app: &mut DiagramApp, input: CanvasInput) {
    if input.scroll != 0.0 {
        if let Some(pos) = input.pointer {
            app.viewport.zoom_at(pos, input.scroll * 0.001);
        }
    }

    if input.pressed {
        if let Some(local) = input.pointer {
            let world = app.viewport.to_world(local);
            // The hit borrow ends before pointer_down mutates the
            // controller; positions are captured by value inside.
            let hit = hit_test(&app.layout, app.controller.expanded_node(), world).cloned();
            app.controller.pointer_down(local, hit.as_ref(), &app.viewport);
        }
    }

    if let Some(local) = input.pointer {
        app.controller
            .pointer_move(local, &mut app.viewport, &mut app.layout);
    }

    if input.released {
        if let Some(local) = input.pointer {
            if let GestureOutcome::NodeClicked { id, .. } = app.controller.pointer_up(local) {
                app.selected_node = Some(id);
            }
        }
    }
}

fn paint_grid(painter: &egui::Painter, rect: Rect, viewport: &super::viewport::Viewport) {
    let spacing = 40.0 * viewport.zoom;
    if spacing < 8.0 {
        return;
    }
    let dot = Color32::from_rgb(30, 36, 48);
    let mut x = rect.min.x + viewport.pan.x.rem_euclid(spacing);
    while x < rect.max.x {
        let mut y = rect.min.y + viewport.pan.y.rem_euclid(spacing);
        while y < rect.max.y {
            painter.circle_filled(pos2(x, y), 1.0, dot);
            y += spacing;
        }
        x += spacing;
    }
}

fn paint_edges(app: &DiagramApp, painter: &egui::Painter, rect: Rect) {
    let expanded = app.controller.expanded_node();
    let to_canvas = |world: Pos2| app.viewport.to_screen(world) + rect.min.to_vec2();

    for edge in app.layout.edges() {
        let (Some(from), Some(to)) = (app.layout.node(&edge.from), app.layout.node(&edge.to))
        else {
            continue;
        };
        let from_rect = node_rect(from, expanded == Some(from.id.as_str()));
        let to_rect = node_rect(to, expanded == Some(to.id.as_str()));
        let start = boundary_anchor(from_rect, to_rect.center());
        let end = boundary_anchor(to_rect, from_rect.center());

        let traversing = app.engine.active_edge().is_some_and(|e| e.matches(edge));
        let variant = edge_variant(from.category, to.category, traversing);
        let marker = app
            .edge_anim
            .as_ref()
            .filter(|a| a.edge.matches(edge) && !a.finished())
            .map(|a| a.progress());

        paint_edge(painter, to_canvas(start), to_canvas(end), variant, marker);

        if app.show_payloads {
            if let Some(descriptor) = &edge.payload {
                let mid = to_canvas(edge_midpoint(start, end));
                paint_payload_label(painter, mid, descriptor, traversing, app.viewport.zoom);
            }
        }
    }
}

fn paint_nodes(app: &DiagramApp, painter: &egui::Painter, rect: Rect) {
    let expanded = app.controller.expanded_node();
    // Dragged node paints above the expanded card, which paints above the
    // rest; everything else keeps insertion order.
    let top = app
        .controller
        .dragging_node()
        .or(expanded)
        .map(str::to_string);

    let paint = |node: &crate::model::Node| {
        let is_expanded = expanded == Some(node.id.as_str());
        let world = node_rect(node, is_expanded);
        let screen = Rect::from_min_max(
            app.viewport.to_screen(world.min) + rect.min.to_vec2(),
            app.viewport.to_screen(world.max) + rect.min.to_vec2(),
        );
        let style = category_style(node.category);
        let icon = node_icon(&node.id, node.category);
        let active = app.engine.active_node() == Some(node.id.as_str());
        if is_expanded {
            paint_expanded_node(painter, node, screen, &style, icon, active, app.viewport.zoom);
        } else {
            paint_collapsed_node(painter, node, screen, &style, icon, active, app.viewport.zoom);
        }
    };

    for node in app.layout.nodes() {
        if top.as_deref() != Some(node.id.as_str()) {
            paint(node);
        }
    }
    if let Some(id) = top.as_deref() {
        if let Some(node) = app.layout.node(id) {
            paint(node);
        }
    }
}

fn paint_legend(painter: &egui::Painter, rect: Rect) {
    let categories = [
        NodeCategory::Channel,
        NodeCategory::DomainService,
        NodeCategory::Infrastructure,
        NodeCategory::Organization,
    ];
    let mut anchor = rect.left_bottom() + vec2(14.0, -14.0 - 16.0 * categories.len() as f32);
    for category in categories {
        painter.circle_filled(anchor + vec2(5.0, 5.0), 5.0, legend_color(category));
        painter.text(
            anchor + vec2(16.0, 5.0),
            Align2::LEFT_CENTER,
            category.legend_label(),
            FontId::proportional(11.0),
            Color32::from_rgb(148, 163, 184),
        );
        anchor.y += 16.0;
    }
}

/// Floating zoom buttons in the canvas corner. Button zoom pivots on the
/// canvas center so the view does not jump toward the cursor.
fn zoom_controls(app: &mut DiagramApp, ui: &mut egui::Ui, rect: Rect) {
    let center_local = rect.center() - rect.min.to_vec2();
    let panel = Rect::from_min_size(rect.min + vec2(10.0, 10.0), vec2(140.0, 28.0));
    ui.allocate_new_ui(egui::UiBuilder::new().max_rect(panel), |ui| {
        egui::Frame::menu(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui.small_button("−").clicked() {
                    app.viewport.zoom_at(center_local, -0.2);
                }
                ui.label(
                    RichText::new(format!("{:>3.0}%", app.viewport.zoom * 100.0))
                        .monospace()
                        .color(Color32::from_rgb(148, 163, 184)),
                );
                if ui.small_button("+").clicked() {
                    app.viewport.zoom_at(center_local, 0.2);
                }
                if ui.small_button("⌂").clicked() {
                    app.viewport.reset();
                }
            });
        });
    });
}

fn reauth_modal(app: &mut DiagramApp, ctx: &Context) {
    let Some(dialog) = app.reauth.as_mut() else {
        return;
    };
    let mut apply = false;
    let mut cancel = false;
    egui::Window::new("Credencial expirada")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label("A chave de API foi rejeitada. Informe uma nova chave:");
            ui.add(
                egui::TextEdit::singleline(&mut dialog.key)
                    .password(true)
                    .hint_text("GEMINI_API_KEY"),
            );
            ui.horizontal(|ui| {
                if ui.button("Aplicar").clicked() {
                    apply = true;
                }
                if ui.button("Cancelar").clicked() {
                    cancel = true;
                }
            });
        });
    if apply {
        let key = std::mem::take(&mut app.reauth).map(|d| d.key).unwrap_or_default();
        app.media.set_backend(Arc::new(GeminiClient::new(key)));
        app.engine.log("🔑 Nova credencial aplicada");
    } else if cancel {
        app.reauth = None;
    }
}
