#![cfg(feature = "egui")]

use std::sync::Arc;

use anyhow::Result;
use eframe::egui;

use crate::catalog::Catalog;
use crate::layout::LayoutStore;
use crate::media::{AspectRatio, GenerativeBackend, ImageSize, MediaKind, MediaSession};
use crate::script::validate_script;
use crate::sim::{SimPhase, SimulationEngine};

use super::interaction::InteractionController;
use super::render::EdgeAnimation;
use super::viewport::Viewport;

/// Modal state for the one-shot re-authentication prompt.
#[derive(Debug, Clone, Default)]
pub struct ReauthDialog {
    pub key: String,
}

/// Interactive egui application showing the platform diagram and driving
/// the scripted walkthrough.
pub struct DiagramApp {
    pub catalog: Catalog,
    pub layout: LayoutStore,
    pub viewport: Viewport,
    pub controller: InteractionController,
    pub engine: SimulationEngine,
    pub media: MediaSession,
    /// Global toggle for payload chips on edges, independent of the
    /// simulation state.
    pub show_payloads: bool,
    /// Node shown in the detail side panel (selection, not expansion).
    pub selected_node: Option<String>,
    pub edge_anim: Option<EdgeAnimation>,
    pub reauth: Option<ReauthDialog>,
}

impl DiagramApp {
    /// Create the app over a validated catalog. Fails fast on dangling
    /// references in the catalog or the generated script.
    pub fn new(
        catalog: Catalog,
        region: &str,
        backend: Arc<dyn GenerativeBackend>,
    ) -> Result<Self> {
        catalog.validate()?;
        let engine = SimulationEngine::new(region);
        validate_script(&catalog, engine.steps())?;
        let layout = LayoutStore::from_catalog(&catalog);
        Ok(Self {
            catalog,
            layout,
            viewport: Viewport::new(),
            controller: InteractionController::new(),
            engine,
            media: MediaSession::new(backend),
            show_payloads: true,
            selected_node: None,
            edge_anim: None,
            reauth: None,
        })
    }

    /// Start a run. Discards any generated media from a previous run so a
    /// late response cannot resurrect old state.
    pub fn start_run(&mut self) {
        if self.engine.is_running() {
            return;
        }
        self.media.invalidate();
        self.engine.start();
        self.retrigger_animation();
    }

    pub fn advance_run(&mut self) {
        self.engine.advance();
        self.retrigger_animation();
    }

    pub fn reset_run(&mut self) {
        self.engine.reset();
        self.media.invalidate();
        self.edge_anim = None;
    }

    /// Switch the region; the script rebuilds wholesale and a run in
    /// progress resets.
    pub fn set_region(&mut self, region: &str) {
        if region == self.engine.region() {
            return;
        }
        self.engine.set_region(region);
        self.media.invalidate();
        self.edge_anim = None;
    }

    /// Restart the traversal marker when the current step carries an edge.
    fn retrigger_animation(&mut self) {
        self.edge_anim = self
            .engine
            .active_edge()
            .cloned()
            .map(EdgeAnimation::new);
    }

    /// Kick off video generation for the current step (single-flight; a
    /// no-op when a request is already pending).
    pub fn request_video(&mut self) {
        let subject = self
            .engine
            .payload()
            .map(|p| p.title.clone())
            .unwrap_or_else(|| "data platform event flow".to_string());
        let prompt = format!(
            "Cinematic visualization of a food-delivery data platform: {subject}. \
             Abstract glowing data streams between services, dark background."
        );
        self.media
            .request_video(prompt, None, AspectRatio::Wide16x9);
    }

    /// Kick off still-image generation for the current step, same
    /// single-flight contract as video.
    pub fn request_image(&mut self) {
        let subject = self
            .engine
            .payload()
            .map(|p| p.title.clone())
            .unwrap_or_else(|| "data platform architecture".to_string());
        let prompt = format!(
            "Editorial illustration of a food-delivery data platform: {subject}. \
             Flat dark style with red accents."
        );
        self.media.request_image(prompt, ImageSize::K1);
    }

    /// Request an AI narrative summary of the completed run.
    pub fn request_summary(&mut self) {
        if self.engine.phase() != SimPhase::Completed {
            return;
        }
        let context = self
            .engine
            .steps()
            .iter()
            .map(|s| s.log.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.media.request_text(
            "Summarize this order's end-to-end journey through the platform.".to_string(),
            context,
        );
    }

    /// Text summary artifact, once ready.
    pub fn summary_text(&self) -> Option<String> {
        match self.media.artifact(MediaKind::Text) {
            Some(crate::media::MediaArtifact::Text(t)) => Some(t),
            _ => None,
        }
    }
}

impl eframe::App for DiagramApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        super::ui::update(self, ctx, _frame);
    }
}
