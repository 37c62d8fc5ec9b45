#![cfg(feature = "egui")]

use eframe::egui::{Pos2, Vec2};

/// Zoom clamp range. Out-of-range requests are capped silently.
pub const ZOOM_MIN: f32 = 0.4;
pub const ZOOM_MAX: f32 = 3.0;

/// Pan/zoom state of the diagram canvas.
///
/// World→screen mapping is `screen = world * zoom + pan`; `to_world` is the
/// exact inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a world position to screen space.
    pub fn to_screen(&self, world: Pos2) -> Pos2 {
        Pos2::new(
            world.x * self.zoom + self.pan.x,
            world.y * self.zoom + self.pan.y,
        )
    }

    /// Map a screen position back to world space.
    pub fn to_world(&self, screen: Pos2) -> Pos2 {
        Pos2::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Change zoom by `delta` (additive), keeping the world point currently
    /// under `screen` fixed on screen. The resulting zoom is clamped to
    /// `[ZOOM_MIN, ZOOM_MAX]`; clamping caps the effective delta silently.
    pub fn zoom_at(&mut self, screen: Pos2, delta: f32) {
        let new_zoom = (self.zoom + delta).clamp(ZOOM_MIN, ZOOM_MAX);
        if (new_zoom - self.zoom).abs() < f32::EPSILON {
            return;
        }
        let world = self.to_world(screen);
        self.zoom = new_zoom;
        self.pan = screen.to_vec2() - world.to_vec2() * new_zoom;
    }

    /// Reset to identity: pan at origin, zoom 1. Unconditional, regardless
    /// of any gesture in progress.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
