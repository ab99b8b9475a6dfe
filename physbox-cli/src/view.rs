//! Mapping between world meters (y up) and screen points (y down).

use egui::{Pos2, Rect};
use glam::DVec2;

/// World height shown at zoom 1
const VIEW_SPAN_METERS: f32 = 20.0;
const ZOOM_STEP: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// World point drawn at the middle of the canvas
    pub center: DVec2,
    pub zoom: f32,
}

impl Default for View {
    fn default() -> Self {
        Self {
            center: DVec2::new(0.0, 10.0),
            zoom: 1.0,
        }
    }
}

impl View {
    /// Screen points per meter for a canvas
    pub fn scale(&self, canvas: Rect) -> f32 {
        canvas.width().min(canvas.height()) / VIEW_SPAN_METERS * self.zoom
    }

    pub fn world_to_screen(&self, canvas: Rect, p: DVec2) -> Pos2 {
        let scale = self.scale(canvas);
        let offset = p - self.center;
        let c = canvas.center();
        Pos2::new(c.x + offset.x as f32 * scale, c.y - offset.y as f32 * scale)
    }

    pub fn screen_to_world(&self, canvas: Rect, pos: Pos2) -> DVec2 {
        let scale = self.scale(canvas);
        let c = canvas.center();
        self.center
            + DVec2::new(
                ((pos.x - c.x) / scale) as f64,
                ((c.y - pos.y) / scale) as f64,
            )
    }

    pub fn zoom_in(&mut self) {
        self.zoom *= ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.zoom /= ZOOM_STEP;
    }

    /// Keep `target` in the middle of the canvas
    pub fn follow(&mut self, target: DVec2) {
        self.center = target;
    }
}
