//! Orthographic orbit camera mapping scene coordinates onto the canvas.

use glam::{Mat3, Vec3};
use tree_core::scene::Bounds;

/// Default view direction, in degrees, matching the usual 3-D plot framing.
pub const DEFAULT_AZIMUTH: f32 = -60.0;
pub const DEFAULT_ELEVATION: f32 = 30.0;

/// Zoom limits, in screen points per world unit.
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 5000.0;

/// Looks at `target` from a direction given by azimuth (around +z, from +x)
/// and elevation (above the xy-plane). World +z is always screen-up.
#[derive(Clone, Copy, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Degrees.
    pub azimuth: f32,
    /// Degrees, kept within `[-90, 90]`.
    pub elevation: f32,
    /// Screen points per world unit.
    pub zoom: f32,
    /// Screen-space offset of `target` from the canvas center.
    pub pan: egui::Vec2,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            azimuth: DEFAULT_AZIMUTH,
            elevation: DEFAULT_ELEVATION,
            zoom: 50.0,
            pan: egui::Vec2::ZERO,
        }
    }
}

impl OrbitCamera {
    /// Columns are the screen-right, screen-up and towards-viewer axes in
    /// world space.
    fn basis(&self) -> Mat3 {
        let (sa, ca) = self.azimuth.to_radians().sin_cos();
        let (se, ce) = self.elevation.to_radians().sin_cos();

        let right = Vec3::new(-sa, ca, 0.0);
        let up = Vec3::new(-se * ca, -se * sa, ce);
        let toward = Vec3::new(ce * ca, ce * sa, se);
        Mat3::from_cols(right, up, toward)
    }

    /// Maps a world point to a canvas position and a view depth.
    ///
    /// Larger depth is closer to the viewer.
    pub fn project(&self, p: Vec3, rect: egui::Rect) -> (egui::Pos2, f32) {
        let v = self.basis().transpose() * (p - self.target);
        let center = rect.center() + self.pan;
        let screen = egui::pos2(center.x + v.x * self.zoom, center.y - v.y * self.zoom);
        (screen, v.z)
    }

    /// Inverse of [`OrbitCamera::project`] for a known depth.
    pub fn unproject(&self, p: egui::Pos2, depth: f32, rect: egui::Rect) -> Vec3 {
        let center = rect.center() + self.pan;
        let v = Vec3::new(
            (p.x - center.x) / self.zoom,
            (center.y - p.y) / self.zoom,
            depth,
        );
        self.target + self.basis() * v
    }

    /// Rotates the view by a screen drag.
    pub fn orbit(&mut self, drag: egui::Vec2) {
        self.azimuth = (self.azimuth - drag.x * 0.4).rem_euclid(360.0);
        self.elevation = (self.elevation + drag.y * 0.4).clamp(-90.0, 90.0);
    }

    /// Zooms by `factor` while keeping the world point under `anchor` fixed.
    pub fn zoom_at(&mut self, factor: f32, anchor: egui::Pos2, rect: egui::Rect) {
        let (_, depth) = self.project(self.target, rect);
        let before = self.unproject(anchor, depth, rect);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let (after, _) = self.project(before, rect);
        self.pan += anchor - after;
    }

    /// Centers `bounds` in `rect` and scales them to fill most of it.
    pub fn fit(&mut self, bounds: &Bounds, rect: egui::Rect) {
        self.target = bounds.center();
        self.pan = egui::Vec2::ZERO;

        let extent = bounds.size().length().max(1e-3);
        let side = rect.width().min(rect.height()).max(1.0);
        self.zoom = (0.9 * side / extent).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn reset_view(&mut self) {
        self.azimuth = DEFAULT_AZIMUTH;
        self.elevation = DEFAULT_ELEVATION;
    }
}
