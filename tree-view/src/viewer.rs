//! 3D tree viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the generated [`Scene`], the
//! configuration it was generated from and an [`OrbitCamera`], and implements
//! [`eframe::App`] to draw the scene and edit its parameters.

use eframe::App;
use rand::{SeedableRng, rngs::StdRng};
use tree_core::{
    config::SceneConfig,
    error::TreeError,
    scene::{Rgb, Scene},
};

use crate::camera::OrbitCamera;

/// Main application state for the viewer.
///
/// ### Fields
/// - `scene` - Geometry currently on screen.
/// - `cfg` - Parameters edited in the side panel; applied on rebuild.
/// - `seed` - Seed of the random source that produced `scene`.
///
/// - `camera` - View transform used for projection.
/// - `needs_fit` - Whether the camera should be re-framed on the next frame.
///
/// - `last_error` - Message from the last rejected rebuild, if any.
pub struct Viewer {
    scene: Scene,
    cfg: SceneConfig,
    seed: u64,

    camera: OrbitCamera,
    needs_fit: bool,

    last_error: Option<String>,
}

/// One drawable element with its view depth.
enum Primitive {
    Point {
        pos: egui::Pos2,
        radius: f32,
        color: egui::Color32,
    },
    Line {
        a: egui::Pos2,
        b: egui::Pos2,
        stroke: egui::Stroke,
    },
}

fn color(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

impl Viewer {
    /// Generates the first scene from `cfg`.
    ///
    /// ### Parameters
    /// - `cfg` - Scene parameters.
    /// - `seed` - Fixed seed for the random source; a fresh one is drawn
    ///   from the thread RNG when `None`.
    ///
    /// ### Returns
    /// A ready [`Viewer`], or the validation error for `cfg`.
    pub fn new(cfg: SceneConfig, seed: Option<u64>) -> Result<Self, TreeError> {
        let seed = seed.unwrap_or_else(rand::random);
        let scene = Scene::generate(&cfg, &mut StdRng::seed_from_u64(seed))?;
        tracing::info!(seed, "initial scene ready");

        Ok(Self {
            scene,
            cfg,
            seed,
            camera: OrbitCamera::default(),
            needs_fit: true,
            last_error: None,
        })
    }

    /// Regenerates the scene from the current config and `seed`.
    ///
    /// On a rejected config the previous scene stays on screen and the
    /// error is kept for the status bar.
    fn rebuild(&mut self, seed: u64) {
        match Scene::generate(&self.cfg, &mut StdRng::seed_from_u64(seed)) {
            Ok(scene) => {
                self.scene = scene;
                self.seed = seed;
                self.needs_fit = true;
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!("rebuild failed: {e}");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Rebuilds with a freshly drawn seed.
    fn reroll(&mut self) {
        self.rebuild(rand::random());
    }

    /// Projects every part of the scene and sorts the result back to front.
    fn primitives(&self, rect: egui::Rect) -> Vec<(f32, Primitive)> {
        let style = &self.scene.style;
        let cam = &self.camera;
        let mut out = Vec::with_capacity(
            self.scene.seed.len()
                + self.scene.trunk.len()
                + self.scene.branches.len()
                + self.scene.canopy.len(),
        );

        let clouds = [
            (&self.scene.seed.points, style.seed),
            (&self.scene.trunk.points, style.trunk),
            (&self.scene.canopy.points, style.canopy),
        ];
        for (points, marker) in clouds {
            let c = color(marker.color);
            for &p in points {
                let (pos, depth) = cam.project(p, rect);
                out.push((
                    depth,
                    Primitive::Point {
                        pos,
                        radius: marker.size * 0.5,
                        color: c,
                    },
                ));
            }
        }

        let stroke = egui::Stroke::new(style.branch_width, color(style.branch_color));
        for seg in self.scene.branches.segments() {
            let (a, da) = cam.project(seg.start, rect);
            let (b, db) = cam.project(seg.end, rect);
            out.push(((da + db) * 0.5, Primitive::Line { a, b, stroke }));
        }

        out.sort_by(|x, y| x.0.total_cmp(&y.0));
        out
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `u32` [`egui::DragValue`].
    fn labeled_drag_u32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (rebuild controls, view reset).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("🎲 New seed").clicked() {
                    self.reroll();
                }

                if ui.button("Rebuild").clicked() {
                    self.rebuild(self.seed);
                }

                ui.separator();

                if ui.button("Reset view").clicked() {
                    self.camera.reset_view();
                    self.needs_fit = true;
                }
            });
        });
    }

    /// Builds the bottom status bar (seed, primitive counts, errors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("seed = {}", self.seed));
                ui.separator();
                ui.label(format!("canopy = {}", self.scene.canopy.len()));
                ui.label(format!(
                    "segments = {} ({} tips)",
                    self.scene.branches.len(),
                    self.scene.branches.tips().count()
                ));
                ui.label(format!("trunk = {}", self.scene.trunk.len()));
                ui.label(format!("seed spiral = {}", self.scene.seed.len()));

                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
                }
            });
        });
    }

    /// Builds the right-hand panel for generation parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                let curves = [
                    ("Seed spiral", &mut self.cfg.seed_spiral),
                    ("Trunk", &mut self.cfg.trunk),
                ];
                for (title, curve) in curves {
                    ui.separator();
                    ui.label(title);
                    Self::labeled_drag_usize(ui, "samples:", &mut curve.samples, 0..=5000, 1.0);
                    Self::labeled_drag_f32(ui, "height:", &mut curve.height, 0.0..=50.0, 0.05);
                    Self::labeled_drag_f32(ui, "radius:", &mut curve.radius, 0.0..=10.0, 0.01);
                    Self::labeled_drag_f32(ui, "turns:", &mut curve.turns, 0.0..=50.0, 0.1);
                }

                ui.separator();
                ui.label("Branches");
                let b = &mut self.cfg.branches;
                Self::labeled_drag_u32(ui, "depth:", &mut b.depth, 0..=10, 0.05);
                Self::labeled_drag_f32(ui, "length:", &mut b.length, 0.0..=10.0, 0.05);
                Self::labeled_drag_f32(ui, "decay:", &mut b.decay, 0.0..=1.0, 0.01);
                Self::labeled_drag_f32(ui, "spread:", &mut b.spread, -3.2..=3.2, 0.01);
                Self::labeled_drag_f32(ui, "jitter:", &mut b.jitter, 0.0..=1.0, 0.005);
                Self::labeled_drag_f32(ui, "origin.z:", &mut b.origin.z, -20.0..=50.0, 0.05);

                ui.separator();
                ui.label("Canopy");
                let c = &mut self.cfg.canopy;
                Self::labeled_drag_usize(ui, "points:", &mut c.points, 0..=20_000, 5.0);
                Self::labeled_drag_f32(ui, "radius:", &mut c.radius, 0.0..=10.0, 0.02);
                Self::labeled_drag_f32(ui, "center.z:", &mut c.center.z, -20.0..=50.0, 0.05);

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = SceneConfig::default();
                }
            });
    }

    /// Builds the central canvas where the scene is drawn and orbited.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            if self.needs_fit {
                if let Some(bounds) = self.scene.bounds() {
                    self.camera.fit(&bounds, rect);
                }
                self.needs_fit = false;
            }

            // Orbit with the primary button, pan with the secondary one.
            if response.dragged_by(egui::PointerButton::Primary) {
                self.camera.orbit(response.drag_delta());
            } else if response.dragged_by(egui::PointerButton::Secondary) {
                self.camera.pan += response.drag_delta();
            }

            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let anchor = response.hover_pos().unwrap_or(rect.center());
                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.camera.zoom_at(factor, anchor, rect);
            }

            painter.rect_filled(rect, 0.0, color(self.scene.style.background));

            for (_, prim) in self.primitives(rect) {
                match prim {
                    Primitive::Point { pos, radius, color } => {
                        painter.circle_filled(pos, radius, color);
                    }
                    Primitive::Line { a, b, stroke } => {
                        painter.line_segment([a, b], stroke);
                    }
                }
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
