//! Interactive sandbox window.
//!
//! The app owns the World and a command queue. Widgets only push commands;
//! the queue is drained once per frame, right before the fixed-size step.

use crate::forms::{BodyForm, FormError, ObstacleForm};
use crate::view::View;
use crate::watch::SceneWatcher;
use eframe::egui;
use glam::DVec2;
use physbox_core::{
    build_simulation_context, random_body_spec, Applied, Body, BodyId, Color, Command,
    CommandQueue, ObstacleId, Shape as BodyShape, World, WorldError, BODY_DIAMETER, DEFAULT_DT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{info, warn};

/// Minimum pick radius in screen points, scaled by zoom
const PICK_RADIUS: f32 = 15.0;

pub struct ViewOptions {
    pub scene: Option<PathBuf>,
    /// Overrides the scene's `simulate dt`
    pub dt: Option<f64>,
}

enum Dialog {
    Spawn(BodyForm),
    EditBody(BodyId, BodyForm),
    Obstacle(Option<ObstacleId>, ObstacleForm),
    BodyMenu(BodyId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogAction {
    Keep,
    Close,
    Submit,
    Delete,
    Edit,
    ToggleTrack,
}

pub struct SandboxApp {
    world: World,
    commands: CommandQueue,
    dt: f64,
    dt_override: Option<f64>,
    rng: StdRng,
    view: View,
    selected: Option<BodyId>,
    tracking: Option<BodyId>,
    dialog: Option<Dialog>,
    step_once: bool,
    message: Option<String>,
    watcher: Option<SceneWatcher>,
    load_error: Option<String>,
}

impl SandboxApp {
    pub fn new(options: ViewOptions, _cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            world: World::new(),
            commands: CommandQueue::new(),
            dt: options.dt.unwrap_or(DEFAULT_DT),
            dt_override: options.dt,
            rng: StdRng::from_entropy(),
            view: View::default(),
            selected: None,
            tracking: None,
            dialog: None,
            step_once: false,
            message: None,
            watcher: None,
            load_error: None,
        };

        if let Some(path) = options.scene {
            match std::fs::read_to_string(&path) {
                Ok(source) => app.load_scene(&source),
                Err(e) => app.load_error = Some(format!("cannot read {}: {}", path.display(), e)),
            }
            app.watcher = Some(SceneWatcher::new(path));
        }

        app
    }

    fn load_scene(&mut self, source: &str) {
        match build_simulation_context(source) {
            Ok(ctx) => {
                for diagnostic in ctx.diagnostics.iter() {
                    warn!("scene: {}", diagnostic);
                }
                info!(
                    bodies = ctx.world.bodies().len(),
                    obstacles = ctx.world.obstacles().len(),
                    "scene loaded"
                );
                self.world = ctx.world;
                self.dt = self.dt_override.unwrap_or(ctx.simulate.dt);
                self.selected = None;
                self.tracking = None;
                self.dialog = None;
                self.load_error = None;
            }
            Err(e) => {
                // Keep the last good world on screen
                warn!(error = %e, "scene rejected");
                self.load_error = Some(e.to_string());
            }
        }
    }

    fn check_file_changes(&mut self) {
        let Some(watcher) = &self.watcher else {
            return;
        };
        if let Some(source) = watcher.poll() {
            info!(path = %watcher.path().display(), "scene changed, reloading");
            self.load_scene(&source);
        }
    }

    fn reject(&mut self, error: FormError) {
        warn!(error = %error, "rejected form input");
        self.message = Some(format!("Invalid input: {}", error));
    }

    /// Nearest body under a screen position
    fn body_at(&self, canvas: egui::Rect, pos: egui::Pos2) -> Option<BodyId> {
        let radius = (PICK_RADIUS * self.view.zoom).max(self.body_radius(canvas));
        self.world
            .bodies()
            .iter()
            .map(|b| (b.id(), self.view.world_to_screen(canvas, b.position).distance(pos)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Obstacle whose drawn rectangle contains a world point
    fn obstacle_at(&self, point: DVec2) -> Option<ObstacleId> {
        self.world
            .obstacles()
            .iter()
            .find(|o| {
                let offset = (point - o.position).abs();
                offset.x <= o.size.x / 2.0 && offset.y <= o.size.y / 2.0
            })
            .map(|o| o.id())
    }

    fn body_radius(&self, canvas: egui::Rect) -> f32 {
        (BODY_DIAMETER as f32 / 2.0 * self.view.scale(canvas)).max(3.0)
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            if ui.button("Spawn Object").clicked() {
                let spec = random_body_spec(&mut self.rng);
                self.commands.push(Command::AddBody(spec));
            }
            if ui.button("Spawn...").clicked() {
                self.dialog = Some(Dialog::Spawn(BodyForm::default()));
            }
            if ui.button("Add Obstacle...").clicked() {
                self.dialog = Some(Dialog::Obstacle(None, ObstacleForm::default()));
            }

            ui.separator();

            let paused = self.world.is_paused();
            if ui.button(if paused { "▶ Resume" } else { "⏸ Pause" }).clicked() {
                self.commands.push(Command::TogglePaused);
            }
            if ui.add_enabled(paused, egui::Button::new("⏭ Step")).clicked() {
                self.step_once = true;
            }
            if ui.button("⏮ Reset").clicked() {
                self.commands.push(Command::Reset);
            }
            let scene_path = self.watcher.as_ref().map(|w| w.path().to_path_buf());
            if let Some(path) = scene_path {
                if ui.button("Reload").clicked() {
                    match std::fs::read_to_string(&path) {
                        Ok(source) => self.load_scene(&source),
                        Err(e) => self.load_error = Some(e.to_string()),
                    }
                }
            }

            ui.separator();

            if ui.button("−").clicked() {
                self.view.zoom_out();
            }
            ui.label(format!("{:.0}%", self.view.zoom * 100.0));
            if ui.button("+").clicked() {
                self.view.zoom_in();
            }

            ui.separator();

            let mut gravity = self.world.gravity();
            if ui
                .add(egui::Slider::new(&mut gravity, 0.0..=20.0).text("Gravity"))
                .changed()
            {
                self.commands.push(Command::SetGravity(gravity));
            }
            let mut drag = self.world.drag();
            if ui
                .add(egui::Slider::new(&mut drag, 0.0..=1.0).text("Drag"))
                .changed()
            {
                self.commands.push(Command::SetDrag(drag));
            }
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("Time: {:.2} s", self.world.time()));
            ui.separator();
            ui.label(format!("Gravity: {:.2} m/s²", self.world.gravity()));
            ui.separator();
            ui.label(format!("Drag: {:.2}", self.world.drag()));
            ui.separator();
            ui.label(format!("Bodies: {}", self.world.bodies().len()));
            ui.separator();
            ui.label(format!("Total KE: {:.2} J", self.world.total_kinetic_energy()));
            ui.separator();
            ui.label(format!("dt: {:.4} s", self.dt));
        });
    }

    fn body_panel(ui: &mut egui::Ui, body: &Body, gravity: f64, tracked: bool) {
        ui.heading(format!("{} ({})", body.id(), body.shape));
        if tracked {
            ui.label(egui::RichText::new("tracking").color(egui::Color32::GREEN));
        }
        ui.separator();
        egui::Grid::new("body_stats").num_columns(2).show(ui, |ui| {
            let momentum = body.momentum();
            let rows = [
                ("Mass", format!("{:.3} kg", body.mass())),
                ("Position", format!("({:.2}, {:.2}) m", body.position.x, body.position.y)),
                ("Velocity", format!("({:.2}, {:.2}) m/s", body.velocity.x, body.velocity.y)),
                ("Kinetic energy", format!("{:.3} J", body.kinetic_energy())),
                ("Potential energy", format!("{:.3} J", body.potential_energy(gravity))),
                ("Momentum", format!("({:.2}, {:.2}) kg·m/s", momentum.x, momentum.y)),
                ("Work done", format!("{:.3} J", body.work_done())),
                ("Elasticity", format!("{:.2}", body.elasticity)),
            ];
            for (name, value) in rows {
                ui.label(name);
                ui.label(value);
                ui.end_row();
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, egui::Color32::from_gray(24));

        let ground = self.view.world_to_screen(rect, DVec2::ZERO).y;
        if ground < rect.bottom() {
            painter.rect_filled(
                egui::Rect::from_min_max(
                    egui::pos2(rect.left(), ground.max(rect.top())),
                    rect.right_bottom(),
                ),
                0.0,
                egui::Color32::from_gray(40),
            );
            painter.line_segment(
                [egui::pos2(rect.left(), ground), egui::pos2(rect.right(), ground)],
                egui::Stroke::new(2.0, egui::Color32::from_gray(160)),
            );
        }

        for obstacle in self.world.obstacles() {
            let half = obstacle.size / 2.0;
            let a = self.view.world_to_screen(rect, obstacle.position - half);
            let b = self.view.world_to_screen(rect, obstacle.position + half);
            painter.rect_filled(egui::Rect::from_two_pos(a, b), 0.0, egui::Color32::GRAY);
        }

        let radius = self.body_radius(rect);
        for body in self.world.bodies() {
            let color = color32(body.color);
            let trail: Vec<egui::Pos2> = body
                .trail()
                .map(|p| self.view.world_to_screen(rect, p))
                .collect();
            if trail.len() >= 2 {
                painter.add(egui::Shape::line(
                    trail,
                    egui::Stroke::new(1.0, color.gamma_multiply(0.5)),
                ));
            }

            let center = self.view.world_to_screen(rect, body.position);
            draw_body(&painter, body, center, radius, color);

            if self.selected == Some(body.id()) {
                painter.circle_stroke(center, radius + 4.0, egui::Stroke::new(2.0, egui::Color32::RED));
            }
            if self.tracking == Some(body.id()) {
                painter.circle_stroke(center, radius + 8.0, egui::Stroke::new(2.0, egui::Color32::GREEN));
            }
        }

        let Some(pointer) = response.interact_pointer_pos() else {
            return;
        };
        if response.double_clicked() {
            if let Some(id) = self.body_at(rect, pointer) {
                self.selected = Some(id);
                self.dialog = Some(Dialog::BodyMenu(id));
            }
        } else if response.clicked() {
            self.selected = self.body_at(rect, pointer);
        } else if response.secondary_clicked() {
            let point = self.view.screen_to_world(rect, pointer);
            if let Some(id) = self.body_at(rect, pointer) {
                self.selected = Some(id);
                self.dialog = Some(Dialog::BodyMenu(id));
            } else if let Some(id) = self.obstacle_at(point) {
                let form = self
                    .world
                    .obstacle(id)
                    .map(ObstacleForm::from_obstacle)
                    .unwrap_or_default();
                self.dialog = Some(Dialog::Obstacle(Some(id), form));
            } else {
                let form = ObstacleForm::from_spec(physbox_core::ObstacleSpec {
                    position: point,
                    ..Default::default()
                });
                self.dialog = Some(Dialog::Obstacle(None, form));
            }
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context) {
        let Some(mut dialog) = self.dialog.take() else {
            return;
        };
        let mut open = true;
        let mut action = DialogAction::Keep;

        match &mut dialog {
            Dialog::Spawn(form) => {
                egui::Window::new("Spawn Object")
                    .open(&mut open)
                    .collapsible(false)
                    .resizable(false)
                    .show(ctx, |ui| {
                        body_form_ui(ui, form);
                        ui.horizontal(|ui| {
                            if ui.button("Spawn").clicked() {
                                action = DialogAction::Submit;
                            }
                            if ui.button("Cancel").clicked() {
                                action = DialogAction::Close;
                            }
                        });
                    });
            }
            Dialog::EditBody(id, form) => {
                egui::Window::new(format!("Edit {}", id))
                    .open(&mut open)
                    .collapsible(false)
                    .resizable(false)
                    .show(ctx, |ui| {
                        body_form_ui(ui, form);
                        ui.horizontal(|ui| {
                            if ui.button("Apply").clicked() {
                                action = DialogAction::Submit;
                            }
                            if ui.button("Cancel").clicked() {
                                action = DialogAction::Close;
                            }
                        });
                    });
            }
            Dialog::Obstacle(id, form) => {
                let title = match id {
                    Some(id) => format!("Edit {}", id),
                    None => "Add Obstacle".to_string(),
                };
                let existing = id.is_some();
                egui::Window::new(title)
                    .open(&mut open)
                    .collapsible(false)
                    .resizable(false)
                    .show(ctx, |ui| {
                        egui::Grid::new("obstacle_form").num_columns(2).show(ui, |ui| {
                            for (label, text) in [
                                ("X Position", &mut form.x),
                                ("Y Position", &mut form.y),
                                ("Width", &mut form.width),
                                ("Height", &mut form.height),
                            ] {
                                ui.label(label);
                                ui.text_edit_singleline(text);
                                ui.end_row();
                            }
                        });
                        ui.horizontal(|ui| {
                            if ui.button(if existing { "Apply" } else { "Add" }).clicked() {
                                action = DialogAction::Submit;
                            }
                            if existing && ui.button("Delete").clicked() {
                                action = DialogAction::Delete;
                            }
                            if ui.button("Cancel").clicked() {
                                action = DialogAction::Close;
                            }
                        });
                    });
            }
            Dialog::BodyMenu(id) => {
                let tracked = self.tracking == Some(*id);
                egui::Window::new(id.to_string())
                    .open(&mut open)
                    .collapsible(false)
                    .resizable(false)
                    .show(ctx, |ui| {
                        ui.vertical(|ui| {
                            if ui.button("Edit Properties").clicked() {
                                action = DialogAction::Edit;
                            }
                            if ui.button("Delete").clicked() {
                                action = DialogAction::Delete;
                            }
                            if ui.button(if tracked { "Untrack" } else { "Track" }).clicked() {
                                action = DialogAction::ToggleTrack;
                            }
                        });
                    });
            }
        }

        if !open {
            action = DialogAction::Close;
        }
        self.dialog = self.finish_dialog(dialog, action);
    }

    /// Turn a dialog action into commands. Returns the dialog to show next frame.
    fn finish_dialog(&mut self, dialog: Dialog, action: DialogAction) -> Option<Dialog> {
        match (dialog, action) {
            (dialog, DialogAction::Keep) => Some(dialog),
            (_, DialogAction::Close) => None,

            (Dialog::Spawn(form), DialogAction::Submit) => {
                match form.to_spec(Color::random(&mut self.rng)) {
                    Ok(spec) => {
                        self.commands.push(Command::AddBody(spec));
                        None
                    }
                    Err(e) => {
                        self.reject(e);
                        Some(Dialog::Spawn(form))
                    }
                }
            }
            (Dialog::EditBody(id, form), DialogAction::Submit) => match form.to_edit() {
                Ok(edit) => {
                    self.commands.push(Command::EditBody(id, edit));
                    None
                }
                Err(e) => {
                    self.reject(e);
                    Some(Dialog::EditBody(id, form))
                }
            },
            (Dialog::Obstacle(id, form), DialogAction::Submit) => match form.to_spec() {
                Ok(spec) => {
                    self.commands.push(match id {
                        Some(id) => Command::EditObstacle(id, spec),
                        None => Command::AddObstacle(spec),
                    });
                    None
                }
                Err(e) => {
                    self.reject(e);
                    Some(Dialog::Obstacle(id, form))
                }
            },
            (Dialog::Obstacle(Some(id), _), DialogAction::Delete) => {
                self.commands.push(Command::RemoveObstacle(id));
                None
            }

            (Dialog::BodyMenu(id), DialogAction::Edit) => self
                .world
                .body(id)
                .map(|body| Dialog::EditBody(id, BodyForm::from_body(body))),
            (Dialog::BodyMenu(id), DialogAction::Delete) => {
                self.commands.push(Command::RemoveBody(id));
                None
            }
            (Dialog::BodyMenu(id), DialogAction::ToggleTrack) => {
                self.tracking = if self.tracking == Some(id) { None } else { Some(id) };
                None
            }

            (dialog, _) => Some(dialog),
        }
    }

    fn advance(&mut self) {
        let results = self.commands.apply(&mut self.world);
        if let Some(message) = first_failure(&results) {
            self.message = Some(message);
        }

        // Drop handles to bodies that no longer exist
        if self.selected.is_some_and(|id| self.world.body(id).is_none()) {
            self.selected = None;
        }
        if self.tracking.is_some_and(|id| self.world.body(id).is_none()) {
            self.tracking = None;
        }
        if let Some(Dialog::BodyMenu(id) | Dialog::EditBody(id, _)) = &self.dialog {
            if self.world.body(*id).is_none() {
                self.dialog = None;
            }
        }

        if std::mem::take(&mut self.step_once) && self.world.is_paused() {
            self.world.set_paused(false);
            self.world.step(self.dt);
            self.world.set_paused(true);
        } else {
            self.world.step(self.dt);
        }

        if let Some(body) = self.tracking.and_then(|id| self.world.body(id)) {
            self.view.follow(body.position);
        }
    }
}

impl eframe::App for SandboxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            self.top_bar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.status_bar(ui);
            let mut dismiss = false;
            if let Some(message) = &self.message {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(message).color(egui::Color32::YELLOW));
                    dismiss = ui.small_button("✕").clicked();
                });
            }
            if dismiss {
                self.message = None;
            }
            if let Some(error) = &self.load_error {
                ui.label(
                    egui::RichText::new(format!("Error: {}", error)).color(egui::Color32::RED),
                );
            }
        });

        if let Some(body) = self.selected.and_then(|id| self.world.body(id)) {
            let gravity = self.world.gravity();
            let tracked = self.tracking == Some(body.id());
            egui::SidePanel::right("selected_body")
                .resizable(false)
                .show(ctx, |ui| Self::body_panel(ui, body, gravity, tracked));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas(ui));

        self.show_dialog(ctx);
        self.advance();

        ctx.request_repaint();
    }
}

/// Message for the first command the world refused, if any
fn first_failure(results: &[Result<Applied, WorldError>]) -> Option<String> {
    results
        .iter()
        .find_map(|r| r.as_ref().err())
        .map(|e| format!("Command failed: {}", e))
}

fn color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

fn draw_body(painter: &egui::Painter, body: &Body, center: egui::Pos2, radius: f32, color: egui::Color32) {
    match body.shape {
        BodyShape::Circle => {
            painter.circle_filled(center, radius, color);
        }
        BodyShape::Square => {
            painter.rect_filled(
                egui::Rect::from_center_size(center, egui::vec2(radius * 2.0, radius * 2.0)),
                0.0,
                color,
            );
        }
        BodyShape::Triangle => {
            let points = vec![
                center + egui::vec2(0.0, -radius),
                center + egui::vec2(-radius, radius),
                center + egui::vec2(radius, radius),
            ];
            painter.add(egui::Shape::convex_polygon(points, color, egui::Stroke::NONE));
        }
        BodyShape::Arrow => {
            // Points along the velocity; screen y is flipped
            let v = egui::vec2(body.velocity.x as f32, -body.velocity.y as f32);
            let dir = if v.length() > 1e-6 {
                v.normalized()
            } else {
                egui::vec2(0.0, -1.0)
            };
            painter.arrow(center - dir * radius, dir * radius * 2.0, egui::Stroke::new(2.0, color));
        }
    }
}

fn body_form_ui(ui: &mut egui::Ui, form: &mut BodyForm) {
    egui::Grid::new("body_form").num_columns(2).show(ui, |ui| {
        for (label, text) in [
            ("Mass", &mut form.mass),
            ("X Position", &mut form.x),
            ("Y Position", &mut form.y),
            ("X Velocity", &mut form.vx),
            ("Y Velocity", &mut form.vy),
        ] {
            ui.label(label);
            ui.text_edit_singleline(text);
            ui.end_row();
        }
        ui.label("Elasticity");
        ui.add(egui::Slider::new(&mut form.elasticity, 0.0..=1.0));
        ui.end_row();
    });
    egui::ComboBox::from_label("Shape")
        .selected_text(form.shape.name())
        .show_ui(ui, |ui| {
            for shape in BodyShape::ALL {
                ui.selectable_value(&mut form.shape, shape, shape.name());
            }
        });
}
