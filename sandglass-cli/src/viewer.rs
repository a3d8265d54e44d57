//! Interactive hourglass viewer
//!
//! Draws the boundaries and sand of a scene, tilts gravity with the arrow
//! keys, and rebuilds the scene whenever its JSON file changes on disk.

use eframe::egui;
use glam::Vec2;
use log::{info, warn};
use notify::{Event, RecommendedWatcher, Watcher};
use sandglass_core::Scene;
use std::path::PathBuf;
use std::sync::mpsc;

use crate::load_config;

const SAND: egui::Color32 = egui::Color32::from_rgb(211, 176, 131);

pub fn run(
    scene_path: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([450.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sandglass",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(scene_path, seed, cc)))),
    )?;
    Ok(())
}

/// Hourglass viewer application
pub struct ViewerApp {
    scene_path: Option<PathBuf>,
    /// Canonical form of `scene_path`, as reported by the watcher
    watched_path: Option<PathBuf>,
    seed: Option<u64>,
    scene: Option<Scene>,
    last_load_error: Option<String>,
    playing: bool,
    speed_multiplier: f32,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ViewerApp {
    pub fn new(
        scene_path: Option<PathBuf>,
        seed: Option<u64>,
        _cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut watcher = None;

        if let Some(path) = &scene_path {
            watcher = notify::recommended_watcher(move |res| {
                // The receiver is gone during shutdown
                let _ = tx.send(res);
            })
            .ok();

            if let Some(w) = watcher.as_mut() {
                if let Err(e) = w.watch(path, notify::RecursiveMode::NonRecursive) {
                    warn!("not watching {}: {}", path.display(), e);
                }
            }
        }

        let watched_path = scene_path
            .as_ref()
            .map(|path| path.canonicalize().unwrap_or_else(|_| path.clone()));

        let mut app = Self {
            scene_path,
            watched_path,
            seed,
            scene: None,
            last_load_error: None,
            playing: true,
            speed_multiplier: 1.0,
            file_watcher: watcher,
            file_receiver: rx,
        };

        app.reload_scene();
        app
    }

    fn reload_scene(&mut self) {
        let built = load_config(self.scene_path.as_deref(), self.seed)
            .and_then(|config| Scene::build(&config));

        match built {
            Ok(scene) => {
                self.scene = Some(scene);
                self.last_load_error = None;
            }
            Err(e) => {
                warn!("scene reload failed: {}", e);
                self.last_load_error = Some(format!("{}", e));
                self.scene = None;
                self.playing = false;
            }
        }
    }

    fn check_file_changes(&mut self) {
        let mut needs_reload = false;

        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    paths,
                    ..
                }) => {
                    if let Some(watched) = &self.watched_path {
                        needs_reload |= paths.iter().any(|p| p == watched);
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("file watcher error: {}", e),
            }
        }

        if needs_reload {
            info!("scene file changed, rebuilding");
            self.reload_scene();
        }
    }

    /// Arrow keys give a tilt direction; no keys means straight down
    fn read_tilt(ctx: &egui::Context) -> Vec2 {
        ctx.input(|input| {
            let mut tilt = Vec2::ZERO;
            if input.key_down(egui::Key::ArrowRight) {
                tilt.x += 1.0;
            }
            if input.key_down(egui::Key::ArrowLeft) {
                tilt.x -= 1.0;
            }
            if input.key_down(egui::Key::ArrowDown) {
                tilt.y += 1.0;
            }
            if input.key_down(egui::Key::ArrowUp) {
                tilt.y -= 1.0;
            }
            tilt
        })
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                    self.playing = !self.playing;
                }

                if ui.button("⏮ Reset").clicked() {
                    self.reload_scene();
                }

                if ui.button("⏭ Step").clicked() {
                    if let Some(scene) = self.scene.as_mut() {
                        scene.advance(1.0 / 60.0);
                    }
                }

                ui.separator();
                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.speed_multiplier, 0.1..=4.0));

                if let Some(scene) = &self.scene {
                    ui.separator();
                    ui.label(format!("t = {:.1}s", scene.elapsed));
                }
            });
            ui.label("Use arrow keys to tilt");
        });

        let tilt = Self::read_tilt(ctx);
        let frame_dt = ctx.input(|i| i.stable_dt).min(1.0 / 20.0);

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.max_rect();
            let painter = ui.painter();
            painter.rect_filled(rect, 0.0, egui::Color32::DARK_GRAY);

            if let Some(scene) = self.scene.as_mut() {
                scene.tilt(tilt);

                // Fit the scene's pixel box into the panel
                let config = &scene.config;
                let scale = (rect.width() / config.width).min(rect.height() / config.height);
                let origin = rect.center()
                    - egui::vec2(config.width * scale, config.height * scale) * 0.5;
                let to_screen = |p: Vec2| origin + egui::vec2(p.x * scale, p.y * scale);

                for boundary in scene.world.boundaries() {
                    painter.line_segment(
                        [to_screen(boundary.a), to_screen(boundary.b)],
                        egui::Stroke::new(2.0, egui::Color32::LIGHT_GRAY),
                    );
                }

                let radius = (scene.world.particle_radius * scale).max(1.0);
                for p in scene.state.positions() {
                    painter.circle_filled(to_screen(*p), radius, SAND);
                }
            }

            if let Some(ref error) = self.last_load_error {
                ui.vertical_centered(|ui| {
                    ui.add_space(rect.height() * 0.4);
                    ui.label(
                        egui::RichText::new(format!("Error: {}", error))
                            .color(egui::Color32::RED)
                            .size(16.0),
                    );
                });
            }
        });

        if self.playing {
            if let Some(scene) = self.scene.as_mut() {
                scene.advance(frame_dt * self.speed_multiplier);
            }
            ctx.request_repaint();
        }
    }
}
