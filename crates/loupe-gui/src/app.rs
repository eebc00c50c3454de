use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

use loupe_core::config::ReviewConfig;
use loupe_core::events::{EventBus, EventKind, ReviewEvent};
use loupe_core::geometry::Size;
use loupe_core::surface::ReviewSurface;
use loupe_core::timing::SystemClock;
use tracing::trace;

use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::states::{UIState, ViewportState};
use crate::worker;

pub struct LoupeApp {
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub ui_state: UIState,
    pub config: ReviewConfig,
    pub texture: Option<egui::TextureHandle>,
    pub main: ViewportState,
    pub original: ViewportState,
    pub show_about: bool,
    bus: EventBus,
    /// Status lines produced by bus subscribers.
    notices: Rc<RefCell<Vec<String>>>,
}

impl LoupeApp {
    pub fn new(ctx: &egui::Context) -> std::io::Result<Self> {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = worker::spawn_worker(result_tx.clone(), ctx.clone())?;

        let config = ReviewConfig::default();
        let (main, original) = ViewportState::pair(&config);

        let mut bus = EventBus::new();
        main.connect(&mut bus);
        original.connect(&mut bus);
        let notices = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&notices);
        bus.subscribe(EventKind::DetachToggled, move |event| {
            if let ReviewEvent::DetachToggled { detached } = event {
                let state = if *detached { "detached" } else { "attached" };
                sink.borrow_mut().push(format!("View sync {state}"));
            }
        });

        let mut app = Self {
            cmd_tx,
            result_tx,
            result_rx,
            ui_state: UIState::default(),
            config,
            texture: None,
            main,
            original,
            show_about: false,
            bus,
            notices,
        };
        app.apply_toggles();
        Ok(app)
    }

    pub fn surfaces_mut(&mut self) -> [&mut ReviewSurface<SystemClock>; 2] {
        [&mut self.main.surface, &mut self.original.surface]
    }

    /// Publish a collaborator event and let the subscribed surfaces apply it.
    pub fn broadcast(&mut self, event: &ReviewEvent) {
        let delivered = self.bus.publish(event);
        trace!(kind = %event.kind(), delivered, "Event published");
        self.main.apply_delivered();
        self.original.apply_delivered();
    }

    /// Push the review toggles from the UI state into both surfaces.
    pub fn apply_toggles(&mut self) {
        let auto_center = self.ui_state.auto_center;
        let single_face = self.ui_state.single_face;
        let show_annotations = self.ui_state.show_annotations;
        for surface in self.surfaces_mut() {
            surface.set_auto_center(auto_center);
            surface.set_single_face_mode(single_face);
            surface.set_annotations_visible(show_annotations);
        }
    }

    pub fn set_config(&mut self, config: ReviewConfig) {
        for surface in self.surfaces_mut() {
            surface.set_config(config.clone());
        }
        self.config = config;
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::ImageLoaded { path, image } => {
                    let size = image.size;
                    self.texture = Some(ctx.load_texture(
                        "review-image",
                        image,
                        egui::TextureOptions::LINEAR,
                    ));
                    self.broadcast(&ReviewEvent::ImageLoaded {
                        path: path.clone(),
                        dimensions: Size::new(size[0] as f64, size[1] as f64),
                    });
                    self.ui_state.add_log(format!(
                        "Opened: {} ({}x{})",
                        path.display(),
                        size[0],
                        size[1]
                    ));
                    self.ui_state.image_size = Some(size);
                    self.ui_state.file_path = Some(path);
                }
                WorkerResult::ImageFailed { path, message } => {
                    self.broadcast(&ReviewEvent::ImageFailed {
                        path: path.clone(),
                        reason: message.clone(),
                    });
                    self.ui_state
                        .add_log(format!("ERROR: Failed to open {}: {message}", path.display()));
                }
                WorkerResult::FacesLoaded { faces } => {
                    self.ui_state.add_log(format!("{} faces detected", faces.len()));
                    self.broadcast(&ReviewEvent::FacesDetected { faces });
                }
                WorkerResult::ConfigImported { config } => match config.validate() {
                    Ok(()) => {
                        self.set_config(config);
                        self.ui_state.add_log("Config imported".into());
                    }
                    Err(e) => self.ui_state.add_log(format!("ERROR: {e}")),
                },
                WorkerResult::Error { message } => {
                    self.ui_state.add_log(format!("ERROR: {message}"));
                }
                WorkerResult::Log { message } => {
                    self.ui_state.add_log(message);
                }
            }
        }
    }

    pub fn send_command(&self, cmd: WorkerCommand) {
        let _ = self.cmd_tx.send(cmd);
    }

    /// Publish what the surfaces produced this frame; the peer picks up
    /// sync snapshots on its next frame.
    fn route_sync(&mut self, ctx: &egui::Context) {
        let mut sent = false;
        for view in [&mut self.main, &mut self.original] {
            for event in view.surface.take_events() {
                sent |= event.kind() == EventKind::SyncView;
                self.bus.publish(&event);
            }
        }
        let lines: Vec<String> = self.notices.borrow_mut().drain(..).collect();
        for line in lines {
            self.ui_state.add_log(line);
        }
        if sent {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for LoupeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::faces::show(ctx, self);
        panels::viewport::show(ctx, self);
        panels::viewport::show_original(ctx, self);
        self.route_sync(ctx);

        // About dialog
        if self.show_about {
            egui::Window::new("About Loupe")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Loupe");
                        ui.label("Face annotation review");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
