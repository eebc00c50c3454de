use loupe_core::config::ReviewConfig;
use loupe_core::surface::SurfaceKey;

use crate::app::LoupeApp;
use crate::messages::{WorkerCommand, WorkerResult};

pub fn show(ctx: &egui::Context, app: &mut LoupeApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Open Image...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    open_file(app);
                }

                let reload_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::R);
                let can_reload = app.ui_state.file_path.is_some();
                if ui.add_enabled(can_reload, egui::Button::new("Reload Detections").shortcut_text(ctx.format_shortcut(&reload_shortcut))).clicked() {
                    ui.close();
                    reload_faces(app);
                }

                ui.separator();

                if ui.button("Import Config...").clicked() {
                    ui.close();
                    import_config(app);
                }

                if ui.button("Export Config...").clicked() {
                    ui.close();
                    export_config(app);
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Fit (A)").clicked() {
                    ui.close();
                    app.main.surface.key_down(SurfaceKey::AutoFit);
                }
                if ui.button("Actual Size (=)").clicked() {
                    ui.close();
                    app.main.surface.key_down(SurfaceKey::ActualSize);
                }
                ui.separator();
                let detached = app.original.surface.is_detached();
                if ui.button(if detached { "Attach Original View (X)" } else { "Detach Original View (X)" }).clicked() {
                    ui.close();
                    app.original.surface.toggle_detached();
                }
                ui.checkbox(&mut app.ui_state.show_original, "Original View Window");
            });

            ui.menu_button("Edit", |ui| {
                if ui.button("Reset Defaults").clicked() {
                    ui.close();
                    app.set_config(ReviewConfig::default());
                    app.ui_state.add_log("Config reset to defaults".into());
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            open_file(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::R))) {
            reload_faces(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

fn open_file(app: &mut LoupeApp) {
    let cmd_tx = app.cmd_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png", "tif", "tiff", "webp", "bmp"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = cmd_tx.send(WorkerCommand::LoadImage { path });
        }
    });
}

fn reload_faces(app: &mut LoupeApp) {
    if let Some(image) = app.ui_state.file_path.clone() {
        app.send_command(WorkerCommand::ReloadFaces { image });
    }
}

fn import_config(app: &mut LoupeApp) {
    let result_tx = app.result_tx.clone();
    std::thread::spawn(move || {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .pick_file()
        else {
            return;
        };
        let result = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| toml::from_str::<ReviewConfig>(&content).map_err(|e| e.to_string()));
        let _ = match result {
            Ok(config) => result_tx.send(WorkerResult::ConfigImported { config }),
            Err(message) => result_tx.send(WorkerResult::Error {
                message: format!("Failed to import {}: {message}", path.display()),
            }),
        };
    });
}

fn export_config(app: &mut LoupeApp) {
    let config = app.config.clone();
    let result_tx = app.result_tx.clone();

    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("TOML", &["toml"])
            .set_file_name("loupe_config.toml")
            .save_file()
        {
            let written = toml::to_string_pretty(&config)
                .map_err(|e| e.to_string())
                .and_then(|content| std::fs::write(&path, content).map_err(|e| e.to_string()));
            let _ = match written {
                Ok(()) => result_tx.send(WorkerResult::Log {
                    message: format!("Config saved to {}", path.display()),
                }),
                Err(message) => result_tx.send(WorkerResult::Error { message }),
            };
        }
    });
}
