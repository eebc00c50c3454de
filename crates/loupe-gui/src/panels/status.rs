use crate::app::LoupeApp;

pub fn show(ctx: &egui::Context, app: &mut LoupeApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        // Log area, fixed height for 4 lines, scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    // Reserve space for 4 empty lines to prevent layout jump.
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        // Status line
        ui.horizontal(|ui| {
            if let Some(ref size) = app.ui_state.image_size {
                ui.label(format!("{}x{}", size[0], size[1]));
                ui.separator();
            }
            ui.label(format!("Zoom: {}", app.main.surface.zoom_label()));
            ui.separator();
            ui.label(format!("Faces: {}", app.main.surface.faces().len()));
            ui.separator();
            ui.label(format!("Display: {}", app.main.surface.display_mode()));
            if app.ui_state.show_original {
                ui.separator();
                let sync = if app.original.surface.is_detached() {
                    "detached"
                } else {
                    "synced"
                };
                ui.label(format!(
                    "Original: {} ({sync})",
                    app.original.surface.zoom_label()
                ));
            }
        });

        ui.add_space(2.0);
    });
}
