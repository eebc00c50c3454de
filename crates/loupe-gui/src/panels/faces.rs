use loupe_core::events::ReviewEvent;
use loupe_core::face::ConfidenceClass;

use crate::app::LoupeApp;
use crate::panels::section_header;

pub fn show(ctx: &egui::Context, app: &mut LoupeApp) {
    egui::SidePanel::left("faces")
        .default_width(240.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            section_header(ui, "Display", None);
            let mut changed = false;
            changed |= ui
                .checkbox(&mut app.ui_state.show_annotations, "Show annotations")
                .changed();
            changed |= ui
                .checkbox(&mut app.ui_state.single_face, "Active face only")
                .changed();
            changed |= ui
                .checkbox(&mut app.ui_state.auto_center, "Center active face")
                .changed();
            if changed {
                app.apply_toggles();
            }
            ui.checkbox(&mut app.ui_state.show_original, "Original view window");

            ui.separator();
            faces_list(ui, app);
        });
}

fn faces_list(ui: &mut egui::Ui, app: &mut LoupeApp) {
    let bands = app.config.confidence.clone();
    let active = app.main.surface.active_face();
    let rows: Vec<(usize, String, ConfidenceClass, bool)> = app
        .main
        .surface
        .faces()
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let name = f.display_label().unwrap_or("(unnamed)").to_string();
            let class = ConfidenceClass::classify(f.confidence, &bands);
            (i, name, class, f.layout_box().is_some())
        })
        .collect();

    let status = format!("{}", rows.len());
    section_header(ui, "Faces", Some(&status));

    if rows.is_empty() {
        ui.weak("No detections");
        return;
    }

    let mut selected = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for (index, name, class, has_box) in &rows {
            let mut text = egui::RichText::new(format!("{index}. {name}"));
            if !has_box {
                text = text.italics();
            }
            let response = ui
                .selectable_label(active == Some(*index), text)
                .on_hover_text(format!("Confidence: {class}"));
            if response.clicked() {
                selected = Some(*index);
            }
        }
    });

    if let Some(index) = selected {
        app.broadcast(&ReviewEvent::ActiveFaceChanged { index });
    }
}
