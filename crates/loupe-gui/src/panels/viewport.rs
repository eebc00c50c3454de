use std::time::Duration;

use loupe_core::face::ConfidenceClass;
use loupe_core::geometry::{Point, Rect, Size, Vec2};
use loupe_core::surface::{ReviewSurface, SurfaceKey};
use loupe_core::timing::SystemClock;

use crate::app::LoupeApp;
use crate::states::ViewportState;

const LABEL_FONT_SIZE: f32 = 13.0;
const WHEEL_ZOOM_SENSITIVITY: f32 = 0.005;
const TICK_REPAINT: Duration = Duration::from_millis(16);

/// Main review view in the central panel.
pub fn show(ctx: &egui::Context, app: &mut LoupeApp) {
    let texture = app.texture.clone();
    egui::CentralPanel::default().show(ctx, |ui| {
        surface_ui(ui, &mut app.main, texture.as_ref(), "Main");
    });
}

/// Linked original view in its own native window.
pub fn show_original(ctx: &egui::Context, app: &mut LoupeApp) {
    // Keep consuming peer messages while hidden so the view is current when reopened.
    app.original.drain_inbox();
    if !app.ui_state.show_original {
        return;
    }

    let texture = app.texture.clone();
    let original = &mut app.original;
    let mut close = false;
    ctx.show_viewport_immediate(
        egui::ViewportId::from_hash_of("loupe_original_view"),
        egui::ViewportBuilder::default()
            .with_title("Loupe - Original")
            .with_inner_size([900.0, 700.0]),
        |ctx, _class| {
            if ctx.input(|i| i.viewport().close_requested()) {
                close = true;
            }
            egui::CentralPanel::default().show(ctx, |ui| {
                surface_ui(ui, original, texture.as_ref(), "Original");
            });
        },
    );
    if close {
        app.ui_state.show_original = false;
    }
}

fn surface_ui(
    ui: &mut egui::Ui,
    view: &mut ViewportState,
    texture: Option<&egui::TextureHandle>,
    title: &str,
) {
    let rect = ui.available_rect_before_wrap();
    paint_background(ui, rect);

    view.drain_inbox();
    let surface = &mut view.surface;
    surface.set_surface_size(Size::new(rect.width() as f64, rect.height() as f64));

    let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
    let cursor = response
        .hover_pos()
        .map(|p| Point::new((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64));
    surface.set_cursor(cursor);

    handle_keys(ui, surface);
    handle_zoom(ui, &response, surface);
    handle_pan(&response, surface);
    if response.double_clicked() {
        surface.key_down(SurfaceKey::AutoFit);
    }
    surface.tick();

    let painter = ui.painter_at(rect);
    match texture {
        Some(texture) if !surface.load_failed() => {
            draw_image(&painter, rect, surface, texture.id());
            draw_annotations(&painter, rect, surface);
            draw_viewing_label(&painter, rect, &format!("{title} \u{b7} {}", surface.zoom_label()));
        }
        _ => show_placeholder(&painter, rect, surface.load_failed()),
    }
    draw_notice(&painter, rect, surface);

    surface.on_paint();
    if surface.needs_tick() {
        ui.ctx().request_repaint_after(TICK_REPAINT);
    }
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn handle_keys(ui: &egui::Ui, surface: &mut ReviewSurface<SystemClock>) {
    let events = ui.input(|i| i.events.clone());
    for event in events {
        match event {
            egui::Event::Key {
                key,
                pressed,
                modifiers,
                ..
            } => {
                if modifiers.command {
                    continue;
                }
                let Some(key) = surface_key(key) else {
                    continue;
                };
                if pressed {
                    surface.key_down(key);
                } else {
                    surface.key_up(key);
                }
            }
            egui::Event::WindowFocused(false) => surface.focus_lost(),
            _ => {}
        }
    }
}

fn surface_key(key: egui::Key) -> Option<SurfaceKey> {
    match key {
        egui::Key::Plus => Some(SurfaceKey::ZoomIn),
        egui::Key::Minus => Some(SurfaceKey::ZoomOut),
        egui::Key::Equals => Some(SurfaceKey::ActualSize),
        egui::Key::A | egui::Key::Num0 => Some(SurfaceKey::AutoFit),
        egui::Key::X => Some(SurfaceKey::ToggleDetach),
        _ => None,
    }
}

fn handle_zoom(ui: &egui::Ui, response: &egui::Response, surface: &mut ReviewSurface<SystemClock>) {
    if !response.hovered() {
        return;
    }
    let (scroll_delta, pinch) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
    if scroll_delta != 0.0 {
        surface.wheel_zoom((scroll_delta * WHEEL_ZOOM_SENSITIVITY).exp() as f64);
    }
    if pinch != 1.0 {
        surface.wheel_zoom(pinch as f64);
    }
}

fn handle_pan(response: &egui::Response, surface: &mut ReviewSurface<SystemClock>) {
    if response.dragged_by(egui::PointerButton::Primary)
        || response.dragged_by(egui::PointerButton::Middle)
    {
        let delta = response.drag_delta();
        surface.pan_by(Vec2::new(delta.x as f64, delta.y as f64));
    }
}

fn to_egui(rect: egui::Rect, r: Rect) -> egui::Rect {
    egui::Rect::from_min_max(
        rect.min + egui::vec2(r.x0 as f32, r.y0 as f32),
        rect.min + egui::vec2(r.x1 as f32, r.y1 as f32),
    )
}

fn to_pos(rect: egui::Rect, p: Point) -> egui::Pos2 {
    rect.min + egui::vec2(p.x as f32, p.y as f32)
}

fn draw_image(
    painter: &egui::Painter,
    rect: egui::Rect,
    surface: &ReviewSurface<SystemClock>,
    texture_id: egui::TextureId,
) {
    let Some(img_rect) = surface.viewport().image_screen_rect() else {
        return;
    };
    painter.image(
        texture_id,
        to_egui(rect, img_rect),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

fn class_color(class: ConfidenceClass) -> egui::Color32 {
    match class {
        ConfidenceClass::High => egui::Color32::from_rgb(80, 200, 120),
        ConfidenceClass::Medium => egui::Color32::from_rgb(240, 180, 60),
        ConfidenceClass::Low => egui::Color32::from_rgb(230, 80, 70),
        ConfidenceClass::Unknown => egui::Color32::from_gray(170),
    }
}

fn draw_annotations(painter: &egui::Painter, rect: egui::Rect, surface: &mut ReviewSurface<SystemClock>) {
    let font = egui::FontId::proportional(LABEL_FONT_SIZE);
    let measure = |text: &str| {
        let galley = painter.layout_no_wrap(text.to_owned(), font.clone(), egui::Color32::WHITE);
        Size::new(galley.size().x as f64, galley.size().y as f64)
    };
    let padding = surface.config().layout.padding as f32;
    let active = surface.active_face();
    let Some(layout) = surface.layout(&measure) else {
        return;
    };

    for face in &layout.faces {
        let color = class_color(face.class);
        let width = if active == Some(face.face_index) { 3.0 } else { 1.5 };
        painter.rect_stroke(
            to_egui(rect, face.box_rect),
            0.0,
            egui::Stroke::new(width, color),
            egui::StrokeKind::Middle,
        );

        let Some(label) = &face.label else {
            continue;
        };
        painter.line_segment(
            [
                to_pos(rect, label.connector.p0),
                to_pos(rect, label.connector.p1),
            ],
            egui::Stroke::new(1.0, color.gamma_multiply(0.8)),
        );
        let label_rect = to_egui(rect, label.rect);
        painter.rect_filled(label_rect, 3.0, egui::Color32::from_black_alpha(190));
        painter.rect_stroke(label_rect, 3.0, egui::Stroke::new(1.0, color), egui::StrokeKind::Inside);
        painter.text(
            label_rect.min + egui::vec2(padding, padding),
            egui::Align2::LEFT_TOP,
            &label.text,
            font.clone(),
            egui::Color32::WHITE,
        );
    }
}

fn draw_viewing_label(painter: &egui::Painter, rect: egui::Rect, label: &str) {
    let label_pos = rect.left_top() + egui::vec2(8.0, 8.0);
    painter.text(
        label_pos,
        egui::Align2::LEFT_TOP,
        label,
        egui::FontId::proportional(14.0),
        egui::Color32::from_white_alpha(200),
    );
}

fn draw_notice(painter: &egui::Painter, rect: egui::Rect, surface: &ReviewSurface<SystemClock>) {
    let Some(notice) = surface.notice() else {
        return;
    };
    let galley = painter.layout_no_wrap(
        notice.text().to_owned(),
        egui::FontId::proportional(16.0),
        egui::Color32::WHITE,
    );
    let toast = egui::Rect::from_center_size(
        egui::pos2(rect.center().x, rect.max.y - 40.0),
        galley.size() + egui::vec2(24.0, 12.0),
    );
    painter.rect_filled(toast, 6.0, egui::Color32::from_black_alpha(200));
    painter.galley(toast.min + egui::vec2(12.0, 6.0), galley, egui::Color32::WHITE);
}

fn show_placeholder(painter: &egui::Painter, rect: egui::Rect, failed: bool) {
    let text = if failed {
        "Image could not be loaded"
    } else {
        "Open an image to begin"
    };
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(18.0),
        egui::Color32::from_gray(100),
    );
}
