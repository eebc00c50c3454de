mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use loupe_core::config::ReviewConfig;
use loupe_core::events::{EventBus, EventKind, ReviewEvent};
use loupe_core::face::DisplayMode;
use loupe_core::geometry::{Point, Size, Vec2};
use loupe_core::layout::MonospaceMeasure;
use loupe_core::surface::{ReviewSurface, SurfaceKey};
use loupe_core::sync::SyncRole;
use loupe_core::timing::ManualClock;
use loupe_core::viewport::ZoomMode;

use common::{crowded_faces, loaded_surface};

fn tap(surface: &mut ReviewSurface<ManualClock>, clock: &ManualClock, key: SurfaceKey) {
    surface.key_down(key);
    clock.advance_ms(40);
    surface.key_up(key);
    clock.advance_ms(40);
}

// ---------------------------------------------------------------------------
// Keyboard contract
// ---------------------------------------------------------------------------

#[test]
fn test_key_characters_map_to_actions() {
    assert_eq!(SurfaceKey::from_char('+'), Some(SurfaceKey::ZoomIn));
    assert_eq!(SurfaceKey::from_char('-'), Some(SurfaceKey::ZoomOut));
    assert_eq!(SurfaceKey::from_char('='), Some(SurfaceKey::ActualSize));
    assert_eq!(SurfaceKey::from_char('a'), Some(SurfaceKey::AutoFit));
    assert_eq!(SurfaceKey::from_char('0'), Some(SurfaceKey::AutoFit));
    assert_eq!(SurfaceKey::from_char('X'), Some(SurfaceKey::ToggleDetach));
    assert_eq!(SurfaceKey::from_char('q'), None);
}

#[test]
fn test_plus_tap_steps_once_after_window() {
    let (mut surface, clock) = loaded_surface(SyncRole::Primary);
    tap(&mut surface, &clock, SurfaceKey::ZoomIn);
    surface.tick();
    assert_eq!(surface.viewport().mode(), ZoomMode::Auto);
    assert!(surface.needs_tick());

    clock.advance_ms(250);
    surface.tick();
    assert_eq!(surface.viewport().mode(), ZoomMode::Manual);
    assert_abs_diff_eq!(surface.viewport().zoom_factor(), 0.55, epsilon = 1e-12);
}

#[test]
fn test_plus_hold_zooms_continuously() {
    let (mut surface, clock) = loaded_surface(SyncRole::Primary);
    surface.key_down(SurfaceKey::ZoomIn);
    for _ in 0..30 {
        clock.advance_ms(16);
        surface.tick();
    }
    surface.key_up(SurfaceKey::ZoomIn);
    clock.advance_ms(1000);
    surface.tick();

    assert_abs_diff_eq!(
        surface.viewport().zoom_factor(),
        0.5 * 1.012_f64.powi(3),
        epsilon = 1e-9
    );
}

#[test]
fn test_double_tap_plus_and_minus() {
    let (mut surface, clock) = loaded_surface(SyncRole::Primary);
    tap(&mut surface, &clock, SurfaceKey::ZoomIn);
    tap(&mut surface, &clock, SurfaceKey::ZoomIn);
    assert_eq!(surface.viewport().mode(), ZoomMode::Manual);
    assert_abs_diff_eq!(surface.viewport().zoom_factor(), 1.0);
    assert_eq!(surface.zoom_label(), "100%");

    clock.advance_ms(500);
    tap(&mut surface, &clock, SurfaceKey::ZoomOut);
    tap(&mut surface, &clock, SurfaceKey::ZoomOut);
    assert_eq!(surface.viewport().mode(), ZoomMode::Auto);
    assert_eq!(surface.zoom_label(), "Fit (50%)");

    clock.advance_ms(1000);
    surface.tick();
    assert_eq!(surface.viewport().mode(), ZoomMode::Auto);
}

#[test]
fn test_actual_size_and_auto_fit_keys_are_immediate() {
    let (mut surface, _clock) = loaded_surface(SyncRole::Primary);
    surface.key_down(SurfaceKey::ActualSize);
    assert_abs_diff_eq!(surface.viewport().effective_scale(), 1.0);

    surface.key_down(SurfaceKey::AutoFit);
    assert_eq!(surface.viewport().mode(), ZoomMode::Auto);
    assert_abs_diff_eq!(surface.viewport().effective_scale(), 0.5);
}

#[test]
fn test_focus_loss_stops_hold() {
    let (mut surface, clock) = loaded_surface(SyncRole::Primary);
    surface.key_down(SurfaceKey::ZoomIn);
    clock.advance_ms(300);
    surface.tick();
    surface.focus_lost();
    clock.advance_ms(1000);
    surface.tick();

    assert_abs_diff_eq!(surface.viewport().zoom_factor(), 0.5 * 1.012, epsilon = 1e-12);
    assert!(!surface.needs_tick());
}

// ---------------------------------------------------------------------------
// Image lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_failed_load_keeps_previous_view() {
    let (mut surface, _clock) = loaded_surface(SyncRole::Primary);
    surface.set_faces(crowded_faces(2));
    surface.key_down(SurfaceKey::ActualSize);

    assert!(surface.handle_event(&ReviewEvent::ImageFailed {
        path: "broken.jpg".into(),
        reason: "truncated".into(),
    }));
    assert!(surface.load_failed());
    assert_eq!(surface.viewport().mode(), ZoomMode::Manual);
    assert_abs_diff_eq!(surface.viewport().zoom_factor(), 1.0);
    assert!(surface.layout(&MonospaceMeasure::default()).is_none());

    assert!(surface.handle_event(&ReviewEvent::ImageLoaded {
        path: "next.jpg".into(),
        dimensions: Size::new(2000.0, 1000.0),
    }));
    assert!(!surface.load_failed());
    assert_eq!(surface.viewport().mode(), ZoomMode::Auto);
    assert_abs_diff_eq!(surface.viewport().effective_scale(), 0.25);
    assert_eq!(surface.image_path().unwrap().to_str(), Some("next.jpg"));
}

#[test]
fn test_invalid_dimensions_are_rejected() {
    let (mut surface, _clock) = loaded_surface(SyncRole::Primary);
    assert!(!surface.handle_event(&ReviewEvent::ImageLoaded {
        path: "empty.png".into(),
        dimensions: Size::new(0.0, 100.0),
    }));
    assert!(surface.load_failed());
    assert_eq!(
        surface.viewport().natural_size(),
        Some(Size::new(1000.0, 800.0))
    );
}

// ---------------------------------------------------------------------------
// Faces
// ---------------------------------------------------------------------------

#[test]
fn test_active_face_auto_center() {
    let (mut surface, clock) = loaded_surface(SyncRole::Primary);
    clock.advance_ms(100);
    assert!(surface.handle_event(&ReviewEvent::FacesDetected {
        faces: crowded_faces(5),
    }));
    surface.set_auto_center(true);

    assert!(surface.handle_event(&ReviewEvent::ActiveFaceChanged { index: 2 }));
    assert_eq!(surface.active_face(), Some(2));

    let center = surface.viewport().image_to_screen(Point::new(210.0, 320.0));
    assert_abs_diff_eq!(center.x, 250.0, epsilon = 1e-9);
    assert_abs_diff_eq!(center.y, 200.0, epsilon = 1e-9);

    let events = surface.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), EventKind::SyncView);
}

#[test]
fn test_active_face_bounds() {
    let (mut surface, _clock) = loaded_surface(SyncRole::Primary);
    surface.set_faces(crowded_faces(3));
    surface.set_active_face(7);
    assert_eq!(surface.active_face(), None);

    surface.set_active_face(2);
    surface.set_faces(crowded_faces(2));
    assert_eq!(surface.active_face(), None);
}

#[test]
fn test_display_mode_follows_toggles() {
    let (mut surface, _clock) = loaded_surface(SyncRole::Primary);
    surface.set_faces(crowded_faces(3));
    assert_eq!(surface.display_mode(), DisplayMode::All);

    surface.set_single_face_mode(true);
    assert_eq!(surface.display_mode(), DisplayMode::None);
    surface.set_active_face(1);
    assert_eq!(surface.display_mode(), DisplayMode::Single(1));

    surface.set_annotations_visible(false);
    assert_eq!(surface.display_mode(), DisplayMode::None);
}

#[test]
fn test_layout_is_cached_until_view_or_faces_change() {
    let (mut surface, clock) = loaded_surface(SyncRole::Primary);
    clock.advance_ms(100);
    surface.set_faces(crowded_faces(3));

    let calls = Cell::new(0usize);
    let measure = |text: &str| {
        calls.set(calls.get() + 1);
        Size::new(text.len() as f64 * 7.0, 14.0)
    };

    assert_eq!(surface.layout(&measure).map(|l| l.faces.len()), Some(3));
    assert_eq!(calls.get(), 3);
    surface.layout(&measure);
    assert_eq!(calls.get(), 3);

    surface.pan_by(Vec2::new(10.0, 0.0));
    surface.layout(&measure);
    assert_eq!(calls.get(), 6);

    surface.set_single_face_mode(true);
    assert_eq!(surface.layout(&measure).map(|l| l.faces.len()), Some(0));
    assert_eq!(calls.get(), 6);
}

#[test]
fn test_layout_requires_an_image() {
    let mut surface =
        ReviewSurface::new(ManualClock::new(), SyncRole::Primary, ReviewConfig::default());
    surface.set_faces(crowded_faces(2));
    assert!(surface.layout(&MonospaceMeasure::default()).is_none());
}

// ---------------------------------------------------------------------------
// Event routing
// ---------------------------------------------------------------------------

#[test]
fn test_bus_routes_sync_between_surfaces() {
    let (mut main, clock) = loaded_surface(SyncRole::Primary);
    let original = Rc::new(RefCell::new(loaded_surface(SyncRole::Secondary).0));
    clock.advance_ms(100);

    let mut bus = EventBus::new();
    let peer = Rc::clone(&original);
    bus.subscribe(EventKind::SyncView, move |event| {
        if let ReviewEvent::SyncView(msg) = event {
            peer.borrow_mut().handle_event(&ReviewEvent::ApplyView(*msg));
        }
    });

    main.key_down(SurfaceKey::ActualSize);
    for event in main.take_events() {
        assert_eq!(bus.publish(&event), 1);
    }
    original.borrow_mut().on_paint();

    let original = original.borrow();
    assert_abs_diff_eq!(original.viewport().effective_scale(), 1.0);
    assert!(!main.handle_event(&ReviewEvent::SyncView(
        loupe_core::sync::SyncMessage::from_viewport(original.viewport(), SyncRole::Secondary)
    )));
}
