#![allow(dead_code)]

use loupe_core::config::ReviewConfig;
use loupe_core::face::{Face, FaceBox};
use loupe_core::geometry::Size;
use loupe_core::surface::ReviewSurface;
use loupe_core::sync::SyncRole;
use loupe_core::timing::ManualClock;
use loupe_core::viewport::Viewport;

/// Viewport with a 1000x800 image on a 500x400 surface (fit scale 0.5).
pub fn loaded_viewport() -> Viewport {
    viewport_with(Size::new(1000.0, 800.0), Size::new(500.0, 400.0))
}

pub fn viewport_with(natural: Size, surface: Size) -> Viewport {
    let mut vp = Viewport::default();
    vp.set_surface_size(surface);
    vp.set_natural_size(natural);
    vp
}

/// Surface on a manual clock with the standard test image loaded.
pub fn loaded_surface(role: SyncRole) -> (ReviewSurface<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let mut surface = ReviewSurface::new(clock.clone(), role, ReviewConfig::default());
    surface.set_surface_size(Size::new(500.0, 400.0));
    surface.handle_event(&loupe_core::events::ReviewEvent::ImageLoaded {
        path: "photo.jpg".into(),
        dimensions: Size::new(1000.0, 800.0),
    });
    // Let the initial resize settle so it does not leak into assertions.
    clock.advance_ms(500);
    surface.tick();
    surface.take_events();
    (surface, clock)
}

/// A tight row of labelled faces whose labels are wider than the gaps.
pub fn crowded_faces(count: usize) -> Vec<Face> {
    (0..count)
        .map(|i| {
            Face::labelled(
                FaceBox::new(100.0 + i as f64 * 45.0, 300.0, 40.0, 40.0),
                format!("Person number {i}"),
            )
        })
        .collect()
}
