use std::fmt;

use tracing::debug;

use crate::config::ZoomConfig;
use crate::consts::MIN_PROPORTION_DENOMINATOR;
use crate::geometry::{is_valid_size, Affine, Point, Rect, Size, Vec2};

/// Whether the scale is derived from the surface or stored explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoomMode {
    /// Scale is recomputed every frame so the whole image fits.
    #[default]
    Auto,
    /// Scale and pan are stored in the viewport.
    Manual,
}

impl fmt::Display for ZoomMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "Fit"),
            Self::Manual => write!(f, "Manual"),
        }
    }
}

/// Uniform image → surface mapping: `screen = offset + image * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub offset: Vec2,
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec2::ZERO,
    };

    pub fn affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    pub fn image_to_screen(&self, p: Point) -> Point {
        self.affine() * p
    }

    pub fn screen_to_image(&self, p: Point) -> Point {
        self.affine().inverse() * p
    }

    pub fn rect_to_screen(&self, r: Rect) -> Rect {
        self.affine().transform_rect_bbox(r)
    }
}

/// Zoom/pan state of one rendering surface.
#[derive(Clone, Debug)]
pub struct Viewport {
    mode: ZoomMode,
    zoom: f64,
    /// Surface-space position of the image origin. Only meaningful in manual mode.
    pan: Vec2,
    natural_size: Option<Size>,
    surface_size: Size,
    limits: ZoomConfig,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}

impl Viewport {
    pub fn new(limits: ZoomConfig) -> Self {
        Self {
            mode: ZoomMode::Auto,
            zoom: limits.clamp(1.0),
            pan: Vec2::ZERO,
            natural_size: None,
            surface_size: Size::ZERO,
            limits,
        }
    }

    pub fn mode(&self) -> ZoomMode {
        self.mode
    }

    /// Stored zoom factor. Stale while in auto mode; see [`Self::effective_scale`].
    pub fn zoom_factor(&self) -> f64 {
        self.zoom
    }

    pub fn limits(&self) -> &ZoomConfig {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: ZoomConfig) {
        self.limits = limits;
        self.zoom = self.limits.clamp(self.zoom);
    }

    pub fn natural_size(&self) -> Option<Size> {
        self.natural_size
    }

    pub fn surface_size(&self) -> Size {
        self.surface_size
    }

    pub fn has_image(&self) -> bool {
        self.natural_size.is_some()
    }

    /// Set the image dimensions. Invalid sizes are ignored so the viewport
    /// keeps its last valid state.
    pub fn set_natural_size(&mut self, size: Size) -> bool {
        if !is_valid_size(size) {
            debug!(?size, "Ignoring invalid natural size");
            return false;
        }
        self.natural_size = Some(size);
        true
    }

    /// Returns true when the size actually changed.
    pub fn set_surface_size(&mut self, size: Size) -> bool {
        if self.surface_size == size {
            return false;
        }
        self.surface_size = size;
        true
    }

    /// Scale at which the whole image fits the surface, clamped to the zoom limits.
    pub fn fit_scale(&self) -> f64 {
        match self.natural_size {
            Some(n) if is_valid_size(self.surface_size) => {
                let fit = (self.surface_size.width / n.width).min(self.surface_size.height / n.height);
                self.limits.clamp(fit)
            }
            _ => self.limits.clamp(1.0),
        }
    }

    /// Scale actually used for drawing.
    pub fn effective_scale(&self) -> f64 {
        match self.mode {
            ZoomMode::Auto => self.fit_scale(),
            ZoomMode::Manual => self.zoom,
        }
    }

    /// Surface position of the image origin.
    pub fn offset(&self) -> Vec2 {
        match self.mode {
            ZoomMode::Auto => self.centered_offset(self.fit_scale()),
            ZoomMode::Manual => self.pan,
        }
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            scale: self.effective_scale(),
            offset: self.offset(),
        }
    }

    /// Scroll-container view of the pan: how far the surface's top-left
    /// corner sits inside the scaled image.
    pub fn scroll_offset(&self) -> Vec2 {
        -self.offset()
    }

    /// Switches to manual mode and positions the image by scroll offset.
    pub fn set_scroll_offset(&mut self, scroll: Vec2) {
        if !scroll.is_finite() {
            return;
        }
        self.enter_manual();
        self.pan = -scroll;
    }

    /// Scaled image size (`natural * zoom`) with the `max(1, …)` guard used
    /// before an image has loaded.
    pub fn scaled_extent(&self) -> Size {
        let scale = self.effective_scale();
        let natural = self.natural_size.unwrap_or(Size::ZERO);
        Size::new(
            (natural.width * scale).max(MIN_PROPORTION_DENOMINATOR),
            (natural.height * scale).max(MIN_PROPORTION_DENOMINATOR),
        )
    }

    /// On-screen bounds of the image.
    pub fn image_screen_rect(&self) -> Option<Rect> {
        let n = self.natural_size?;
        Some(self.transform().rect_to_screen(n.to_rect()))
    }

    pub fn image_to_screen(&self, p: Point) -> Point {
        self.transform().image_to_screen(p)
    }

    pub fn screen_to_image(&self, p: Point) -> Point {
        self.transform().screen_to_image(p)
    }

    /// Screen point a zoom should pivot on: the cursor when it is over the
    /// image, otherwise the surface center.
    pub fn resolve_anchor(&self, cursor: Option<Point>) -> Point {
        let over_image = match (cursor, self.image_screen_rect()) {
            (Some(c), Some(r)) => c.is_finite() && r.contains(c),
            _ => false,
        };
        match cursor {
            Some(c) if over_image => c,
            _ => self.surface_center(),
        }
    }

    pub fn zoom_in(&mut self, cursor: Option<Point>) -> bool {
        let step = self.limits.step;
        self.zoom_by(step, cursor)
    }

    pub fn zoom_out(&mut self, cursor: Option<Point>) -> bool {
        let step = self.limits.step;
        self.zoom_by(1.0 / step, cursor)
    }

    /// Multiply the visible scale by `factor`, keeping the anchor fixed on screen.
    pub fn zoom_by(&mut self, factor: f64, cursor: Option<Point>) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !self.has_image() {
            return false;
        }
        let anchor = self.resolve_anchor(cursor);
        self.enter_manual();
        let target = self.zoom * factor;
        self.zoom_to(target, anchor)
    }

    /// Manual mode at 1:1, anchored at the cursor when it is over the image.
    pub fn reset(&mut self, cursor: Option<Point>) -> bool {
        if !self.has_image() {
            return false;
        }
        let anchor = self.resolve_anchor(cursor);
        let was_auto = self.mode == ZoomMode::Auto;
        self.enter_manual();
        self.zoom_to(1.0, anchor) || was_auto
    }

    /// Back to the derived fit scale. Pan is cleared.
    pub fn auto_fit(&mut self) -> bool {
        let changed = self.mode != ZoomMode::Auto || self.pan != Vec2::ZERO;
        self.mode = ZoomMode::Auto;
        self.pan = Vec2::ZERO;
        if changed {
            debug!("Viewport switched to auto-fit");
        }
        changed
    }

    /// Drag the image by a surface-space delta.
    pub fn pan_by(&mut self, delta: Vec2) -> bool {
        if !delta.is_finite() || delta == Vec2::ZERO || !self.has_image() {
            return false;
        }
        self.enter_manual();
        self.pan = self.pan + delta;
        true
    }

    /// Scroll so that the given image point sits at the surface center.
    pub fn center_on(&mut self, image_point: Point) -> bool {
        if !image_point.is_finite() || !self.has_image() {
            return false;
        }
        self.enter_manual();
        let pan = self.surface_center().to_vec2() - image_point.to_vec2() * self.zoom;
        let changed = pan != self.pan;
        self.pan = pan;
        changed
    }

    /// Set an explicit zoom in manual mode without moving the anchor point.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let anchor = self.surface_center();
        self.enter_manual();
        self.zoom_to(zoom, anchor)
    }

    /// Rescale to `target` (clamped) so the image point under `anchor` stays put.
    fn zoom_to(&mut self, target: f64, anchor: Point) -> bool {
        let new_zoom = self.limits.clamp(target);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        let anchor = anchor.to_vec2();
        let image_point = (anchor - self.pan) / self.zoom;
        self.zoom = new_zoom;
        self.pan = anchor - image_point * new_zoom;
        true
    }

    /// Snapshot the visible auto-fit scale and offset so that leaving auto
    /// mode does not make the image jump.
    fn enter_manual(&mut self) {
        if self.mode == ZoomMode::Auto {
            let fit = self.fit_scale();
            self.pan = self.centered_offset(fit);
            self.zoom = fit;
            self.mode = ZoomMode::Manual;
            debug!(zoom = self.zoom, "Viewport switched to manual");
        }
    }

    fn surface_center(&self) -> Point {
        self.surface_size.to_rect().center()
    }

    fn centered_offset(&self, scale: f64) -> Vec2 {
        match self.natural_size {
            Some(n) => Vec2::new(
                (self.surface_size.width - n.width * scale) / 2.0,
                (self.surface_size.height - n.height * scale) / 2.0,
            ),
            None => Vec2::ZERO,
        }
    }
}
