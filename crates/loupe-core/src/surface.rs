//! One rendering surface: viewport, keyboard gestures, view sync and the
//! current face set, wired together.
//!
//! The renderer feeds raw input and collaborator events in, calls
//! [`ReviewSurface::tick`] and [`ReviewSurface::on_paint`] once per frame,
//! and drains produced events with [`ReviewSurface::take_events`].

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ReviewConfig;
use crate::events::ReviewEvent;
use crate::face::{DisplayMode, Face};
use crate::geometry::{Point, Size, Vec2};
use crate::input::{ContinuousInputController, ZoomCommand, ZoomDirection};
use crate::layout::{AnnotationLayout, LayoutRequest, TextMeasure};
use crate::sync::{ChangeKind, DetachNotice, SyncChannel, SyncMessage, SyncRole};
use crate::timing::{Clock, Debouncer};
use crate::viewport::{ViewTransform, Viewport, ZoomMode};

/// Surface-local keyboard contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKey {
    /// `+`: tap = step, hold = continuous, double-tap = 1:1.
    ZoomIn,
    /// `-`: tap = step, hold = continuous, double-tap = fit.
    ZoomOut,
    /// `=`
    ActualSize,
    /// `a` / `0`
    AutoFit,
    /// `x` / `X`
    ToggleDetach,
}

impl SurfaceKey {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::ZoomIn),
            '-' => Some(Self::ZoomOut),
            '=' => Some(Self::ActualSize),
            'a' | '0' => Some(Self::AutoFit),
            'x' | 'X' => Some(Self::ToggleDetach),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct LayoutKey {
    transform: ViewTransform,
    faces_revision: u64,
    mode: DisplayMode,
}

pub struct ReviewSurface<C: Clock + Clone> {
    clock: C,
    config: ReviewConfig,
    viewport: Viewport,
    input: ContinuousInputController<C>,
    sync: SyncChannel<C>,
    resize: Debouncer,
    cursor: Option<Point>,
    faces: Vec<Face>,
    faces_revision: u64,
    active_face: Option<usize>,
    single_face_mode: bool,
    annotations_visible: bool,
    auto_center: bool,
    image_path: Option<PathBuf>,
    load_failed: bool,
    notice: Option<DetachNotice>,
    layout: Option<(LayoutKey, AnnotationLayout)>,
    events: Vec<ReviewEvent>,
}

impl<C: Clock + Clone> ReviewSurface<C> {
    pub fn new(clock: C, role: SyncRole, config: ReviewConfig) -> Self {
        Self {
            viewport: Viewport::new(config.zoom.clone()),
            input: ContinuousInputController::new(clock.clone(), config.input.clone()),
            sync: SyncChannel::new(clock.clone(), role, &config.sync),
            resize: Debouncer::new(config.sync.resize_debounce()),
            clock,
            config,
            cursor: None,
            faces: Vec::new(),
            faces_revision: 0,
            active_face: None,
            single_face_mode: false,
            annotations_visible: true,
            auto_center: false,
            image_path: None,
            load_failed: false,
            notice: None,
            layout: None,
            events: Vec::new(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ReviewConfig) {
        self.viewport.set_limits(config.zoom.clone());
        self.input.set_config(config.input.clone());
        self.sync.set_config(&config.sync);
        self.resize = Debouncer::new(config.sync.resize_debounce());
        self.config = config;
        self.layout = None;
    }

    pub fn role(&self) -> SyncRole {
        self.sync.role()
    }

    pub fn is_detached(&self) -> bool {
        self.sync.is_detached()
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn active_face(&self) -> Option<usize> {
        self.active_face
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    /// True when the last image load failed; the renderer shows a placeholder.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn set_auto_center(&mut self, enabled: bool) {
        self.auto_center = enabled;
    }

    pub fn set_single_face_mode(&mut self, enabled: bool) {
        self.single_face_mode = enabled;
    }

    pub fn set_annotations_visible(&mut self, visible: bool) {
        self.annotations_visible = visible;
    }

    pub fn display_mode(&self) -> DisplayMode {
        if !self.annotations_visible {
            return DisplayMode::None;
        }
        match (self.single_face_mode, self.active_face) {
            (true, Some(i)) => DisplayMode::Single(i),
            (true, None) => DisplayMode::None,
            (false, _) => DisplayMode::All,
        }
    }

    /// Visible detach/attach acknowledgement, if one is still showing.
    pub fn notice(&self) -> Option<&DetachNotice> {
        let now = self.clock.now();
        self.notice.as_ref().filter(|n| n.is_visible(now))
    }

    /// True while something time-based is pending and frames must keep coming.
    pub fn needs_tick(&self) -> bool {
        self.input.is_active()
            || self.sync.has_trailing()
            || self.sync.has_pending_apply()
            || self.resize.is_armed()
            || self.notice().is_some()
    }

    pub fn set_cursor(&mut self, cursor: Option<Point>) {
        self.cursor = cursor;
    }

    pub fn set_surface_size(&mut self, size: Size) {
        if self.viewport.set_surface_size(size) {
            self.resize.trigger(self.clock.now());
        }
    }

    pub fn key_down(&mut self, key: SurfaceKey) {
        match key {
            SurfaceKey::ZoomIn => {
                let cmds = self.input.key_down(ZoomDirection::In);
                self.apply_commands(cmds);
            }
            SurfaceKey::ZoomOut => {
                let cmds = self.input.key_down(ZoomDirection::Out);
                self.apply_commands(cmds);
            }
            SurfaceKey::ActualSize => {
                self.input.cancel();
                self.apply_command(ZoomCommand::ResetActualSize);
            }
            SurfaceKey::AutoFit => {
                self.input.cancel();
                self.apply_command(ZoomCommand::AutoFit);
            }
            SurfaceKey::ToggleDetach => self.toggle_detached(),
        }
    }

    pub fn key_up(&mut self, key: SurfaceKey) {
        let cmds = match key {
            SurfaceKey::ZoomIn => self.input.key_up(ZoomDirection::In),
            SurfaceKey::ZoomOut => self.input.key_up(ZoomDirection::Out),
            _ => return,
        };
        self.apply_commands(cmds);
    }

    /// Window lost focus: key-ups will never arrive.
    pub fn focus_lost(&mut self) {
        self.input.cancel();
    }

    /// Mouse wheel / pinch zoom around the cursor.
    pub fn wheel_zoom(&mut self, factor: f64) {
        self.sync.begin_local_change(&mut self.viewport);
        if self.viewport.zoom_by(factor, self.cursor) {
            self.local_change(ChangeKind::Continuous);
        }
    }

    /// Drag panning in surface pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.sync.begin_local_change(&mut self.viewport);
        if self.viewport.pan_by(delta) {
            self.local_change(ChangeKind::Continuous);
        }
    }

    pub fn apply_command(&mut self, cmd: ZoomCommand) {
        self.sync.begin_local_change(&mut self.viewport);
        let cursor = self.cursor;
        let changed = match cmd {
            ZoomCommand::Step(ZoomDirection::In) => self.viewport.zoom_in(cursor),
            ZoomCommand::Step(ZoomDirection::Out) => self.viewport.zoom_out(cursor),
            ZoomCommand::Continuous { direction, ticks } => {
                let step = self.config.input.hold_step.powi(ticks as i32);
                let factor = match direction {
                    ZoomDirection::In => step,
                    ZoomDirection::Out => 1.0 / step,
                };
                self.viewport.zoom_by(factor, cursor)
            }
            ZoomCommand::ResetActualSize => self.viewport.reset(cursor),
            ZoomCommand::AutoFit => self.viewport.auto_fit(),
        };
        if changed {
            self.local_change(ChangeKind::Discrete);
        }
    }

    fn apply_commands(&mut self, cmds: Vec<ZoomCommand>) {
        for cmd in cmds {
            self.apply_command(cmd);
        }
    }

    pub fn toggle_detached(&mut self) {
        let notice = self.sync.toggle_detached();
        info!(role = %self.sync.role(), detached = notice.detached, "{}", notice.text());
        self.events.push(ReviewEvent::DetachToggled {
            detached: notice.detached,
        });
        self.notice = Some(notice);
    }

    /// Per-frame housekeeping: hold ticks, deferred taps, trailing sync
    /// messages and settled resizes.
    pub fn tick(&mut self) {
        let cmds = self.input.poll();
        self.apply_commands(cmds);

        if self.resize.poll(self.clock.now()) {
            debug!(size = ?self.viewport.surface_size(), "Surface resize settled");
            if let Some(msg) = self.sync.outbound(&self.viewport, ChangeKind::Discrete) {
                self.events.push(ReviewEvent::SyncView(msg));
            }
        }

        if let Some(msg) = self.sync.poll(&self.viewport) {
            self.events.push(ReviewEvent::SyncView(msg));
        }
    }

    /// Paint callback; completes any deferred inbound sync.
    pub fn on_paint(&mut self) {
        self.sync.on_paint(&mut self.viewport);
    }

    /// Accept a collaborator event. Returns false for events that do not
    /// apply to a surface or were ignored.
    pub fn handle_event(&mut self, event: &ReviewEvent) -> bool {
        match event {
            ReviewEvent::FacesDetected { faces } => {
                self.set_faces(faces.clone());
                true
            }
            ReviewEvent::ActiveFaceChanged { index } => {
                self.set_active_face(*index);
                true
            }
            ReviewEvent::ImageLoaded { path, dimensions } => {
                self.image_loaded(path, *dimensions);
                !self.load_failed
            }
            ReviewEvent::ImageFailed { path, reason } => {
                warn!(path = %path.display(), %reason, "Image failed to load");
                self.load_failed = true;
                self.input.cancel();
                true
            }
            ReviewEvent::ApplyView(msg) => self.receive(msg),
            ReviewEvent::SyncView(_) | ReviewEvent::DetachToggled { .. } => false,
        }
    }

    /// Apply a peer's view snapshot.
    pub fn receive(&mut self, msg: &SyncMessage) -> bool {
        let applied = self.sync.receive(&mut self.viewport, msg);
        if applied {
            self.input.cancel();
        }
        applied
    }

    pub fn set_faces(&mut self, faces: Vec<Face>) {
        debug!(count = faces.len(), "Face set replaced");
        self.faces = faces;
        self.faces_revision += 1;
        if self.active_face.is_some_and(|i| i >= self.faces.len()) {
            self.active_face = None;
        }
    }

    pub fn set_active_face(&mut self, index: usize) {
        if index >= self.faces.len() {
            debug!(index, count = self.faces.len(), "Active face out of range");
            self.active_face = None;
            return;
        }
        self.active_face = Some(index);
        if self.auto_center {
            if let Some(bbox) = self.faces[index].layout_box() {
                self.sync.begin_local_change(&mut self.viewport);
                if self.viewport.center_on(bbox.center()) {
                    self.local_change(ChangeKind::Discrete);
                }
            }
        }
    }

    fn image_loaded(&mut self, path: &Path, dimensions: Size) {
        self.input.cancel();
        if !self.viewport.set_natural_size(dimensions) {
            warn!(path = %path.display(), ?dimensions, "Image reported invalid dimensions");
            self.load_failed = true;
            return;
        }
        info!(path = %path.display(), width = dimensions.width, height = dimensions.height, "Image loaded");
        self.image_path = Some(path.to_path_buf());
        self.load_failed = false;
        self.viewport.auto_fit();
        self.layout = None;
    }

    fn local_change(&mut self, kind: ChangeKind) {
        if let Some(msg) = self.sync.outbound(&self.viewport, kind) {
            self.events.push(ReviewEvent::SyncView(msg));
        }
    }

    /// Drain produced events (sync snapshots, detach toggles).
    pub fn take_events(&mut self) -> Vec<ReviewEvent> {
        std::mem::take(&mut self.events)
    }

    /// Label layout for the current transform and face set, recomputed only
    /// when either changed.
    pub fn layout(&mut self, measure: &dyn TextMeasure) -> Option<&AnnotationLayout> {
        let natural = self.viewport.natural_size()?;
        if self.load_failed {
            return None;
        }
        let key = LayoutKey {
            transform: self.viewport.transform(),
            faces_revision: self.faces_revision,
            mode: self.display_mode(),
        };
        let stale = self.layout.as_ref().map_or(true, |(k, _)| *k != key);
        if stale {
            let request = LayoutRequest {
                faces: &self.faces,
                transform: key.transform,
                natural_size: natural,
                mode: key.mode,
            };
            let layout = AnnotationLayout::compute(
                &request,
                &self.config.layout,
                &self.config.confidence,
                measure,
            );
            self.layout = Some((key, layout));
        }
        self.layout.as_ref().map(|(_, l)| l)
    }

    pub fn zoom_label(&self) -> String {
        let pct = self.viewport.effective_scale() * 100.0;
        match self.viewport.mode() {
            ZoomMode::Auto => format!("Fit ({pct:.0}%)"),
            ZoomMode::Manual => format!("{pct:.0}%"),
        }
    }
}
