//! Zoom/pan synchronization between two rendering surfaces.
//!
//! A [`SyncMessage`] is a full snapshot of a viewport expressed
//! proportionally (scroll position divided by the scaled image size), so it
//! can be applied to a surface of a different size and a lost or reordered
//! message is corrected by the next one.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{SyncConfig, ZoomConfig};
use crate::consts::{DETACH_NOTICE_MS, MIN_PROPORTION_DENOMINATOR};
use crate::error::Result;
use crate::geometry::Vec2;
use crate::timing::{Clock, Throttle};
use crate::viewport::Viewport;

/// Which side of a sync relationship produced a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SyncRole {
    /// The main review surface.
    #[default]
    Primary,
    /// A linked "original" view.
    Secondary,
}

impl fmt::Display for SyncRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Proportional viewport snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireSyncMessage", into = "WireSyncMessage")]
pub struct SyncMessage {
    pub zoom: f64,
    /// Horizontal scroll divided by the scaled image width.
    pub x: f64,
    /// Vertical scroll divided by the scaled image height.
    pub y: f64,
    pub role: SyncRole,
}

/// On-the-wire shape: `{ zoom, x, y, slave: 0|1 }`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct WireSyncMessage {
    zoom: f64,
    x: f64,
    y: f64,
    #[serde(default)]
    slave: u8,
}

impl From<WireSyncMessage> for SyncMessage {
    fn from(w: WireSyncMessage) -> Self {
        Self {
            zoom: w.zoom,
            x: w.x,
            y: w.y,
            role: if w.slave == 0 {
                SyncRole::Primary
            } else {
                SyncRole::Secondary
            },
        }
    }
}

impl From<SyncMessage> for WireSyncMessage {
    fn from(m: SyncMessage) -> Self {
        Self {
            zoom: m.zoom,
            x: m.x,
            y: m.y,
            slave: match m.role {
                SyncRole::Primary => 0,
                SyncRole::Secondary => 1,
            },
        }
    }
}

impl SyncMessage {
    /// Snapshot a viewport. Proportions are clamped to `[0, ∞)`.
    pub fn from_viewport(vp: &Viewport, role: SyncRole) -> Self {
        let zoom = vp.effective_scale();
        let scroll = vp.scroll_offset();
        let natural = vp.natural_size().unwrap_or_default();
        let denom_x = (natural.width * zoom).max(MIN_PROPORTION_DENOMINATOR);
        let denom_y = (natural.height * zoom).max(MIN_PROPORTION_DENOMINATOR);
        Self {
            zoom,
            x: (scroll.x / denom_x).max(0.0),
            y: (scroll.y / denom_y).max(0.0),
            role,
        }
    }

    /// Clamp malformed values instead of rejecting the message.
    pub fn sanitized(&self, limits: &ZoomConfig, fallback_zoom: f64) -> Self {
        let zoom = if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom
        } else {
            fallback_zoom
        };
        let proportion = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            zoom: limits.clamp(zoom),
            x: proportion(self.x),
            y: proportion(self.y),
            role: self.role,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// How a local viewport change came about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// Zoom commands: sent immediately.
    Discrete,
    /// Scroll, drag and resize: throttled.
    Continuous,
}

/// Transient acknowledgement shown when detachment is toggled.
#[derive(Clone, Debug, PartialEq)]
pub struct DetachNotice {
    pub detached: bool,
    pub expires_at: Duration,
}

impl DetachNotice {
    pub fn text(&self) -> &'static str {
        if self.detached {
            "View sync detached"
        } else {
            "View sync attached"
        }
    }

    pub fn is_visible(&self, now: Duration) -> bool {
        now < self.expires_at
    }
}

/// One side of a sync relationship. Each surface owns its own channel, so
/// the suppression flag is scoped to that relationship.
pub struct SyncChannel<C: Clock> {
    clock: C,
    role: SyncRole,
    detached: bool,
    suppress: bool,
    pending_scroll: Option<Vec2>,
    throttle: Throttle,
}

impl<C: Clock> SyncChannel<C> {
    pub fn new(clock: C, role: SyncRole, config: &SyncConfig) -> Self {
        Self {
            clock,
            role,
            detached: false,
            suppress: false,
            pending_scroll: None,
            throttle: Throttle::new(config.scroll_throttle()),
        }
    }

    pub fn role(&self) -> SyncRole {
        self.role
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// True between an inbound application and the next paint.
    pub fn is_suppressed(&self) -> bool {
        self.suppress
    }

    pub fn has_pending_apply(&self) -> bool {
        self.pending_scroll.is_some()
    }

    pub fn set_config(&mut self, config: &SyncConfig) {
        self.throttle = Throttle::new(config.scroll_throttle());
    }

    /// Message for a local change, or `None` when detached, suppressed or
    /// rate-limited. A rate-limited change is sent later by [`Self::poll`].
    pub fn outbound(&mut self, vp: &Viewport, kind: ChangeKind) -> Option<SyncMessage> {
        if self.detached {
            return None;
        }
        if self.suppress {
            trace!(role = %self.role, "Outbound sync suppressed during inbound apply");
            return None;
        }
        if !vp.has_image() {
            return None;
        }
        let now = self.clock.now();
        let send = match kind {
            ChangeKind::Discrete => {
                self.throttle.mark_fired(now);
                true
            }
            ChangeKind::Continuous => self.throttle.try_fire(now),
        };
        send.then(|| SyncMessage::from_viewport(vp, self.role))
    }

    /// Trailing message for a continuous change that was rate-limited.
    pub fn poll(&mut self, vp: &Viewport) -> Option<SyncMessage> {
        if self.detached || self.suppress {
            self.throttle.clear();
            return None;
        }
        let now = self.clock.now();
        self.throttle
            .take_trailing(now)
            .then(|| SyncMessage::from_viewport(vp, self.role))
    }

    pub fn has_trailing(&self) -> bool {
        self.throttle.is_pending()
    }

    /// Apply a peer's snapshot. Zoom takes effect at once; the scroll offset
    /// is deferred to [`Self::on_paint`] because it depends on settled layout.
    /// Returns false when the message was ignored.
    pub fn receive(&mut self, vp: &mut Viewport, msg: &SyncMessage) -> bool {
        if self.detached {
            debug!(role = %self.role, "Inbound sync ignored: detached");
            return false;
        }
        let Some(natural) = vp.natural_size() else {
            debug!(role = %self.role, "Inbound sync ignored: no image loaded");
            return false;
        };

        let msg = msg.sanitized(vp.limits(), vp.effective_scale());
        self.suppress = true;
        self.throttle.clear();

        vp.set_zoom(msg.zoom);
        let zoom = vp.zoom_factor();
        let scroll = Vec2::new(msg.x * natural.width * zoom, msg.y * natural.height * zoom);
        self.pending_scroll = Some(scroll);
        debug!(role = %self.role, zoom, x = msg.x, y = msg.y, "Inbound sync applied");
        true
    }

    /// Paint callback: applies any deferred scroll and lifts suppression.
    pub fn on_paint(&mut self, vp: &mut Viewport) {
        if let Some(scroll) = self.pending_scroll.take() {
            vp.set_scroll_offset(scroll);
        }
        self.suppress = false;
    }

    /// Call before a user-driven mutation of the viewport. An inbound apply
    /// still waiting for paint is completed first; the mutation then builds
    /// on the peer's view and goes out like any other local change.
    pub fn begin_local_change(&mut self, vp: &mut Viewport) {
        if self.suppress {
            trace!(role = %self.role, "Local change during inbound apply, settling early");
            self.on_paint(vp);
        }
    }

    pub fn set_detached(&mut self, detached: bool) -> DetachNotice {
        if self.detached != detached {
            debug!(role = %self.role, detached, "Sync detachment changed");
        }
        self.detached = detached;
        self.throttle.clear();
        DetachNotice {
            detached,
            expires_at: self.clock.now() + Duration::from_millis(DETACH_NOTICE_MS),
        }
    }

    pub fn toggle_detached(&mut self) -> DetachNotice {
        self.set_detached(!self.detached)
    }
}
