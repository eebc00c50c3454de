/// Smallest zoom factor a viewport may hold.
pub const MIN_ZOOM: f64 = 0.05;

/// Largest zoom factor a viewport may hold.
pub const MAX_ZOOM: f64 = 20.0;

/// Multiplicative step applied by a single zoom-in/zoom-out command.
pub const DEFAULT_ZOOM_STEP: f64 = 1.1;

/// Multiplicative step applied on every tick while a zoom key is held.
pub const DEFAULT_HOLD_STEP: f64 = 1.012;

/// Key-down duration (ms) after which a press becomes a hold.
pub const DEFAULT_HOLD_THRESHOLD_MS: u64 = 200;

/// Interval (ms) between continuous zoom ticks while holding.
pub const DEFAULT_HOLD_TICK_MS: u64 = 120;

/// Window (ms) in which a second tap turns into a double-tap.
pub const DEFAULT_DOUBLE_TAP_MS: u64 = 250;

/// Minimum spacing (ms) between outbound sync messages for continuous
/// changes. 16 ms keeps the stream at or below ~60 Hz.
pub const DEFAULT_SCROLL_THROTTLE_MS: u64 = 16;

/// Quiet period (ms) before a surface resize is treated as settled.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 100;

/// How long (ms) the detach/attach acknowledgement stays on screen.
pub const DETACH_NOTICE_MS: u64 = 1500;

/// Gap (px) between a face box and the first search ring.
pub const DEFAULT_LABEL_RADIUS_MARGIN: f64 = 20.0;

/// Distance (px) between successive search rings.
pub const DEFAULT_LABEL_RADIUS_STEP: f64 = 10.0;

/// Number of search rings tried before falling back.
pub const DEFAULT_LABEL_RING_COUNT: usize = 30;

/// Angular increment (degrees) within one search ring.
pub const DEFAULT_LABEL_ANGLE_STEP_DEG: f64 = 15.0;

/// Lower bound (px) for the collision buffer around placed rects.
pub const DEFAULT_LABEL_MIN_BUFFER_PX: f64 = 4.0;

/// Collision buffer as a fraction of the displayed image width.
pub const DEFAULT_LABEL_BUFFER_RATIO: f64 = 0.005;

/// Padding (px) between label text and the label border.
pub const DEFAULT_LABEL_PADDING: f64 = 4.0;

/// Vertical gap (px) between a face box and a fallback label above it.
pub const DEFAULT_LABEL_FALLBACK_GAP: f64 = 6.0;

/// Confidence at or above which a detection counts as high confidence.
pub const DEFAULT_CONFIDENCE_HIGH: f64 = 0.8;

/// Confidence at or above which a detection counts as medium confidence.
pub const DEFAULT_CONFIDENCE_MEDIUM: f64 = 0.5;

/// Guard denominator used before an image has real dimensions.
pub const MIN_PROPORTION_DENOMINATOR: f64 = 1.0;
