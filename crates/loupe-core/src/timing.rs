use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source. Readings are durations since an arbitrary epoch
/// fixed when the clock was created.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Clone, Debug)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Hand-driven clock. Clones share the same reading, so one handle can be
/// given to the component under test and the other kept to advance time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn set(&self, at: Duration) {
        self.now.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Leading-edge rate limiter with a trailing flag: a call inside the quiet
/// interval is remembered so the caller can flush it later.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last_fire: Option<Duration>,
    pending: bool,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fire: None,
            pending: false,
        }
    }

    /// Returns true if the caller may act now; otherwise the request is
    /// recorded as pending.
    pub fn try_fire(&mut self, now: Duration) -> bool {
        let ready = match self.last_fire {
            Some(last) => now.saturating_sub(last) >= self.interval,
            None => true,
        };
        if ready {
            self.last_fire = Some(now);
            self.pending = false;
        } else {
            self.pending = true;
        }
        ready
    }

    /// Consumes a pending request once the interval has elapsed.
    pub fn take_trailing(&mut self, now: Duration) -> bool {
        if self.pending && self.try_fire(now) {
            return true;
        }
        false
    }

    /// Mark an emission that bypassed the throttle (discrete changes).
    pub fn mark_fired(&mut self, now: Duration) {
        self.last_fire = Some(now);
        self.pending = false;
    }

    pub fn clear(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Trailing-edge debouncer: fires once the input has been quiet for `delay`.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Duration>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now: Duration) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once per quiet period.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
