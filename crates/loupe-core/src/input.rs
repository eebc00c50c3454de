//! Keyboard gesture recognition for the zoom keys.
//!
//! Raw key-down/key-up timing is turned into exactly one outcome per gesture:
//! a tap (single zoom step), a hold (continuous zoom ticks until release) or
//! a double-tap (reset to 1:1 for zoom-in, auto-fit for zoom-out).
//!
//! The recognizer is a plain state machine polled against a [`Clock`]; it
//! owns no timers, so dropping a gesture is just a state change.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::config::InputConfig;
use crate::timing::Clock;

/// The two zoom keys (`+` and `-`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZoomDirection {
    In,
    Out,
}

impl fmt::Display for ZoomDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "+"),
            Self::Out => write!(f, "-"),
        }
    }
}

/// Discrete zoom intent produced by the recognizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomCommand {
    /// One fixed zoom step (tap).
    Step(ZoomDirection),
    /// `ticks` hold ticks, each applying the small hold step.
    Continuous { direction: ZoomDirection, ticks: u32 },
    /// Double-tap on `+`.
    ResetActualSize,
    /// Double-tap on `-`.
    AutoFit,
}

impl ZoomCommand {
    fn double_tap(direction: ZoomDirection) -> Self {
        match direction {
            ZoomDirection::In => Self::ResetActualSize,
            ZoomDirection::Out => Self::AutoFit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GestureState {
    Idle,
    /// Key is down, not yet long enough to be a hold.
    Pressed { key: ZoomDirection, since: Duration },
    /// Key is held; `next_tick` is when the next continuous tick is due.
    Holding { key: ZoomDirection, next_tick: Duration },
    /// A tap finished; waiting to see whether a second one follows.
    TapPending { key: ZoomDirection, released_at: Duration },
    /// Second press inside the double-tap window.
    SecondPress { key: ZoomDirection, since: Duration },
}

/// Tap / hold / double-tap recognizer for the zoom keys.
pub struct ContinuousInputController<C: Clock> {
    clock: C,
    config: InputConfig,
    state: GestureState,
}

impl<C: Clock> ContinuousInputController<C> {
    pub fn new(clock: C, config: InputConfig) -> Self {
        Self {
            clock,
            config,
            state: GestureState::Idle,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn set_config(&mut self, config: InputConfig) {
        self.config = config;
        self.cancel();
    }

    /// True while a gesture is in progress and [`Self::poll`] must keep being called.
    pub fn is_active(&self) -> bool {
        self.state != GestureState::Idle
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.state, GestureState::Holding { .. })
    }

    /// Time until the recognizer next needs polling, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        let now = self.clock.now();
        let due = match self.state {
            GestureState::Idle => return None,
            GestureState::Pressed { since, .. } | GestureState::SecondPress { since, .. } => {
                since + self.config.hold_threshold()
            }
            GestureState::Holding { next_tick, .. } => next_tick,
            GestureState::TapPending { released_at, .. } => {
                released_at + self.config.double_tap_window() + Duration::from_millis(1)
            }
        };
        Some(due.saturating_sub(now))
    }

    pub fn key_down(&mut self, key: ZoomDirection) -> Vec<ZoomCommand> {
        let now = self.clock.now();
        let mut out = self.advance(now);

        self.state = match self.state {
            GestureState::Idle => GestureState::Pressed { key, since: now },
            // Auto-repeat from the OS.
            GestureState::Pressed { key: k, .. }
            | GestureState::Holding { key: k, .. }
            | GestureState::SecondPress { key: k, .. }
                if k == key =>
            {
                return out;
            }
            GestureState::Pressed { .. }
            | GestureState::Holding { .. }
            | GestureState::SecondPress { .. } => {
                debug!(%key, "Zoom gesture interrupted by other key");
                GestureState::Pressed { key, since: now }
            }
            GestureState::TapPending { key: k, released_at } => {
                if k == key && now.saturating_sub(released_at) <= self.config.double_tap_window() {
                    GestureState::SecondPress { key, since: now }
                } else {
                    out.push(ZoomCommand::Step(k));
                    GestureState::Pressed { key, since: now }
                }
            }
        };
        out
    }

    pub fn key_up(&mut self, key: ZoomDirection) -> Vec<ZoomCommand> {
        let now = self.clock.now();
        let mut out = self.advance(now);

        match self.state {
            GestureState::Pressed { key: k, .. } if k == key => {
                self.state = GestureState::TapPending {
                    key,
                    released_at: now,
                };
            }
            GestureState::SecondPress { key: k, .. } if k == key => {
                out.push(ZoomCommand::double_tap(key));
                self.state = GestureState::Idle;
            }
            GestureState::Holding { key: k, .. } if k == key => {
                debug!(%key, "Continuous zoom stopped");
                self.state = GestureState::Idle;
            }
            _ => {}
        }
        out
    }

    /// Emits whatever became due since the last call: hold ticks or a
    /// deferred tap whose double-tap window expired.
    pub fn poll(&mut self) -> Vec<ZoomCommand> {
        let now = self.clock.now();
        self.advance(now)
    }

    /// Drop any gesture in progress without emitting anything.
    pub fn cancel(&mut self) {
        if self.state != GestureState::Idle {
            debug!("Zoom gesture cancelled");
        }
        self.state = GestureState::Idle;
    }

    fn advance(&mut self, now: Duration) -> Vec<ZoomCommand> {
        let mut out = Vec::new();
        let threshold = self.config.hold_threshold();

        match self.state {
            GestureState::TapPending { key, released_at }
                if now.saturating_sub(released_at) > self.config.double_tap_window() =>
            {
                out.push(ZoomCommand::Step(key));
                self.state = GestureState::Idle;
            }
            GestureState::Pressed { key, since } if now.saturating_sub(since) >= threshold => {
                debug!(%key, "Continuous zoom started");
                self.state = GestureState::Holding {
                    key,
                    next_tick: since + threshold,
                };
            }
            GestureState::SecondPress { key, since } if now.saturating_sub(since) >= threshold => {
                // The first tap stands on its own; the second press is a hold.
                out.push(ZoomCommand::Step(key));
                self.state = GestureState::Holding {
                    key,
                    next_tick: since + threshold,
                };
            }
            _ => {}
        }

        if let GestureState::Holding { key, next_tick } = self.state {
            if now >= next_tick {
                let interval = self.config.tick_interval();
                let elapsed = now - next_tick;
                let ticks = (elapsed.as_nanos() / interval.as_nanos()) as u32 + 1;
                self.state = GestureState::Holding {
                    key,
                    next_tick: next_tick + interval * ticks,
                };
                out.push(ZoomCommand::Continuous {
                    direction: key,
                    ticks,
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::ManualClock;

    #[test]
    fn autorepeat_key_down_is_ignored() {
        let clock = ManualClock::new();
        let mut ctl = ContinuousInputController::new(clock.clone(), InputConfig::default());
        assert!(ctl.key_down(ZoomDirection::In).is_empty());
        clock.advance_ms(30);
        assert!(ctl.key_down(ZoomDirection::In).is_empty());
        clock.advance_ms(30);
        assert!(ctl.key_up(ZoomDirection::In).is_empty());
        clock.advance_ms(300);
        assert_eq!(ctl.poll(), vec![ZoomCommand::Step(ZoomDirection::In)]);
    }

    #[test]
    fn next_deadline_tracks_state() {
        let clock = ManualClock::new();
        let mut ctl = ContinuousInputController::new(clock.clone(), InputConfig::default());
        assert_eq!(ctl.next_deadline(), None);
        ctl.key_down(ZoomDirection::Out);
        clock.advance_ms(50);
        assert_eq!(ctl.next_deadline(), Some(Duration::from_millis(150)));
    }
}
