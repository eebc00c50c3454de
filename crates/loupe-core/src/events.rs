use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use tracing::trace;

use crate::face::Face;
use crate::geometry::Size;
use crate::sync::SyncMessage;

/// Everything that flows between the engine and its collaborators.
#[derive(Clone, Debug, PartialEq)]
pub enum ReviewEvent {
    /// New detection result; replaces the face set wholesale.
    FacesDetected { faces: Vec<Face> },
    /// The reviewer moved to another face.
    ActiveFaceChanged { index: usize },
    ImageLoaded { path: PathBuf, dimensions: Size },
    ImageFailed { path: PathBuf, reason: String },
    /// Outbound snapshot of a local viewport.
    SyncView(SyncMessage),
    /// Snapshot to apply to a peer viewport.
    ApplyView(SyncMessage),
    DetachToggled { detached: bool },
}

/// Payload-free discriminant used for subscriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    FacesDetected,
    ActiveFaceChanged,
    ImageLoaded,
    ImageFailed,
    SyncView,
    ApplyView,
    DetachToggled,
}

impl ReviewEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::FacesDetected { .. } => EventKind::FacesDetected,
            Self::ActiveFaceChanged { .. } => EventKind::ActiveFaceChanged,
            Self::ImageLoaded { .. } => EventKind::ImageLoaded,
            Self::ImageFailed { .. } => EventKind::ImageFailed,
            Self::SyncView(_) => EventKind::SyncView,
            Self::ApplyView(_) => EventKind::ApplyView,
            Self::DetachToggled { .. } => EventKind::DetachToggled,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FacesDetected => "faces-detected",
            Self::ActiveFaceChanged => "active-face-changed",
            Self::ImageLoaded => "image-loaded",
            Self::ImageFailed => "image-failed",
            Self::SyncView => "sync-view",
            Self::ApplyView => "apply-view",
            Self::DetachToggled => "detach-toggled",
        };
        write!(f, "{name}")
    }
}

type Handler = Box<dyn FnMut(&ReviewEvent)>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Single-threaded publish/subscribe dispatcher keyed by [`EventKind`].
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<(SubscriptionId, Handler)>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&ReviewEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(kind)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.handlers.values_mut() {
            if let Some(pos) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Deliver to every handler of the event's kind, in subscription order.
    /// Returns how many handlers ran.
    pub fn publish(&mut self, event: &ReviewEvent) -> usize {
        let kind = event.kind();
        let Some(list) = self.handlers.get_mut(&kind) else {
            trace!(%kind, "No subscribers");
            return 0;
        };
        for (_, handler) in list.iter_mut() {
            handler(event);
        }
        list.len()
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn publish_reaches_only_matching_kind() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(EventKind::ActiveFaceChanged, move |e| {
            if let ReviewEvent::ActiveFaceChanged { index } = e {
                sink.borrow_mut().push(*index);
            }
        });

        assert_eq!(bus.publish(&ReviewEvent::ActiveFaceChanged { index: 3 }), 1);
        assert_eq!(bus.publish(&ReviewEvent::DetachToggled { detached: true }), 0);
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn unsubscribe_removes_handler() {
        let mut bus = EventBus::new();
        let id = bus.subscribe(EventKind::SyncView, |_| {});
        assert_eq!(bus.subscriber_count(EventKind::SyncView), 1);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(EventKind::SyncView), 0);
    }
}
