use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;

use loupe_core::config::ReviewConfig;
use loupe_core::events::{EventBus, EventKind, ReviewEvent};
use loupe_core::surface::ReviewSurface;
use loupe_core::sync::{SyncMessage, SyncRole};
use loupe_core::timing::SystemClock;

/// Collaborator events every surface subscribes to.
const SURFACE_EVENTS: [EventKind; 4] = [
    EventKind::FacesDetected,
    EventKind::ActiveFaceChanged,
    EventKind::ImageLoaded,
    EventKind::ImageFailed,
];

/// One rendering surface plus its half of the sync link.
pub struct ViewportState {
    pub surface: ReviewSurface<SystemClock>,
    /// Collaborator events delivered by the bus, applied in order.
    mailbox: Rc<RefCell<Vec<ReviewEvent>>>,
    inbox_tx: mpsc::Sender<SyncMessage>,
    inbox: mpsc::Receiver<SyncMessage>,
}

impl ViewportState {
    fn new(clock: SystemClock, role: SyncRole, config: &ReviewConfig) -> Self {
        let (inbox_tx, inbox) = mpsc::channel();
        Self {
            surface: ReviewSurface::new(clock, role, config.clone()),
            mailbox: Rc::new(RefCell::new(Vec::new())),
            inbox_tx,
            inbox,
        }
    }

    /// Main and original surfaces on a shared clock.
    pub fn pair(config: &ReviewConfig) -> (Self, Self) {
        let clock = SystemClock::new();
        let main = Self::new(clock.clone(), SyncRole::Primary, config);
        let original = Self::new(clock, SyncRole::Secondary, config);
        (main, original)
    }

    /// Subscribe this surface to collaborator events and to the peer's
    /// sync snapshots. Snapshots travel over the surface's own channel.
    pub fn connect(&self, bus: &mut EventBus) {
        for kind in SURFACE_EVENTS {
            let mailbox = Rc::clone(&self.mailbox);
            bus.subscribe(kind, move |event| mailbox.borrow_mut().push(event.clone()));
        }

        let role = self.surface.role();
        let tx = self.inbox_tx.clone();
        bus.subscribe(EventKind::SyncView, move |event| {
            if let ReviewEvent::SyncView(msg) = event {
                if msg.role != role {
                    let _ = tx.send(*msg);
                }
            }
        });
    }

    /// Apply collaborator events the bus delivered since the last call.
    pub fn apply_delivered(&mut self) {
        let events = std::mem::take(&mut *self.mailbox.borrow_mut());
        for event in &events {
            self.surface.handle_event(event);
        }
    }

    /// Apply everything pending, then the peer's snapshots. Snapshots are
    /// complete, so applying them in order leaves the latest one in effect.
    pub fn drain_inbox(&mut self) {
        self.apply_delivered();
        while let Ok(msg) = self.inbox.try_recv() {
            self.surface.handle_event(&ReviewEvent::ApplyView(msg));
        }
    }
}
