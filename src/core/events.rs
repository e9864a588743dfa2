// src/core/events.rs — Session mutation events

use tokio::sync::broadcast;

use crate::core::session::Session;

/// Published on every session mutation so a UI or log collector can render
/// current state without racing the scheduler's writes. Payloads are full
/// snapshots; receivers never observe a half-applied update.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Created(Session),
    Started(Session),
    IterationRecorded(Session),
    Stopped(Session),
    Completed(Session),
    Deleted { id: String },
}

impl SessionEvent {
    /// Session id the event concerns.
    pub fn session_id(&self) -> &str {
        match self {
            SessionEvent::Created(s)
            | SessionEvent::Started(s)
            | SessionEvent::IterationRecorded(s)
            | SessionEvent::Stopped(s)
            | SessionEvent::Completed(s) => &s.id,
            SessionEvent::Deleted { id } => id,
        }
    }
}

/// Broadcast fan-out for session events. Cloning shares the channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Send to all current subscribers; dropped silently when nobody listens.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
